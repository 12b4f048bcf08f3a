//! Input sources feeding the controller.
//!
//! - `gesture`: classified button gestures and handler registration
//! - `console`: stdin stand-in for the button and the remote controller

pub mod console;
pub mod gesture;

pub use gesture::{ButtonRegistry, Gesture, GestureClassifier, GestureEvent};
