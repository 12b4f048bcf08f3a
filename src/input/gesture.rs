//! Button gestures and the classifier interface.
//!
//! Debouncing and press-length classification happen in the classifier
//! itself. The core only registers handlers per input and gesture and sets
//! the evaluation delay. [`ButtonRegistry`] is the in-process classifier used
//! on the host: something upstream decides which gesture happened and calls
//! [`ButtonRegistry::dispatch`].

use log::{debug, info};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use strum::{Display, EnumString};

/// Identifier of a physical input (its GPIO number).
pub type InputId = u8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Gesture {
    ShortPress,
    /// Held past the long threshold but released before the very long one.
    LongPress,
    /// Held past the very long threshold.
    VeryLongPress,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureEvent {
    pub input: InputId,
    pub gesture: Gesture,
}

impl GestureEvent {
    pub fn new(input: InputId, gesture: Gesture) -> Self {
        Self { input, gesture }
    }
}

pub type GestureHandler = Box<dyn Fn(GestureEvent) + Send + Sync>;

type SharedHandler = Arc<dyn Fn(GestureEvent) + Send + Sync>;

/// Gesture classifier API consumed by the startup sequence.
pub trait GestureClassifier {
    fn set_evaluate_delay(&self, delay: Duration);

    fn register_callback(&self, input: InputId, gesture: Gesture, handler: GestureHandler);
}

/// Handler table for classified gestures.
#[derive(Default)]
pub struct ButtonRegistry {
    evaluate_delay: RwLock<Duration>,
    handlers: RwLock<HashMap<(InputId, Gesture), Vec<SharedHandler>>>,
}

impl ButtonRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn evaluate_delay(&self) -> Duration {
        *self.evaluate_delay.read()
    }

    pub fn has_handler(&self, input: InputId, gesture: Gesture) -> bool {
        self.handlers.read().contains_key(&(input, gesture))
    }

    /// Deliver a classified gesture to its handlers.
    ///
    /// Returns the number of handlers invoked. Gestures nobody registered
    /// for are dropped. Handlers run without the table locked, so they may
    /// register further handlers.
    pub fn dispatch(&self, event: GestureEvent) -> usize {
        let list = self
            .handlers
            .read()
            .get(&(event.input, event.gesture))
            .cloned()
            .unwrap_or_default();
        if list.is_empty() {
            debug!(
                "[Button] {} on input {} has no handler",
                event.gesture, event.input
            );
        }
        for handler in &list {
            handler(event);
        }
        list.len()
    }
}

impl GestureClassifier for ButtonRegistry {
    fn set_evaluate_delay(&self, delay: Duration) {
        info!("[Button] evaluate delay set to {:?}", delay);
        *self.evaluate_delay.write() = delay;
    }

    fn register_callback(&self, input: InputId, gesture: Gesture, handler: GestureHandler) {
        debug!("[Button] registered {} handler on input {}", gesture, input);
        self.handlers
            .write()
            .entry((input, gesture))
            .or_default()
            .push(Arc::from(handler));
    }
}
