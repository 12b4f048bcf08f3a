//! The accessory itself: outputs, state, controller and boot sequence.

pub mod accessory_state;
pub mod actuator;
pub mod controller;
pub mod pins;
pub mod startup;

pub use accessory_state::{AccessoryState, StateView};
pub use controller::{Command, CommandSender, Controller, RemoteWriteRequest, command_channel};
pub use pins::{OutputPin, SimulatedPin};
pub use startup::{Collaborators, Peripherals, run_startup};
