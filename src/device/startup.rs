//! Boot sequence.
//!
//! Brings both outputs to a known level before anything can change them,
//! then wires the button into the controller. Any output configuration
//! failure aborts the sequence and no handler is registered.

use super::actuator::{Relay, StatusIndicator};
use super::controller::{Command, CommandSender, Controller};
use super::pins::OutputPin;
use crate::config::Config;
use crate::error::Result;
use crate::input::gesture::{Gesture, GestureClassifier, GestureEvent};
use crate::network::NetworkReset;
use crate::remote::publisher::AttributePublisher;
use log::{info, warn};
use std::time::Duration;

pub struct Peripherals<R: OutputPin, L: OutputPin> {
    pub relay: R,
    pub status_led: L,
}

/// Collaborators the controller reports to.
pub struct Collaborators {
    pub publisher: Box<dyn AttributePublisher>,
    pub network: Box<dyn NetworkReset>,
}

/// Run the boot sequence.
///
/// `restored_on` is the last known value of the remote attribute. Button
/// handlers forward gestures to `commands`, whose receiver must be handed to
/// the returned controller's `run`.
pub fn run_startup<R: OutputPin, L: OutputPin>(
    config: &Config,
    peripherals: Peripherals<R, L>,
    restored_on: bool,
    classifier: &dyn GestureClassifier,
    collaborators: Collaborators,
    commands: &CommandSender,
) -> Result<Controller<R, L>> {
    let indicator = StatusIndicator::initialize(
        peripherals.status_led,
        config.pins.led_active_low,
        false,
    )?;
    let relay = Relay::initialize(peripherals.relay, restored_on)?;

    let controller = Controller::new(
        relay,
        indicator,
        collaborators.publisher,
        collaborators.network,
        config.identify.clone(),
    );

    classifier.set_evaluate_delay(Duration::from_millis(config.button.evaluate_delay_ms));
    for gesture in [Gesture::ShortPress, Gesture::VeryLongPress] {
        let tx = commands.clone();
        classifier.register_callback(
            config.pins.button,
            gesture,
            Box::new(move |event: GestureEvent| {
                if tx.send(Command::Gesture(event)).is_err() {
                    warn!("[Button] {} dropped: controller stopped", event.gesture);
                }
            }),
        );
    }

    info!(
        "Startup complete: relay {}, button on gpio {}",
        if restored_on { "on" } else { "off" },
        config.pins.button
    );
    Ok(controller)
}
