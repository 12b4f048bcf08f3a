//! Reconciliation controller.
//!
//! Owns the accessory state, the relay and the status LED. Button gestures
//! and remote writes arrive as [`Command`]s on one channel and are applied
//! one at a time by [`Controller::run`], so the relay and the state are never
//! written concurrently.
//!
//! A short press toggles; a remote write sets an absolute value. Every
//! transition writes the relay and then publishes the new value.
//!
//! Identify blinks the status LED on a separate task, so commands queued
//! behind it are not delayed.

use super::accessory_state::{AccessoryState, StateView};
use super::actuator::{Relay, StatusIndicator, blink};
use super::pins::OutputPin;
use crate::config::IdentifyConfig;
use crate::error::{PlugError, Result};
use crate::input::gesture::{Gesture, GestureEvent};
use crate::network::NetworkReset;
use crate::remote::publisher::AttributePublisher;
use log::{debug, info};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A write of the on/off attribute from the remote-control path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteWriteRequest {
    pub requested_value: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Gesture(GestureEvent),
    RemoteWrite(RemoteWriteRequest),
    /// Write of the wifi-reset attribute.
    WifiReset(bool),
    Identify,
}

/// Submits commands to a running controller. Cheap to clone.
#[derive(Clone)]
pub struct CommandSender {
    tx: mpsc::UnboundedSender<Command>,
}

impl CommandSender {
    pub fn send(&self, command: Command) -> Result<()> {
        self.tx
            .send(command)
            .map_err(|_| PlugError::ControllerStopped)
    }
}

pub fn command_channel() -> (CommandSender, mpsc::UnboundedReceiver<Command>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (CommandSender { tx }, rx)
}

pub struct Controller<R: OutputPin, L: OutputPin> {
    state: AccessoryState,
    relay: Relay<R>,
    indicator: Arc<Mutex<StatusIndicator<L>>>,
    publisher: Box<dyn AttributePublisher>,
    network: Box<dyn NetworkReset>,
    identify: IdentifyConfig,
    blink: Option<JoinHandle<()>>,
}

impl<R: OutputPin, L: OutputPin> Controller<R, L> {
    /// Build a controller around already initialized outputs.
    ///
    /// The state starts at the relay's current level.
    pub fn new(
        relay: Relay<R>,
        indicator: StatusIndicator<L>,
        publisher: Box<dyn AttributePublisher>,
        network: Box<dyn NetworkReset>,
        identify: IdentifyConfig,
    ) -> Self {
        Self {
            state: AccessoryState::new(relay.level()),
            relay,
            indicator: Arc::new(Mutex::new(indicator)),
            publisher,
            network,
            identify,
            blink: None,
        }
    }

    pub fn is_on(&self) -> bool {
        self.state.is_on()
    }

    pub fn state_view(&self) -> StateView {
        self.state.view()
    }

    pub fn relay_level(&self) -> bool {
        self.relay.level()
    }

    pub fn handle_gesture(&mut self, event: GestureEvent) {
        match event.gesture {
            Gesture::ShortPress => {
                let on = self.state.toggle();
                info!("[Button] input {} toggled relay {}", event.input, on_off(on));
                self.apply(on);
            }
            Gesture::VeryLongPress => {
                info!("[Button] input {} held, resetting network", event.input);
                self.network.reset_networking();
            }
            Gesture::LongPress => {
                debug!("[Button] input {} long press ignored", event.input);
            }
        }
    }

    pub fn handle_remote_write(&mut self, request: RemoteWriteRequest) {
        let on = request.requested_value;
        info!("[Remote] setting relay {}", on_off(on));
        self.state.set(on);
        self.apply(on);
    }

    pub fn handle_wifi_reset(&mut self, value: bool) {
        if value {
            info!("[Remote] wifi reset requested");
            self.network.reset_networking();
        }
    }

    /// Start blinking the status LED and return immediately.
    ///
    /// The relay and the state are left alone. A request arriving while a
    /// blink is still running is dropped. Must be called within a tokio
    /// runtime.
    pub fn identify(&mut self) {
        if self.blink.as_ref().is_some_and(|task| !task.is_finished()) {
            debug!("[Remote] identify already running");
            return;
        }
        info!("[Remote] identify");
        self.blink = Some(tokio::spawn(blink(
            self.indicator.clone(),
            self.identify.blinks,
            Duration::from_millis(self.identify.interval_ms),
        )));
    }

    pub fn handle(&mut self, command: Command) {
        match command {
            Command::Gesture(event) => self.handle_gesture(event),
            Command::RemoteWrite(request) => self.handle_remote_write(request),
            Command::WifiReset(value) => self.handle_wifi_reset(value),
            Command::Identify => self.identify(),
        }
    }

    /// Apply commands until every sender is dropped.
    pub async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Command>) {
        while let Some(command) = rx.recv().await {
            self.handle(command);
        }
        info!("Controller stopped: command channel closed");
    }

    fn apply(&mut self, on: bool) {
        self.relay.write(on);
        self.publisher.publish_on(on);
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}
