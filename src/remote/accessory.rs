//! Remote view of the accessory.
//!
//! The protocol stack reads the on/off attribute from here and forwards
//! writes, identify requests and wifi-reset writes into the controller.

use super::publisher::WatchPublisher;
use crate::config::DeviceInfo;
use crate::device::accessory_state::StateView;
use crate::device::controller::{Command, CommandSender, RemoteWriteRequest};
use crate::error::Result;
use tokio::sync::watch;

#[derive(Clone)]
pub struct RemoteAccessory {
    info: DeviceInfo,
    state: StateView,
    published: watch::Receiver<bool>,
    commands: CommandSender,
}

impl RemoteAccessory {
    pub fn new(
        info: DeviceInfo,
        state: StateView,
        publisher: &WatchPublisher,
        commands: CommandSender,
    ) -> Self {
        Self {
            info,
            state,
            published: publisher.subscribe(),
            commands,
        }
    }

    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }

    /// Current value of the on/off attribute.
    pub fn read_on(&self) -> bool {
        self.state.is_on()
    }

    pub fn write_on(&self, value: bool) -> Result<()> {
        self.commands.send(Command::RemoteWrite(RemoteWriteRequest {
            requested_value: value,
        }))
    }

    pub fn write_wifi_reset(&self, value: bool) -> Result<()> {
        self.commands.send(Command::WifiReset(value))
    }

    pub fn identify(&self) -> Result<()> {
        self.commands.send(Command::Identify)
    }

    /// Receiver woken whenever the controller publishes the on/off value.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.published.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, IdentifyConfig};
    use crate::device::actuator::{Relay, StatusIndicator};
    use crate::device::controller::{Controller, command_channel};
    use crate::device::pins::SimulatedPin;
    use crate::network::LoggingNetworkReset;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_remote_write_is_reported_back() {
        let relay = SimulatedPin::new(12);
        let publisher = Arc::new(WatchPublisher::new(false));
        let controller = Controller::new(
            Relay::initialize(relay.clone(), false).unwrap(),
            StatusIndicator::initialize(SimulatedPin::new(13), false, false).unwrap(),
            Box::new(publisher.clone()),
            Box::new(LoggingNetworkReset),
            IdentifyConfig {
                blinks: 1,
                interval_ms: 0,
            },
        );
        let (tx, rx) = command_channel();
        let remote = RemoteAccessory::new(
            Config::default().device,
            controller.state_view(),
            &publisher,
            tx,
        );
        let mut updates = remote.subscribe();
        let task = tokio::spawn(controller.run(rx));

        assert!(!remote.read_on());
        remote.write_on(true).unwrap();
        updates.changed().await.unwrap();

        assert!(*updates.borrow());
        assert!(remote.read_on());
        assert_eq!(relay.history(), vec![false, true]);

        drop(remote);
        task.await.unwrap();
    }
}
