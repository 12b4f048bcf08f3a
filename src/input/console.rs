//! Line-oriented stand-in for the button and the remote controller.
//!
//! Reads commands from stdin so the accessory can be exercised on a host.

use super::gesture::{ButtonRegistry, Gesture, GestureEvent, InputId};
use crate::error::{PlugError, Result};
use crate::remote::accessory::RemoteAccessory;
use log::{info, warn};
use std::str::FromStr;
use std::sync::Arc;
use strum::EnumString;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ConsoleCommand {
    Press,
    Long,
    #[strum(serialize = "verylong", serialize = "very-long")]
    VeryLong,
    On,
    Off,
    Identify,
    WifiReset,
    Status,
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Result<Self> {
        Self::from_str(line.trim()).map_err(|_| PlugError::UnknownCommand(line.trim().to_string()))
    }
}

/// Apply one console command.
pub fn execute(
    command: ConsoleCommand,
    button: InputId,
    registry: &ButtonRegistry,
    remote: &RemoteAccessory,
) -> Result<()> {
    let gesture = |g| {
        registry.dispatch(GestureEvent::new(button, g));
    };
    match command {
        ConsoleCommand::Press => gesture(Gesture::ShortPress),
        ConsoleCommand::Long => gesture(Gesture::LongPress),
        ConsoleCommand::VeryLong => gesture(Gesture::VeryLongPress),
        ConsoleCommand::On => remote.write_on(true)?,
        ConsoleCommand::Off => remote.write_on(false)?,
        ConsoleCommand::Identify => remote.identify()?,
        ConsoleCommand::WifiReset => remote.write_wifi_reset(true)?,
        ConsoleCommand::Status => {
            let info = remote.info();
            info!(
                "{} {} ({}): {}",
                info.manufacturer,
                info.name,
                info.model,
                if remote.read_on() { "on" } else { "off" }
            );
        }
    }
    Ok(())
}

/// Spawn a task reading commands from stdin until EOF.
pub fn run_console(
    button: InputId,
    registry: Arc<ButtonRegistry>,
    remote: RemoteAccessory,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    warn!("[Console] read failed: {}", e);
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            let result = ConsoleCommand::parse(&line)
                .and_then(|command| execute(command, button, &registry, &remote));
            if let Err(e) = result {
                warn!("[Console] {}", e);
                if matches!(e, PlugError::ControllerStopped) {
                    break;
                }
            }
        }
        info!("[Console] input closed");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::device::accessory_state::AccessoryState;
    use crate::device::controller::{Command, RemoteWriteRequest, command_channel};
    use crate::input::gesture::GestureClassifier;
    use crate::remote::publisher::WatchPublisher;

    #[test]
    fn test_parse() {
        assert_eq!(ConsoleCommand::parse("press").unwrap(), ConsoleCommand::Press);
        assert_eq!(ConsoleCommand::parse(" ON \n").unwrap(), ConsoleCommand::On);
        assert_eq!(ConsoleCommand::parse("verylong").unwrap(), ConsoleCommand::VeryLong);
        assert_eq!(ConsoleCommand::parse("very-long").unwrap(), ConsoleCommand::VeryLong);
        assert_eq!(ConsoleCommand::parse("wifi-reset").unwrap(), ConsoleCommand::WifiReset);
        assert!(matches!(
            ConsoleCommand::parse("explode"),
            Err(PlugError::UnknownCommand(c)) if c == "explode"
        ));
    }

    #[test]
    fn test_execute_routes_commands() {
        let registry = ButtonRegistry::new();
        let (tx, mut rx) = command_channel();
        let button_tx = tx.clone();
        registry.register_callback(
            0,
            Gesture::ShortPress,
            Box::new(move |event| {
                button_tx.send(Command::Gesture(event)).unwrap();
            }),
        );
        let state = AccessoryState::new(false);
        let remote = RemoteAccessory::new(
            Config::default().device,
            state.view(),
            &WatchPublisher::new(false),
            tx,
        );

        execute(ConsoleCommand::Press, 0, &registry, &remote).unwrap();
        execute(ConsoleCommand::Long, 0, &registry, &remote).unwrap();
        execute(ConsoleCommand::On, 0, &registry, &remote).unwrap();
        execute(ConsoleCommand::WifiReset, 0, &registry, &remote).unwrap();
        execute(ConsoleCommand::Status, 0, &registry, &remote).unwrap();

        assert_eq!(
            rx.try_recv().unwrap(),
            Command::Gesture(GestureEvent::new(0, Gesture::ShortPress))
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            Command::RemoteWrite(RemoteWriteRequest {
                requested_value: true
            })
        );
        assert_eq!(rx.try_recv().unwrap(), Command::WifiReset(true));
        assert!(rx.try_recv().is_err());
    }
}
