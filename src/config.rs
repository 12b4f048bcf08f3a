use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Load environment variables from .env file with robust parsing.
/// Handles values with spaces without requiring quotes.
pub fn load_dotenv() {
    let env_path = Path::new(".env");
    if !env_path.exists() {
        return;
    }

    let content = match fs::read_to_string(env_path) {
        Ok(c) => c,
        Err(_) => return,
    };

    for (key, value) in parse_dotenv(&content) {
        // Only set if not already set (env vars take precedence)
        if std::env::var(&key).is_err() {
            // SAFETY: called from the synchronous main before the tokio runtime is
            // built, so no other thread reads the environment
            unsafe { std::env::set_var(key, value) };
        }
    }
}

fn parse_dotenv(content: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();

    for line in content.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            let mut value = value.trim();
            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = &value[1..value.len() - 1];
            }
            pairs.push((key.trim().to_string(), value.to_string()));
        }
    }

    pairs
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub device: DeviceInfo,
    pub pins: PinConfig,
    pub button: ButtonConfig,
    pub identify: IdentifyConfig,
    pub storage: StorageConfig,
}

/// Accessory information reported to paired controllers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub manufacturer: String,
    pub name: String,
    pub model: String,
    pub serial: String,
    pub firmware_revision: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinConfig {
    /// Relay output (also drives the blue LED on the S20).
    pub relay: u8,
    /// Green status LED.
    pub status_led: u8,
    pub button: u8,
    /// LED lights when the pin is driven low.
    pub led_active_low: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ButtonConfig {
    /// How long the classifier waits before it considers a press complete.
    pub evaluate_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifyConfig {
    pub blinks: u8,
    pub interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub state_file: PathBuf,
}

/// Directory for persisted attribute data
const PERSIST_DIR: &str = "smart-plug";
const STATE_FILE: &str = "attributes.json";

fn default_state_file() -> PathBuf {
    dirs::config_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(PERSIST_DIR)
        .join(STATE_FILE)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device: DeviceInfo {
                manufacturer: "itead".to_string(),
                name: "Sonoff".to_string(),
                model: "S20".to_string(),
                serial: "12345678".to_string(),
                firmware_revision: "1.0".to_string(),
            },
            pins: PinConfig {
                relay: 12,
                status_led: 13,
                button: 0,
                led_active_low: true,
            },
            button: ButtonConfig {
                evaluate_delay_ms: 10,
            },
            identify: IdentifyConfig {
                blinks: 3,
                interval_ms: 100,
            },
            storage: StorageConfig {
                state_file: default_state_file(),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from defaults, overriding any value `lookup` returns.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(name) = lookup("PLUG_DEVICE_NAME") {
            config.device.name = name;
        }
        if let Some(serial) = lookup("PLUG_SERIAL") {
            config.device.serial = serial;
        }
        if let Some(pin) = lookup("PLUG_RELAY_PIN")
            && let Ok(p) = pin.parse()
        {
            config.pins.relay = p;
        }
        if let Some(pin) = lookup("PLUG_LED_PIN")
            && let Ok(p) = pin.parse()
        {
            config.pins.status_led = p;
        }
        if let Some(pin) = lookup("PLUG_BUTTON_PIN")
            && let Ok(p) = pin.parse()
        {
            config.pins.button = p;
        }
        if let Some(active_low) = lookup("PLUG_LED_ACTIVE_LOW")
            && let Ok(v) = active_low.parse()
        {
            config.pins.led_active_low = v;
        }
        if let Some(delay) = lookup("PLUG_EVALUATE_DELAY_MS")
            && let Ok(d) = delay.parse()
        {
            config.button.evaluate_delay_ms = d;
        }
        if let Some(path) = lookup("PLUG_STATE_FILE") {
            config.storage.state_file = PathBuf::from(path);
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_match_s20_wiring() {
        let config = Config::default();
        assert_eq!(config.pins.relay, 12);
        assert_eq!(config.pins.status_led, 13);
        assert_eq!(config.pins.button, 0);
        assert!(config.pins.led_active_low);
        assert_eq!(config.button.evaluate_delay_ms, 10);
        assert_eq!(config.device.model, "S20");
    }

    #[test]
    fn test_lookup_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PLUG_RELAY_PIN", "5"),
            ("PLUG_EVALUATE_DELAY_MS", "25"),
            ("PLUG_LED_ACTIVE_LOW", "false"),
            ("PLUG_STATE_FILE", "/tmp/plug.json"),
        ]
        .into_iter()
        .collect();

        let config = Config::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.pins.relay, 5);
        assert_eq!(config.button.evaluate_delay_ms, 25);
        assert!(!config.pins.led_active_low);
        assert_eq!(config.storage.state_file, PathBuf::from("/tmp/plug.json"));
    }

    #[test]
    fn test_unparseable_values_keep_defaults() {
        let config = Config::from_lookup(|key| match key {
            "PLUG_RELAY_PIN" => Some("relay".to_string()),
            "PLUG_EVALUATE_DELAY_MS" => Some("-1".to_string()),
            _ => None,
        });
        assert_eq!(config.pins.relay, 12);
        assert_eq!(config.button.evaluate_delay_ms, 10);
    }

    #[test]
    fn test_parse_dotenv() {
        let pairs = parse_dotenv(
            "# comment\n\nPLUG_DEVICE_NAME=Desk Lamp\nPLUG_SERIAL=\"ABC 1\"\nnot a pair\n",
        );
        assert_eq!(
            pairs,
            vec![
                ("PLUG_DEVICE_NAME".to_string(), "Desk Lamp".to_string()),
                ("PLUG_SERIAL".to_string(), "ABC 1".to_string()),
            ]
        );
    }
}
