//! Digital output pins.
//!
//! The [`OutputPin`] trait is the boundary to the board support layer. On the
//! host the [`SimulatedPin`] stands in for a GPIO and records every level it
//! was driven to, so tests and the host runtime can observe the relay.

use crate::error::{PlugError, Result};
use parking_lot::Mutex;
use std::sync::Arc;

/// A single digital output.
pub trait OutputPin: Send + 'static {
    /// Pin number, used for logging and error reporting.
    fn number(&self) -> u8;

    /// Configure the pin as a driven output.
    fn enable_output(&mut self) -> Result<()>;

    /// Drive the electrical level. Must complete before returning.
    fn set_high(&mut self, high: bool);
}

#[derive(Debug, Default)]
struct PinLog {
    enabled: bool,
    fail_enable: Option<String>,
    levels: Vec<bool>,
}

/// In-memory output pin.
///
/// Cloning yields another handle to the same pin, so a caller can hand one
/// handle to the driver and keep another for inspection.
#[derive(Debug, Clone)]
pub struct SimulatedPin {
    number: u8,
    log: Arc<Mutex<PinLog>>,
}

impl SimulatedPin {
    pub fn new(number: u8) -> Self {
        Self {
            number,
            log: Arc::new(Mutex::new(PinLog::default())),
        }
    }

    /// A pin whose configuration always fails with `reason`.
    pub fn faulty(number: u8, reason: impl Into<String>) -> Self {
        let pin = Self::new(number);
        pin.log.lock().fail_enable = Some(reason.into());
        pin
    }

    pub fn is_enabled(&self) -> bool {
        self.log.lock().enabled
    }

    /// Last electrical level driven, if any.
    pub fn level(&self) -> Option<bool> {
        self.log.lock().levels.last().copied()
    }

    /// Every level driven since creation, oldest first.
    pub fn history(&self) -> Vec<bool> {
        self.log.lock().levels.clone()
    }

    pub fn write_count(&self) -> usize {
        self.log.lock().levels.len()
    }
}

impl OutputPin for SimulatedPin {
    fn number(&self) -> u8 {
        self.number
    }

    fn enable_output(&mut self) -> Result<()> {
        let mut log = self.log.lock();
        if let Some(reason) = &log.fail_enable {
            return Err(PlugError::OutputConfig {
                pin: self.number,
                reason: reason.clone(),
            });
        }
        log.enabled = true;
        Ok(())
    }

    fn set_high(&mut self, high: bool) {
        self.log.lock().levels.push(high);
    }
}
