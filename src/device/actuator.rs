//! Relay and status indicator drivers.
//!
//! Both drivers can only be obtained through `initialize`, which configures
//! the pin and drives the initial level, so no write can precede it.

use super::pins::OutputPin;
use crate::error::Result;
use log::{debug, info};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// The switched relay output.
pub struct Relay<P: OutputPin> {
    pin: P,
    level: bool,
}

impl<P: OutputPin> Relay<P> {
    /// Configure the relay pin and drive it to `initial`.
    ///
    /// A configuration failure is returned to the caller, which must not
    /// continue booting.
    pub fn initialize(mut pin: P, initial: bool) -> Result<Self> {
        pin.enable_output()?;
        pin.set_high(initial);
        info!("[Relay] gpio {} initialized {}", pin.number(), on_off(initial));
        Ok(Self {
            pin,
            level: initial,
        })
    }

    /// Drive the relay. Writing the current level again is harmless.
    pub fn write(&mut self, on: bool) {
        debug!("[Relay] gpio {} -> {}", self.pin.number(), on_off(on));
        self.pin.set_high(on);
        self.level = on;
    }

    /// Last level written.
    pub fn level(&self) -> bool {
        self.level
    }
}

/// The status LED.
///
/// Levels are logical (lit or not); the configured polarity decides the
/// electrical level.
pub struct StatusIndicator<P: OutputPin> {
    pin: P,
    active_low: bool,
    lit: bool,
}

impl<P: OutputPin> StatusIndicator<P> {
    pub fn initialize(mut pin: P, active_low: bool, lit: bool) -> Result<Self> {
        pin.enable_output()?;
        pin.set_high(lit != active_low);
        info!("[Led] gpio {} initialized {}", pin.number(), on_off(lit));
        Ok(Self {
            pin,
            active_low,
            lit,
        })
    }

    pub fn write(&mut self, lit: bool) {
        self.pin.set_high(lit != self.active_low);
        self.lit = lit;
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

}

/// Blink `count` times with `interval` on and off, ending dark.
///
/// The lock is only held for each write, never across a sleep.
pub async fn blink<P: OutputPin>(
    indicator: Arc<Mutex<StatusIndicator<P>>>,
    count: u8,
    interval: Duration,
) {
    for _ in 0..count {
        indicator.lock().write(true);
        tokio::time::sleep(interval).await;
        indicator.lock().write(false);
        tokio::time::sleep(interval).await;
    }
}

fn on_off(level: bool) -> &'static str {
    if level { "on" } else { "off" }
}
