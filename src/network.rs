//! Network reset escalation.
//!
//! Resetting the stored network credentials belongs to the provisioning
//! subsystem; the controller only requests it.

use log::warn;

pub trait NetworkReset: Send + Sync {
    fn reset_networking(&self);
}

/// Host stand-in for the provisioning subsystem.
pub struct LoggingNetworkReset;

impl NetworkReset for LoggingNetworkReset {
    fn reset_networking(&self) {
        warn!("[Network] reset requested: stored network configuration would be cleared and the device restarted");
    }
}
