//! The accessory's on/off value.
//!
//! [`AccessoryState`] is the single writable handle and is owned by the
//! controller. Any number of read-only [`StateView`]s can be handed to the
//! remote path for reporting.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Writable on/off state. Deliberately not `Clone`.
pub struct AccessoryState {
    on: Arc<AtomicBool>,
}

impl AccessoryState {
    pub fn new(initial: bool) -> Self {
        Self {
            on: Arc::new(AtomicBool::new(initial)),
        }
    }

    pub fn is_on(&self) -> bool {
        self.on.load(Ordering::SeqCst)
    }

    pub(crate) fn set(&self, value: bool) {
        self.on.store(value, Ordering::SeqCst);
    }

    /// Toggle the state and return the new value.
    pub(crate) fn toggle(&self) -> bool {
        // fetch_xor with true flips the bit
        !self.on.fetch_xor(true, Ordering::SeqCst)
    }

    pub fn view(&self) -> StateView {
        StateView {
            on: self.on.clone(),
        }
    }
}

/// Read-only handle on the accessory state.
#[derive(Clone)]
pub struct StateView {
    on: Arc<AtomicBool>,
}

impl StateView {
    pub fn is_on(&self) -> bool {
        self.on.load(Ordering::SeqCst)
    }
}
