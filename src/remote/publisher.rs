//! Publishing the on/off attribute back to remote observers.
//!
//! The protocol stack reads and subscribes through a tokio `watch` channel;
//! every publish replaces the value and wakes subscribers. Persistence is one
//! such subscriber (see `persistence::run_persistence`).

use log::debug;
use std::sync::Arc;
use tokio::sync::watch;

/// Pushes the current on/off value out to the remote-control path.
pub trait AttributePublisher: Send + Sync {
    fn publish_on(&self, on: bool);
}

impl<T: AttributePublisher + ?Sized> AttributePublisher for Arc<T> {
    fn publish_on(&self, on: bool) {
        (**self).publish_on(on);
    }
}

pub struct WatchPublisher {
    tx: watch::Sender<bool>,
}

impl WatchPublisher {
    pub fn new(initial: bool) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl AttributePublisher for WatchPublisher {
    fn publish_on(&self, on: bool) {
        self.tx.send_replace(on);
        debug!("[Remote] on attribute published: {}", on);
    }
}
