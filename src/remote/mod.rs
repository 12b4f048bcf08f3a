//! Remote-control side of the accessory: attribute access, publishing and
//! persistence of the published value.

pub mod accessory;
pub mod persistence;
pub mod publisher;

pub use accessory::RemoteAccessory;
pub use persistence::{AttributeStore, run_persistence};
pub use publisher::{AttributePublisher, WatchPublisher};
