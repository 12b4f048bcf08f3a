//! Smart plug accessory library.
//!
//! Keeps a single relay, its local button and its remote on/off attribute
//! consistent with each other.

pub mod config;
pub mod device;
pub mod error;
pub mod input;
pub mod network;
pub mod remote;
