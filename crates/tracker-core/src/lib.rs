//! Tracker Core Library
//!
//! Domain types, the key-value storage port, and the record codecs shared by
//! the tracker server.

pub mod codec;
pub mod error;
pub mod ports;
pub mod types;

pub use error::{Result, TrackerError};
pub use ports::KeyValueStore;
pub use types::*;
