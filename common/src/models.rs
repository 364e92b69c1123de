//! # Domain Models
//!
//! * [`mac`]: parsing, validation and prefix extraction for hardware addresses.
//! * [`backup`]: the persisted `interface -> original address` mapping.

pub mod backup;
pub mod mac;
