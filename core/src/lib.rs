//! # Macshift Core
//!
//! Everything that touches the operating system or decides what to do with it.
//!
//! * [`executor`]: runs native commands ([`executor::CommandExecutor`]).
//! * [`platform`]: the two command families (`ip` and `ifconfig`) and their output scrapers.
//! * [`inspector`]: reads interface names and current addresses.
//! * [`generator`]: random, vendor-seeded addresses.
//! * [`mutator`]: the down / set-address / up sequence.
//! * [`backup`]: the persisted undo record.
//! * [`rotator`]: timed, repeated address changes.
//! * [`vendors`]: vendor name resolution.
//! * [`service`]: ties the above together into show / change / rotate / restore.

pub mod backup;
pub mod executor;
pub mod generator;
pub mod inspector;
pub mod mutator;
pub mod platform;
pub mod rotator;
pub mod service;
pub mod vendors;
