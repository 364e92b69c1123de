use std::collections::BTreeMap;

use chrono::{Local, NaiveDateTime};
use pnet::util::MacAddr;
use serde::{Deserialize, Serialize};

use super::mac::serde_mac;

/// Format of the `timestamp` field, e.g. `2024-05-01 13:37:00.123456`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// The address an interface had before it was first changed by this tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupRecord {
    #[serde(with = "serde_mac")]
    pub original_mac: MacAddr,
    pub timestamp: String,
}

/// Persisted mapping from interface name to its backup. One record per name.
pub type BackupMap = BTreeMap<String, BackupRecord>;

impl BackupRecord {
    /// Captures `original_mac` with the current local time.
    pub fn new(original_mac: MacAddr) -> Self {
        Self {
            original_mac,
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    /// Parses the stored timestamp, if it is in the expected format.
    pub fn captured_at(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.timestamp, TIMESTAMP_FORMAT).ok()
    }
}
