//! Backup store for original hardware addresses.
//!
//! The whole mapping is read, modified and written back on every backup. There is
//! no locking: two processes backing up at once race, and the last writer wins.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use macshift_common::error::PersistenceError;
use macshift_common::models::backup::{BackupMap, BackupRecord};
use pnet::util::MacAddr;
use tracing::warn;

/// Storage for the `interface -> original address` mapping.
pub trait BackupRepository {
    /// Loads the mapping. A missing store is an empty mapping.
    fn load(&self) -> Result<BackupMap, PersistenceError>;
    /// Replaces the stored mapping with `map`.
    fn save(&self, map: &BackupMap) -> Result<(), PersistenceError>;
}

/// Pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonBackupStore {
    path: PathBuf,
}

impl JsonBackupStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BackupRepository for JsonBackupStore {
    fn load(&self) -> Result<BackupMap, PersistenceError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BackupMap::new()),
            Err(source) => {
                return Err(PersistenceError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_str(&raw).map_err(|e| PersistenceError::Malformed {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    fn save(&self, map: &BackupMap) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(map)
            .map_err(|e| PersistenceError::Serialize(e.to_string()))?;

        fs::write(&self.path, json).map_err(|source| PersistenceError::Write {
            path: self.path.clone(),
            source,
        })
    }
}

/// Records `mac` as the original address of `interface`, replacing any earlier record.
///
/// An unreadable or malformed store is treated as empty and overwritten.
pub fn backup(
    repo: &dyn BackupRepository,
    interface: &str,
    mac: MacAddr,
) -> Result<BackupRecord, PersistenceError> {
    let mut map = repo.load().unwrap_or_else(|e| {
        warn!("{e}; starting a fresh backup");
        BackupMap::new()
    });

    let record = BackupRecord::new(mac);
    map.insert(interface.to_string(), record.clone());
    repo.save(&map)?;
    Ok(record)
}

/// The stored record for `interface`, if any.
///
/// A store that cannot be loaded is reported and treated as holding nothing.
pub fn find_backup(repo: &dyn BackupRepository, interface: &str) -> Option<BackupRecord> {
    match repo.load() {
        Ok(mut map) => map.remove(interface),
        Err(e) => {
            warn!("{e}");
            None
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
