//! # MAC Service
//!
//! Orchestrates the components behind the four user intents: show, change, rotate
//! and restore. The CLI resolves the interface and reads the current address, then
//! hands both to [`MacService::dispatch`].

use std::time::Duration;

use macshift_common::error::{MacshiftError, PersistenceError};
use macshift_common::models::backup::BackupRecord;
use macshift_common::vendors::{VendorRepository, resolve_vendor};
use pnet::util::MacAddr;
use rand::Rng;
use tokio::sync::watch;
use tracing::warn;

use crate::backup::{self, BackupRepository};
use crate::executor::CommandExecutor;
use crate::generator::AddressGenerator;
use crate::inspector::{InterfaceInspector, detect_interfaces, get_mac};
use crate::mutator::{Confirmation, Mutator, confirm};
use crate::platform::Platform;
use crate::rotator::{RotationSummary, Rotator};

/// Which address a one-shot change should apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Manual(MacAddr),
    Random,
}

#[derive(Debug)]
pub enum Action {
    /// Report the current state only.
    Show,
    Change(Target),
    /// Rotate until `stop` turns `true`.
    Rotate {
        interval: Duration,
        stop: watch::Receiver<bool>,
    },
    Restore,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeReport {
    pub before: MacAddr,
    pub applied: MacAddr,
    /// Address read back after the change.
    pub after: Option<MacAddr>,
    pub vendor: String,
    pub confirmation: Confirmation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    NoBackup,
    Restored {
        original: MacAddr,
        confirmation: Confirmation,
    },
}

#[derive(Debug)]
pub enum Outcome {
    Shown {
        vendor: String,
        backup: Option<BackupRecord>,
    },
    Changed(ChangeReport),
    Restored(RestoreOutcome),
    Rotated(RotationSummary),
}

pub struct MacService<'a> {
    executor: &'a dyn CommandExecutor,
    platform: &'a dyn Platform,
    inspector: &'a dyn InterfaceInspector,
    vendors: &'a dyn VendorRepository,
    backups: &'a dyn BackupRepository,
}

impl<'a> MacService<'a> {
    pub fn new(
        executor: &'a dyn CommandExecutor,
        platform: &'a dyn Platform,
        inspector: &'a dyn InterfaceInspector,
        vendors: &'a dyn VendorRepository,
        backups: &'a dyn BackupRepository,
    ) -> Self {
        Self {
            executor,
            platform,
            inspector,
            vendors,
            backups,
        }
    }

    pub fn mutator(&self) -> Mutator<'a> {
        Mutator::new(self.executor, self.platform)
    }

    pub fn inspector(&self) -> &'a dyn InterfaceInspector {
        self.inspector
    }

    /// All detected interfaces; an empty host is a discovery failure.
    pub fn interfaces(&self) -> Result<Vec<String>, MacshiftError> {
        let interfaces = detect_interfaces(self.inspector);
        if interfaces.is_empty() {
            return Err(MacshiftError::NoInterfaces);
        }
        Ok(interfaces)
    }

    pub fn current_address(&self, interface: &str) -> Result<MacAddr, MacshiftError> {
        get_mac(self.inspector, interface).ok_or_else(|| MacshiftError::AddressUnavailable {
            interface: interface.to_string(),
        })
    }

    pub fn vendor_of(&self, mac: MacAddr) -> String {
        resolve_vendor(self.vendors, mac)
    }

    pub fn backup(&self, interface: &str, mac: MacAddr) -> Result<BackupRecord, PersistenceError> {
        backup::backup(self.backups, interface, mac)
    }

    /// Applies `target` once and reads the address back.
    ///
    /// The applied address always differs from `current`: a manual target equal to it
    /// is replaced by a random one.
    pub fn change<R: Rng>(
        &self,
        interface: &str,
        current: MacAddr,
        target: Target,
        generator: &mut AddressGenerator<R>,
    ) -> Result<ChangeReport, MacshiftError> {
        let applied = match target {
            Target::Manual(mac) if mac != current => mac,
            Target::Manual(mac) => {
                warn!("{mac} is already in use on {interface}, picking a random address");
                generator.distinct_from(Some(current))?
            }
            Target::Random => generator.distinct_from(Some(current))?,
        };

        self.mutator().change_mac(interface, applied)?;

        let after = get_mac(self.inspector, interface);
        let confirmation = Confirmation::from_observed(applied, after);
        let vendor = self.vendor_of(after.unwrap_or(applied));

        Ok(ChangeReport {
            before: current,
            applied,
            after,
            vendor,
            confirmation,
        })
    }

    /// Re-applies the backed up address of `interface`, if there is one.
    pub fn restore(&self, interface: &str) -> Result<RestoreOutcome, MacshiftError> {
        let Some(record) = backup::find_backup(self.backups, interface) else {
            return Ok(RestoreOutcome::NoBackup);
        };

        self.mutator().change_mac(interface, record.original_mac)?;

        Ok(RestoreOutcome::Restored {
            original: record.original_mac,
            confirmation: confirm(self.inspector, interface, record.original_mac),
        })
    }

    /// Runs `action` against `interface`, whose address is currently `current`.
    ///
    /// Show and restore leave the backup alone. Every other action backs `current` up
    /// first; a failed backup is reported and the action proceeds without it.
    pub async fn dispatch<R: Rng>(
        &self,
        interface: &str,
        current: MacAddr,
        action: Action,
        generator: &mut AddressGenerator<R>,
    ) -> Result<Outcome, MacshiftError> {
        match action {
            Action::Show => Ok(Outcome::Shown {
                vendor: self.vendor_of(current),
                backup: backup::find_backup(self.backups, interface),
            }),
            Action::Restore => Ok(Outcome::Restored(self.restore(interface)?)),
            Action::Change(target) => {
                self.backup_or_warn(interface, current);
                Ok(Outcome::Changed(self.change(interface, current, target, generator)?))
            }
            Action::Rotate { interval, stop } => {
                self.backup_or_warn(interface, current);
                let mut rotator = Rotator::new(self, interval);
                Ok(Outcome::Rotated(rotator.run(interface, generator, stop).await))
            }
        }
    }

    fn backup_or_warn(&self, interface: &str, current: MacAddr) {
        match self.backup(interface, current) {
            Ok(_) => macshift_common::success!("Original MAC backed up."),
            Err(e) => warn!("Backup failed: {e}"),
        }
    }
}
