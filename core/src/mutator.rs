//! Applying a new hardware address.
//!
//! The interface is brought down, re-addressed and brought up again, strictly in that
//! order. The first failing step aborts the sequence; steps that already ran are left
//! as they are.

use macshift_common::error::{MutationError, MutationStep};
use pnet::util::MacAddr;
use tracing::debug;

use crate::executor::{CommandExecutor, ShellCommand};
use crate::inspector::{InterfaceInspector, get_mac};
use crate::platform::Platform;

pub struct Mutator<'a> {
    executor: &'a dyn CommandExecutor,
    platform: &'a dyn Platform,
}

impl<'a> Mutator<'a> {
    pub fn new(executor: &'a dyn CommandExecutor, platform: &'a dyn Platform) -> Self {
        Self { executor, platform }
    }

    /// Runs the three-step sequence for `interface`.
    ///
    /// Success only means no command failed. A command that prints an error but exits
    /// cleanly goes unnoticed, so callers should [`confirm`] afterwards.
    pub fn change_mac(&self, interface: &str, mac: MacAddr) -> Result<(), MutationError> {
        let steps: [(MutationStep, ShellCommand); 3] = [
            (MutationStep::Down, self.platform.link_down(interface)),
            (MutationStep::SetAddress, self.platform.set_address(interface, mac)),
            (MutationStep::Up, self.platform.link_up(interface)),
        ];

        for (step, command) in steps {
            debug!("{step}: {command}");
            self.executor
                .run(&command)
                .map_err(|source| MutationError { step, source })?;
        }
        Ok(())
    }
}

/// Result of re-reading the address after a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// The interface now reports the requested address.
    Confirmed,
    /// The interface reports something else.
    Mismatch { observed: MacAddr },
    /// The address could not be read back.
    Unverified,
}

impl Confirmation {
    /// Compares an address read back from the interface with `expected`.
    pub fn from_observed(expected: MacAddr, observed: Option<MacAddr>) -> Self {
        match observed {
            Some(observed) if observed == expected => Confirmation::Confirmed,
            Some(observed) => Confirmation::Mismatch { observed },
            None => Confirmation::Unverified,
        }
    }
}

/// Re-reads `interface` and compares it with `expected`.
pub fn confirm(inspector: &dyn InterfaceInspector, interface: &str, expected: MacAddr) -> Confirmation {
    Confirmation::from_observed(expected, get_mac(inspector, interface))
}
