//! Timed address rotation.
//!
//! Each tick reads the current address, generates a different one, applies it and
//! then sleeps for the interval. The only way out is the stop signal, which is
//! checked between ticks: a tick that has started always runs to completion.

use std::time::Duration;

use macshift_common::error::MacshiftError;
use macshift_common::success;
use pnet::util::MacAddr;
use rand::Rng;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::generator::AddressGenerator;
use crate::inspector::get_mac;
use crate::mutator::{Confirmation, confirm};
use crate::service::MacService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotatorState {
    Running,
    Stopped,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RotationSummary {
    /// Addresses applied, one per successful tick.
    pub applied: Vec<MacAddr>,
    pub failed_ticks: usize,
}

pub struct Rotator<'s, 'a> {
    service: &'s MacService<'a>,
    interval: Duration,
    state: RotatorState,
}

impl<'s, 'a> Rotator<'s, 'a> {
    pub fn new(service: &'s MacService<'a>, interval: Duration) -> Self {
        Self {
            service,
            interval,
            state: RotatorState::Running,
        }
    }

    /// Rotates `interface` until `stop` becomes `true`.
    pub async fn run<R: Rng>(
        &mut self,
        interface: &str,
        generator: &mut AddressGenerator<R>,
        mut stop: watch::Receiver<bool>,
    ) -> RotationSummary {
        info!("Rotating MAC every {}s on {interface}", self.interval.as_secs());
        let mut summary = RotationSummary::default();

        while self.state == RotatorState::Running {
            match self.tick(interface, generator) {
                Ok(mac) => summary.applied.push(mac),
                Err(e) => {
                    error!("Rotation step failed: {e}");
                    summary.failed_ticks += 1;
                }
            }

            if stop_requested(&mut stop, self.interval).await {
                self.state = RotatorState::Stopped;
            }
        }

        warn!("Rotation stopped by user.");
        summary
    }

    fn tick<R: Rng>(
        &self,
        interface: &str,
        generator: &mut AddressGenerator<R>,
    ) -> Result<MacAddr, MacshiftError> {
        let inspector = self.service.inspector();
        let current = get_mac(inspector, interface);
        if current.is_none() {
            warn!("Could not read the current MAC of {interface}");
        }

        let next = generator.distinct_from(current)?;
        self.service.mutator().change_mac(interface, next)?;

        match confirm(inspector, interface, next) {
            Confirmation::Confirmed => success!("Rotated MAC: {next}"),
            Confirmation::Unverified => success!("Rotated MAC: {next} (could not be read back)"),
            Confirmation::Mismatch { observed } => {
                warn!("Rotated MAC to {next}, but {interface} reports {observed}")
            }
        }
        Ok(next)
    }
}

/// Sleeps for `interval` unless a stop is (or already was) requested.
async fn stop_requested(stop: &mut watch::Receiver<bool>, interval: Duration) -> bool {
    let signalled = tokio::select! {
        biased;
        res = stop.wait_for(|stopped| *stopped) => Some(res.is_ok()),
        _ = sleep(interval) => None,
    };

    match signalled {
        Some(true) => true,
        // The sender is gone, so no stop can arrive any more.
        Some(false) => {
            sleep(interval).await;
            false
        }
        None => false,
    }
}
