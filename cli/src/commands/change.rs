use colored::*;
use macshift_common::{mprint, success};
use macshift_core::mutator::Confirmation;
use macshift_core::service::ChangeReport;
use tracing::warn;

use crate::terminal::colors;

pub fn render(interface: &str, report: &ChangeReport) {
    match report.confirmation {
        Confirmation::Confirmed => {
            success!("MAC changed successfully!");
            mprint!(
                "    {} → {} ({})",
                report.before,
                report.applied.to_string().color(colors::MAC_ADDR),
                report.vendor.as_str().color(colors::VENDOR)
            );
        }
        Confirmation::Mismatch { observed } => {
            warn!(
                "Requested {} but {interface} still reports {observed} ({})",
                report.applied, report.vendor
            );
        }
        Confirmation::Unverified => {
            warn!(
                "Applied {} but could not read the MAC of {interface} back",
                report.applied
            );
        }
    }
}
