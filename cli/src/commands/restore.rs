use macshift_common::success;
use macshift_core::mutator::Confirmation;
use macshift_core::service::RestoreOutcome;
use tracing::{error, warn};

pub fn render(interface: &str, outcome: &RestoreOutcome) {
    match outcome {
        RestoreOutcome::NoBackup => error!("No backup found for this interface."),
        RestoreOutcome::Restored { original, confirmation } => match confirmation {
            Confirmation::Confirmed => success!("Restored MAC: {original}"),
            Confirmation::Unverified => success!("Restored MAC: {original} (could not be read back)"),
            Confirmation::Mismatch { observed } => {
                warn!("Restored MAC to {original}, but {interface} reports {observed}")
            }
        },
    }
}
