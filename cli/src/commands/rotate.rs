use macshift_core::rotator::RotationSummary;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// A stop flag that turns `true` on the first Ctrl-C.
///
/// The handler stays installed for the rest of the process, so a second Ctrl-C
/// no longer kills a tick halfway through its commands.
pub fn stop_on_ctrl_c() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = tx.send(true);
            }
            Err(e) => debug!("Cannot listen for Ctrl-C: {e}"),
        }
    });
    rx
}

pub fn render(summary: &RotationSummary) {
    let applied = summary.applied.len();
    info!(
        "Applied {applied} address{}",
        if applied == 1 { "" } else { "es" }
    );
    if let Some(last) = summary.applied.last() {
        info!("Last MAC: {last}");
    }
    if summary.failed_ticks > 0 {
        warn!("{} rotation step(s) failed", summary.failed_ticks);
    }
}
