use colored::*;
use macshift_common::models::backup::BackupRecord;

use crate::terminal::{colors, print};

pub fn render(vendor: &str, backup: Option<&BackupRecord>) {
    print::aligned_line("Vendor", vendor.color(colors::VENDOR));

    let stored: ColoredString = match backup {
        Some(record) => {
            let saved = record
                .captured_at()
                .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| record.timestamp.clone());
            format!("{} (saved {saved})", record.original_mac).color(colors::MAC_ADDR)
        }
        None => "none".dimmed(),
    };
    print::aligned_line("Backup", stored);
}
