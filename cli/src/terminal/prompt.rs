//! Interactive interface selection.

use std::io::{BufRead, Write};

use anyhow::bail;
use colored::*;
use macshift_common::mprint;
use tracing::{error, info};

use crate::terminal::colors;

/// Lists `interfaces` with a 1-based index and reads a choice from `input`.
///
/// Invalid or out-of-range answers reprompt. Running out of input aborts.
pub fn select_interface<R, W>(interfaces: &[String], input: &mut R, prompt: &mut W) -> anyhow::Result<String>
where
    R: BufRead,
    W: Write,
{
    info!("Select interface:");
    for (i, name) in interfaces.iter().enumerate() {
        mprint!("  {}. {}", i + 1, name.color(colors::PRIMARY));
    }

    let mut line = String::new();
    loop {
        write!(prompt, "{}", "Enter choice: ".color(colors::ACCENT))?;
        prompt.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            bail!("no interface selected");
        }

        match parse_choice(&line, interfaces.len()) {
            Ok(idx) => return Ok(interfaces[idx].clone()),
            Err(reason) => error!("{reason}"),
        }
    }
}

fn parse_choice(raw: &str, count: usize) -> Result<usize, &'static str> {
    let choice: i64 = raw.trim().parse().map_err(|_| "Invalid input. Enter a number.")?;
    match usize::try_from(choice) {
        Ok(n) if (1..=count).contains(&n) => Ok(n - 1),
        _ => Err("Out of range. Try again."),
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
