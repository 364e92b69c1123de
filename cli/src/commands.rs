pub mod change;
pub mod restore;
pub mod rotate;
pub mod show;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use colored::*;
use macshift_common::config::{Config, DEFAULT_BACKUP_FILE, DEFAULT_MAX_ATTEMPTS, PlatformKind, QueryMode};
use macshift_common::error::{AddressParseError, MacshiftError};
use macshift_common::models::mac::parse_mac;
use macshift_core::backup::JsonBackupStore;
use macshift_core::executor::SystemExecutor;
use macshift_core::generator::AddressGenerator;
use macshift_core::inspector::inspector_for;
use macshift_core::platform::platform_for;
use macshift_core::service::{Action, MacService, Outcome, Target};
use macshift_core::vendors::VendorResolver;
use tracing::{debug, warn};

use crate::terminal::{colors, print, prompt};

#[derive(Parser)]
#[command(name = "macshift")]
#[command(version, about = "Change, rotate and restore network interface MAC addresses.")]
#[command(after_help = "Examples:
  sudo macshift
  sudo macshift -i eth0 -m 00:11:22:33:44:55
  sudo macshift --restore
  sudo macshift --interval 30")]
pub struct CommandLine {
    /// Network interface (e.g. eth0); prompts when omitted
    #[arg(short, long)]
    pub interface: Option<String>,

    /// Set a custom MAC address (e.g. 00:11:22:33:44:55)
    #[arg(short, long, value_name = "MAC")]
    pub mac: Option<String>,

    /// Generate and apply a random MAC address
    #[arg(long)]
    pub random: bool,

    /// Restore the original MAC from the backup file
    #[arg(long)]
    pub restore: bool,

    /// Rotate to a new random MAC every SECS seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Only show the current MAC, its vendor and the stored backup
    #[arg(long)]
    pub show: bool,

    /// Where original addresses are backed up
    #[arg(long, value_name = "PATH", default_value = DEFAULT_BACKUP_FILE)]
    pub backup_file: PathBuf,

    /// Native command family; detected from the host when omitted
    #[arg(long, value_enum)]
    pub platform: Option<PlatformArg>,

    /// How interfaces are read back from the OS
    #[arg(long, value_enum, default_value_t = QueryArg::Scrape)]
    pub query: QueryArg,

    /// Attempts at generating an address different from the current one
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: usize,

    /// Fall back to the IEEE OUI database for vendor names
    #[arg(long)]
    pub oui_db: bool,

    #[arg(long)]
    pub no_banner: bool,

    /// -v logs every command, -vv also its output
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlatformArg {
    Iproute2,
    Ifconfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QueryArg {
    Scrape,
    Datalink,
}

impl From<PlatformArg> for PlatformKind {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Iproute2 => PlatformKind::IpRoute2,
            PlatformArg::Ifconfig => PlatformKind::Ifconfig,
        }
    }
}

impl From<QueryArg> for QueryMode {
    fn from(arg: QueryArg) -> Self {
        match arg {
            QueryArg::Scrape => QueryMode::Scrape,
            QueryArg::Datalink => QueryMode::Datalink,
        }
    }
}

impl From<&CommandLine> for Config {
    fn from(cli: &CommandLine) -> Self {
        Self {
            backup_file: cli.backup_file.clone(),
            platform: cli.platform.map_or_else(PlatformKind::detect, PlatformKind::from),
            query: cli.query.into(),
            max_attempts: cli.max_attempts.max(1),
            oui_db: cli.oui_db,
            no_banner: cli.no_banner,
            verbosity: cli.verbose,
        }
    }
}

/// What the user asked for, once the flags are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Show,
    Restore,
    Rotate(Duration),
    Change(Target),
}

impl Request {
    fn mutates(self) -> bool {
        !matches!(self, Request::Show)
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Reconciles the action flags: show, then restore, then rotation, then a
    /// one-shot change. A supplied address is validated whichever action wins.
    pub fn request(&self) -> Result<Request, AddressParseError> {
        let manual = self.mac.as_deref().map(parse_mac).transpose()?;

        if self.show {
            return Ok(Request::Show);
        }
        if self.restore {
            return Ok(Request::Restore);
        }
        if let Some(secs) = self.interval {
            return Ok(Request::Rotate(Duration::from_secs(secs)));
        }
        match manual {
            Some(mac) => Ok(Request::Change(Target::Manual(mac))),
            None => {
                if !self.random {
                    warn!("No action specified. Defaulting to random MAC.");
                }
                Ok(Request::Change(Target::Random))
            }
        }
    }
}

pub async fn run(cli: &CommandLine, cfg: &Config) -> anyhow::Result<()> {
    let request = cli.request().context("Invalid MAC address")?;
    debug!("Resolved {request:?}");

    let executor = SystemExecutor;
    let platform = platform_for(cfg.platform);
    debug!("Using {:?} commands, {:?} queries", platform.kind(), cfg.query);
    let inspector = inspector_for(cfg.query, &executor, platform.as_ref());
    let vendors = VendorResolver::new(cfg.oui_db);
    let backups = JsonBackupStore::new(&cfg.backup_file);
    let service = MacService::new(&executor, platform.as_ref(), inspector.as_ref(), &vendors, &backups);
    let mut generator = AddressGenerator::new(cfg.max_attempts);

    let interface = match &cli.interface {
        Some(name) => name.clone(),
        None => {
            let interfaces = service.interfaces()?;
            prompt::select_interface(&interfaces, &mut io::stdin().lock(), &mut io::stdout())?
        }
    };

    let current = service.current_address(&interface)?;

    print::header(match request {
        Request::Show => "interface status",
        Request::Restore => "restoring mac",
        Request::Rotate(_) => "rotating mac",
        Request::Change(_) => "changing mac",
    });
    print::aligned_line("Interface", interface.as_str().color(colors::ACCENT));
    print::aligned_line("Current MAC", current.to_string().color(colors::MAC_ADDR));

    if request.mutates() && !is_root::is_root() {
        warn!("Not running as root, the OS will likely refuse the change.");
    }

    let action = match request {
        Request::Show => Action::Show,
        Request::Restore => Action::Restore,
        Request::Change(target) => Action::Change(target),
        Request::Rotate(interval) => Action::Rotate {
            interval,
            stop: rotate::stop_on_ctrl_c(),
        },
    };

    let outcome = match service.dispatch(&interface, current, action, &mut generator).await {
        Ok(outcome) => outcome,
        Err(MacshiftError::Mutation(e)) if request == Request::Restore => bail!("Restore failed: {e}"),
        Err(e) => return Err(e.into()),
    };

    match outcome {
        Outcome::Shown { vendor, backup } => show::render(&vendor, backup.as_ref()),
        Outcome::Changed(report) => change::render(&interface, &report),
        Outcome::Restored(restored) => restore::render(&interface, &restored),
        Outcome::Rotated(summary) => rotate::render(&summary),
    }

    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
