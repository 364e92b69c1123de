use std::path::PathBuf;

/// Default location of the backup file, relative to the working directory.
pub const DEFAULT_BACKUP_FILE: &str = "mac_backup.json";

/// Default cap on regenerating an address that collides with the current one.
pub const DEFAULT_MAX_ATTEMPTS: usize = 64;

/// Native command family used to inspect and mutate interfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformKind {
    /// `ip link ...` (iproute2).
    IpRoute2,
    /// `ifconfig ...` (net-tools / BSD).
    Ifconfig,
}

impl PlatformKind {
    /// Picks the command family for the host this binary was built for.
    pub fn detect() -> Self {
        if cfg!(target_os = "linux") {
            PlatformKind::IpRoute2
        } else {
            PlatformKind::Ifconfig
        }
    }
}

/// How interface names and addresses are read back from the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryMode {
    /// Scrape the text output of the platform commands.
    #[default]
    Scrape,
    /// Ask the OS directly through the datalink interface list.
    Datalink,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Where the original addresses are persisted.
    pub backup_file: PathBuf,
    pub platform: PlatformKind,
    pub query: QueryMode,
    /// Upper bound on attempts to generate an address different from the current one.
    pub max_attempts: usize,
    /// Fall back to the embedded IEEE OUI database for vendor names.
    pub oui_db: bool,
    pub no_banner: bool,
    pub verbosity: u8,
}

