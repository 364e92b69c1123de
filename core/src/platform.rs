//! The two native command families.
//!
//! [`IpRoute2`] drives `ip link`, [`Ifconfig`] drives the legacy `ifconfig`. One of
//! them is chosen once at start-up (see [`platform_for`]) and handed to every
//! component that needs it.
//!
//! Both also know how to scrape their own human-oriented output. Any change in the
//! native tool's phrasing shows up as "no result" rather than as an error, so the
//! patterns are kept here, next to the commands that produce the text.

use std::collections::HashSet;
use std::sync::OnceLock;

use macshift_common::config::PlatformKind;
use macshift_common::models::mac::parse_mac;
use pnet::util::MacAddr;
use regex::Regex;

use crate::executor::ShellCommand;

/// The five native operations the tool relies on.
pub trait PlatformCommands {
    /// List every link on the host.
    fn list_links(&self) -> ShellCommand;
    /// Show a single interface, including its hardware address.
    fn show_link(&self, interface: &str) -> ShellCommand;
    /// Set the interface administratively down.
    fn link_down(&self, interface: &str) -> ShellCommand;
    /// Assign a new hardware address.
    fn set_address(&self, interface: &str, mac: MacAddr) -> ShellCommand;
    /// Set the interface administratively up.
    fn link_up(&self, interface: &str) -> ShellCommand;
}

/// Extracts structured data from the output of [`PlatformCommands`].
pub trait OutputScraper {
    /// Interface names found in the output of [`PlatformCommands::list_links`], in order.
    fn interface_names(&self, output: &str) -> Vec<String>;
    /// The first hardware address in the output of [`PlatformCommands::show_link`].
    fn hardware_address(&self, output: &str) -> Option<MacAddr>;
}

/// A command family together with the scraper for its output.
pub trait Platform: PlatformCommands + OutputScraper {
    fn kind(&self) -> PlatformKind;
}

/// Builds the command family for `kind`.
pub fn platform_for(kind: PlatformKind) -> Box<dyn Platform> {
    match kind {
        PlatformKind::IpRoute2 => Box::new(IpRoute2),
        PlatformKind::Ifconfig => Box::new(Ifconfig),
    }
}

fn compile(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("scraping pattern is a valid regex"))
}

/// Collects the first capture group of every match, dropping repeats.
fn captures_in_order(re: &Regex, output: &str) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    re.captures_iter(output)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|name| seen.insert(name.clone()))
        .collect()
}

fn first_address(re: &Regex, output: &str) -> Option<MacAddr> {
    re.captures(output)
        .and_then(|caps| caps.get(1))
        .and_then(|m| parse_mac(m.as_str()).ok())
}

/// `ip link` (iproute2).
#[derive(Debug, Clone, Copy, Default)]
pub struct IpRoute2;

static IP_LINK_NAME: OnceLock<Regex> = OnceLock::new();
static IP_LINK_ETHER: OnceLock<Regex> = OnceLock::new();

impl PlatformCommands for IpRoute2 {
    fn list_links(&self) -> ShellCommand {
        ShellCommand::new("ip", ["link"])
    }

    fn show_link(&self, interface: &str) -> ShellCommand {
        ShellCommand::new("ip", ["link", "show", interface])
    }

    fn link_down(&self, interface: &str) -> ShellCommand {
        ShellCommand::new("ip", ["link", "set", interface, "down"])
    }

    fn set_address(&self, interface: &str, mac: MacAddr) -> ShellCommand {
        ShellCommand::new(
            "ip",
            ["link", "set", interface, "address", mac.to_string().as_str()],
        )
    }

    fn link_up(&self, interface: &str) -> ShellCommand {
        ShellCommand::new("ip", ["link", "set", interface, "up"])
    }
}

impl OutputScraper for IpRoute2 {
    // "2: enp9s0: <BROADCAST,..." and "5: veth1@if4: <...".
    fn interface_names(&self, output: &str) -> Vec<String> {
        let re = compile(&IP_LINK_NAME, r"(?m)^\d+:\s+([^:@\s]+)(?:@[^:\s]+)?:");
        captures_in_order(re, output)
    }

    fn hardware_address(&self, output: &str) -> Option<MacAddr> {
        let re = compile(
            &IP_LINK_ETHER,
            r"ether\s+([0-9a-fA-F]{2}(?::[0-9a-fA-F]{2}){5})\b",
        );
        first_address(re, output)
    }
}

impl Platform for IpRoute2 {
    fn kind(&self) -> PlatformKind {
        PlatformKind::IpRoute2
    }
}

/// Legacy `ifconfig` (net-tools on Linux, BSD userland elsewhere).
#[derive(Debug, Clone, Copy, Default)]
pub struct Ifconfig;

static IFCONFIG_NAME: OnceLock<Regex> = OnceLock::new();
static IFCONFIG_ADDR: OnceLock<Regex> = OnceLock::new();

impl PlatformCommands for Ifconfig {
    fn list_links(&self) -> ShellCommand {
        ShellCommand::new("ifconfig", Vec::<String>::new())
    }

    fn show_link(&self, interface: &str) -> ShellCommand {
        ShellCommand::new("ifconfig", [interface])
    }

    fn link_down(&self, interface: &str) -> ShellCommand {
        ShellCommand::new("ifconfig", [interface, "down"])
    }

    fn set_address(&self, interface: &str, mac: MacAddr) -> ShellCommand {
        ShellCommand::new(
            "ifconfig",
            [interface, "hw", "ether", mac.to_string().as_str()],
        )
    }

    fn link_up(&self, interface: &str) -> ShellCommand {
        ShellCommand::new("ifconfig", [interface, "up"])
    }
}

impl OutputScraper for Ifconfig {
    // Leading bare names: "en0: flags=..." or the older "eth0      Link encap:...".
    fn interface_names(&self, output: &str) -> Vec<String> {
        let re = compile(&IFCONFIG_NAME, r"(?m)^([\w.\-]+)(?::\s|:$|\s{2,})");
        captures_in_order(re, output)
    }

    fn hardware_address(&self, output: &str) -> Option<MacAddr> {
        let re = compile(
            &IFCONFIG_ADDR,
            r"\b([0-9a-fA-F]{2}(?::[0-9a-fA-F]{2}){5})\b",
        );
        first_address(re, output)
    }
}

impl Platform for Ifconfig {
    fn kind(&self) -> PlatformKind {
        PlatformKind::Ifconfig
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
