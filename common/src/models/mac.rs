//! **Medium Access Control (MAC)** address helpers.
//!
//! Addresses are carried as [`pnet::util::MacAddr`]. Comparing two of them compares
//! octets, so equality is case-insensitive with respect to their text form.

use std::sync::OnceLock;

use pnet::util::MacAddr;
use regex::Regex;

use crate::error::AddressParseError;

/// Six two-digit hex pairs joined by colons.
pub const MAC_PATTERN: &str = r"^([0-9A-Fa-f]{2}:){5}[0-9A-Fa-f]{2}$";

static MAC_RE: OnceLock<Regex> = OnceLock::new();

fn mac_regex() -> &'static Regex {
    MAC_RE.get_or_init(|| Regex::new(MAC_PATTERN).expect("MAC pattern is a valid regex"))
}

/// Returns `true` only for the canonical `xx:xx:xx:xx:xx:xx` form.
pub fn is_valid_mac(input: &str) -> bool {
    mac_regex().is_match(input)
}

/// Parses a user supplied address, accepting only the canonical form.
pub fn parse_mac(input: &str) -> Result<MacAddr, AddressParseError> {
    if !is_valid_mac(input) {
        return Err(AddressParseError::InvalidFormat(input.to_string()));
    }

    let mut octets = [0u8; 6];
    for (octet, pair) in octets.iter_mut().zip(input.split(':')) {
        *octet = u8::from_str_radix(pair, 16)
            .map_err(|_| AddressParseError::InvalidFormat(input.to_string()))?;
    }

    Ok(MacAddr::new(
        octets[0], octets[1], octets[2], octets[3], octets[4], octets[5],
    ))
}

/// The first three octets (OUI) of an address.
pub fn prefix_octets(mac: MacAddr) -> [u8; 3] {
    [mac.0, mac.1, mac.2]
}

/// Serde adapter storing an address as its lower-case colon-hex string.
pub mod serde_mac {
    use pnet::util::MacAddr;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(mac: &MacAddr, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&mac.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<MacAddr, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_mac(&raw).map_err(D::Error::custom)
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
