use pnet::util::MacAddr;

use crate::models::mac::prefix_octets;

/// Name reported when no vendor matches a prefix.
pub const UNKNOWN_VENDOR: &str = "Unknown";

/// Known vendor prefixes. Random addresses are seeded from these.
pub const VENDOR_PREFIXES: &[([u8; 3], &str)] = &[
    ([0x00, 0x14, 0x22], "Dell"),
    ([0x00, 0x40, 0x96], "Cisco"),
    ([0xAC, 0xDE, 0x48], "Private"),
];

/// Defines the contract for resolving device manufacturers from MAC addresses.
pub trait VendorRepository {
    /// Retrieves the vendor name for a given MAC address.
    ///
    /// # Returns
    /// * `Some(String)` - The name of the vendor if found.
    /// * `None` - If the OUI is unknown.
    fn get_vendor(&self, mac_addr: MacAddr) -> Option<String>;
}

/// Lookup against [`VENDOR_PREFIXES`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticVendorTable;

impl VendorRepository for StaticVendorTable {
    fn get_vendor(&self, mac_addr: MacAddr) -> Option<String> {
        let prefix = prefix_octets(mac_addr);
        VENDOR_PREFIXES
            .iter()
            .find(|(octets, _)| *octets == prefix)
            .map(|(_, name)| name.to_string())
    }
}

/// Vendor name for `mac`, or [`UNKNOWN_VENDOR`].
pub fn resolve_vendor(repo: &dyn VendorRepository, mac: MacAddr) -> String {
    repo.get_vendor(mac)
        .unwrap_or_else(|| UNKNOWN_VENDOR.to_string())
}
