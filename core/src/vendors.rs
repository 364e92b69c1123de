use std::sync::OnceLock;

use mac_oui::Oui;
use macshift_common::vendors::{StaticVendorTable, VendorRepository};
use pnet::util::MacAddr;
use tracing::warn;

static OUI_DB: OnceLock<Option<Oui>> = OnceLock::new();

/// Retrieves or initializes the **Organizationally unique identifier** database.
fn get_oui_db() -> Option<&'static Oui> {
    OUI_DB
        .get_or_init(|| match Oui::default() {
            Ok(db) => Some(db),
            Err(e) => {
                warn!("Failed to load OUI database: {e:?}");
                None
            }
        })
        .as_ref()
}

/// Vendor lookup against the embedded IEEE OUI database.
pub struct MacOuiRepo;

impl VendorRepository for MacOuiRepo {
    fn get_vendor(&self, mac_addr: MacAddr) -> Option<String> {
        let oui_db: &Oui = get_oui_db()?;
        match oui_db.lookup_by_mac(&mac_addr.to_string()) {
            Ok(Some(entry)) => Some(entry.company_name.clone()),
            Ok(None) => None,
            Err(_) => None,
        }
    }
}

/// The static prefix table first, then optionally the OUI database.
pub struct VendorResolver {
    fallback: Option<MacOuiRepo>,
}

impl VendorResolver {
    pub fn new(use_oui_db: bool) -> Self {
        Self {
            fallback: use_oui_db.then_some(MacOuiRepo),
        }
    }
}

impl VendorRepository for VendorResolver {
    fn get_vendor(&self, mac_addr: MacAddr) -> Option<String> {
        StaticVendorTable
            .get_vendor(mac_addr)
            .or_else(|| self.fallback.as_ref()?.get_vendor(mac_addr))
    }
}
