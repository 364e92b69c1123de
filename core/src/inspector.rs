//! Reading interface state back from the OS.
//!
//! [`InterfaceInspector`] is the narrow capability the rest of the crate depends on.
//! [`ScrapingInspector`] parses native command output through a [`Platform`];
//! [`DatalinkInspector`] asks the OS for the interface list directly.

use macshift_common::config::QueryMode;
use macshift_common::error::ExecError;
use pnet::datalink::{self, NetworkInterface};
use pnet::util::MacAddr;
use tracing::debug;

use crate::executor::CommandExecutor;
use crate::platform::Platform;

pub trait InterfaceInspector {
    /// Names of all interfaces, in the order the OS reports them.
    fn list_interface_names(&self) -> Result<Vec<String>, ExecError>;

    /// Current hardware address of `interface`, `None` when it has none.
    fn current_address(&self, interface: &str) -> Result<Option<MacAddr>, ExecError>;
}

/// Interface names, or an empty list when they cannot be determined.
pub fn detect_interfaces(inspector: &dyn InterfaceInspector) -> Vec<String> {
    inspector.list_interface_names().unwrap_or_else(|e| {
        debug!("Interface listing failed: {e}");
        Vec::new()
    })
}

/// Current address of `interface`, or `None` when it cannot be determined.
pub fn get_mac(inspector: &dyn InterfaceInspector, interface: &str) -> Option<MacAddr> {
    inspector.current_address(interface).unwrap_or_else(|e| {
        debug!("Reading the address of {interface} failed: {e}");
        None
    })
}

pub struct ScrapingInspector<'a> {
    executor: &'a dyn CommandExecutor,
    platform: &'a dyn Platform,
}

impl<'a> ScrapingInspector<'a> {
    pub fn new(executor: &'a dyn CommandExecutor, platform: &'a dyn Platform) -> Self {
        Self { executor, platform }
    }
}

impl InterfaceInspector for ScrapingInspector<'_> {
    fn list_interface_names(&self) -> Result<Vec<String>, ExecError> {
        let output = self.executor.run(&self.platform.list_links())?;
        Ok(self.platform.interface_names(&output))
    }

    fn current_address(&self, interface: &str) -> Result<Option<MacAddr>, ExecError> {
        let output = self.executor.run(&self.platform.show_link(interface))?;
        Ok(self.platform.hardware_address(&output))
    }
}

/// Structured query through `pnet::datalink`. Loopback-style all-zero addresses
/// count as "no address".
#[derive(Debug, Clone, Copy, Default)]
pub struct DatalinkInspector;

impl DatalinkInspector {
    fn interfaces(&self) -> Vec<NetworkInterface> {
        datalink::interfaces()
    }
}

fn usable_mac(interface: &NetworkInterface) -> Option<MacAddr> {
    interface.mac.filter(|mac| *mac != MacAddr::zero())
}

impl InterfaceInspector for DatalinkInspector {
    fn list_interface_names(&self) -> Result<Vec<String>, ExecError> {
        Ok(self.interfaces().into_iter().map(|i| i.name).collect())
    }

    fn current_address(&self, interface: &str) -> Result<Option<MacAddr>, ExecError> {
        Ok(self
            .interfaces()
            .iter()
            .find(|i| i.name == interface)
            .and_then(usable_mac))
    }
}

/// Builds the inspector selected by `mode`.
pub fn inspector_for<'a>(
    mode: QueryMode,
    executor: &'a dyn CommandExecutor,
    platform: &'a dyn Platform,
) -> Box<dyn InterfaceInspector + 'a> {
    match mode {
        QueryMode::Scrape => Box::new(ScrapingInspector::new(executor, platform)),
        QueryMode::Datalink => Box::new(DatalinkInspector),
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
