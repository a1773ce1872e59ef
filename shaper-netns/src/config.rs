//! Namespace locator configuration

use serde::{Deserialize, Serialize};
use shaper_core::ProcessId;
use std::path::{Path, PathBuf};

/// Directory where namespace-aware tools (`ip netns`) look up namespaces by name
pub const DEFAULT_NETNS_ROOT: &str = "/var/run/netns";

/// procfs mount point
pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// Namespace locator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetnsConfig {
    /// Root directory for named namespace links
    pub netns_root: PathBuf,

    /// procfs root used to build `/proc/<pid>/ns/net`
    pub proc_root: PathBuf,

    /// `ip` binary used for veth listings
    pub ip_command: String,
}

impl Default for NetnsConfig {
    fn default() -> Self {
        Self {
            netns_root: PathBuf::from(DEFAULT_NETNS_ROOT),
            proc_root: PathBuf::from(DEFAULT_PROC_ROOT),
            ip_command: "ip".to_string(),
        }
    }
}

impl NetnsConfig {
    /// Create a new configuration with default paths
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the namespace link root
    #[must_use]
    pub fn with_netns_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.netns_root = root.into();
        self
    }

    /// Set the procfs root
    #[must_use]
    pub fn with_proc_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.proc_root = root.into();
        self
    }

    /// Set the `ip` binary
    #[must_use]
    pub fn with_ip_command(mut self, command: impl Into<String>) -> Self {
        self.ip_command = command.into();
        self
    }

    /// Path of the named link for a container
    #[must_use]
    pub fn netns_path(&self, container_name: &str) -> PathBuf {
        self.netns_root.join(container_name)
    }

    /// Network namespace file of a process
    #[must_use]
    pub fn proc_netns_path(&self, pid: ProcessId) -> PathBuf {
        self.proc_root
            .join(pid.as_raw().to_string())
            .join("ns")
            .join("net")
    }

    /// Root directory for named namespace links
    #[must_use]
    pub fn netns_root(&self) -> &Path {
        &self.netns_root
    }
}
