//! Core type definitions shared by the inspector, locator and catalog

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Process identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct ProcessId(i32);

impl ProcessId {
    /// Create from raw PID
    #[must_use]
    pub const fn from_raw(pid: i32) -> Self {
        Self(pid)
    }

    /// Get raw PID value
    #[must_use]
    pub const fn as_raw(self) -> i32 {
        self.0
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Liveness of a container as reported by the runtime
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ContainerStatus {
    /// Container has a live init process
    Running {
        /// Full container ID
        id: String,
        /// Host PID of the container's init process
        pid: ProcessId,
        /// Image the container was created from
        image: String,
    },
    /// Container exists but is stopped, paused or exited
    NotRunning,
    /// Runtime did not report a usable state
    Unknown,
}

/// A container as seen by the runtime for a single invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerRecord {
    /// Human-readable name, without the runtime's leading `/`
    pub name: String,
    /// Liveness and identity, populated only for running containers
    pub status: ContainerStatus,
}

impl ContainerRecord {
    /// Record for a running container
    #[must_use]
    pub fn running(
        name: impl Into<String>,
        id: impl Into<String>,
        pid: ProcessId,
        image: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            status: ContainerStatus::Running {
                id: id.into(),
                pid,
                image: image.into(),
            },
        }
    }

    /// Record for a container that cannot be probed; only the name is known
    #[must_use]
    pub fn not_running(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: ContainerStatus::NotRunning,
        }
    }

    /// Whether the container has a live process
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.status, ContainerStatus::Running { .. })
    }

    /// Host PID, if running
    #[must_use]
    pub const fn pid(&self) -> Option<ProcessId> {
        match self.status {
            ContainerStatus::Running { pid, .. } => Some(pid),
            _ => None,
        }
    }

    /// Container ID, if running
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match &self.status {
            ContainerStatus::Running { id, .. } => Some(id.as_str()),
            _ => None,
        }
    }

    /// Image name, if running
    #[must_use]
    pub fn image(&self) -> Option<&str> {
        match &self.status {
            ContainerStatus::Running { image, .. } => Some(image.as_str()),
            _ => None,
        }
    }
}

/// Entry of the runtime's container listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSummary {
    /// Primary name, without the leading `/`
    pub name: String,
    /// Raw runtime state (`running`, `exited`, ...)
    pub state: String,
}

impl ContainerSummary {
    /// Whether the runtime reports this container as running
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == "running"
    }
}

/// Strip the leading `/` Docker puts in front of container names
#[must_use]
pub fn normalize_container_name(name: &str) -> &str {
    name.trim_start_matches('/')
}

/// One veth endpoint as seen from a single network namespace
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VethRecord {
    /// Host name for the default namespace, container name otherwise
    pub scope: String,
    /// Kernel ifindex, unique within `scope`
    pub ifindex: u32,
    /// Interface name
    pub ifname: String,
    /// Ifindex of the paired endpoint, meaningful in the other namespace
    pub peer_ifindex: u32,
}

impl VethRecord {
    /// Create a new record
    #[must_use]
    pub fn new(
        scope: impl Into<String>,
        ifindex: u32,
        ifname: impl Into<String>,
        peer_ifindex: u32,
    ) -> Self {
        Self {
            scope: scope.into(),
            ifindex,
            ifname: ifname.into(),
            peer_ifindex,
        }
    }
}

impl fmt::Display for VethRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}@if{} ({})",
            self.ifindex, self.ifname, self.peer_ifindex, self.scope
        )
    }
}

/// What the caller intends to do with the generated shaping commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Commands are executed against the kernel
    #[default]
    Execute,
    /// Commands are only printed
    Stdout,
    /// Commands are written out as a script
    Script,
}

impl ExecutionMode {
    /// Whether commands will actually be executed
    #[must_use]
    pub const fn executes(self) -> bool {
        matches!(self, Self::Execute)
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Execute => "execute",
            Self::Stdout => "stdout",
            Self::Script => "script",
        };
        f.write_str(s)
    }
}

impl FromStr for ExecutionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "execute" => Ok(Self::Execute),
            "stdout" => Ok(Self::Stdout),
            "script" => Ok(Self::Script),
            other => Err(Error::InvalidConfig {
                message: format!("unknown execution mode: {other}"),
            }),
        }
    }
}
