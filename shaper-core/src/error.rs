//! Error types for shaper

use thiserror::Error;

/// Exit status used for every privilege-related failure.
pub const EXIT_PERMISSION_DENIED: i32 = libc::EPERM;

/// Exit status used when no more specific code applies.
pub const EXIT_FAILURE: i32 = 1;

/// Shaper error types
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// System error from nix
    #[error("System error: {0}")]
    System(#[from] nix::Error),

    /// Container runtime API failed for a reason other than a missing container
    #[error("Container runtime error: {message}")]
    Runtime {
        /// Error message
        message: String,
    },

    /// Container could not be resolved, or the runtime has no containers at all
    #[error("Container not found: {}", describe_target(.target))]
    ContainerNotFound {
        /// Requested identifier, `None` when the runtime is empty
        target: Option<String>,
    },

    /// Container exists but has no running process to probe
    #[error("Container not running: {name}")]
    ContainerNotRunning {
        /// Container name
        name: String,
    },

    /// Permission denied
    #[error("Permission denied: {operation}")]
    PermissionDenied {
        /// Operation that was denied
        operation: String,
    },

    /// Namespace operation failed
    #[error("Namespace error: {message}")]
    Namespace {
        /// Error message
        message: String,
    },

    /// Veth listing command exited non-zero
    #[error("`{command}` exited with code {code}: {stderr}")]
    ListingCommand {
        /// Command line that was run
        command: String,
        /// Exit code reported by the command
        code: i32,
        /// Captured standard error
        stderr: String,
    },

    /// Catalog record conflicts with an existing one
    #[error("Integrity violation: {message}")]
    Integrity {
        /// Error message
        message: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Error message
        message: String,
    },
}

fn describe_target(target: &Option<String>) -> &str {
    target
        .as_deref()
        .unwrap_or("runtime reports no containers")
}

impl Error {
    /// Map an I/O error to [`Error::PermissionDenied`] when the kernel refused
    /// the operation, and to [`Error::Io`] otherwise.
    #[must_use]
    pub fn from_io(operation: impl Into<String>, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::PermissionDenied {
            Self::PermissionDenied {
                operation: format!("{}: {err}", operation.into()),
            }
        } else {
            Self::Io(err)
        }
    }

    /// Process exit status for this error.
    ///
    /// Privilege failures and unusable containers exit with `EPERM`; a failed
    /// listing command propagates its own exit code.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::PermissionDenied { .. }
            | Self::ContainerNotFound { .. }
            | Self::ContainerNotRunning { .. } => EXIT_PERMISSION_DENIED,
            Self::ListingCommand { code, .. } => *code,
            _ => EXIT_FAILURE,
        }
    }
}

/// Result type alias for shaper operations
pub type Result<T> = std::result::Result<T, Error>;
