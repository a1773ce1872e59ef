//! Named network namespace links for running containers
//!
//! Docker does not register container namespaces under `/var/run/netns`, so
//! `ip netns exec` cannot see them. [`NetnsLocator::acquire`] links the
//! container's `/proc/<pid>/ns/net` under the container name and hands back a
//! [`NetnsLink`] guard that removes the link again.

use shaper_core::{Error, ProcessId, Result};
use std::fs;
use std::io;
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};

use crate::config::NetnsConfig;

/// Creates and removes namespace links under the configured root
#[derive(Debug, Clone)]
pub struct NetnsLocator {
    config: NetnsConfig,
}

impl NetnsLocator {
    /// Create a locator
    #[must_use]
    pub const fn new(config: NetnsConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    #[must_use]
    pub const fn config(&self) -> &NetnsConfig {
        &self.config
    }

    /// Make the namespace of `pid` addressable as `container_name`.
    ///
    /// The link root is created if missing. An existing link is reused.
    ///
    /// # Errors
    /// Returns [`Error::PermissionDenied`] if the root or link cannot be
    /// created for lack of privilege, [`Error::InvalidConfig`] for a name that
    /// is not a single path component.
    pub fn acquire(&self, container_name: &str, pid: ProcessId) -> Result<NetnsLink> {
        validate_name(container_name)?;
        self.ensure_root()?;

        let path = self.config.netns_path(container_name);
        let target = self.config.proc_netns_path(pid);

        if path.symlink_metadata().is_ok() {
            tracing::debug!(path = %path.display(), "Reusing existing namespace link");
        } else {
            tracing::debug!(
                path = %path.display(),
                target = %target.display(),
                "Creating namespace link"
            );

            match symlink(&target, &path) {
                Ok(()) => {}
                // Lost a race with another invocation for the same container
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    tracing::debug!(path = %path.display(), "Namespace link appeared concurrently");
                }
                Err(e) => {
                    let err = Error::from_io(
                        format!("symlink {} -> {}", path.display(), target.display()),
                        e,
                    );
                    tracing::error!(error = %err, "Failed to create namespace link");
                    return Err(err);
                }
            }
        }

        Ok(NetnsLink {
            name: container_name.to_string(),
            path,
            released: false,
        })
    }

    fn ensure_root(&self) -> Result<()> {
        let root = self.config.netns_root();

        fs::create_dir_all(root).map_err(|e| {
            let err = Error::from_io(format!("create {}", root.display()), e);
            tracing::error!(error = %err, "Failed to create namespace link root");
            err
        })
    }
}

/// A namespace link that exists for as long as this guard is held.
///
/// Call [`NetnsLink::release`] to remove it and observe failures. Dropping an
/// unreleased guard still removes the link, logging any error.
#[derive(Debug)]
#[must_use = "dropping the guard removes the namespace link"]
pub struct NetnsLink {
    name: String,
    path: PathBuf,
    released: bool,
}

impl NetnsLink {
    /// Namespace name, usable with `ip netns exec`
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Filesystem path of the link
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Confirm the link resolves to a live namespace.
    ///
    /// # Errors
    /// Returns [`Error::PermissionDenied`] if the namespace cannot be stat'ed
    /// for lack of privilege, [`Error::Namespace`] if the target is gone.
    pub fn check(&self) -> Result<()> {
        match fs::metadata(&self.path) {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::Namespace {
                message: format!(
                    "namespace link {} does not resolve (process gone?)",
                    self.path.display()
                ),
            }),
            Err(e) => Err(Error::from_io(format!("stat {}", self.path.display()), e)),
        }
    }

    /// Remove the link.
    ///
    /// # Errors
    /// Returns [`Error::PermissionDenied`] if removal is refused, or
    /// [`Error::Io`] if the path is no longer a removable link.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        remove_link(&self.path)
    }
}

impl Drop for NetnsLink {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        if let Err(e) = remove_link(&self.path) {
            tracing::error!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove namespace link"
            );
        }
    }
}

fn remove_link(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "Removed namespace link");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::from_io(format!("remove {}", path.display()), e)),
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') {
        return Err(Error::InvalidConfig {
            message: format!("invalid namespace name: {name:?}"),
        });
    }
    Ok(())
}
