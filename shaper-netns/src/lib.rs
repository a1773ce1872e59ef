//! Network namespace access for containers
//!
//! This crate provides:
//! - Named namespace links under `/var/run/netns` with scoped cleanup
//! - Command execution inside a named namespace via `ip netns exec`
//! - Veth listings for the host and container namespaces

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub mod config;
pub mod exec;
pub mod locator;

pub use config::{DEFAULT_NETNS_ROOT, DEFAULT_PROC_ROOT, NetnsConfig};
pub use exec::{CommandOutput, CommandRunner, MockRunner, SystemRunner, VethListing};
pub use locator::{NetnsLink, NetnsLocator};
