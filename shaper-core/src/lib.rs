//! Shaper Core - shared types and errors for the veth correlation engine
//!
//! This crate provides the data model used by the container inspector,
//! the namespace locator and the ifindex catalog.

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod types;

pub use error::{EXIT_FAILURE, EXIT_PERMISSION_DENIED, Error, Result};
pub use types::{
    ContainerRecord, ContainerStatus, ContainerSummary, ExecutionMode, ProcessId, VethRecord,
    normalize_container_name,
};
