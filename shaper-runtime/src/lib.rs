//! Container runtime access with pluggable backends
//!
//! This crate answers the questions every veth lookup starts with: does the
//! container exist, is it running, and what is its init PID. Docker is the
//! production backend; a mock backend serves tests.

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod backend;
pub mod docker;
pub mod inspector;

pub use backend::{ContainerRuntime, MockRuntime};
pub use docker::DockerRuntime;
pub use inspector::ContainerInspector;

// Re-export commonly used types
pub use shaper_core::{ContainerRecord, ContainerStatus, ContainerSummary, ExecutionMode};
