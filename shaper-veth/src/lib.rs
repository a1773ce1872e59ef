//! Container to host veth correlation
//!
//! A container's veth endpoint reports the ifindex of its peer, but that
//! index is only meaningful in the host namespace. This crate lists veths on
//! both sides, stores them in an [`IfindexCatalog`] and joins
//! `container.peer_ifindex` to `host.ifindex` to find the host interfaces
//! that carry a container's traffic.

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub mod catalog;
pub mod parse;
pub mod resolver;

pub use catalog::IfindexCatalog;
pub use parse::parse_veth_links;
pub use resolver::{VethResolver, VethTable};

// Re-export commonly used types
pub use shaper_core::VethRecord;
