//! In-memory veth table and the container-to-host join
//!
//! Records are keyed by `(scope, ifindex)` with a secondary index on
//! `peer_ifindex`. A catalog lives for one correlation query and is never
//! persisted.

use shaper_core::{Error, Result, VethRecord};
use std::collections::{BTreeMap, HashMap};

use crate::parse::parse_veth_links;

/// Veth records observed in one or more namespaces
#[derive(Debug, Clone, Default)]
pub struct IfindexCatalog {
    host_scope: String,
    scopes: BTreeMap<String, BTreeMap<u32, VethRecord>>,
    by_peer: HashMap<u32, (String, u32)>,
    rejected: Vec<VethRecord>,
}

impl IfindexCatalog {
    /// Create an empty catalog whose host records are tagged `host_scope`
    #[must_use]
    pub fn new(host_scope: impl Into<String>) -> Self {
        Self {
            host_scope: host_scope.into(),
            ..Self::default()
        }
    }

    /// Insert a single record.
    ///
    /// # Errors
    /// Returns [`Error::Integrity`] if `(scope, ifindex)` is already present
    /// or another record already claims the same `peer_ifindex`. The catalog
    /// is left unchanged in that case.
    pub fn insert(&mut self, record: VethRecord) -> Result<()> {
        if let Some(existing) = self
            .scopes
            .get(&record.scope)
            .and_then(|records| records.get(&record.ifindex))
        {
            return Err(Error::Integrity {
                message: format!("ifindex already recorded: {existing}, rejecting {record}"),
            });
        }

        if let Some((scope, ifindex)) = self.by_peer.get(&record.peer_ifindex) {
            return Err(Error::Integrity {
                message: format!(
                    "peer ifindex {} already claimed by {ifindex} in {scope}, rejecting {record}",
                    record.peer_ifindex
                ),
            });
        }

        self.by_peer
            .insert(record.peer_ifindex, (record.scope.clone(), record.ifindex));
        self.scopes
            .entry(record.scope.clone())
            .or_default()
            .insert(record.ifindex, record);

        Ok(())
    }

    /// Parse a veth listing taken in `scope` and insert its records.
    ///
    /// Each record is inserted independently: a rejected record is logged,
    /// kept aside for [`IfindexCatalog::check_join`] and skipped without
    /// affecting the others. Returns the records inserted.
    pub fn populate(&mut self, scope: &str, output: &str) -> Vec<VethRecord> {
        let mut inserted = Vec::new();

        for record in parse_veth_links(scope, output) {
            match self.insert(record.clone()) {
                Ok(()) => inserted.push(record),
                Err(e) => {
                    tracing::warn!(scope, error = %e, "Rejected veth record");
                    self.rejected.push(record);
                }
            }
        }

        tracing::debug!(scope, count = inserted.len(), "Populated veth catalog");
        inserted
    }

    /// Host-side records paired with the veths of `container_name`.
    ///
    /// Joins container records to host records on
    /// `container.peer_ifindex == host.ifindex`, in container ifindex order.
    /// The iterator borrows the catalog and can be recreated at will.
    pub fn resolve(&self, container_name: &str) -> impl Iterator<Item = &VethRecord> {
        let host = self.scopes.get(&self.host_scope);

        self.records_in(container_name)
            .filter_map(move |container| host?.get(&container.peer_ifindex))
    }

    /// Records rejected by [`IfindexCatalog::populate`], in arrival order
    #[must_use]
    pub fn rejected(&self) -> &[VethRecord] {
        &self.rejected
    }

    /// Confirm that no rejected record belongs to the join for
    /// `container_name`.
    ///
    /// A rejected record matters if it was listed in the container's own
    /// namespace, or if it is a host record whose ifindex one of the
    /// container's veths names as its peer.
    ///
    /// # Errors
    /// Returns [`Error::Integrity`] for the first such record.
    pub fn check_join(&self, container_name: &str) -> Result<()> {
        let needed = self.rejected.iter().find(|rejected| {
            rejected.scope == container_name
                || (rejected.scope == self.host_scope
                    && self
                        .records_in(container_name)
                        .any(|container| container.peer_ifindex == rejected.ifindex))
        });

        match needed {
            Some(rejected) => Err(Error::Integrity {
                message: format!("veth {rejected} of {container_name} was rejected"),
            }),
            None => Ok(()),
        }
    }

    /// Names of the host-side veths of `container_name`, in join order
    #[must_use]
    pub fn fetch_names(&self, container_name: &str) -> Vec<String> {
        self.resolve(container_name)
            .map(|record| record.ifname.clone())
            .collect()
    }

    /// Records observed in `scope`, in ifindex order
    pub fn records_in(&self, scope: &str) -> impl Iterator<Item = &VethRecord> {
        self.scopes
            .get(scope)
            .into_iter()
            .flat_map(BTreeMap::values)
    }

    /// Every record, grouped by scope
    pub fn iter(&self) -> impl Iterator<Item = &VethRecord> {
        self.scopes.values().flat_map(BTreeMap::values)
    }

    /// Scopes with at least one record
    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.scopes.keys().map(String::as_str)
    }

    /// Total number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_peer.len()
    }

    /// Whether the catalog holds no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_peer.is_empty()
    }
}
