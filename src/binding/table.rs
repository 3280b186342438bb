//! The contract → implementation table

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::{Contract, DiscoveredType, TypeRef};

/// A contract and the type chosen to implement it
#[derive(Debug, Clone)]
pub struct Binding {
    contract: Contract,
    implementation: Arc<DiscoveredType>,
}

impl Binding {
    pub(crate) fn new(contract: Contract, implementation: Arc<DiscoveredType>) -> Self {
        Self {
            contract,
            implementation,
        }
    }

    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    pub fn implementation(&self) -> &DiscoveredType {
        &self.implementation
    }

    pub fn summary(&self) -> BindingSummary {
        BindingSummary {
            contract: self.contract.clone(),
            implementation: self.implementation.type_ref(),
        }
    }
}

/// Serializable view of a [`Binding`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingSummary {
    pub contract: Contract,
    pub implementation: TypeRef,
}

/// A candidate that lost a contract to an earlier type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub contract: Contract,

    /// Type that holds the binding
    pub winner: TypeRef,

    /// Type that was discarded
    pub discarded: TypeRef,
}

/// Contract → binding map produced by one discovery pass
///
/// Holds at most one binding per contract. Iteration is ordered by
/// contract name. Once [`bind`](super::bind) returns, the table is never
/// modified again.
#[derive(Debug, Clone, Default)]
pub struct BindingTable {
    bindings: BTreeMap<Contract, Binding>,
    conflicts: Vec<Conflict>,
}

impl BindingTable {
    pub fn get(&self, contract: &str) -> Option<&Binding> {
        self.bindings.get(contract)
    }

    /// Returns the implementation bound to `contract`
    pub fn implementation_of(&self, contract: &str) -> Option<&DiscoveredType> {
        self.get(contract).map(Binding::implementation)
    }

    pub fn contains(&self, contract: &str) -> bool {
        self.bindings.contains_key(contract)
    }

    pub fn contracts(&self) -> impl Iterator<Item = &Contract> {
        self.bindings.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.values()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Candidates that were discarded because a contract was already bound
    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    pub fn summaries(&self) -> Vec<BindingSummary> {
        self.iter().map(Binding::summary).collect()
    }

    /// Binds `contract` to `implementation` unless it is already bound.
    /// Returns the existing binding when the candidate loses.
    pub(super) fn bind_first(
        &mut self,
        contract: Contract,
        implementation: &Arc<DiscoveredType>,
    ) -> Option<&Binding> {
        match self.bindings.entry(contract) {
            btree_map::Entry::Vacant(entry) => {
                let contract = entry.key().clone();
                entry.insert(Binding::new(contract, Arc::clone(implementation)));
                None
            }
            btree_map::Entry::Occupied(entry) => Some(entry.into_mut()),
        }
    }

    pub(super) fn record_conflict(&mut self, conflict: Conflict) {
        self.conflicts.push(conflict);
    }
}

impl<'a> IntoIterator for &'a BindingTable {
    type Item = &'a Binding;
    type IntoIter = btree_map::Values<'a, Contract, Binding>;

    fn into_iter(self) -> Self::IntoIter {
        self.bindings.values()
    }
}
