//! First-writer-wins contract binding

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::DiscoveredType;

use super::table::{BindingTable, Conflict};

/// Builds a binding table from discovered types, in the order given
///
/// For every contract a type implements, the first type to claim the
/// contract keeps it; later candidates are discarded and recorded as
/// conflicts. The result depends on input order, so feed this the sorted
/// output of [`discover`](crate::plugin::discover) for reproducible tables.
///
/// Private and abstract types are skipped. Types with no contracts
/// contribute nothing. Never fails.
pub fn bind<I>(types: I) -> BindingTable
where
    I: IntoIterator<Item = DiscoveredType>,
{
    let mut table = BindingTable::default();

    for ty in types {
        if !ty.is_eligible() {
            debug!(ty = %ty.name, "not binding non-instantiable type");
            continue;
        }
        if ty.contracts.is_empty() {
            debug!(ty = %ty.name, "type implements no contracts");
            continue;
        }

        let ty = Arc::new(ty);
        for contract in ty.contracts.iter().cloned() {
            let Some(existing) = table.bind_first(contract.clone(), &ty) else {
                debug!(contract = %contract, ty = %ty.name, "bound contract");
                continue;
            };

            let conflict = Conflict {
                contract,
                winner: existing.implementation().type_ref(),
                discarded: ty.type_ref(),
            };
            warn!(
                contract = %conflict.contract,
                winner = %conflict.winner,
                discarded = %conflict.discarded,
                "contract already bound, discarding candidate"
            );
            table.record_conflict(conflict);
        }
    }

    info!(
        bindings = table.len(),
        conflicts = table.conflicts().len(),
        "binding complete"
    );

    table
}
