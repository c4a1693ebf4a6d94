//! Exclusion merging: the union of every exclusion declared against an
//! owner coordinate, from every source.

use std::collections::{BTreeMap, BTreeSet};

use depman_core::coordinate::Coordinate;

use crate::importer::ImportedBom;
use crate::store::DeclarationStore;

/// Union all exclusions per owner coordinate across direct declarations and
/// every imported BOM.
///
/// There is no precedence between sources: exclusions are restrictive and
/// monotonic, so declaration order can only widen the set, never narrow it.
/// The `apply_exclusions` kill-switch is enforced at query time by the
/// snapshot, not here; the stored data stays complete.
pub fn effective_exclusions(
    store: &DeclarationStore,
    imports: &[ImportedBom],
) -> BTreeMap<Coordinate, BTreeSet<Coordinate>> {
    let mut merged: BTreeMap<Coordinate, BTreeSet<Coordinate>> = BTreeMap::new();

    for (owner, excluded) in store.direct_exclusions() {
        merged
            .entry(owner.clone())
            .or_default()
            .insert(excluded.clone());
    }

    for import in imports {
        for (owner, excluded) in &import.exclusions {
            merged
                .entry(owner.clone())
                .or_default()
                .extend(excluded.iter().cloned());
        }
    }

    merged
}
