//! Precedence merging: one effective version per coordinate.

use std::collections::BTreeMap;

use depman_core::coordinate::Coordinate;

use crate::importer::ImportedBom;
use crate::store::DeclarationStore;

/// Merge all declared versions into the effective per-coordinate mapping.
///
/// Precedence, highest first: a direct declaration always wins; among
/// imported BOMs the lowest-ranked (first-registered) import that manages
/// the coordinate wins. Within one import tree the importer has already
/// collapsed nesting to a single candidate.
///
/// Pure given a frozen store: identical inputs produce the identical map,
/// and `BTreeMap` keeps enumeration order deterministic.
pub fn effective_versions(
    store: &DeclarationStore,
    imports: &[ImportedBom],
) -> BTreeMap<Coordinate, String> {
    let mut merged: BTreeMap<Coordinate, String> = BTreeMap::new();

    let mut ranked: Vec<&ImportedBom> = imports.iter().collect();
    ranked.sort_by_key(|i| i.rank);

    for import in ranked {
        for (coordinate, version) in &import.versions {
            merged
                .entry(coordinate.clone())
                .or_insert_with(|| version.clone());
        }
    }

    for (coordinate, version) in store.direct_versions() {
        merged.insert(coordinate.clone(), version.clone());
    }

    merged
}
