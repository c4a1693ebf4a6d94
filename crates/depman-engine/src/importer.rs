//! Recursive BOM import: expands each top-level imported BOM into a flat,
//! per-coordinate view, surviving diamond imports and cycles.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use depman_core::bom::{BomLoader, BomReference};
use depman_core::coordinate::Coordinate;
use depman_core::errors::{DepmanError, DepmanResult};

/// One top-level import, fully expanded: the winning version per coordinate
/// within this import tree, plus every exclusion the tree declared.
#[derive(Debug, Clone)]
pub struct ImportedBom {
    pub reference: BomReference,
    /// Position among the top-level imports; lower rank wins in the
    /// precedence resolver.
    pub rank: usize,
    pub versions: BTreeMap<Coordinate, String>,
    pub exclusions: BTreeMap<Coordinate, BTreeSet<Coordinate>>,
}

/// Expand every top-level import in registration order.
///
/// Each top-level import gets its own visited set: two siblings that import
/// a shared parent BOM each see its entries, and precedence between them is
/// decided later by first-import-wins. A loader failure anywhere aborts the
/// whole expansion.
pub fn import_all(
    imports: &[BomReference],
    loader: &dyn BomLoader,
) -> DepmanResult<Vec<ImportedBom>> {
    imports
        .iter()
        .enumerate()
        .map(|(rank, reference)| {
            tracing::debug!("Importing BOM {reference} (rank {rank})");
            let mut versions = BTreeMap::new();
            let mut exclusions = BTreeMap::new();
            let mut visited = HashSet::new();
            expand(reference, loader, &mut visited, &mut versions, &mut exclusions)?;
            Ok(ImportedBom {
                reference: reference.clone(),
                rank,
                versions,
                exclusions,
            })
        })
        .collect()
}

/// Depth-first expansion of one BOM.
///
/// Nested imports are expanded before the BOM's own entries are applied, and
/// application is last-write-wins: a BOM's own entries beat entries pulled in
/// through its imports (closer to the root of the tree wins), and a later
/// nested sibling beats an earlier one. Exclusions are only ever unioned.
fn expand(
    reference: &BomReference,
    loader: &dyn BomLoader,
    visited: &mut HashSet<Coordinate>,
    versions: &mut BTreeMap<Coordinate, String>,
    exclusions: &mut BTreeMap<Coordinate, BTreeSet<Coordinate>>,
) -> DepmanResult<()> {
    if !visited.insert(reference.coordinate.clone()) {
        // Diamond import or cycle: already applied in this tree.
        tracing::debug!("Skipping already-visited BOM {reference}");
        return Ok(());
    }

    let descriptor = loader.load(reference).map_err(|e| {
        miette::Report::from(DepmanError::UnresolvableBom {
            reference: reference.to_string(),
            message: e.to_string(),
        })
    })?;

    for nested in &descriptor.imports {
        expand(nested, loader, visited, versions, exclusions)?;
    }

    for entry in &descriptor.managed {
        versions.insert(entry.coordinate.clone(), entry.version.clone());
        if !entry.exclusions.is_empty() {
            exclusions
                .entry(entry.coordinate.clone())
                .or_default()
                .extend(entry.exclusions.iter().cloned());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use depman_core::bom::{BomDescriptor, ManagedDependency};

    /// Loader over a fixed set of descriptors, keyed by coordinate.
    struct MapLoader {
        descriptors: Vec<BomDescriptor>,
    }

    impl BomLoader for MapLoader {
        fn load(&self, reference: &BomReference) -> DepmanResult<BomDescriptor> {
            self.descriptors
                .iter()
                .find(|d| d.reference.coordinate == reference.coordinate)
                .cloned()
                .ok_or_else(|| {
                    miette::Report::from(DepmanError::UnresolvableBom {
                        reference: reference.to_string(),
                        message: "no such descriptor".to_string(),
                    })
                })
        }
    }

    fn coord(s: &str) -> Coordinate {
        Coordinate::parse(s).unwrap()
    }

    fn bom(reference: &str) -> BomDescriptor {
        BomDescriptor::new(BomReference::parse(reference).unwrap())
    }

    fn managed(coordinate: &str, version: &str) -> ManagedDependency {
        ManagedDependency {
            coordinate: coord(coordinate),
            version: version.to_string(),
            exclusions: Vec::new(),
        }
    }

    #[test]
    fn own_entries_beat_nested_imports() {
        let mut parent = bom("org.shared:parent-bom:1.0");
        parent.managed.push(managed("g:a", "1.0"));

        let mut child = bom("org.example:bom:1.0");
        child.imports.push(parent.reference.clone());
        child.managed.push(managed("g:a", "2.0"));

        let loader = MapLoader {
            descriptors: vec![parent, child],
        };
        let imported =
            import_all(&[BomReference::parse("org.example:bom:1.0").unwrap()], &loader).unwrap();
        assert_eq!(imported[0].versions.get(&coord("g:a")).unwrap(), "2.0");
    }

    #[test]
    fn later_nested_sibling_wins_within_one_tree() {
        let mut first = bom("org.one:bom:1.0");
        first.managed.push(managed("g:a", "1.0"));
        let mut second = bom("org.two:bom:1.0");
        second.managed.push(managed("g:a", "2.0"));

        let mut top = bom("org.example:bom:1.0");
        top.imports.push(first.reference.clone());
        top.imports.push(second.reference.clone());

        let loader = MapLoader {
            descriptors: vec![first, second, top],
        };
        let imported =
            import_all(&[BomReference::parse("org.example:bom:1.0").unwrap()], &loader).unwrap();
        assert_eq!(imported[0].versions.get(&coord("g:a")).unwrap(), "2.0");
    }

    #[test]
    fn self_import_terminates() {
        let mut top = bom("org.example:bom:1.0");
        top.imports.push(top.reference.clone());
        top.managed.push(managed("g:a", "1.0"));

        let loader = MapLoader {
            descriptors: vec![top],
        };
        let imported =
            import_all(&[BomReference::parse("org.example:bom:1.0").unwrap()], &loader).unwrap();
        assert_eq!(imported[0].versions.get(&coord("g:a")).unwrap(), "1.0");
    }

    #[test]
    fn missing_bom_is_fatal() {
        let mut top = bom("org.example:bom:1.0");
        top.imports
            .push(BomReference::parse("org.missing:bom:1.0").unwrap());

        let loader = MapLoader {
            descriptors: vec![top],
        };
        let err = import_all(&[BomReference::parse("org.example:bom:1.0").unwrap()], &loader)
            .unwrap_err();
        assert!(err.to_string().contains("org.missing:bom:1.0"));
    }

    #[test]
    fn exclusions_union_across_nesting() {
        let mut parent = bom("org.shared:parent-bom:1.0");
        parent.managed.push(ManagedDependency {
            coordinate: coord("g:a"),
            version: "1.0".to_string(),
            exclusions: vec![coord("x:y")],
        });

        let mut top = bom("org.example:bom:1.0");
        top.imports.push(parent.reference.clone());
        top.managed.push(ManagedDependency {
            coordinate: coord("g:a"),
            version: "2.0".to_string(),
            exclusions: vec![coord("x:z")],
        });

        let loader = MapLoader {
            descriptors: vec![parent, top],
        };
        let imported =
            import_all(&[BomReference::parse("org.example:bom:1.0").unwrap()], &loader).unwrap();
        let excl = imported[0].exclusions.get(&coord("g:a")).unwrap();
        assert!(excl.contains(&coord("x:y")));
        assert!(excl.contains(&coord("x:z")));
    }
}
