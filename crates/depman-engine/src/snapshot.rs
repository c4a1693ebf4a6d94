//! The frozen management snapshot: the read-only query surface the host
//! build tool consults for every dependency edge it resolves.

use std::collections::{BTreeMap, BTreeSet};

use depman_core::bom::BomLoader;
use depman_core::coordinate::Coordinate;
use depman_core::errors::DepmanResult;
use depman_core::policy::PolicyFlags;

use crate::exclusion::effective_exclusions;
use crate::importer::import_all;
use crate::precedence::effective_versions;
use crate::store::DeclarationStore;

/// The effective management state for one build, frozen at construction.
///
/// Owns plain maps with no interior mutability, so it is `Send + Sync` and
/// safe to share behind an `Arc` across parallel resolution workers. Either
/// [`build`](Self::build) produces the full merge or it fails; a partially
/// merged snapshot never exists.
#[derive(Debug)]
pub struct ManagementSnapshot {
    versions: BTreeMap<Coordinate, String>,
    exclusions: BTreeMap<Coordinate, BTreeSet<Coordinate>>,
    policy: PolicyFlags,
}

impl ManagementSnapshot {
    /// Expand all BOM imports through `loader`, merge every source, and
    /// freeze the result.
    ///
    /// Fails with `UnresolvableBom` if any BOM anywhere in the import graph
    /// cannot be loaded; nothing is published in that case.
    pub fn build(
        store: &DeclarationStore,
        policy: PolicyFlags,
        loader: &dyn BomLoader,
    ) -> DepmanResult<Self> {
        let imports = import_all(store.imports(), loader)?;
        let versions = effective_versions(store, &imports);
        let exclusions = effective_exclusions(store, &imports);
        tracing::debug!(
            "Built management snapshot: {} managed coordinates, {} owners with exclusions",
            versions.len(),
            exclusions.len()
        );
        Ok(Self {
            versions,
            exclusions,
            policy,
        })
    }

    /// The managed version for a coordinate, if any source manages it.
    pub fn managed_version(&self, coordinate: &Coordinate) -> Option<&str> {
        self.versions.get(coordinate).map(String::as_str)
    }

    /// Whether any source manages a version for this coordinate.
    pub fn is_managed(&self, coordinate: &Coordinate) -> bool {
        self.versions.contains_key(coordinate)
    }

    /// The exclusions to apply beneath `owner` during the transitive walk.
    ///
    /// Empty when nothing is declared or when the `apply_exclusions`
    /// kill-switch is off.
    pub fn exclusions_for(&self, owner: &Coordinate) -> BTreeSet<Coordinate> {
        if !self.policy.apply_exclusions {
            return BTreeSet::new();
        }
        self.exclusions.get(owner).cloned().unwrap_or_default()
    }

    /// Decide the version for one dependency edge.
    ///
    /// Branch order: an explicit version wins when the
    /// `overridden_by_dependencies` policy allows it; else the managed
    /// version if present; else whatever was explicitly requested; else
    /// nothing (unmanaged).
    pub fn resolve_effective_version(
        &self,
        coordinate: &Coordinate,
        explicit_version: Option<&str>,
    ) -> Option<String> {
        if let Some(explicit) = explicit_version {
            if self.policy.overridden_by_dependencies {
                return Some(explicit.to_string());
            }
        }
        if let Some(managed) = self.managed_version(coordinate) {
            return Some(managed.to_string());
        }
        explicit_version.map(|v| v.to_string())
    }

    /// All managed coordinates with their effective versions, in coordinate
    /// order. Bulk read for generated-descriptor emission.
    pub fn managed_entries(&self) -> impl Iterator<Item = (&Coordinate, &str)> {
        self.versions.iter().map(|(c, v)| (c, v.as_str()))
    }

    pub fn policy(&self) -> PolicyFlags {
        self.policy
    }

    /// Number of managed coordinates.
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}
