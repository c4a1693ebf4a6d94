//! The declaration store: everything the configuration phase declares,
//! before any merging happens.

use std::collections::BTreeMap;

use depman_core::bom::BomReference;
use depman_core::config::ManagementConfig;
use depman_core::coordinate::Coordinate;
use depman_core::errors::{DepmanError, DepmanResult};

/// Ordered, append-only collection of management declarations.
///
/// Filled single-threaded during the configuration phase, then read by
/// [`crate::snapshot::ManagementSnapshot::build`]. There is no removal
/// operation: a build's management configuration is assembled once.
#[derive(Debug, Default)]
pub struct DeclarationStore {
    /// Directly declared versions. Re-declaring a coordinate overwrites the
    /// prior direct value; imported-BOM entries are unaffected.
    direct_versions: BTreeMap<Coordinate, String>,
    /// Directly declared exclusions, in declaration order.
    direct_exclusions: Vec<(Coordinate, Coordinate)>,
    /// Top-level BOM imports. The position in this list is the import's
    /// precedence rank (earlier wins).
    imports: Vec<BomReference>,
}

impl DeclarationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a parsed declarative config block.
    pub fn from_config(config: &ManagementConfig) -> DepmanResult<Self> {
        let mut store = Self::new();
        for reference in config.bom_imports()? {
            store.add_imported_bom(reference)?;
        }
        for (coordinate, version) in config.direct_versions()? {
            store.add_direct_version(coordinate, version)?;
        }
        for (owner, excluded) in config.direct_exclusions()? {
            store.add_direct_exclusion(owner, excluded)?;
        }
        Ok(store)
    }

    /// Declare a managed version directly. Last direct declaration wins
    /// among direct declarations for the same coordinate.
    pub fn add_direct_version(
        &mut self,
        coordinate: Coordinate,
        version: impl Into<String>,
    ) -> DepmanResult<()> {
        ensure_valid(&coordinate)?;
        let version = version.into();
        if version.is_empty() {
            return Err(DepmanError::InvalidCoordinate {
                message: format!("empty managed version declared for '{coordinate}'"),
            }
            .into());
        }
        self.direct_versions.insert(coordinate, version);
        Ok(())
    }

    /// Declare that `excluded` must be cut from beneath `owner`.
    pub fn add_direct_exclusion(
        &mut self,
        owner: Coordinate,
        excluded: Coordinate,
    ) -> DepmanResult<()> {
        ensure_valid(&owner)?;
        ensure_valid(&excluded)?;
        self.direct_exclusions.push((owner, excluded));
        Ok(())
    }

    /// Register a top-level BOM import. Registration order is precedence
    /// order: earlier imports win over later ones.
    pub fn add_imported_bom(&mut self, reference: BomReference) -> DepmanResult<()> {
        ensure_valid(&reference.coordinate)?;
        if reference.version.is_empty() {
            return Err(DepmanError::InvalidCoordinate {
                message: format!("BOM import '{}' has an empty version", reference.coordinate),
            }
            .into());
        }
        self.imports.push(reference);
        Ok(())
    }

    pub fn direct_versions(&self) -> &BTreeMap<Coordinate, String> {
        &self.direct_versions
    }

    pub fn direct_exclusions(&self) -> &[(Coordinate, Coordinate)] {
        &self.direct_exclusions
    }

    pub fn imports(&self) -> &[BomReference] {
        &self.imports
    }
}

/// Coordinates normally come validated out of `Coordinate::new`, but the
/// fields are public; re-check at the declaration boundary.
fn ensure_valid(coordinate: &Coordinate) -> DepmanResult<()> {
    if coordinate.group.is_empty() || coordinate.artifact.is_empty() {
        return Err(DepmanError::InvalidCoordinate {
            message: format!("'{coordinate}' has an empty group or artifact"),
        }
        .into());
    }
    Ok(())
}
