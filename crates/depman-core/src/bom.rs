use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;
use crate::errors::{DepmanError, DepmanResult};

/// A reference to an importable BOM descriptor: a coordinate plus the
/// descriptor's own version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BomReference {
    pub coordinate: Coordinate,
    pub version: String,
}

impl BomReference {
    pub fn new(coordinate: Coordinate, version: impl Into<String>) -> Self {
        Self {
            coordinate,
            version: version.into(),
        }
    }

    /// Parse `"group:artifact:version"`.
    pub fn parse(s: &str) -> DepmanResult<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        match parts.as_slice() {
            [group, artifact, version] if !version.is_empty() => {
                Ok(Self::new(Coordinate::new(*group, *artifact)?, *version))
            }
            _ => Err(DepmanError::InvalidCoordinate {
                message: format!("'{s}' is not of the form group:artifact:version"),
            }
            .into()),
        }
    }
}

impl std::fmt::Display for BomReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.coordinate.group, self.coordinate.artifact, self.version
        )
    }
}

/// One dependency-management entry as a BOM declares it: a managed version
/// for a coordinate plus the transitive exclusions declared against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedDependency {
    pub coordinate: Coordinate,
    pub version: String,
    #[serde(default)]
    pub exclusions: Vec<Coordinate>,
}

/// A parsed BOM descriptor: its own management entries in declaration order
/// plus the BOMs it imports, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BomDescriptor {
    pub reference: BomReference,
    #[serde(default)]
    pub managed: Vec<ManagedDependency>,
    #[serde(default)]
    pub imports: Vec<BomReference>,
}

impl BomDescriptor {
    pub fn new(reference: BomReference) -> Self {
        Self {
            reference,
            managed: Vec::new(),
            imports: Vec::new(),
        }
    }
}

/// The capability to produce a parsed descriptor for a BOM reference.
///
/// Retrieval, caching, and retries are the loader's responsibility; the
/// engine only calls `load` during snapshot construction and treats any
/// failure as fatal to the build's management setup.
pub trait BomLoader {
    fn load(&self, reference: &BomReference) -> DepmanResult<BomDescriptor>;
}
