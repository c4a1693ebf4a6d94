use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::bom::BomReference;
use crate::coordinate::Coordinate;
use crate::errors::{DepmanError, DepmanResult};
use crate::policy::PolicyFlags;

/// The declarative management block a host build file embeds.
///
/// ```toml
/// apply-exclusions = true
/// overridden-by-dependencies = false
///
/// imports = ["org.springframework:spring-framework-bom:5.3.21"]
///
/// [dependencies]
/// "org.slf4j:slf4j-api" = "1.7.36"
///
/// [[exclusions]]
/// owner = "com.example:web"
/// exclude = "commons-logging:commons-logging"
/// ```
///
/// `[dependencies]` is a `BTreeMap`, so direct declarations are applied in
/// coordinate order regardless of their order in the file; `imports` and
/// `[[exclusions]]` keep file order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManagementConfig {
    #[serde(flatten)]
    pub policy: PolicyFlags,

    /// Imported BOMs as `"group:artifact:version"`, in precedence order.
    #[serde(default)]
    pub imports: Vec<String>,

    /// Directly managed versions, keyed by `"group:artifact"`.
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,

    /// Direct transitive exclusions.
    #[serde(default)]
    pub exclusions: Vec<ExclusionEntry>,
}

/// One `[[exclusions]]` entry: cut `exclude` from beneath `owner`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExclusionEntry {
    pub owner: String,
    pub exclude: String,
}

impl ManagementConfig {
    /// Parse a management block from TOML text.
    pub fn parse_toml(text: &str) -> DepmanResult<Self> {
        toml::from_str(text).map_err(|e| {
            DepmanError::Config {
                message: format!("Failed to parse management config: {e}"),
            }
            .into()
        })
    }

    /// Directly managed versions as validated coordinates.
    pub fn direct_versions(&self) -> DepmanResult<Vec<(Coordinate, String)>> {
        self.dependencies
            .iter()
            .map(|(key, version)| Ok((Coordinate::parse(key)?, version.clone())))
            .collect()
    }

    /// Direct exclusions as validated `(owner, excluded)` pairs.
    pub fn direct_exclusions(&self) -> DepmanResult<Vec<(Coordinate, Coordinate)>> {
        self.exclusions
            .iter()
            .map(|e| Ok((Coordinate::parse(&e.owner)?, Coordinate::parse(&e.exclude)?)))
            .collect()
    }

    /// Imported BOM references, in declaration order.
    pub fn bom_imports(&self) -> DepmanResult<Vec<BomReference>> {
        self.imports.iter().map(|s| BomReference::parse(s)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
overridden-by-dependencies = false

imports = [
    "org.springframework:spring-framework-bom:5.3.21",
    "com.fasterxml.jackson:jackson-bom:2.13.3",
]

[dependencies]
"org.slf4j:slf4j-api" = "1.7.36"
"com.google.guava:guava" = "31.1-jre"

[[exclusions]]
owner = "com.example:web"
exclude = "commons-logging:commons-logging"
"#;

    #[test]
    fn parse_full_config() {
        let config = ManagementConfig::parse_toml(CONFIG).unwrap();
        assert!(config.policy.apply_exclusions);
        assert!(!config.policy.overridden_by_dependencies);
        assert_eq!(config.imports.len(), 2);
        assert_eq!(config.dependencies.len(), 2);
        assert_eq!(config.exclusions.len(), 1);
    }

    #[test]
    fn direct_versions_are_validated() {
        let config = ManagementConfig::parse_toml(CONFIG).unwrap();
        let versions = config.direct_versions().unwrap();
        assert!(versions
            .iter()
            .any(|(c, v)| c.to_string() == "org.slf4j:slf4j-api" && v == "1.7.36"));
    }

    #[test]
    fn bad_coordinate_key_is_rejected() {
        let config = ManagementConfig::parse_toml(
            r#"
[dependencies]
"not-a-coordinate" = "1.0"
"#,
        )
        .unwrap();
        assert!(config.direct_versions().is_err());
    }

    #[test]
    fn empty_config_defaults() {
        let config = ManagementConfig::parse_toml("").unwrap();
        assert!(config.policy.apply_exclusions);
        assert!(config.policy.overridden_by_dependencies);
        assert!(config.imports.is_empty());
        assert!(config.dependencies.is_empty());
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        assert!(ManagementConfig::parse_toml("imports = [").is_err());
    }
}
