//! BOM descriptor parsing: dependency-management entries, property
//! interpolation, nested BOM import detection.

use std::collections::BTreeMap;

use quick_xml::events::Event;
use quick_xml::Reader;

use depman_core::bom::{BomDescriptor, BomReference, ManagedDependency};
use depman_core::coordinate::Coordinate;
use depman_core::errors::{DepmanError, DepmanResult};

/// A BOM parsed from POM XML, before interpolation and validation.
#[derive(Debug, Clone, Default)]
pub struct BomPom {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub properties: BTreeMap<String, String>,
    pub dependency_management: Vec<PomManagedDependency>,
}

/// One `<dependencyManagement>` entry as declared in the document.
#[derive(Debug, Clone, Default)]
pub struct PomManagedDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    pub scope: Option<String>,
    pub type_: Option<String>,
    pub classifier: Option<String>,
    pub exclusions: Vec<PomExclusion>,
}

/// An exclusion within a management entry. A missing artifact means the
/// whole group is excluded and is represented downstream as artifact `*`.
#[derive(Debug, Clone, Default)]
pub struct PomExclusion {
    pub group_id: String,
    pub artifact_id: Option<String>,
}

impl PomManagedDependency {
    /// Whether this entry imports another BOM rather than managing a version.
    pub fn is_bom_import(&self) -> bool {
        self.scope.as_deref() == Some("import") && self.type_.as_deref().unwrap_or("jar") == "pom"
    }
}

impl BomPom {
    /// Resolve `${property}` references using the document's properties and
    /// the built-in project variables. Unresolvable references are left
    /// as-is after a bounded number of passes.
    pub fn interpolate(&self, input: &str) -> String {
        let mut result = input.to_string();
        let mut iterations = 0;
        while result.contains("${") && iterations < 20 {
            iterations += 1;
            let Some(start) = result.find("${") else {
                break;
            };
            let Some(end) = result[start..].find('}') else {
                break;
            };
            let key = &result[start + 2..start + end];
            match self.lookup_property(key) {
                Some(value) => {
                    result = format!("{}{}{}", &result[..start], value, &result[start + end + 1..]);
                }
                None => break,
            }
        }
        result
    }

    fn lookup_property(&self, key: &str) -> Option<String> {
        match key {
            "project.groupId" | "pom.groupId" => self.group_id.clone(),
            "project.artifactId" | "pom.artifactId" => self.artifact_id.clone(),
            "project.version" | "pom.version" => self.version.clone(),
            _ => self.properties.get(key).cloned(),
        }
    }

    /// Interpolate, validate, and split this document into a descriptor:
    /// plain management entries become [`ManagedDependency`] values and
    /// `scope=import, type=pom` entries become nested [`BomReference`]s.
    ///
    /// Entries that still lack a version after interpolation manage nothing
    /// and are skipped with a warning; a BOM import without a version is an
    /// error, since it cannot be resolved at all.
    pub fn into_descriptor(self) -> DepmanResult<BomDescriptor> {
        let (group, artifact, version) = match (&self.group_id, &self.artifact_id, &self.version) {
            (Some(g), Some(a), Some(v)) => (g.clone(), a.clone(), v.clone()),
            _ => {
                return Err(DepmanError::Parse {
                    message: "BOM document is missing groupId, artifactId, or version".to_string(),
                }
                .into())
            }
        };
        let reference = BomReference::new(Coordinate::new(group, artifact)?, version);
        let mut descriptor = BomDescriptor::new(reference);

        for entry in &self.dependency_management {
            let group = self.interpolate(&entry.group_id);
            let artifact = self.interpolate(&entry.artifact_id);
            let version = entry.version.as_deref().map(|v| self.interpolate(v));

            if entry.is_bom_import() {
                let Some(version) = version.filter(|v| !v.is_empty()) else {
                    return Err(DepmanError::Parse {
                        message: format!(
                            "BOM import '{group}:{artifact}' in {} has no version",
                            descriptor.reference
                        ),
                    }
                    .into());
                };
                descriptor
                    .imports
                    .push(BomReference::new(Coordinate::new(group, artifact)?, version));
                continue;
            }

            let Some(version) = version.filter(|v| !v.is_empty()) else {
                tracing::warn!(
                    "Skipping management entry '{group}:{artifact}' in {}: no version",
                    descriptor.reference
                );
                continue;
            };

            let mut coordinate = Coordinate::new(group, artifact)?;
            if let Some(classifier) = &entry.classifier {
                coordinate = coordinate.with_classifier(self.interpolate(classifier));
            }
            let exclusions = entry
                .exclusions
                .iter()
                .map(|e| {
                    Coordinate::new(
                        self.interpolate(&e.group_id),
                        e.artifact_id
                            .as_deref()
                            .map(|a| self.interpolate(a))
                            .unwrap_or_else(|| "*".to_string()),
                    )
                })
                .collect::<DepmanResult<Vec<_>>>()?;

            descriptor.managed.push(ManagedDependency {
                coordinate,
                version,
                exclusions,
            });
        }

        Ok(descriptor)
    }
}

/// Parse a POM XML string into a [`BomPom`].
pub fn parse_bom(xml: &str) -> DepmanResult<BomPom> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut pom = BomPom::default();
    let mut path: Vec<String> = Vec::new();
    let mut text_buf = String::new();

    let mut current_dep: Option<PomManagedDependency> = None;
    let mut current_exclusion: Option<PomExclusion> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                path.push(tag);
                text_buf.clear();

                let ctx = path.join(">");
                if ctx == "project>dependencyManagement>dependencies>dependency" {
                    current_dep = Some(PomManagedDependency::default());
                } else if ctx.ends_with(">exclusions>exclusion") && current_dep.is_some() {
                    current_exclusion = Some(PomExclusion::default());
                }
            }
            Ok(Event::Text(ref e)) => {
                text_buf = e.unescape().unwrap_or_default().to_string();
            }
            Ok(Event::End(_)) => {
                let ctx = path.join(">");
                let tag = path.last().cloned().unwrap_or_default();

                // <project><properties><key>value</key></properties>
                if path.len() == 3 && path.get(1).map(|s| s.as_str()) == Some("properties") {
                    pom.properties.insert(tag.clone(), text_buf.clone());
                }

                if let Some(ref mut excl) = current_exclusion {
                    match tag.as_str() {
                        "groupId" => excl.group_id = text_buf.clone(),
                        "artifactId" => excl.artifact_id = Some(text_buf.clone()),
                        _ => {}
                    }
                    if ctx.ends_with(">exclusions>exclusion") {
                        if let (Some(excl), Some(dep)) =
                            (current_exclusion.take(), current_dep.as_mut())
                        {
                            dep.exclusions.push(excl);
                        }
                    }
                } else if let Some(ref mut dep) = current_dep {
                    match tag.as_str() {
                        "groupId" if ctx.ends_with(">dependency>groupId") => {
                            dep.group_id = text_buf.clone();
                        }
                        "artifactId" if ctx.ends_with(">dependency>artifactId") => {
                            dep.artifact_id = text_buf.clone();
                        }
                        "version" if ctx.ends_with(">dependency>version") => {
                            dep.version = Some(text_buf.clone());
                        }
                        "scope" if ctx.ends_with(">dependency>scope") => {
                            dep.scope = Some(text_buf.clone());
                        }
                        "type" if ctx.ends_with(">dependency>type") => {
                            dep.type_ = Some(text_buf.clone());
                        }
                        "classifier" if ctx.ends_with(">dependency>classifier") => {
                            dep.classifier = Some(text_buf.clone());
                        }
                        _ => {}
                    }
                    if ctx == "project>dependencyManagement>dependencies>dependency" {
                        if let Some(dep) = current_dep.take() {
                            pom.dependency_management.push(dep);
                        }
                    }
                }

                // Top-level project identity
                if path.len() == 2 {
                    match tag.as_str() {
                        "groupId" => pom.group_id = Some(text_buf.clone()),
                        "artifactId" => pom.artifact_id = Some(text_buf.clone()),
                        "version" => pom.version = Some(text_buf.clone()),
                        _ => {}
                    }
                }

                path.pop();
                text_buf.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(DepmanError::Parse {
                    message: format!("Failed to parse BOM XML: {e}"),
                }
                .into());
            }
            _ => {}
        }
    }

    Ok(pom)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOM_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
    <modelVersion>4.0.0</modelVersion>
    <groupId>org.example</groupId>
    <artifactId>platform-bom</artifactId>
    <version>1.0.0</version>
    <packaging>pom</packaging>

    <properties>
        <slf4j.version>1.7.36</slf4j.version>
    </properties>

    <dependencyManagement>
        <dependencies>
            <dependency>
                <groupId>org.slf4j</groupId>
                <artifactId>slf4j-api</artifactId>
                <version>${slf4j.version}</version>
            </dependency>
            <dependency>
                <groupId>com.example</groupId>
                <artifactId>web</artifactId>
                <version>2.0.0</version>
                <exclusions>
                    <exclusion>
                        <groupId>commons-logging</groupId>
                        <artifactId>commons-logging</artifactId>
                    </exclusion>
                    <exclusion>
                        <groupId>log4j</groupId>
                    </exclusion>
                </exclusions>
            </dependency>
            <dependency>
                <groupId>com.fasterxml.jackson</groupId>
                <artifactId>jackson-bom</artifactId>
                <version>2.13.3</version>
                <type>pom</type>
                <scope>import</scope>
            </dependency>
        </dependencies>
    </dependencyManagement>
</project>"#;

    #[test]
    fn parse_bom_document() {
        let pom = parse_bom(BOM_XML).unwrap();
        assert_eq!(pom.group_id.as_deref(), Some("org.example"));
        assert_eq!(pom.artifact_id.as_deref(), Some("platform-bom"));
        assert_eq!(pom.version.as_deref(), Some("1.0.0"));
        assert_eq!(pom.dependency_management.len(), 3);
        assert_eq!(pom.properties.get("slf4j.version").unwrap(), "1.7.36");
    }

    #[test]
    fn descriptor_splits_imports_from_entries() {
        let descriptor = parse_bom(BOM_XML).unwrap().into_descriptor().unwrap();
        assert_eq!(descriptor.reference.to_string(), "org.example:platform-bom:1.0.0");
        assert_eq!(descriptor.managed.len(), 2);
        assert_eq!(descriptor.imports.len(), 1);
        assert_eq!(
            descriptor.imports[0].to_string(),
            "com.fasterxml.jackson:jackson-bom:2.13.3"
        );
    }

    #[test]
    fn property_interpolation_in_versions() {
        let descriptor = parse_bom(BOM_XML).unwrap().into_descriptor().unwrap();
        let slf4j = descriptor
            .managed
            .iter()
            .find(|m| m.coordinate.artifact == "slf4j-api")
            .unwrap();
        assert_eq!(slf4j.version, "1.7.36");
    }

    #[test]
    fn exclusions_carry_over_with_wildcard_artifact() {
        let descriptor = parse_bom(BOM_XML).unwrap().into_descriptor().unwrap();
        let web = descriptor
            .managed
            .iter()
            .find(|m| m.coordinate.artifact == "web")
            .unwrap();
        assert_eq!(web.exclusions.len(), 2);
        assert_eq!(web.exclusions[0].to_string(), "commons-logging:commons-logging");
        assert_eq!(web.exclusions[1].to_string(), "log4j:*");
    }

    #[test]
    fn project_version_interpolation() {
        let xml = r#"<?xml version="1.0"?>
<project>
    <groupId>org.example</groupId>
    <artifactId>bom</artifactId>
    <version>3.0.0</version>
    <dependencyManagement>
        <dependencies>
            <dependency>
                <groupId>${project.groupId}</groupId>
                <artifactId>sibling</artifactId>
                <version>${project.version}</version>
            </dependency>
        </dependencies>
    </dependencyManagement>
</project>"#;
        let descriptor = parse_bom(xml).unwrap().into_descriptor().unwrap();
        assert_eq!(descriptor.managed[0].coordinate.group, "org.example");
        assert_eq!(descriptor.managed[0].version, "3.0.0");
    }

    #[test]
    fn entry_without_version_is_skipped() {
        let xml = r#"<?xml version="1.0"?>
<project>
    <groupId>org.example</groupId>
    <artifactId>bom</artifactId>
    <version>1.0</version>
    <dependencyManagement>
        <dependencies>
            <dependency>
                <groupId>g</groupId>
                <artifactId>no-version</artifactId>
            </dependency>
        </dependencies>
    </dependencyManagement>
</project>"#;
        let descriptor = parse_bom(xml).unwrap().into_descriptor().unwrap();
        assert!(descriptor.managed.is_empty());
    }

    #[test]
    fn import_without_version_is_an_error() {
        let xml = r#"<?xml version="1.0"?>
<project>
    <groupId>org.example</groupId>
    <artifactId>bom</artifactId>
    <version>1.0</version>
    <dependencyManagement>
        <dependencies>
            <dependency>
                <groupId>g</groupId>
                <artifactId>other-bom</artifactId>
                <type>pom</type>
                <scope>import</scope>
            </dependency>
        </dependencies>
    </dependencyManagement>
</project>"#;
        assert!(parse_bom(xml).unwrap().into_descriptor().is_err());
    }

    #[test]
    fn missing_identity_is_an_error() {
        let xml = r#"<?xml version="1.0"?>
<project>
    <artifactId>bom</artifactId>
</project>"#;
        assert!(parse_bom(xml).unwrap().into_descriptor().is_err());
    }

    #[test]
    fn malformed_xml_is_a_parse_error() {
        assert!(parse_bom("<project><unclosed></project>").is_err());
    }
}
