use serde::{Deserialize, Serialize};

use crate::errors::{DepmanError, DepmanResult};

/// The identity of a module: `group:artifact`, optionally refined by a
/// classifier to distinguish artifact variants of the same group:artifact.
///
/// Coordinates compare by exact string equality on all identifying fields.
/// The derived total order keeps snapshot enumeration deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub group: String,
    pub artifact: String,
    #[serde(default)]
    pub classifier: Option<String>,
}

impl Coordinate {
    /// Create a coordinate, rejecting empty group or artifact.
    pub fn new(group: impl Into<String>, artifact: impl Into<String>) -> DepmanResult<Self> {
        let group = group.into();
        let artifact = artifact.into();
        if group.is_empty() || artifact.is_empty() {
            return Err(DepmanError::InvalidCoordinate {
                message: format!("'{group}:{artifact}' has an empty group or artifact"),
            }
            .into());
        }
        Ok(Self {
            group,
            artifact,
            classifier: None,
        })
    }

    /// Refine a coordinate with a classifier.
    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    /// Parse `"group:artifact"` or `"group:artifact:classifier"`.
    pub fn parse(s: &str) -> DepmanResult<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        match parts.as_slice() {
            [group, artifact] => Self::new(*group, *artifact),
            [group, artifact, classifier] => {
                Ok(Self::new(*group, *artifact)?.with_classifier(*classifier))
            }
            _ => Err(DepmanError::InvalidCoordinate {
                message: format!("'{s}' is not of the form group:artifact[:classifier]"),
            }
            .into()),
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.classifier {
            Some(c) => write!(f, "{}:{}:{}", self.group, self.artifact, c),
            None => write!(f, "{}:{}", self.group, self.artifact),
        }
    }
}
