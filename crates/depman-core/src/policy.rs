use serde::{Deserialize, Serialize};

/// Process-wide management policy, fixed before snapshot construction and
/// immutable for the rest of the build.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PolicyFlags {
    /// Whether Maven-style exclusions are honored during resolution.
    /// When false, exclusion lookups return the empty set regardless of
    /// what was declared.
    #[serde(default = "default_true", rename = "apply-exclusions")]
    pub apply_exclusions: bool,

    /// Whether a version declared directly on a requested dependency
    /// overrides the managed version for that coordinate.
    #[serde(default = "default_true", rename = "overridden-by-dependencies")]
    pub overridden_by_dependencies: bool,
}

impl Default for PolicyFlags {
    fn default() -> Self {
        Self {
            apply_exclusions: true,
            overridden_by_dependencies: true,
        }
    }
}

fn default_true() -> bool {
    true
}
