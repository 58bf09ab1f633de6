use serde::Serialize;

/// An ordered version tag carried by a scenario definition.
///
/// Bumping the triple marks a definition as superseding earlier results for
/// the same scenario name. This is advisory metadata for reporting; the
/// harness never merges or migrates entries that share a name, it runs
/// whichever entry was selected.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, derive_more::Display,
)]
#[display("{major}.{minor}.{patch}")]
pub struct ScenarioVersion {
    major: u32,
    minor: u32,
    patch: u32,
}

impl ScenarioVersion {
    pub fn create(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl Default for ScenarioVersion {
    fn default() -> Self {
        Self::create(1, 0, 0)
    }
}
