//! Build context - externally supplied values and the identifiers derived from them

use serde::{Deserialize, Serialize};

/// Environment variable the CI server uses to pass the build counter
pub const BUILD_NUMBER_ENV: &str = "BUILD_NUMBER";

/// Environment variable the CI server uses to pass the checked-out revision
pub const REVISION_ENV: &str = "BUILD_VCS_NUMBER";

/// Names a step environment value may reference
pub const REFERENCE_NAMES: [&str; 3] = ["versionText", "buildText", "revision"];

/// Values the hosting CI platform supplies for a single pipeline invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildContext {
    /// Monotonic counter, incremented per invocation
    pub build_number: u64,

    /// VCS commit identifier of the checked-out source
    pub revision: String,
}

impl BuildContext {
    pub fn new(build_number: u64, revision: impl Into<String>) -> Self {
        Self {
            build_number,
            revision: revision.into(),
        }
    }
}

/// Identifiers computed once per resolution and copied into step environments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildIdentifiers {
    /// `v{major}.{minor}`
    pub version_text: String,

    pub build_number: u64,

    /// `{version_text}.0.{build_number}`
    pub build_text: String,

    pub revision: String,
}

impl BuildIdentifiers {
    /// Derive identifiers from already-validated version fields and context
    pub fn compute(major: u64, minor: u64, context: &BuildContext) -> Self {
        let version_text = format!("v{}.{}", major, minor);
        let build_text = format!("{}.0.{}", version_text, context.build_number);

        Self {
            version_text,
            build_number: context.build_number,
            build_text,
            revision: context.revision.clone(),
        }
    }

    /// Look up a substitutable identifier by its reference name
    pub fn lookup(&self, name: &str) -> Option<&str> {
        REFERENCE_NAMES
            .iter()
            .zip(self.reference_values())
            .find(|(reference, _)| **reference == name)
            .map(|(_, value)| value)
    }

    // Same order as REFERENCE_NAMES
    fn reference_values(&self) -> [&str; 3] {
        [&self.version_text, &self.build_text, &self.revision]
    }
}
