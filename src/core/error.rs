//! Resolution error types

use thiserror::Error;

/// Errors raised while turning a descriptor into a runnable pipeline.
///
/// All of these are detected before any container is started.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Invalid version v{major}.{minor}: major and minor must be non-negative")]
    InvalidVersion { major: i64, minor: i64 },

    #[error("Project '{name}' declares no steps")]
    NoSteps { name: String },

    #[error("Invalid build context: {0}")]
    InvalidContext(String),

    #[error("Step {step_index}: variable '{variable}' references undefined '${reference}'")]
    UnresolvedReference {
        step_index: usize,
        variable: String,
        reference: String,
    },

    #[error("Step {step_index}: command is empty")]
    EmptyCommand { step_index: usize },

    #[error("Step {step_index}: invalid environment variable name '{name}'")]
    InvalidEnvironmentName { step_index: usize, name: String },

    #[error("Step {step_index}: environment variable '{name}' is declared more than once")]
    DuplicateEnvironment { step_index: usize, name: String },
}
