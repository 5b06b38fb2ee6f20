//! buildpipe - resolve and run declarative containerized CI build descriptors

pub mod cli;
pub mod core;
pub mod execution;
pub mod runner;

// Re-export commonly used types
pub use core::{
    resolve, BuildContext, BuildIdentifiers, BuildStep, Pipeline, ProjectDescriptor, ResolveError,
    StepTemplate,
};
pub use execution::{AbortHandle, ExecutionEngine, ExecutionEvent, ExecutionResult};
pub use runner::{ContainerCliRunner, ContainerRunner, DryRunRunner, RunnerConfig, RunnerError};
