//! Container runners - the boundary where build steps actually execute

pub mod cli_runner;
pub mod config;
pub mod error;

use crate::core::Environment;
use async_trait::async_trait;
use tracing::info;

pub use cli_runner::ContainerCliRunner;
pub use config::RunnerConfig;
pub use error::RunnerError;

/// Trait for step execution - allows for different container backends
#[async_trait]
pub trait ContainerRunner: Send + Sync {
    /// Start a container from `image`, run `command` in `workdir` with `env`
    /// injected, and wait for the exit status.
    async fn run(
        &self,
        image: &str,
        workdir: &str,
        env: &Environment,
        command: &[String],
    ) -> Result<i32, RunnerError>;
}

/// Runner that logs each step instead of starting a container
#[derive(Debug, Clone, Default)]
pub struct DryRunRunner;

#[async_trait]
impl ContainerRunner for DryRunRunner {
    async fn run(
        &self,
        image: &str,
        workdir: &str,
        env: &Environment,
        command: &[String],
    ) -> Result<i32, RunnerError> {
        info!(
            "[dry-run] {} in {} ({} env vars): {}",
            image,
            workdir,
            env.len(),
            command.join(" ")
        );
        Ok(0)
    }
}
