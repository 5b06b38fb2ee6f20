//! Step executor - runs individual steps through a container runner

use crate::{
    core::BuildStep,
    execution::AbortHandle,
    runner::{ContainerRunner, RunnerError},
};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// Result of executing a single step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The command exited with status 0
    Succeeded,
    /// The command exited with a non-zero status
    Failed { exit_status: i32 },
    /// The runner could not run the step at all
    RunnerError { error: String },
    /// Stopped by an abort request or an elapsed deadline
    Aborted,
}

/// Executes a single step
pub struct StepExecutor<R> {
    runner: R,
}

impl<R: ContainerRunner> StepExecutor<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    /// Run a step and wait for it, an abort, or the deadline, whichever comes first
    pub async fn execute(
        &self,
        step_index: usize,
        step: &BuildStep,
        abort: &AbortHandle,
        deadline: Option<Instant>,
    ) -> StepOutcome {
        info!("Executing step {}: {}", step_index, step.describe());
        debug!(
            "Step {} runs in {} with {} env vars",
            step_index,
            step.workdir,
            step.env.len()
        );

        let run = self
            .runner
            .run(&step.image, &step.workdir, &step.env, &step.command);
        let expired = async {
            match deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        let result = tokio::select! {
            result = run => result,
            _ = abort.aborted() => {
                warn!("Step {} aborted", step_index);
                return StepOutcome::Aborted;
            }
            _ = expired => {
                warn!("Step {} aborted: pipeline deadline elapsed", step_index);
                return StepOutcome::Aborted;
            }
        };

        match result {
            Ok(0) => {
                info!("Step {} completed successfully", step_index);
                StepOutcome::Succeeded
            }
            Ok(exit_status) => {
                error!("Step {} exited with status {}", step_index, exit_status);
                StepOutcome::Failed { exit_status }
            }
            Err(RunnerError::Timeout(secs)) => {
                warn!("Step {} aborted: timeout after {}s", step_index, secs);
                StepOutcome::Aborted
            }
            Err(e) => {
                error!("Runner error for step {}: {}", step_index, e);
                StepOutcome::RunnerError {
                    error: e.to_string(),
                }
            }
        }
    }
}
