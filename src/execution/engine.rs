//! Main execution engine - runs a resolved pipeline step by step

use crate::{
    core::{ExecutionRecord, FailureReason, Pipeline},
    execution::{AbortHandle, StepExecutor, StepOutcome},
    runner::ContainerRunner,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Final outcome of a pipeline invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ExecutionResult {
    /// Every step exited with status 0, in order
    Succeeded,
    /// Step `step_index` exited non-zero; later steps never ran
    Failed { step_index: usize, exit_status: i32 },
    /// The runner could not run step `step_index`
    RunnerError { step_index: usize, error: String },
    /// Cancelled or timed out while at step `step_index`
    Aborted {
        step_index: usize,
        completed_steps: usize,
    },
}

impl ExecutionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionResult::Succeeded)
    }
}

/// Events that can occur during pipeline execution
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    PipelineStarted {
        execution_id: Uuid,
        pipeline_name: String,
        total_steps: usize,
    },
    StepStarted {
        step_index: usize,
        total_steps: usize,
        description: String,
    },
    StepSucceeded {
        step_index: usize,
    },
    StepFailed {
        step_index: usize,
        reason: FailureReason,
    },
    PipelineFinished {
        execution_id: Uuid,
        result: ExecutionResult,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(&ExecutionEvent) + Send + Sync>;

/// Sequential pipeline execution engine
pub struct ExecutionEngine<R> {
    executor: StepExecutor<R>,
    abort: AbortHandle,
    timeout: Option<Duration>,
    event_handlers: Vec<EventHandler>,
}

impl<R: ContainerRunner> ExecutionEngine<R> {
    pub fn new(runner: R) -> Self {
        Self {
            executor: StepExecutor::new(runner),
            abort: AbortHandle::new(),
            timeout: None,
            event_handlers: Vec::new(),
        }
    }

    /// Abort the whole invocation once `timeout` has elapsed
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use an abort handle shared with the caller
    pub fn with_abort_handle(mut self, abort: AbortHandle) -> Self {
        self.abort = abort;
        self
    }

    /// Handle for aborting executions started by this engine
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(&ExecutionEvent) + Send + Sync + 'static,
    {
        self.event_handlers.push(Arc::new(handler));
    }

    /// Emit an event to all handlers
    fn emit_event(&self, event: ExecutionEvent) {
        for handler in &self.event_handlers {
            handler(&event);
        }
    }

    /// Execute the pipeline and return its outcome
    pub async fn execute(&self, pipeline: &Pipeline) -> ExecutionResult {
        self.execute_recorded(pipeline).await.0
    }

    /// Execute the pipeline, also returning the run record
    pub async fn execute_recorded(&self, pipeline: &Pipeline) -> (ExecutionResult, ExecutionRecord) {
        let total_steps = pipeline.steps.len();
        let mut record = ExecutionRecord::new(&pipeline.name, total_steps);
        let deadline = self.timeout.map(|timeout| Instant::now() + timeout);

        info!(
            "Starting pipeline execution: {} {} ({})",
            pipeline.name, pipeline.identifiers.build_text, record.execution_id
        );
        record.start();
        self.emit_event(ExecutionEvent::PipelineStarted {
            execution_id: record.execution_id,
            pipeline_name: pipeline.name.clone(),
            total_steps,
        });

        for (step_index, step) in pipeline.steps.iter().enumerate() {
            let expired = deadline.is_some_and(|deadline| Instant::now() >= deadline);
            if self.abort.is_aborted() || expired {
                warn!("Pipeline aborted before step {}", step_index);
                return self.halt(&mut record, step_index, FailureReason::Aborted);
            }

            record.begin_step(step_index);
            self.emit_event(ExecutionEvent::StepStarted {
                step_index,
                total_steps,
                description: step.describe(),
            });

            let outcome = self
                .executor
                .execute(step_index, step, &self.abort, deadline)
                .await;

            let reason = match outcome {
                StepOutcome::Succeeded => {
                    record.step_succeeded(step_index);
                    self.emit_event(ExecutionEvent::StepSucceeded { step_index });
                    continue;
                }
                StepOutcome::Failed { exit_status } => FailureReason::ExitStatus(exit_status),
                StepOutcome::RunnerError { error } => FailureReason::Runner(error),
                StepOutcome::Aborted => FailureReason::Aborted,
            };

            return self.halt(&mut record, step_index, reason);
        }

        record.succeed();
        info!("Pipeline execution finished: {} - succeeded", pipeline.name);
        self.finish(record, ExecutionResult::Succeeded)
    }

    /// Stop the run at `step_index`; no later step is started
    fn halt(
        &self,
        record: &mut ExecutionRecord,
        step_index: usize,
        reason: FailureReason,
    ) -> (ExecutionResult, ExecutionRecord) {
        self.emit_event(ExecutionEvent::StepFailed {
            step_index,
            reason: reason.clone(),
        });

        let result = match &reason {
            FailureReason::ExitStatus(exit_status) => ExecutionResult::Failed {
                step_index,
                exit_status: *exit_status,
            },
            FailureReason::Runner(error) => ExecutionResult::RunnerError {
                step_index,
                error: error.clone(),
            },
            FailureReason::Aborted => ExecutionResult::Aborted {
                step_index,
                completed_steps: record.completed_steps(),
            },
        };

        record.fail(step_index, reason);
        error!(
            "Pipeline execution finished: {} - {:?}",
            record.pipeline_name, result
        );
        self.finish(record.clone(), result)
    }

    fn finish(
        &self,
        record: ExecutionRecord,
        result: ExecutionResult,
    ) -> (ExecutionResult, ExecutionRecord) {
        self.emit_event(ExecutionEvent::PipelineFinished {
            execution_id: record.execution_id,
            result: result.clone(),
        });
        (result, record)
    }
}
