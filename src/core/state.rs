//! Execution state models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Why a pipeline stopped before finishing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureReason {
    /// The step's command exited with a non-zero status
    ExitStatus(i32),
    /// The container runner could not run the step
    Runner(String),
    /// Cancelled or timed out from outside
    Aborted,
}

/// Pipeline run state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    /// Not started
    Pending,
    /// Step `step_index` is executing
    Running { step_index: usize },
    /// Every step exited with status 0
    Succeeded,
    /// Step `step_index` stopped the pipeline
    Failed {
        step_index: usize,
        reason: FailureReason,
    },
}

impl RunState {
    /// Check if the run can no longer change
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Succeeded | RunState::Failed { .. })
    }
}

/// State of a single step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepState {
    /// Not reached yet, or never reached because an earlier step stopped the run
    Pending,
    Running {
        started_at: DateTime<Utc>,
    },
    Succeeded {
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    },
    Failed {
        reason: FailureReason,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    },
}

/// Record of one pipeline invocation, held in memory for the duration of the run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRecord {
    /// Unique execution ID
    pub execution_id: Uuid,

    pub pipeline_name: String,

    pub state: RunState,

    pub started_at: Option<DateTime<Utc>>,

    pub completed_at: Option<DateTime<Utc>>,

    /// One entry per pipeline step, same order
    pub steps: Vec<StepState>,
}

impl ExecutionRecord {
    pub fn new(pipeline_name: impl Into<String>, total_steps: usize) -> Self {
        Self {
            execution_id: Uuid::new_v4(),
            pipeline_name: pipeline_name.into(),
            state: RunState::Pending,
            started_at: None,
            completed_at: None,
            steps: vec![StepState::Pending; total_steps],
        }
    }

    /// Mark the run as started
    pub fn start(&mut self) {
        self.started_at = Some(Utc::now());
    }

    /// Move to `Running(step_index)`
    pub fn begin_step(&mut self, step_index: usize) {
        self.state = RunState::Running { step_index };
        if let Some(step) = self.steps.get_mut(step_index) {
            *step = StepState::Running {
                started_at: Utc::now(),
            };
        }
    }

    /// Record a step that exited with status 0
    pub fn step_succeeded(&mut self, step_index: usize) {
        if let Some(step) = self.steps.get_mut(step_index) {
            *step = StepState::Succeeded {
                started_at: started_at(step),
                finished_at: Utc::now(),
            };
        }
    }

    /// Halt the run at `step_index`
    pub fn fail(&mut self, step_index: usize, reason: FailureReason) {
        if let Some(step) = self.steps.get_mut(step_index) {
            // An abort observed before the step started leaves it Pending
            if matches!(step, StepState::Running { .. }) {
                *step = StepState::Failed {
                    reason: reason.clone(),
                    started_at: started_at(step),
                    finished_at: Utc::now(),
                };
            }
        }
        self.state = RunState::Failed { step_index, reason };
        self.completed_at = Some(Utc::now());
    }

    /// Mark the whole run as succeeded
    pub fn succeed(&mut self) {
        self.state = RunState::Succeeded;
        self.completed_at = Some(Utc::now());
    }

    pub fn completed_steps(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s, StepState::Succeeded { .. }))
            .count()
    }

    /// Calculate progress percentage (0.0 to 1.0)
    pub fn progress(&self) -> f64 {
        if self.steps.is_empty() {
            return 0.0;
        }
        self.completed_steps() as f64 / self.steps.len() as f64
    }
}

fn started_at(step: &StepState) -> DateTime<Utc> {
    match step {
        StepState::Running { started_at } => *started_at,
        _ => Utc::now(),
    }
}
