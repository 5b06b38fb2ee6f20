//! Test: External cancellation and pipeline timeouts

use crate::helpers::*;
use buildpipe::core::{FailureReason, RunState, StepState};
use buildpipe::execution::{AbortHandle, ExecutionEngine, ExecutionResult};
use std::time::Duration;

/// An abort while a step is blocked reports partial progress and stops the run
#[tokio::test]
async fn test_abort_during_second_step() {
    let pipeline = resolve_yaml(&steps_yaml(&["a", "b", "c"]), 1, "abc");
    let runner = RecordingRunner::new(vec![0, 0, 0]).with_delay(Duration::from_millis(300));
    let abort = AbortHandle::new();
    let engine = ExecutionEngine::new(runner.clone()).with_abort_handle(abort.clone());

    let trigger = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(450)).await;
        abort.abort();
    });

    let (result, record) = engine.execute_recorded(&pipeline).await;
    trigger.await.unwrap();

    assert_eq!(
        result,
        ExecutionResult::Aborted {
            step_index: 1,
            completed_steps: 1
        }
    );
    assert_eq!(runner.images(), vec!["a", "b"]);
    assert_eq!(
        record.state,
        RunState::Failed {
            step_index: 1,
            reason: FailureReason::Aborted
        }
    );
    assert_eq!(record.steps[2], StepState::Pending);
}

/// The pipeline-wide timeout aborts a step that blocks too long
#[tokio::test]
async fn test_pipeline_timeout() {
    let pipeline = resolve_yaml(&steps_yaml(&["slow", "never"]), 1, "abc");
    let runner = RecordingRunner::new(vec![0, 0]).with_delay(Duration::from_secs(30));
    let engine = ExecutionEngine::new(runner.clone()).with_timeout(Duration::from_millis(50));

    let result = engine.execute(&pipeline).await;

    assert_eq!(
        result,
        ExecutionResult::Aborted {
            step_index: 0,
            completed_steps: 0
        }
    );
    assert_eq!(runner.images(), vec!["slow"]);
}
