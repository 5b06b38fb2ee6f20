//! Test: Successful runs execute every step, in declared order

use crate::helpers::*;
use buildpipe::core::{RunState, StepState};
use buildpipe::execution::ExecutionResult;

const JONGLEUR: &str = r#"
name: jongleur
version: { major: 0, minor: 9 }
steps:
  - image: maxmanuylov/go-build:1.8
    workdir: /go/src/github.com/maxmanuylov/jongleur
    env:
      VERSION: $versionText
      BUILD: $buildText
      REVISION: $revision
    run: ["/bin/bash", "build/build.sh"]
"#;

/// The single-step jongleur descriptor succeeds when the container exits 0
#[tokio::test]
async fn test_single_step_succeeds() {
    let pipeline = resolve_yaml(JONGLEUR, 0, "abc123");
    let runner = RecordingRunner::new(vec![0]);

    let (result, record) = run_with(&pipeline, &runner).await;

    assert_eq!(result, ExecutionResult::Succeeded);
    assert_eq!(record.state, RunState::Succeeded);

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].image, "maxmanuylov/go-build:1.8");
    assert_eq!(calls[0].workdir, "/go/src/github.com/maxmanuylov/jongleur");
    assert_eq!(
        calls[0].env,
        vec![
            ("VERSION".to_string(), "v0.9".to_string()),
            ("BUILD".to_string(), "v0.9.0.0".to_string()),
            ("REVISION".to_string(), "abc123".to_string()),
        ]
    );
    assert_eq!(calls[0].command, vec!["/bin/bash", "build/build.sh"]);
}

/// Steps run one after another in declaration order
#[tokio::test]
async fn test_steps_run_in_order() {
    let pipeline = resolve_yaml(&steps_yaml(&["lint", "test", "package"]), 3, "f00d");
    let runner = RecordingRunner::new(vec![0, 0, 0]);

    let (result, record) = run_with(&pipeline, &runner).await;

    assert!(result.is_success());
    assert_eq!(runner.images(), vec!["lint", "test", "package"]);
    assert_eq!(record.completed_steps(), 3);
    assert!(record
        .steps
        .iter()
        .all(|s| matches!(s, StepState::Succeeded { .. })));
    assert!(record.completed_at.is_some());
}

/// Each step starts only after the previous one has finished
#[tokio::test]
async fn test_steps_do_not_overlap() {
    let pipeline = resolve_yaml(&steps_yaml(&["a", "b"]), 1, "abc");
    let runner = RecordingRunner::new(vec![0, 0]).with_delay(std::time::Duration::from_millis(20));

    let (result, record) = run_with(&pipeline, &runner).await;
    assert!(result.is_success());

    let finished_first = match &record.steps[0] {
        StepState::Succeeded { finished_at, .. } => *finished_at,
        other => panic!("Expected step 0 succeeded, got {:?}", other),
    };
    let started_second = match &record.steps[1] {
        StepState::Succeeded { started_at, .. } => *started_at,
        other => panic!("Expected step 1 succeeded, got {:?}", other),
    };
    assert!(started_second >= finished_first);
}
