//! Test: Identifier substitution in step environments
//!
//! - `$versionText`, `$buildText`, `$revision` and their braced forms
//! - unresolved references fail before any container runs

use crate::helpers::*;
use buildpipe::core::config::DescriptorConfig;
use buildpipe::core::{BuildContext, Pipeline, ProjectDescriptor, ResolveError, StepTemplate};
use buildpipe::execution::ExecutionResult;

/// The documented scenario: major=0, minor=9, build 0, revision abc123
#[test]
fn test_version_and_build_text() {
    let pipeline = resolve_yaml(&steps_yaml(&["alpine"]), 0, "abc123");
    assert_eq!(pipeline.identifiers.version_text, "v1.0");
    assert_eq!(pipeline.identifiers.build_text, "v1.0.0.0");

    let descriptor = ProjectDescriptor::builder("jongleur")
        .version(0, 9)
        .step(StepTemplate::on("alpine").run(["true"]))
        .build();
    let pipeline = Pipeline::resolve(&descriptor, &BuildContext::new(0, "abc123")).unwrap();
    assert_eq!(pipeline.identifiers.version_text, "v0.9");
    assert_eq!(pipeline.identifiers.build_text, "v0.9.0.0");
}

/// Braced references and `$$` escapes inside YAML values
#[tokio::test]
async fn test_braced_and_escaped_references() {
    let yaml = r#"
name: demo
version: { major: 2, minor: 3 }
steps:
  - image: alpine
    workdir: /src
    env:
      TAG: "${versionText}-${revision}"
      PRICE: "$$5"
      LABEL: "build $buildText"
    run: ["true"]
"#;

    let pipeline = resolve_yaml(yaml, 41, "cafe");
    let runner = RecordingRunner::new(vec![0]);
    let (result, _) = run_with(&pipeline, &runner).await;
    assert!(result.is_success());

    assert_eq!(
        runner.calls()[0].env,
        vec![
            ("TAG".to_string(), "v2.3-cafe".to_string()),
            ("PRICE".to_string(), "$5".to_string()),
            ("LABEL".to_string(), "build v2.3.0.41".to_string()),
        ]
    );
}

/// Different build numbers produce different build text, same version text
#[test]
fn test_build_number_changes_build_text() {
    let first = resolve_yaml(&steps_yaml(&["alpine"]), 7, "abc");
    let second = resolve_yaml(&steps_yaml(&["alpine"]), 8, "abc");

    assert_eq!(first.identifiers.version_text, second.identifiers.version_text);
    assert_eq!(first.identifiers.build_text, "v1.0.0.7");
    assert_eq!(second.identifiers.build_text, "v1.0.0.8");
    assert_ne!(first, second);
}

/// Unknown references fail at resolve time with the step and variable named
#[test]
fn test_unresolved_reference_fails_resolve() {
    let descriptor = ProjectDescriptor::builder("demo")
        .version(0, 9)
        .step(
            StepTemplate::on("alpine")
                .with_env("VERSION", "$versionText")
                .with_env("BUILD", "$versionText.0.$buildNumber")
                .run(["true"]),
        )
        .build();

    let err = Pipeline::resolve(&descriptor, &BuildContext::new(0, "abc123")).unwrap_err();
    assert_eq!(
        err,
        ResolveError::UnresolvedReference {
            step_index: 0,
            variable: "BUILD".to_string(),
            reference: "buildNumber".to_string(),
        }
    );
}

/// Unknown references are also caught when the YAML is loaded
#[test]
fn test_unresolved_reference_fails_load() {
    let yaml = r#"
name: demo
steps:
  - image: alpine
    workdir: /src
    env:
      REVISION: $vcsRevision
    run: ["true"]
"#;

    let err = DescriptorConfig::from_yaml(yaml).unwrap_err();
    assert!(err.to_string().contains("vcsRevision"));
}

/// A negative version never reaches the runner
#[tokio::test]
async fn test_negative_version_runs_nothing() {
    let descriptor = ProjectDescriptor::builder("jongleur")
        .version(-1, 9)
        .step(StepTemplate::on("alpine").run(["true"]))
        .build();
    let runner = RecordingRunner::new(vec![0]);

    let result = resolve_and_run(&descriptor, &BuildContext::new(0, "abc123"), &runner).await;

    assert!(matches!(result, Err(ResolveError::InvalidVersion { .. })));
    assert!(runner.calls().is_empty());

    // Same descriptor with a valid version does reach the runner
    let descriptor = ProjectDescriptor::builder("jongleur")
        .version(1, 9)
        .step(StepTemplate::on("alpine").run(["true"]))
        .build();
    let result = resolve_and_run(&descriptor, &BuildContext::new(0, "abc123"), &runner).await;

    assert_eq!(result, Ok(ExecutionResult::Succeeded));
    assert_eq!(runner.images(), vec!["alpine"]);
}
