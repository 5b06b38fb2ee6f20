//! Test utility functions for buildpipe scenarios

use async_trait::async_trait;
use buildpipe::core::config::DescriptorConfig;
use buildpipe::core::{
    BuildContext, Environment, ExecutionRecord, Pipeline, ProjectDescriptor, ResolveError,
};
use buildpipe::execution::{ExecutionEngine, ExecutionResult};
use buildpipe::runner::{ContainerRunner, RunnerError};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One recorded `ContainerRunner::run` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub image: String,
    pub workdir: String,
    pub env: Vec<(String, String)>,
    pub command: Vec<String>,
}

/// Mock runner that returns predefined exit codes and records every call
#[derive(Clone)]
pub struct RecordingRunner {
    exit_codes: Arc<Vec<i32>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    simulate_delay: Option<Duration>,
}

impl RecordingRunner {
    /// Exit codes are consumed in call order; calls beyond the list exit 0
    pub fn new(exit_codes: Vec<i32>) -> Self {
        Self {
            exit_codes: Arc::new(exit_codes),
            calls: Arc::new(Mutex::new(Vec::new())),
            simulate_delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.simulate_delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn images(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.image).collect()
    }
}

#[async_trait]
impl ContainerRunner for RecordingRunner {
    async fn run(
        &self,
        image: &str,
        workdir: &str,
        env: &Environment,
        command: &[String],
    ) -> Result<i32, RunnerError> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(RecordedCall {
                image: image.to_string(),
                workdir: workdir.to_string(),
                env: env
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                command: command.to_vec(),
            });
            calls.len() - 1
        };

        if let Some(delay) = self.simulate_delay {
            tokio::time::sleep(delay).await;
        }

        Ok(self.exit_codes.get(index).copied().unwrap_or(0))
    }
}

/// Parse a YAML descriptor and resolve it
pub fn resolve_yaml(yaml: &str, build_number: u64, revision: &str) -> Pipeline {
    let descriptor = DescriptorConfig::from_yaml(yaml)
        .expect("Should parse YAML")
        .to_descriptor()
        .expect("Should build descriptor");
    Pipeline::resolve(&descriptor, &BuildContext::new(build_number, revision))
        .expect("Should resolve")
}

/// Run a pipeline with a recording runner
pub async fn run_with(
    pipeline: &Pipeline,
    runner: &RecordingRunner,
) -> (ExecutionResult, ExecutionRecord) {
    ExecutionEngine::new(runner.clone())
        .execute_recorded(pipeline)
        .await
}

/// Resolve a descriptor and run it only when resolution succeeds
pub async fn resolve_and_run(
    descriptor: &ProjectDescriptor,
    context: &BuildContext,
    runner: &RecordingRunner,
) -> Result<ExecutionResult, ResolveError> {
    let pipeline = Pipeline::resolve(descriptor, context)?;
    Ok(run_with(&pipeline, runner).await.0)
}

/// Descriptor with one `alpine` step per image name
pub fn steps_yaml(images: &[&str]) -> String {
    let mut yaml = String::from("name: scenario\nversion: { major: 1, minor: 0 }\nsteps:\n");
    for image in images {
        yaml.push_str(&format!(
            "  - image: {}\n    workdir: /src\n    run: [\"make\"]\n",
            image
        ));
    }
    yaml
}
