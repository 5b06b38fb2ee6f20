//! Container engine CLI runner - runs each step with `<engine> run --rm`

use crate::core::Environment;
use crate::runner::{ContainerRunner, RunnerConfig, RunnerError};
use async_trait::async_trait;
use std::process::ExitStatus;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Runs steps through a docker-compatible CLI
#[derive(Debug, Clone)]
pub struct ContainerCliRunner {
    config: RunnerConfig,
}

impl ContainerCliRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    pub fn engine(&self) -> &str {
        &self.config.engine
    }

    /// Arguments passed to the engine for one step
    ///
    /// `run --rm [extra..] -w <workdir> -e K=V.. <image> <command..>`
    pub fn build_args(
        &self,
        image: &str,
        workdir: &str,
        env: &Environment,
        command: &[String],
    ) -> Vec<String> {
        let mut args = vec!["run".to_string(), "--rm".to_string()];
        args.extend(self.config.extra_args.iter().cloned());
        args.push("-w".to_string());
        args.push(workdir.to_string());

        for (name, value) in env.iter() {
            args.push("-e".to_string());
            args.push(format!("{}={}", name, value));
        }

        args.push(image.to_string());
        args.extend(command.iter().cloned());
        args
    }
}

#[async_trait]
impl ContainerRunner for ContainerCliRunner {
    async fn run(
        &self,
        image: &str,
        workdir: &str,
        env: &Environment,
        command: &[String],
    ) -> Result<i32, RunnerError> {
        let args = self.build_args(image, workdir, env, command);
        debug!("Spawning {} {}", self.config.engine, args.join(" "));

        let child = Command::new(&self.config.engine)
            .args(&args)
            .kill_on_drop(true)
            .status();

        let status = match self.config.step_timeout_secs {
            Some(secs) => timeout(Duration::from_secs(secs), child)
                .await
                .map_err(|_| RunnerError::Timeout(secs))?,
            None => child.await,
        }
        .map_err(|e| RunnerError::Spawn(format!("{}: {}", self.config.engine, e)))?;

        let code = exit_code(status);
        if code != 0 {
            warn!("{} exited with code {}", self.config.engine, code);
        }

        Ok(code)
    }
}

/// Exit code of the container process; 128 + signal when killed by a signal
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    -1
}
