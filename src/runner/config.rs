//! Container runner configuration

/// Configuration for the container engine CLI runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Container engine executable, e.g. `docker` or `podman`
    pub engine: String,

    /// Extra arguments inserted after `run`, e.g. `--network=host`
    pub extra_args: Vec<String>,

    /// Per-step timeout in seconds; `None` waits indefinitely
    pub step_timeout_secs: Option<u64>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            engine: "docker".to_string(),
            extra_args: Vec::new(),
            step_timeout_secs: None,
        }
    }
}

impl RunnerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = engine.into();
        self
    }

    pub fn with_extra_arg(mut self, arg: impl Into<String>) -> Self {
        self.extra_args.push(arg.into());
        self
    }

    pub fn with_step_timeout(mut self, timeout_secs: u64) -> Self {
        self.step_timeout_secs = Some(timeout_secs);
        self
    }
}
