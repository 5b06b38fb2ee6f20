//! CLI command definitions

use crate::core::{BuildContext, BUILD_NUMBER_ENV, REVISION_ENV};
use clap::Args;

/// Values the CI server supplies for this invocation
#[derive(Debug, Args, Clone)]
pub struct ContextArgs {
    /// Build number (monotonic per invocation)
    #[arg(long, env = BUILD_NUMBER_ENV)]
    pub build_number: u64,

    /// VCS revision of the checked-out source
    #[arg(long, env = REVISION_ENV)]
    pub revision: String,
}

impl ContextArgs {
    pub fn to_context(&self) -> BuildContext {
        BuildContext::new(self.build_number, self.revision.clone())
    }
}

/// Resolve and run a descriptor
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Path to descriptor YAML file
    #[arg(short, long)]
    pub file: String,

    #[command(flatten)]
    pub context: ContextArgs,

    /// Container engine executable
    #[arg(long, env = "BUILDPIPE_ENGINE", default_value = "docker")]
    pub engine: String,

    /// Extra argument passed to `<engine> run` (repeatable)
    #[arg(long = "engine-arg", allow_hyphen_values = true)]
    pub engine_args: Vec<String>,

    /// Abort the whole pipeline after this many seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Abort a single step after this many seconds
    #[arg(long)]
    pub step_timeout: Option<u64>,

    /// Log each step instead of starting containers
    #[arg(long)]
    pub dry_run: bool,
}

/// Resolve a descriptor and print the concrete steps
#[derive(Debug, Args, Clone)]
pub struct ResolveCommand {
    /// Path to descriptor YAML file
    #[arg(short, long)]
    pub file: String,

    #[command(flatten)]
    pub context: ContextArgs,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Validate a descriptor file
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Path to descriptor YAML file
    #[arg(short, long)]
    pub file: String,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
