use anyhow::{Context, Result};
use buildpipe::cli::commands::{ResolveCommand, RunCommand, ValidateCommand};
use buildpipe::cli::output::*;
use buildpipe::cli::{Cli, Command};
use buildpipe::core::config::DescriptorConfig;
use buildpipe::core::{BuildContext, ExecutionRecord, Pipeline};
use buildpipe::execution::{AbortHandle, ExecutionEngine, ExecutionEvent};
use buildpipe::runner::{ContainerCliRunner, ContainerRunner, DryRunRunner, RunnerConfig};
use std::time::Duration;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging; RUST_LOG overrides --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    match &cli.command {
        Command::Run(cmd) => run_pipeline(cmd).await?,
        Command::Resolve(cmd) => resolve_pipeline(cmd)?,
        Command::Validate(cmd) => validate_descriptor(cmd)?,
    }

    Ok(())
}

/// Load, resolve, and report resolve errors the same way for `run` and `resolve`
fn load_pipeline(file: &str, context: &BuildContext) -> Result<Pipeline> {
    let config = DescriptorConfig::from_file(file)
        .with_context(|| format!("Failed to load descriptor {}", file))?;
    let descriptor = config.to_descriptor()?;

    match Pipeline::resolve(&descriptor, context) {
        Ok(pipeline) => Ok(pipeline),
        Err(e) => {
            println!("{} Resolution failed:", CROSS);
            println!("  {}", style(&e).red());
            std::process::exit(1);
        }
    }
}

async fn run_pipeline(cmd: &RunCommand) -> Result<()> {
    let pipeline = load_pipeline(&cmd.file, &cmd.context.to_context())?;

    println!(
        "{} Loaded pipeline: {} {}",
        INFO,
        style(&pipeline.name).bold(),
        style(&pipeline.identifiers.build_text).cyan()
    );

    let (result, record) = if cmd.dry_run {
        execute(&pipeline, DryRunRunner, cmd.timeout).await
    } else {
        let mut config = RunnerConfig::new().with_engine(&cmd.engine);
        for arg in &cmd.engine_args {
            config = config.with_extra_arg(arg);
        }
        if let Some(secs) = cmd.step_timeout {
            config = config.with_step_timeout(secs);
        }
        execute(&pipeline, ContainerCliRunner::new(config), cmd.timeout).await
    };

    if result.is_success() {
        println!(
            "\n{} {} completed {}",
            CHECK,
            style(&pipeline.name).bold(),
            style("successfully").green()
        );
        println!("  {}", style(format_record_summary(&record)).dim());
    } else {
        println!(
            "\n{} {} {}",
            CROSS,
            style(&pipeline.name).bold(),
            format_result(&result)
        );
        println!("  {}", style(format_record_summary(&record)).dim());
        error!("{:?}", result);
        std::process::exit(1);
    }

    Ok(())
}

async fn execute<R: ContainerRunner>(
    pipeline: &Pipeline,
    runner: R,
    timeout: Option<u64>,
) -> (buildpipe::ExecutionResult, ExecutionRecord) {
    let abort = AbortHandle::new();
    let mut engine = ExecutionEngine::new(runner).with_abort_handle(abort.clone());
    if let Some(secs) = timeout {
        engine = engine.with_timeout(Duration::from_secs(secs));
    }

    // Ctrl-C aborts the current step
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, aborting pipeline");
            abort.abort();
        }
    });

    let progress = create_progress_bar(pipeline.steps.len());
    {
        let progress = progress.clone();
        engine.add_event_handler(move |event| {
            progress.println(format_execution_event(event));
            match event {
                ExecutionEvent::StepStarted { description, .. } => {
                    progress.set_message(description.clone())
                }
                ExecutionEvent::StepSucceeded { .. } => progress.inc(1),
                _ => {}
            }
        });
    }

    println!();
    let outcome = engine.execute_recorded(pipeline).await;
    progress.finish_and_clear();
    outcome
}

fn resolve_pipeline(cmd: &ResolveCommand) -> Result<()> {
    let pipeline = load_pipeline(&cmd.file, &cmd.context.to_context())?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&pipeline)?);
    } else {
        print!("{}", format_pipeline(&pipeline));
    }

    Ok(())
}

fn validate_descriptor(cmd: &ValidateCommand) -> Result<()> {
    println!("{} Validating descriptor...", INFO);

    match DescriptorConfig::from_file(&cmd.file) {
        Ok(config) => {
            println!("{} Descriptor is valid!", CHECK);
            println!("  Name: {}", style(&config.name).bold());
            println!(
                "  Version: {}",
                style(format!("v{}.{}", config.version.major, config.version.minor)).cyan()
            );
            println!("  Steps: {}", style(config.steps.len()).cyan());

            if config.version.major < 0 || config.version.minor < 0 {
                println!("{} Negative version fields will fail at resolve time", WARN);
            }

            if cmd.json {
                let json = serde_json::to_string_pretty(&config)?;
                println!("\n{}", json);
            }
            Ok(())
        }
        Err(e) => {
            println!("{} Validation failed:", CROSS);
            println!("  {}", style(e).red());
            std::process::exit(1);
        }
    }
}
