//! CLI output formatting

use crate::{
    core::{ExecutionRecord, FailureReason, Pipeline},
    execution::{ExecutionEvent, ExecutionResult},
};
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "!");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Create a step progress bar
pub fn create_progress_bar(total: usize) -> ProgressBar {
    let progress = ProgressBar::new(total as u64);
    let bar_style = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    progress.set_style(bar_style);
    progress
}

/// Format a failure reason for display
pub fn format_reason(reason: &FailureReason) -> String {
    match reason {
        FailureReason::ExitStatus(code) => format!("exit status {}", code),
        FailureReason::Runner(error) => format!("runner error: {}", error),
        FailureReason::Aborted => "aborted".to_string(),
    }
}

/// Format a pipeline result for display
pub fn format_result(result: &ExecutionResult) -> String {
    match result {
        ExecutionResult::Succeeded => style("succeeded").green().to_string(),
        ExecutionResult::Failed {
            step_index,
            exit_status,
        } => style(format!(
            "failed at step {} (exit status {})",
            step_index, exit_status
        ))
        .red()
        .to_string(),
        ExecutionResult::RunnerError { step_index, error } => {
            style(format!("failed at step {} ({})", step_index, error))
                .red()
                .to_string()
        }
        ExecutionResult::Aborted {
            step_index,
            completed_steps,
        } => style(format!(
            "aborted at step {} ({} steps completed)",
            step_index, completed_steps
        ))
        .yellow()
        .to_string(),
    }
}

/// Format an execution event for display
pub fn format_execution_event(event: &ExecutionEvent) -> String {
    match event {
        ExecutionEvent::PipelineStarted {
            execution_id,
            pipeline_name,
            total_steps,
        } => format!(
            "{} Starting pipeline {} with {} step(s) ({})",
            ROCKET,
            style(pipeline_name).bold(),
            total_steps,
            style(&execution_id.to_string()[..8]).dim()
        ),
        ExecutionEvent::StepStarted {
            step_index,
            total_steps,
            description,
        } => format!(
            "{} [{}/{}] {}",
            SPINNER,
            style(step_index + 1).cyan(),
            style(total_steps).dim(),
            description
        ),
        ExecutionEvent::StepSucceeded { step_index } => {
            format!("{} step {}", CHECK, style(step_index).green())
        }
        ExecutionEvent::StepFailed { step_index, reason } => format!(
            "{} step {}: {}",
            CROSS,
            style(step_index).red(),
            style(format_reason(reason)).dim()
        ),
        ExecutionEvent::PipelineFinished {
            execution_id,
            result,
        } => format!(
            "{} Pipeline ({}) {}",
            INFO,
            style(&execution_id.to_string()[..8]).dim(),
            format_result(result)
        ),
    }
}

/// One-line summary of how far a run got
pub fn format_record_summary(record: &ExecutionRecord) -> String {
    let state = if record.state.is_terminal() {
        "finished"
    } else {
        "incomplete"
    };
    format!(
        "{}/{} steps succeeded ({:.0}%), run {}",
        record.completed_steps(),
        record.steps.len(),
        record.progress() * 100.0,
        state
    )
}

/// Human-readable listing of a resolved pipeline
pub fn format_pipeline(pipeline: &Pipeline) -> String {
    let mut out = format!(
        "{} {} (build {}, revision {})\n",
        INFO,
        style(&pipeline.name).bold(),
        style(&pipeline.identifiers.build_text).cyan(),
        style(&pipeline.identifiers.revision).dim()
    );

    for (index, step) in pipeline.steps.iter().enumerate() {
        out.push_str(&format!("  [{}] {}\n", index, style(&step.image).bold()));
        out.push_str(&format!("      workdir: {}\n", step.workdir));
        for (name, value) in step.env.iter() {
            out.push_str(&format!("      env: {}={}\n", style(name).cyan(), value));
        }
        out.push_str(&format!("      run: {}\n", step.command.join(" ")));
    }

    out
}
