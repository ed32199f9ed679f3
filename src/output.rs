// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Renders plans and deployment results in normal, quiet (CI), and JSON modes.

use serde::Serialize;
use std::fmt::Write as _;
use std::time::Instant;

use crate::deploy::{DeploymentPlan, DeploymentResult, StepStatus};

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// A single JSON document for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Print a success message with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => {
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    println!("{message} ({elapsed:.1}s)");
                } else {
                    println!("{message}");
                }
            }
            OutputMode::Quiet => println!("{message}"),
            OutputMode::Json => self.json(&JsonEvent {
                event: "success",
                message,
            }),
        }
    }

    /// Print a dry-run plan.
    pub fn plan(&self, plan: &DeploymentPlan) {
        match self.mode {
            OutputMode::Normal => print!("{}", render_plan(plan)),
            OutputMode::Quiet => println!("Plan: {} steps", plan.steps.len()),
            OutputMode::Json => self.json(plan),
        }
    }

    /// Print the summary of a finished (or aborted) deployment.
    pub fn summary(&self, result: &DeploymentResult) {
        match self.mode {
            OutputMode::Normal => {
                print!("{}", render_summary(result));
                self.final_line(result);
            }
            OutputMode::Quiet => self.final_line(result),
            OutputMode::Json => self.json(result),
        }
    }

    fn final_line(&self, result: &DeploymentResult) {
        match &result.failure {
            None => self.success(&format!(
                "Deployment complete: {}",
                result
                    .endpoints
                    .first()
                    .map(String::as_str)
                    .unwrap_or("no endpoint")
            )),
            Some(failure) => println!("Deployment failed: {failure}"),
        }
    }

    fn json<T: Serialize + ?Sized>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{json}"),
            Err(e) => tracing::error!(error = %e, "failed to serialize output"),
        }
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
}

fn status_marker(status: StepStatus) -> &'static str {
    match status {
        StepStatus::Succeeded => "✓",
        StepStatus::Skipped => "-",
        StepStatus::Failed => "✗",
        StepStatus::NotRun => " ",
    }
}

/// Human-readable plan, one line per step.
pub fn render_plan(plan: &DeploymentPlan) -> String {
    let mut out = String::new();
    match &plan.destination {
        Some(dest) => {
            let _ = writeln!(out, "Deployment plan ({dest}):");
        }
        None => out.push_str("Deployment plan:\n"),
    }

    for (index, planned) in plan.steps.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. {:<20} {}",
            index + 1,
            planned.step.as_str(),
            planned.description
        );
    }

    out.push_str("\nResources:\n");
    for resource in &plan.resources {
        let _ = writeln!(out, "  {:<16} {}", resource.kind.to_string(), resource.name);
    }

    match &plan.uploads_skipped {
        Some(reason) => {
            let _ = writeln!(out, "\nUploads: skipped ({reason})");
        }
        None => {
            out.push_str("\nUploads (overwrite):\n");
            for artifact in &plan.uploads {
                let _ = writeln!(
                    out,
                    "  {} <- {}",
                    artifact.remote_name,
                    artifact.local_path.display()
                );
            }
        }
    }

    let _ = writeln!(out, "\nSettings: {}", plan.settings.join(", "));

    out.push_str("\nEndpoints:\n");
    for endpoint in &plan.endpoints {
        let _ = writeln!(out, "  {endpoint}");
    }
    out
}

/// Per-step status table, uploads, warnings and endpoints.
pub fn render_summary(result: &DeploymentResult) -> String {
    let mut out = String::from("Steps:\n");
    for report in &result.steps {
        let _ = write!(
            out,
            "  {} {:<20} {}",
            status_marker(report.status),
            report.step.as_str(),
            report.status
        );
        if report.attempts > 1 {
            let _ = write!(out, " after {} attempts", report.attempts);
        }
        if let Some(detail) = &report.detail {
            let _ = write!(out, " ({detail})");
        }
        out.push('\n');
    }

    if !result.uploads.is_empty() {
        out.push_str("\nUploads:\n");
        for upload in &result.uploads {
            let _ = writeln!(
                out,
                "  {} {} {}",
                status_marker(upload.status),
                upload.remote_name,
                upload.status
            );
        }
    }

    if !result.warnings.is_empty() {
        out.push_str("\nWarnings:\n");
        for warning in &result.warnings {
            let _ = writeln!(out, "  - {warning}");
        }
    }

    if result.succeeded() && !result.endpoints.is_empty() {
        out.push_str("\nEndpoints:\n");
        for endpoint in &result.endpoints {
            let _ = writeln!(out, "  {endpoint}");
        }
    }
    out
}
