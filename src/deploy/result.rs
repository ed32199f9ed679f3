// ABOUTME: Aggregate outcome of a deployment run.
// ABOUTME: Always produced, even when a step fails, so the invoker sees what completed.

use serde::Serialize;
use std::path::PathBuf;

use super::error::DeployFailure;
use super::step::{StepName, StepStatus};
use crate::cloud::ProvisionedResource;

/// Status of a single step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub step: StepName,
    pub status: StepStatus,
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Status of a single artifact upload within the upload step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadReport {
    pub remote_name: String,
    pub local_path: PathBuf,
    pub overwrite: bool,
    pub status: StepStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    pub steps: Vec<StepReport>,
    pub uploads: Vec<UploadReport>,
    pub resources: Vec<ProvisionedResource>,
    pub endpoints: Vec<String>,
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<DeployFailure>,
}

impl DeploymentResult {
    pub fn new(destination: Option<String>) -> Self {
        Self {
            destination,
            steps: Vec::with_capacity(StepName::ALL.len()),
            uploads: Vec::new(),
            resources: Vec::new(),
            endpoints: Vec::new(),
            warnings: Vec::new(),
            failure: None,
        }
    }

    /// True when every step succeeded or was skipped.
    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }

    pub fn step(&self, name: StepName) -> Option<&StepReport> {
        self.steps.iter().find(|r| r.step == name)
    }

    pub fn count(&self, status: StepStatus) -> usize {
        self.steps.iter().filter(|r| r.status == status).count()
    }

    /// Pad the report with `NotRun` entries for steps never reached.
    pub(crate) fn mark_remaining_not_run(&mut self) {
        let reached = self.steps.len();
        for step in StepName::ALL.iter().skip(reached) {
            self.steps.push(StepReport {
                step: *step,
                status: StepStatus::NotRun,
                attempts: 0,
                detail: None,
            });
        }
    }
}
