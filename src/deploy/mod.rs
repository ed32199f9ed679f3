// ABOUTME: Deployment orchestration: ordered steps, retry policy and result reporting.
// ABOUTME: Exports the orchestrator, its error taxonomy, dry-run plans and results.

mod artifacts;
mod cancel;
mod error;
mod orchestrator;
mod plan;
mod result;
mod retry;
mod step;

pub use artifacts::{Artifact, ArtifactPlan, resolve_artifacts};
pub use cancel::CancelFlag;
pub use error::{DeployError, DeployErrorKind, DeployFailure};
pub use orchestrator::{CONNECTION_SETTING, CONTAINER_SETTING, Orchestrator};
pub use plan::{DEFAULT_HOST_SUFFIX, DeploymentPlan, PlannedStep};
pub use result::{DeploymentResult, StepReport, UploadReport};
pub use retry::{Exhausted, RetryPolicy, retry};
pub use step::{Idempotency, RetryScope, StepName, StepPolicy, StepStatus};

/// Public URLs for a function app host: the base URL, then one per route.
pub fn endpoints(host: &str, routes: &[String]) -> Vec<String> {
    let base = format!("https://{host}");
    std::iter::once(base.clone())
        .chain(routes.iter().map(|r| format!("{base}/api/{r}")))
        .collect()
}
