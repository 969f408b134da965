// Trigger handler: request -> run plan -> region-bound collaborators -> orchestrator -> response.

use crate::config::AppConfig;
use crate::error::ArchiveError;
use crate::orchestrator::{Orchestrator, RunSummary};
use crate::ports::{Backend, Clock};
use crate::request::{RunPlan, TriggerRequest, TriggerResponse};
use std::sync::Arc;
use tracing::{error, info};

/// Connect collaborators for the plan's region and run it to completion.
pub async fn execute_plan(
    backend: &dyn Backend,
    config: &AppConfig,
    plan: &RunPlan,
) -> Result<RunSummary, ArchiveError> {
    let collaborators =
        backend
            .connect(&plan.region)
            .await
            .map_err(|e| ArchiveError::Discovery {
                operation: "connect",
                source: e.into(),
            })?;
    let orchestrator = Orchestrator::new(
        collaborators,
        config.extraction.clone(),
        config.archive.clone(),
    );
    orchestrator.run(plan).await?.into_result()
}

#[derive(Clone)]
pub struct TriggerHandler {
    backend: Arc<dyn Backend>,
    config: Arc<AppConfig>,
    clock: Arc<dyn Clock>,
}

impl TriggerHandler {
    pub fn new(backend: Arc<dyn Backend>, config: Arc<AppConfig>, clock: Arc<dyn Clock>) -> Self {
        Self {
            backend,
            config,
            clock,
        }
    }

    /// Never fails: errors become a 500 with a generic body, details go to the log.
    pub async fn handle(&self, request: TriggerRequest) -> TriggerResponse {
        match self.execute(&request).await {
            Ok(summary) => {
                info!(
                    uploaded = summary.uploaded.len(),
                    skipped_instances = summary.skipped_instances,
                    "trigger succeeded"
                );
                TriggerResponse::success()
            }
            Err(e) => {
                error!(
                    error = %e,
                    region = %request.region,
                    dump_type = %request.dump_type,
                    "trigger failed"
                );
                TriggerResponse::failure()
            }
        }
    }

    pub async fn execute(&self, request: &TriggerRequest) -> Result<RunSummary, ArchiveError> {
        let plan = request.resolve(self.clock.now())?;
        execute_plan(self.backend.as_ref(), &self.config, &plan).await
    }
}
