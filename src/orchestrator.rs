// Orchestrator: discovery, then every mode x instance x metric x dimension through
// window planning, fetching, encoding, key building and upload. Strictly sequential.

use crate::archiver::Archiver;
use crate::config::{ArchiveConfig, ExtractionConfig, FailurePolicy};
use crate::encoder::RecordEncoder;
use crate::error::ArchiveError;
use crate::fetcher::{MetricFetcher, Target};
use crate::key::{ArchiveKey, bucket_name, capture_time};
use crate::models::{DumpType, Instance};
use crate::ports::Collaborators;
use crate::request::RunPlan;
use crate::window::WindowPlan;
use chrono::TimeDelta;
use tracing::{debug, info, instrument, warn};

/// Outcome of one run. Under `FailurePolicy::Continue` it may carry failures.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Object keys written, in upload order.
    pub uploaded: Vec<String>,
    /// Instances passed over because monitoring is disabled.
    pub skipped_instances: usize,
    pub api_calls: usize,
    pub failures: Vec<CombinationFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinationFailure {
    pub mode: DumpType,
    pub instance: String,
    pub metric: String,
    pub dimension: String,
    pub error: String,
}

impl RunSummary {
    pub fn attempted(&self) -> usize {
        self.uploaded.len() + self.failures.len()
    }

    /// A run with any failed combination is a failed run.
    pub fn into_result(self) -> Result<RunSummary, ArchiveError> {
        if self.failures.is_empty() {
            Ok(self)
        } else {
            Err(ArchiveError::Incomplete {
                failed: self.failures.len(),
                attempted: self.attempted(),
            })
        }
    }
}

/// Per-run values shared by every combination.
struct RunContext<'a> {
    account_id: &'a str,
    region: &'a str,
    granularity: TimeDelta,
    windows: WindowPlan,
    fetcher: MetricFetcher<'a>,
    archiver: Archiver<'a>,
}

pub struct Orchestrator {
    collaborators: Collaborators,
    extraction: ExtractionConfig,
    archive: ArchiveConfig,
}

impl Orchestrator {
    pub fn new(
        collaborators: Collaborators,
        extraction: ExtractionConfig,
        archive: ArchiveConfig,
    ) -> Self {
        Self {
            collaborators,
            extraction,
            archive,
        }
    }

    #[instrument(
        skip(self, plan),
        fields(region = %plan.region, start = %plan.start, end = %plan.end)
    )]
    pub async fn run(&self, plan: &RunPlan) -> Result<RunSummary, ArchiveError> {
        let account_id = self
            .collaborators
            .identity
            .account_id()
            .await
            .map_err(|e| ArchiveError::Discovery {
                operation: "get_caller_identity",
                source: e.into(),
            })?;
        let instances = self
            .collaborators
            .discovery
            .list_instances()
            .await
            .map_err(|e| ArchiveError::Discovery {
                operation: "describe_db_instances",
                source: e.into(),
            })?;

        let (eligible, skipped): (Vec<Instance>, Vec<Instance>) =
            instances.into_iter().partition(|i| i.monitoring_enabled);
        for instance in &skipped {
            debug!(instance = %instance.identifier, "monitoring disabled; skipping");
        }
        info!(
            account_id = %account_id,
            eligible = eligible.len(),
            skipped = skipped.len(),
            "instances discovered"
        );

        let ctx = RunContext {
            account_id: &account_id,
            region: &plan.region,
            granularity: plan.granularity,
            windows: WindowPlan::new(
                plan.start,
                plan.end,
                self.extraction.period(),
                self.extraction.max_results,
            ),
            fetcher: MetricFetcher::new(self.collaborators.insights.as_ref(), &self.extraction)?,
            archiver: Archiver::new(
                self.collaborators.store.as_ref(),
                bucket_name(&self.archive.bucket_prefix, &account_id),
            ),
        };

        let mut summary = RunSummary {
            skipped_instances: skipped.len(),
            ..Default::default()
        };

        for &mode in &plan.modes {
            for instance in &eligible {
                for metric in &self.extraction.metrics {
                    for dimension in &self.extraction.dimensions {
                        let target = Target {
                            instance,
                            metric,
                            dimension,
                        };
                        match self.archive_combination(&ctx, mode, target).await {
                            Ok((key, calls)) => {
                                summary.api_calls += calls;
                                summary.uploaded.push(key.path());
                            }
                            Err(e) => match self.extraction.failure_policy {
                                FailurePolicy::FailFast => return Err(e),
                                FailurePolicy::Continue => {
                                    warn!(
                                        error = %e,
                                        mode = %mode,
                                        instance = %instance.identifier,
                                        metric = %metric,
                                        dimension = %dimension,
                                        "combination failed; continuing"
                                    );
                                    summary.failures.push(CombinationFailure {
                                        mode,
                                        instance: instance.identifier.clone(),
                                        metric: metric.clone(),
                                        dimension: dimension.clone(),
                                        error: e.to_string(),
                                    });
                                }
                            },
                        }
                    }
                }
            }
        }

        info!(
            uploaded = summary.uploaded.len(),
            failed = summary.failures.len(),
            api_calls = summary.api_calls,
            "run finished"
        );
        Ok(summary)
    }

    async fn archive_combination(
        &self,
        ctx: &RunContext<'_>,
        mode: DumpType,
        target: Target<'_>,
    ) -> Result<(ArchiveKey, usize), ArchiveError> {
        let mut encoder = RecordEncoder::new(self.archive.encoding());
        let calls = ctx
            .fetcher
            .fetch(mode, target, &ctx.windows, &mut encoder)
            .await?;
        let archive = encoder.finish()?;

        let key = ArchiveKey {
            mode,
            account_id: ctx.account_id.to_string(),
            region: ctx.region.to_string(),
            instance_id: target.instance.identifier.clone(),
            metric: target.metric.to_string(),
            dimension: target.dimension.to_string(),
            captured_at: capture_time(self.collaborators.clock.now(), ctx.granularity),
            encoding: archive.encoding,
        };
        ctx.archiver.upload(&key, archive).await?;
        Ok((key, calls))
    }
}
