// Metric fetcher: builds bounded Performance Insights queries for one
// (instance, metric, dimension) and streams every response into the encoder.

use crate::config::ExtractionConfig;
use crate::encoder::RecordEncoder;
use crate::error::ArchiveError;
use crate::models::{DimensionKeysQuery, DumpType, Instance, ResourceMetricsQuery};
use crate::ports::PerformanceInsights;
use crate::window::{SubWindow, WindowPlan};
use std::time::Duration;
use tracing::debug;

/// One unit of work: an instance crossed with a (metric, dimension) pair.
#[derive(Debug, Clone, Copy)]
pub struct Target<'a> {
    pub instance: &'a Instance,
    pub metric: &'a str,
    pub dimension: &'a str,
}

pub struct MetricFetcher<'a> {
    api: &'a dyn PerformanceInsights,
    period_secs: i32,
    max_results: i32,
    limit: i32,
    throttle: Duration,
}

impl<'a> MetricFetcher<'a> {
    /// Query parameters go out exactly as configured; a value the API cannot take is an error.
    pub fn new(
        api: &'a dyn PerformanceInsights,
        config: &ExtractionConfig,
    ) -> Result<Self, ArchiveError> {
        Ok(Self {
            api,
            period_secs: api_int("period_secs", config.period_secs)?,
            max_results: api_int("max_results", config.max_results)?,
            limit: api_int("limit", config.limit)?,
            throttle: config.throttle(),
        })
    }

    /// Run `mode` for `target` over `plan`; returns the number of API calls made.
    pub async fn fetch(
        &self,
        mode: DumpType,
        target: Target<'_>,
        plan: &WindowPlan,
        encoder: &mut RecordEncoder,
    ) -> Result<usize, ArchiveError> {
        match mode {
            DumpType::GetResourceMetrics => self.fetch_time_series(target, plan, encoder).await,
            DumpType::DescribeDimensionKeys => {
                self.fetch_dimension_summary(target, plan, encoder).await
            }
        }
    }

    /// One query per sub-window, strictly sequential, throttled after every call.
    async fn fetch_time_series(
        &self,
        target: Target<'_>,
        plan: &WindowPlan,
        encoder: &mut RecordEncoder,
    ) -> Result<usize, ArchiveError> {
        let mut calls = 0;
        for window in plan {
            let query = self.resource_metrics_query(target, window);
            let page = self
                .api
                .get_resource_metrics(&query)
                .await
                .map_err(|e| fetch_error(DumpType::GetResourceMetrics, target, e))?;
            calls += 1;
            debug!(
                operation = "get_resource_metrics",
                instance = %target.instance.identifier,
                metric = target.metric,
                dimension = target.dimension,
                window_start = %window.start,
                window_end = %window.end,
                series = page.metric_list.len(),
                "sub-window fetched"
            );
            encoder.push(&page)?;
            if !self.throttle.is_zero() {
                tokio::time::sleep(self.throttle).await;
            }
        }
        debug!(
            instance = %target.instance.identifier,
            metric = target.metric,
            dimension = target.dimension,
            records = encoder.records(),
            "time series complete"
        );
        Ok(calls)
    }

    /// Exactly one query over the whole range, whatever its length.
    async fn fetch_dimension_summary(
        &self,
        target: Target<'_>,
        plan: &WindowPlan,
        encoder: &mut RecordEncoder,
    ) -> Result<usize, ArchiveError> {
        let query = self.dimension_keys_query(target, plan.whole());
        let summary = self
            .api
            .describe_dimension_keys(&query)
            .await
            .map_err(|e| fetch_error(DumpType::DescribeDimensionKeys, target, e))?;
        debug!(
            operation = "describe_dimension_keys",
            instance = %target.instance.identifier,
            metric = target.metric,
            dimension = target.dimension,
            keys = summary.keys.len(),
            "dimension keys fetched"
        );
        encoder.push(&summary)?;
        Ok(1)
    }

    pub fn resource_metrics_query(
        &self,
        target: Target<'_>,
        window: SubWindow,
    ) -> ResourceMetricsQuery {
        ResourceMetricsQuery {
            identifier: target.instance.resource_id.clone(),
            metric: target.metric.to_string(),
            group: target.dimension.to_string(),
            limit: self.limit,
            start: window.start,
            end: window.end,
            period_secs: self.period_secs,
            max_results: self.max_results,
        }
    }

    pub fn dimension_keys_query(&self, target: Target<'_>, range: SubWindow) -> DimensionKeysQuery {
        DimensionKeysQuery {
            identifier: target.instance.resource_id.clone(),
            metric: target.metric.to_string(),
            group: target.dimension.to_string(),
            partition_by: target.dimension.to_string(),
            limit: self.limit,
            start: range.start,
            end: range.end,
            period_secs: self.period_secs,
            max_results: self.max_results,
        }
    }
}

fn api_int(field: &str, value: u32) -> Result<i32, ArchiveError> {
    i32::try_from(value)
        .map_err(|_| ArchiveError::Config(format!("extraction.{} out of range: {}", field, value)))
}

fn fetch_error(mode: DumpType, target: Target<'_>, e: anyhow::Error) -> ArchiveError {
    ArchiveError::Fetch {
        mode,
        instance: target.instance.identifier.clone(),
        metric: target.metric.to_string(),
        dimension: target.dimension.to_string(),
        source: e.into(),
    }
}
