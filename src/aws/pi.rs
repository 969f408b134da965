// Performance Insights queries and conversion of SDK outputs into archived models

use crate::models::{
    DataPoint, DimensionKeyDescription, DimensionKeysQuery, DimensionKeysSummary, MetricKey,
    MetricKeyDataPoints, PartitionKey, ResourceMetricsPage, ResourceMetricsQuery, SERVICE_TYPE,
};
use crate::ports::PerformanceInsights;
use async_trait::async_trait;
use aws_sdk_pi::error::DisplayErrorContext;
use aws_sdk_pi::operation::describe_dimension_keys::DescribeDimensionKeysOutput;
use aws_sdk_pi::operation::get_resource_metrics::GetResourceMetricsOutput;
use aws_sdk_pi::primitives::DateTime as SdkDateTime;
use aws_sdk_pi::types::{self as sdk, DimensionGroup, MetricQuery, ServiceType};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};

pub struct PerformanceInsightsClient {
    client: aws_sdk_pi::Client,
}

impl PerformanceInsightsClient {
    pub fn new(client: aws_sdk_pi::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PerformanceInsights for PerformanceInsightsClient {
    async fn get_resource_metrics(
        &self,
        query: &ResourceMetricsQuery,
    ) -> anyhow::Result<ResourceMetricsPage> {
        let group = DimensionGroup::builder()
            .group(&query.group)
            .limit(query.limit)
            .build()?;
        let metric_query = MetricQuery::builder()
            .metric(&query.metric)
            .group_by(group)
            .build()?;
        let output = self
            .client
            .get_resource_metrics()
            .service_type(ServiceType::from(SERVICE_TYPE))
            .identifier(&query.identifier)
            .metric_queries(metric_query)
            .start_time(to_sdk_time(query.start))
            .end_time(to_sdk_time(query.end))
            .period_in_seconds(query.period_secs)
            .max_results(query.max_results)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("GetResourceMetrics: {}", DisplayErrorContext(e)))?;
        Ok(resource_metrics_page(&output))
    }

    async fn describe_dimension_keys(
        &self,
        query: &DimensionKeysQuery,
    ) -> anyhow::Result<DimensionKeysSummary> {
        let group_by = DimensionGroup::builder()
            .group(&query.group)
            .limit(query.limit)
            .build()?;
        let partition_by = DimensionGroup::builder()
            .group(&query.partition_by)
            .limit(query.limit)
            .build()?;
        let output = self
            .client
            .describe_dimension_keys()
            .service_type(ServiceType::from(SERVICE_TYPE))
            .identifier(&query.identifier)
            .metric(&query.metric)
            .group_by(group_by)
            .partition_by(partition_by)
            .start_time(to_sdk_time(query.start))
            .end_time(to_sdk_time(query.end))
            .period_in_seconds(query.period_secs)
            .max_results(query.max_results)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("DescribeDimensionKeys: {}", DisplayErrorContext(e)))?;
        Ok(dimension_keys_summary(&output))
    }
}

// List members come back as slices (empty when unset); required members are plain values.

fn resource_metrics_page(output: &GetResourceMetricsOutput) -> ResourceMetricsPage {
    ResourceMetricsPage {
        aligned_start_time: output.aligned_start_time().and_then(from_sdk_time),
        aligned_end_time: output.aligned_end_time().and_then(from_sdk_time),
        identifier: output.identifier().map(str::to_string),
        metric_list: output
            .metric_list()
            .iter()
            .map(metric_key_data_points)
            .collect(),
        next_token: output.next_token().map(str::to_string),
    }
}

fn metric_key_data_points(series: &sdk::MetricKeyDataPoints) -> MetricKeyDataPoints {
    MetricKeyDataPoints {
        key: series.key().map(|k| MetricKey {
            metric: k.metric().to_string(),
            dimensions: k.dimensions().map(sorted),
        }),
        data_points: series
            .data_points()
            .iter()
            .filter_map(|p| {
                Some(DataPoint {
                    timestamp: from_sdk_time(p.timestamp())?,
                    value: Some(p.value()),
                })
            })
            .collect(),
    }
}

fn dimension_keys_summary(output: &DescribeDimensionKeysOutput) -> DimensionKeysSummary {
    DimensionKeysSummary {
        aligned_start_time: output.aligned_start_time().and_then(from_sdk_time),
        aligned_end_time: output.aligned_end_time().and_then(from_sdk_time),
        partition_keys: output
            .partition_keys()
            .iter()
            .map(|p| PartitionKey {
                dimensions: sorted(p.dimensions()),
            })
            .collect(),
        keys: output
            .keys()
            .iter()
            .map(|k| DimensionKeyDescription {
                dimensions: k.dimensions().map(sorted),
                total: k.total(),
                partitions: k.partitions().to_vec(),
            })
            .collect(),
        next_token: output.next_token().map(str::to_string),
    }
}

fn sorted(map: &HashMap<String, String>) -> BTreeMap<String, String> {
    map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
}

pub(crate) fn to_sdk_time(t: DateTime<Utc>) -> SdkDateTime {
    SdkDateTime::from_secs_and_nanos(t.timestamp(), t.timestamp_subsec_nanos())
}

pub(crate) fn from_sdk_time(t: &SdkDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(t.secs(), t.subsec_nanos())
}
