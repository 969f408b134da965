// Performance Insights responses as archived: one JSON line per API response.
// Field names follow the service's PascalCase wire names so archived lines read like raw API output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceMetricsPage {
    pub aligned_start_time: Option<DateTime<Utc>>,
    pub aligned_end_time: Option<DateTime<Utc>>,
    pub identifier: Option<String>,
    #[serde(default)]
    pub metric_list: Vec<MetricKeyDataPoints>,
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricKeyDataPoints {
    pub key: Option<MetricKey>,
    #[serde(default)]
    pub data_points: Vec<DataPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricKey {
    pub metric: String,
    pub dimensions: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DataPoint {
    pub timestamp: DateTime<Utc>,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DimensionKeysSummary {
    pub aligned_start_time: Option<DateTime<Utc>>,
    pub aligned_end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub partition_keys: Vec<PartitionKey>,
    #[serde(default)]
    pub keys: Vec<DimensionKeyDescription>,
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PartitionKey {
    pub dimensions: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DimensionKeyDescription {
    pub dimensions: Option<BTreeMap<String, String>>,
    pub total: Option<f64>,
    #[serde(default)]
    pub partitions: Vec<f64>,
}
