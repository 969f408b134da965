// Query parameters handed to the metrics API, one struct per retrieval mode

use chrono::{DateTime, Utc};

/// Service type sent with every Performance Insights query.
pub const SERVICE_TYPE: &str = "RDS";

/// One metric grouped by one dimension over one sub-window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceMetricsQuery {
    pub identifier: String,
    pub metric: String,
    pub group: String,
    pub limit: i32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub period_secs: i32,
    pub max_results: i32,
}

/// Top dimension keys for one metric over the whole range, grouped and partitioned by `group`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionKeysQuery {
    pub identifier: String,
    pub metric: String,
    pub group: String,
    pub partition_by: String,
    pub limit: i32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub period_secs: i32,
    pub max_results: i32,
}
