// Ports for the external collaborators the pipeline drives.
// Implementations live in `aws`; tests supply in-memory fakes.

use crate::models::{
    DimensionKeysQuery, DimensionKeysSummary, Instance, ResourceMetricsPage, ResourceMetricsQuery,
};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Lists every database instance in the region, monitored or not.
#[async_trait]
pub trait InstanceDiscovery: Send + Sync {
    async fn list_instances(&self) -> anyhow::Result<Vec<Instance>>;
}

/// Resolves the account the credentials belong to.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn account_id(&self) -> anyhow::Result<String>;
}

/// Performance Insights query API.
#[async_trait]
pub trait PerformanceInsights: Send + Sync {
    async fn get_resource_metrics(
        &self,
        query: &ResourceMetricsQuery,
    ) -> anyhow::Result<ResourceMetricsPage>;

    async fn describe_dimension_keys(
        &self,
        query: &DimensionKeysQuery,
    ) -> anyhow::Result<DimensionKeysSummary>;
}

/// Object storage write. One call per archive object; no retry at this layer.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> anyhow::Result<()>;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Region-bound set of collaborators for one run.
#[derive(Clone)]
pub struct Collaborators {
    pub discovery: Arc<dyn InstanceDiscovery>,
    pub identity: Arc<dyn IdentityProvider>,
    pub insights: Arc<dyn PerformanceInsights>,
    pub store: Arc<dyn ObjectStore>,
    pub clock: Arc<dyn Clock>,
}

/// Builds collaborators for a region (the AWS backend loads SDK config per region).
#[async_trait]
pub trait Backend: Send + Sync {
    async fn connect(&self, region: &str) -> anyhow::Result<Collaborators>;
}
