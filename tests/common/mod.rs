// Shared test helpers: in-memory collaborators with call recording and injected failures

#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, TimeZone, Utc};
use pi_archiver::config::{AppConfig, ExtractionConfig, FailurePolicy};
use pi_archiver::models::*;
use pi_archiver::ports::*;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const ACCOUNT: &str = "123456789012";

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 9, 14, 0, 0).unwrap()
}

/// One metric, one dimension, no throttle.
pub fn extraction(metrics: &[&str], dimensions: &[&str]) -> ExtractionConfig {
    ExtractionConfig {
        metrics: metrics.iter().map(|s| s.to_string()).collect(),
        dimensions: dimensions.iter().map(|s| s.to_string()).collect(),
        period_secs: 60,
        max_results: 20,
        limit: 10,
        throttle_ms: 0,
        failure_policy: FailurePolicy::FailFast,
    }
}

pub fn app_config(extraction: ExtractionConfig) -> AppConfig {
    AppConfig {
        extraction,
        ..Default::default()
    }
}

pub struct StaticDiscovery {
    instances: Vec<Instance>,
    fail: bool,
    pub calls: AtomicUsize,
}

impl StaticDiscovery {
    pub fn new(instances: Vec<Instance>) -> Self {
        Self {
            instances,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            instances: vec![],
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl InstanceDiscovery for StaticDiscovery {
    async fn list_instances(&self) -> anyhow::Result<Vec<Instance>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            anyhow::bail!("DescribeDBInstances: access denied");
        }
        Ok(self.instances.clone())
    }
}

pub struct StaticIdentity {
    account: Option<String>,
}

impl StaticIdentity {
    pub fn new(account: &str) -> Self {
        Self {
            account: Some(account.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self { account: None }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn account_id(&self) -> anyhow::Result<String> {
        self.account
            .clone()
            .ok_or_else(|| anyhow::anyhow!("GetCallerIdentity: expired token"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ResourceMetrics(ResourceMetricsQuery),
    DimensionKeys(DimensionKeysQuery),
}

/// Answers every query with a small canned response derived from the query.
#[derive(Default)]
pub struct RecordingInsights {
    pub calls: Mutex<Vec<Call>>,
    /// 1-based call number that fails.
    fail_on_call: Option<usize>,
}

impl RecordingInsights {
    pub fn failing_on(call: usize) -> Self {
        Self {
            calls: Mutex::new(vec![]),
            fail_on_call: Some(call),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> anyhow::Result<()> {
        let mut calls = self.calls.lock().unwrap();
        calls.push(call);
        if Some(calls.len()) == self.fail_on_call {
            anyhow::bail!("ThrottlingException: rate exceeded");
        }
        Ok(())
    }
}

pub fn page_for(query: &ResourceMetricsQuery) -> ResourceMetricsPage {
    let mut dimensions = BTreeMap::new();
    dimensions.insert(format!("{}.id", query.group), "abc".to_string());
    ResourceMetricsPage {
        aligned_start_time: Some(query.start),
        aligned_end_time: Some(query.end),
        identifier: Some(query.identifier.clone()),
        metric_list: vec![MetricKeyDataPoints {
            key: Some(MetricKey {
                metric: query.metric.clone(),
                dimensions: Some(dimensions),
            }),
            data_points: vec![DataPoint {
                timestamp: query.start,
                value: Some(1.25),
            }],
        }],
        next_token: None,
    }
}

pub fn summary_for(query: &DimensionKeysQuery) -> DimensionKeysSummary {
    let mut dimensions = BTreeMap::new();
    dimensions.insert(query.group.clone(), "SELECT 1".to_string());
    DimensionKeysSummary {
        aligned_start_time: Some(query.start),
        aligned_end_time: Some(query.end),
        partition_keys: vec![PartitionKey {
            dimensions: dimensions.clone(),
        }],
        keys: vec![DimensionKeyDescription {
            dimensions: Some(dimensions),
            total: Some(0.5),
            partitions: vec![0.5],
        }],
        next_token: None,
    }
}

#[async_trait]
impl PerformanceInsights for RecordingInsights {
    async fn get_resource_metrics(
        &self,
        query: &ResourceMetricsQuery,
    ) -> anyhow::Result<ResourceMetricsPage> {
        self.record(Call::ResourceMetrics(query.clone()))?;
        Ok(page_for(query))
    }

    async fn describe_dimension_keys(
        &self,
        query: &DimensionKeysQuery,
    ) -> anyhow::Result<DimensionKeysSummary> {
        self.record(Call::DimensionKeys(query.clone()))?;
        Ok(summary_for(query))
    }
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
    pub body: Bytes,
}

#[derive(Default)]
pub struct MemoryStore {
    pub objects: Mutex<Vec<StoredObject>>,
    /// 1-based put number that fails.
    fail_on_put: Option<usize>,
    puts: AtomicUsize,
}

impl MemoryStore {
    pub fn failing_on(put: usize) -> Self {
        Self {
            fail_on_put: Some(put),
            ..Default::default()
        }
    }

    pub fn objects(&self) -> Vec<StoredObject> {
        self.objects.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put_object(&self, bucket: &str, key: &str, body: Bytes) -> anyhow::Result<()> {
        let n = self.puts.fetch_add(1, Ordering::SeqCst) + 1;
        if Some(n) == self.fail_on_put {
            anyhow::bail!("PutObject: NoSuchBucket");
        }
        self.objects.lock().unwrap().push(StoredObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
            body,
        });
        Ok(())
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Concrete handles to every fake plus the type-erased bundle the pipeline takes.
pub struct Fixture {
    pub discovery: Arc<StaticDiscovery>,
    pub identity: Arc<StaticIdentity>,
    pub insights: Arc<RecordingInsights>,
    pub store: Arc<MemoryStore>,
    pub clock: Arc<FixedClock>,
}

impl Fixture {
    pub fn new(instances: Vec<Instance>) -> Self {
        Self {
            discovery: Arc::new(StaticDiscovery::new(instances)),
            identity: Arc::new(StaticIdentity::new(ACCOUNT)),
            insights: Arc::new(RecordingInsights::default()),
            store: Arc::new(MemoryStore::default()),
            clock: Arc::new(FixedClock(t0())),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            discovery: self.discovery.clone(),
            identity: self.identity.clone(),
            insights: self.insights.clone(),
            store: self.store.clone(),
            clock: self.clock.clone(),
        }
    }
}

/// Hands out the same fixture for any region and remembers which regions were asked for.
pub struct FakeBackend {
    collaborators: Collaborators,
    pub regions: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn new(fixture: &Fixture) -> Self {
        Self {
            collaborators: fixture.collaborators(),
            regions: Mutex::new(vec![]),
        }
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn connect(&self, region: &str) -> anyhow::Result<Collaborators> {
        self.regions.lock().unwrap().push(region.to_string());
        Ok(self.collaborators.clone())
    }
}

pub fn monitored(identifier: &str) -> Instance {
    Instance::new(identifier, format!("db-{}", identifier.to_uppercase()), true)
}

pub fn unmonitored(identifier: &str) -> Instance {
    Instance::new(identifier, format!("db-{}", identifier.to_uppercase()), false)
}
