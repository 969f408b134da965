// AWS-backed collaborators. One SDK config per region, loaded on connect.

mod pi;
mod rds;
mod s3;
mod sts;

pub use pi::PerformanceInsightsClient;
pub use rds::RdsDiscovery;
pub use s3::S3Store;
pub use sts::StsIdentity;

use crate::ports::{Backend, Collaborators, SystemClock};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default)]
pub struct AwsBackend;

#[async_trait]
impl Backend for AwsBackend {
    async fn connect(&self, region: &str) -> anyhow::Result<Collaborators> {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;
        tracing::debug!(region, "aws config loaded");
        Ok(Collaborators {
            discovery: Arc::new(RdsDiscovery::new(aws_sdk_rds::Client::new(&sdk_config))),
            identity: Arc::new(StsIdentity::new(aws_sdk_sts::Client::new(&sdk_config))),
            insights: Arc::new(PerformanceInsightsClient::new(aws_sdk_pi::Client::new(
                &sdk_config,
            ))),
            store: Arc::new(S3Store::new(aws_sdk_s3::Client::new(&sdk_config))),
            clock: Arc::new(SystemClock),
        })
    }
}
