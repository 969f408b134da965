// Instance discovery via RDS DescribeDBInstances, every page

use crate::models::Instance;
use crate::ports::InstanceDiscovery;
use async_trait::async_trait;
use aws_sdk_rds::error::DisplayErrorContext;
use aws_sdk_rds::types::DbInstance;
use tracing::warn;

pub struct RdsDiscovery {
    client: aws_sdk_rds::Client,
}

impl RdsDiscovery {
    pub fn new(client: aws_sdk_rds::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl InstanceDiscovery for RdsDiscovery {
    async fn list_instances(&self) -> anyhow::Result<Vec<Instance>> {
        let mut pages = self.client.describe_db_instances().into_paginator().send();
        let mut out = Vec::new();
        while let Some(page) = pages.next().await {
            let page =
                page.map_err(|e| anyhow::anyhow!("DescribeDBInstances: {}", DisplayErrorContext(e)))?;
            for db in page.db_instances() {
                match to_instance(db) {
                    Some(instance) => out.push(instance),
                    None => warn!(
                        identifier = ?db.db_instance_identifier(),
                        "instance without identifier or resource id; skipping"
                    ),
                }
            }
        }
        Ok(out)
    }
}

/// An unset Performance Insights flag counts as disabled.
fn to_instance(db: &DbInstance) -> Option<Instance> {
    Some(Instance {
        identifier: db.db_instance_identifier()?.to_string(),
        resource_id: db.dbi_resource_id()?.to_string(),
        monitoring_enabled: db.performance_insights_enabled().unwrap_or(false),
    })
}
