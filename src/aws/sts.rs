// Account lookup via STS GetCallerIdentity

use crate::ports::IdentityProvider;
use async_trait::async_trait;
use aws_sdk_sts::error::DisplayErrorContext;

pub struct StsIdentity {
    client: aws_sdk_sts::Client,
}

impl StsIdentity {
    pub fn new(client: aws_sdk_sts::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentityProvider for StsIdentity {
    async fn account_id(&self) -> anyhow::Result<String> {
        let identity = self
            .client
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("GetCallerIdentity: {}", DisplayErrorContext(e)))?;
        identity
            .account()
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("GetCallerIdentity returned no account"))
    }
}
