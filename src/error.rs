// Error taxonomy for one archive run. Every variant is fatal for the run.

use crate::models::DumpType;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// Bad duration, timestamp, dump type or region in the run request.
    #[error("invalid request: {0}")]
    Config(String),

    /// Identity lookup or instance listing failed.
    #[error("discovery failed ({operation}): {source}")]
    Discovery {
        operation: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("{mode} fetch failed for {instance} {metric}/{dimension}: {source}")]
    Fetch {
        mode: DumpType,
        instance: String,
        metric: String,
        dimension: String,
        #[source]
        source: BoxError,
    },

    #[error("encoding failed: {0}")]
    Encode(#[from] EncodeError),

    #[error("upload to s3://{bucket}/{key} failed: {source}")]
    Upload {
        bucket: String,
        key: String,
        #[source]
        source: BoxError,
    },

    /// End-of-run summary when combinations fail under the `continue` policy.
    #[error("{failed} of {attempted} combinations failed")]
    Incomplete { failed: usize, attempted: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
