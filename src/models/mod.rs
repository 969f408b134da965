// Domain models: discovered instances, retrieval modes, query parameters, archived responses

mod dump_type;
mod insights;
mod instance;
mod query;

pub use dump_type::{DumpType, UnknownDumpType};
pub use insights::{
    DataPoint, DimensionKeyDescription, DimensionKeysSummary, MetricKey, MetricKeyDataPoints,
    PartitionKey, ResourceMetricsPage,
};
pub use instance::Instance;
pub use query::{DimensionKeysQuery, ResourceMetricsQuery, SERVICE_TYPE};
