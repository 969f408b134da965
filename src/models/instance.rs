// Database instance as seen by discovery

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    /// Human-facing name; becomes the `dbinstanceidentifier=` partition.
    pub identifier: String,
    /// Stable resource id; the key Performance Insights is queried with.
    pub resource_id: String,
    pub monitoring_enabled: bool,
}

impl Instance {
    pub fn new(
        identifier: impl Into<String>,
        resource_id: impl Into<String>,
        monitoring_enabled: bool,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            resource_id: resource_id.into(),
            monitoring_enabled,
        }
    }
}
