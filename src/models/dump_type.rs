// Retrieval mode: which Performance Insights API a run archives

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Retrieval mode; the wire name doubles as the first segment of every archive key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DumpType {
    /// Time-series pull, one query per sub-window.
    GetResourceMetrics,
    /// Top dimension keys over the whole range, one query.
    DescribeDimensionKeys,
}

impl DumpType {
    /// Both modes, in the order an unqualified run executes them.
    pub const ALL: [DumpType; 2] = [DumpType::GetResourceMetrics, DumpType::DescribeDimensionKeys];

    pub fn as_str(self) -> &'static str {
        match self {
            DumpType::GetResourceMetrics => "GetResourceMetrics",
            DumpType::DescribeDimensionKeys => "DescribeDimensionKeys",
        }
    }

    /// Empty text selects every mode; anything else must name exactly one.
    pub fn parse_selection(s: &str) -> Result<Vec<DumpType>, UnknownDumpType> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(Self::ALL.to_vec());
        }
        Ok(vec![s.parse()?])
    }
}

impl fmt::Display for DumpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dump type {0:?} (expected GetResourceMetrics or DescribeDimensionKeys)")]
pub struct UnknownDumpType(pub String);

impl FromStr for DumpType {
    type Err = UnknownDumpType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GetResourceMetrics" => Ok(DumpType::GetResourceMetrics),
            "DescribeDimensionKeys" => Ok(DumpType::DescribeDimensionKeys),
            other => Err(UnknownDumpType(other.to_string())),
        }
    }
}
