// Archive key builder: hive-style partition path for one (instance, metric, dimension, mode).
//
//   <mode>/accountid=<acct>/region=<region>/dbinstanceidentifier=<id>/metric=<metric>/
//   dimension=<dim>/dt=<YYYY-MM-DD-HH>/<YYYYMMDDThhmmssZ>.json.gz
//
// Partition-aware readers depend on segment order and labels; keep them exact.

use crate::encoder::Encoding;
use crate::models::DumpType;
use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use std::fmt;

pub const DEFAULT_BUCKET_PREFIX: &str = "rds-performance-insights-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveKey {
    pub mode: DumpType,
    pub account_id: String,
    pub region: String,
    pub instance_id: String,
    pub metric: String,
    pub dimension: String,
    /// Already truncated to the run granularity.
    pub captured_at: DateTime<Utc>,
    pub encoding: Encoding,
}

impl ArchiveKey {
    /// Directory part: every labeled partition, without the file name.
    pub fn prefix(&self) -> String {
        format!(
            "{}/accountid={}/region={}/dbinstanceidentifier={}/metric={}/dimension={}/dt={}",
            self.mode,
            self.account_id,
            self.region,
            self.instance_id,
            self.metric,
            self.dimension,
            self.captured_at.format("%Y-%m-%d-%H"),
        )
    }

    pub fn file_name(&self) -> String {
        format!(
            "{}{}",
            self.captured_at.format("%Y%m%dT%H%M%SZ"),
            self.encoding.extension()
        )
    }

    pub fn path(&self) -> String {
        format!("{}/{}", self.prefix(), self.file_name())
    }
}

impl fmt::Display for ArchiveKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Truncate `now` down to a multiple of `granularity`, so repeated runs in one bucket overwrite
/// the same object. A non-positive or oversized granularity leaves `now` as is.
///
/// Multiples are counted from the Unix epoch, not from year 1. Granularities that divide a day
/// land on the same boundaries either way; others (7h, 25m) land on epoch-relative boundaries.
pub fn capture_time(now: DateTime<Utc>, granularity: TimeDelta) -> DateTime<Utc> {
    if granularity <= TimeDelta::zero() {
        return now;
    }
    now.duration_trunc(granularity).unwrap_or(now)
}

/// One bucket per account: `<prefix><account id>`.
pub fn bucket_name(prefix: &str, account_id: &str) -> String {
    format!("{}{}", prefix, account_id)
}
