// Command-line mode: one-shot extraction driven by flags.

use crate::config::ExtractionConfig;
use crate::error::ArchiveError;
use crate::models::DumpType;
use crate::request::{RunPlan, parse_timestamp};
use chrono::{DateTime, TimeDelta, Utc};
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_REGION: &str = "us-east-1";

/// Archive RDS Performance Insights metrics to partitioned S3 objects
#[derive(Parser, Debug, Clone)]
#[command(name = "pi-archiver", version = crate::version::VERSION)]
pub struct Args {
    /// AWS region to extract from
    #[arg(long, default_value = DEFAULT_REGION)]
    pub region: String,

    /// Range start, RFC 3339 (default: one full sub-window before --end)
    #[arg(long)]
    pub start: Option<String>,

    /// Range end, RFC 3339 (default: now)
    #[arg(long)]
    pub end: Option<String>,

    /// GetResourceMetrics, DescribeDimensionKeys, or "" for both
    #[arg(long = "dump-type", default_value = "GetResourceMetrics")]
    pub dump_type: String,

    /// TOML config file (default: $CONFIG_FILE, then ./config.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Explicit ranges always archive with one-second key granularity.
    pub fn resolve(
        &self,
        now: DateTime<Utc>,
        extraction: &ExtractionConfig,
    ) -> Result<RunPlan, ArchiveError> {
        if self.region.trim().is_empty() {
            return Err(ArchiveError::Config("region is required".into()));
        }
        let end = match &self.end {
            Some(s) => parse_timestamp("end", s)?,
            None => now,
        };
        let start = match &self.start {
            Some(s) => parse_timestamp("start", s)?,
            None => now
                .checked_sub_signed(extraction.default_lookback())
                .ok_or_else(|| ArchiveError::Config("default start out of range".into()))?,
        };
        let modes = DumpType::parse_selection(&self.dump_type)
            .map_err(|e| ArchiveError::Config(e.to_string()))?;
        Ok(RunPlan {
            region: self.region.trim().to_string(),
            start,
            end,
            granularity: TimeDelta::seconds(1),
            modes,
        })
    }
}
