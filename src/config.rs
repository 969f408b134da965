use crate::encoder::Encoding;
use crate::key::DEFAULT_BUCKET_PREFIX;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub archive: ArchiveConfig,
}

/// Coarsest sampling period the metrics API offers (one day).
pub const MAX_PERIOD_SECS: u32 = 86_400;

/// Upper bound for one sub-window: one-day periods at the API's largest page size.
pub const MAX_WINDOW_SECS: i64 = 86_400 * 25;

/// What to pull and how hard to hit the metrics API. Immutable for a run.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionConfig {
    #[serde(default = "default_metrics")]
    pub metrics: Vec<String>,
    #[serde(default = "default_dimensions")]
    pub dimensions: Vec<String>,
    /// Sampling period; also the granularity of every returned data point.
    #[serde(default = "default_period_secs")]
    pub period_secs: u32,
    /// Data points per call; a sub-window spans max_results * period_secs.
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    /// Top-N dimension values per query.
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Delay after every time-series call.
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

fn default_metrics() -> Vec<String> {
    vec!["db.load.avg".into(), "db.sampledload.avg".into()]
}

fn default_dimensions() -> Vec<String> {
    vec![
        "db.host".into(),
        "db.sql".into(),
        "db.sql_tokenized".into(),
        "db.wait_event".into(),
        "db.wait_event_type".into(),
    ]
}

fn default_period_secs() -> u32 {
    60
}

fn default_max_results() -> u32 {
    20
}

fn default_limit() -> u32 {
    10
}

fn default_throttle_ms() -> u64 {
    1000
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            metrics: default_metrics(),
            dimensions: default_dimensions(),
            period_secs: default_period_secs(),
            max_results: default_max_results(),
            limit: default_limit(),
            throttle_ms: default_throttle_ms(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl ExtractionConfig {
    pub fn period(&self) -> chrono::TimeDelta {
        chrono::TimeDelta::seconds(i64::from(self.period_secs))
    }

    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }

    /// Span of one sub-window (period * max_results); None when it does not fit a `TimeDelta`.
    pub fn window_span(&self) -> Option<chrono::TimeDelta> {
        self.period()
            .checked_mul(i32::try_from(self.max_results).ok()?)
    }

    /// Default lookback for the command line: the span of one full sub-window.
    pub fn default_lookback(&self) -> chrono::TimeDelta {
        self.window_span().unwrap_or_else(chrono::TimeDelta::zero)
    }
}

/// What the orchestrator does when one combination fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// First error aborts the run; later combinations never start.
    #[default]
    FailFast,
    /// Record the failure, keep going, report the run failed at the end.
    Continue,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveConfig {
    /// Bucket is `<bucket_prefix><account id>`.
    #[serde(default = "default_bucket_prefix")]
    pub bucket_prefix: String,
    #[serde(default = "default_compress")]
    pub compress: bool,
    #[serde(default = "default_compression_level")]
    pub compression_level: u32,
}

fn default_bucket_prefix() -> String {
    DEFAULT_BUCKET_PREFIX.into()
}

fn default_compress() -> bool {
    true
}

fn default_compression_level() -> u32 {
    crate::encoder::DEFAULT_GZIP_LEVEL
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            bucket_prefix: default_bucket_prefix(),
            compress: default_compress(),
            compression_level: default_compression_level(),
        }
    }
}

impl ArchiveConfig {
    pub fn encoding(&self) -> Encoding {
        if self.compress {
            Encoding::Gzip {
                level: self.compression_level,
            }
        } else {
            Encoding::Plain
        }
    }
}

impl AppConfig {
    /// Load from `path`, else `CONFIG_FILE`, else `./config.toml`. A missing default file means
    /// built-in defaults (function deployments ship no config file); an explicit path must exist.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os("CONFIG_FILE").map(Into::into));
        let path = match explicit {
            Some(p) => p,
            None => {
                let p = Path::new("config.toml");
                if !p.exists() {
                    return Ok(Self::default());
                }
                p.to_path_buf()
            }
        };
        let s = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("config {}: {}", path.display(), e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        let e = &self.extraction;
        anyhow::ensure!(
            !e.metrics.is_empty(),
            "extraction.metrics must be non-empty"
        );
        anyhow::ensure!(
            e.metrics.iter().all(|m| !m.trim().is_empty()),
            "extraction.metrics must not contain empty names"
        );
        anyhow::ensure!(
            !e.dimensions.is_empty(),
            "extraction.dimensions must be non-empty"
        );
        anyhow::ensure!(
            e.dimensions.iter().all(|d| !d.trim().is_empty()),
            "extraction.dimensions must not contain empty names"
        );
        anyhow::ensure!(
            e.period_secs > 0 && e.period_secs <= MAX_PERIOD_SECS,
            "extraction.period_secs must be between 1 and {}, got {}",
            MAX_PERIOD_SECS,
            e.period_secs
        );
        anyhow::ensure!(
            e.max_results > 0 && e.max_results <= i32::MAX as u32,
            "extraction.max_results must be between 1 and {}, got {}",
            i32::MAX,
            e.max_results
        );
        anyhow::ensure!(
            e.limit > 0 && e.limit <= i32::MAX as u32,
            "extraction.limit must be between 1 and {}, got {}",
            i32::MAX,
            e.limit
        );
        anyhow::ensure!(
            e.window_span()
                .is_some_and(|span| span <= chrono::TimeDelta::seconds(MAX_WINDOW_SECS)),
            "extraction.period_secs * extraction.max_results must be at most {}s, got {}s",
            MAX_WINDOW_SECS,
            u64::from(e.period_secs) * u64::from(e.max_results)
        );
        anyhow::ensure!(
            !self.archive.bucket_prefix.is_empty(),
            "archive.bucket_prefix must be non-empty"
        );
        anyhow::ensure!(
            self.archive.compression_level <= 9,
            "archive.compression_level must be between 0 and 9, got {}",
            self.archive.compression_level
        );
        Ok(())
    }
}

/// How the process was started; decided once in `main`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryMode {
    /// Inside the function runtime: serve trigger events.
    Function,
    /// One-shot job driven by command-line flags.
    CommandLine,
}

impl EntryMode {
    pub fn detect() -> Self {
        Self::detect_from(|name| std::env::var(name).ok())
    }

    pub fn detect_from(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let execution_env = lookup("AWS_EXECUTION_ENV").unwrap_or_default();
        let runtime_api = lookup("AWS_LAMBDA_RUNTIME_API").unwrap_or_default();
        if execution_env.starts_with("AWS_Lambda") || !runtime_api.is_empty() {
            EntryMode::Function
        } else {
            EntryMode::CommandLine
        }
    }
}
