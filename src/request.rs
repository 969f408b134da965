// Run requests: trigger payload, trigger response, and resolution into a concrete run plan.

use crate::error::ArchiveError;
use crate::models::DumpType;
use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Everything the orchestrator needs for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPlan {
    pub region: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Capture-time granularity for archive keys: the interval, or one second.
    pub granularity: TimeDelta,
    pub modes: Vec<DumpType>,
}

/// Trigger payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerRequest {
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub interval: String,
    #[serde(default)]
    pub dump_type: String,
}

impl TriggerRequest {
    /// With `interval`: [now - interval, now) with now truncated to the interval.
    /// Without: explicit RFC 3339 `start`/`end`, one-second key granularity.
    pub fn resolve(&self, now: DateTime<Utc>) -> Result<RunPlan, ArchiveError> {
        let region = self.region.trim();
        if region.is_empty() {
            return Err(ArchiveError::Config("region is required".into()));
        }
        let modes = DumpType::parse_selection(&self.dump_type)
            .map_err(|e| ArchiveError::Config(e.to_string()))?;

        let (start, end, granularity) = if !self.interval.trim().is_empty() {
            let interval = parse_duration(&self.interval)?;
            if interval <= TimeDelta::zero() {
                return Err(ArchiveError::Config(format!(
                    "interval must be positive, got {:?}",
                    self.interval
                )));
            }
            let end = now.duration_trunc(interval).map_err(|e| {
                ArchiveError::Config(format!("interval {:?}: {}", self.interval, e))
            })?;
            (end - interval, end, interval)
        } else {
            (
                parse_timestamp("start", &self.start)?,
                parse_timestamp("end", &self.end)?,
                TimeDelta::seconds(1),
            )
        };

        Ok(RunPlan {
            region: region.to_string(),
            start,
            end,
            granularity,
            modes,
        })
    }
}

/// Trigger response; the body is plain text and never base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerResponse {
    pub status_code: u16,
    pub status_description: String,
    pub headers: HashMap<String, String>,
    pub body: String,
    pub is_base64_encoded: bool,
}

impl TriggerResponse {
    pub fn success() -> Self {
        Self::plain(200, "200 OK", "success")
    }

    pub fn failure() -> Self {
        Self::plain(500, "500 Internal Server Error", "error")
    }

    fn plain(status_code: u16, description: &str, body: &str) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "text/plain".to_string());
        Self {
            status_code,
            status_description: description.to_string(),
            headers,
            body: body.to_string(),
            is_base64_encoded: false,
        }
    }
}

pub fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>, ArchiveError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| ArchiveError::Config(format!("{} {:?}: {}", field, value, e)))
}

/// Parse duration text such as "1h", "15m", "1h30m", "1.5s" or "250ms".
/// Units: ns, us (µs), ms, s, m, h. A bare "0" is zero; a leading '-' negates.
pub fn parse_duration(s: &str) -> Result<TimeDelta, ArchiveError> {
    let invalid = || ArchiveError::Config(format!("invalid duration {:?}", s));
    let text = s.trim();
    let (negative, mut rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    if rest == "0" {
        return Ok(TimeDelta::zero());
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total_ns: i128 = 0;
    while !rest.is_empty() {
        let int_len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let (int_part, tail) = rest.split_at(int_len);
        let (frac_part, tail) = match tail.strip_prefix('.') {
            Some(t) => {
                let frac_len = t.find(|c: char| !c.is_ascii_digit()).unwrap_or(t.len());
                t.split_at(frac_len)
            }
            None => ("", tail),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }
        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_len);
        let unit_ns: i128 = match unit {
            "ns" => 1,
            "us" | "µs" | "μs" => 1_000,
            "ms" => 1_000_000,
            "s" => 1_000_000_000,
            "m" => 60 * 1_000_000_000,
            "h" => 3_600 * 1_000_000_000,
            _ => return Err(invalid()),
        };

        let whole: i128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| invalid())?
        };
        let mut frac_ns: i128 = 0;
        if !frac_part.is_empty() {
            // Digits beyond nanosecond precision cannot contribute.
            let digits = &frac_part[..frac_part.len().min(18)];
            let numerator: i128 = digits.parse().map_err(|_| invalid())?;
            frac_ns = numerator * unit_ns / 10i128.pow(digits.len() as u32);
        }
        total_ns = whole
            .checked_mul(unit_ns)
            .and_then(|v| v.checked_add(frac_ns))
            .and_then(|v| v.checked_add(total_ns))
            .filter(|v| *v <= i64::MAX as i128)
            .ok_or_else(invalid)?;
        rest = tail;
    }

    let ns = total_ns as i64;
    Ok(TimeDelta::nanoseconds(if negative { -ns } else { ns }))
}
