// Window planner: splits [start, end) into sub-windows sized to the metrics API's per-call limit.
// Every sub-window is exactly max_results * period long; the last one may run past `end`.

use chrono::{DateTime, TimeDelta, Utc};

/// One bounded slice of the extraction range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SubWindow {
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }
}

/// Extraction range plus the step derived from the API limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPlan {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    step: TimeDelta,
}

impl WindowPlan {
    /// A step that does not fit a `TimeDelta`, or whose first window would end past the last
    /// representable instant, leaves the plan empty.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, period: TimeDelta, max_results: u32) -> Self {
        let step = i32::try_from(max_results)
            .ok()
            .and_then(|n| period.checked_mul(n))
            .filter(|step| start.checked_add_signed(*step).is_some())
            .unwrap_or_else(TimeDelta::zero);
        Self { start, end, step }
    }

    /// Length of every sub-window (max_results * period).
    pub fn step(&self) -> TimeDelta {
        self.step
    }

    /// Lazy sub-window sequence. Restartable: each call starts again at `start`.
    pub fn windows(&self) -> SubWindows {
        SubWindows {
            cursor: self.start,
            end: self.end,
            step: self.step,
        }
    }

    /// The unsplit range, used by the single-shot dimension-summary query.
    pub fn whole(&self) -> SubWindow {
        SubWindow {
            start: self.start,
            end: self.end,
        }
    }

    /// ceil((end - start) / step); zero when the range is empty or the step is not positive.
    pub fn len(&self) -> usize {
        let span = total_nanos(self.end - self.start);
        let step = total_nanos(self.step);
        if span <= 0 || step <= 0 {
            return 0;
        }
        ((span + step - 1) / step) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl IntoIterator for &WindowPlan {
    type Item = SubWindow;
    type IntoIter = SubWindows;

    fn into_iter(self) -> SubWindows {
        self.windows()
    }
}

#[derive(Debug, Clone)]
pub struct SubWindows {
    cursor: DateTime<Utc>,
    end: DateTime<Utc>,
    step: TimeDelta,
}

impl Iterator for SubWindows {
    type Item = SubWindow;

    fn next(&mut self) -> Option<SubWindow> {
        if self.cursor >= self.end || self.step <= TimeDelta::zero() {
            return None;
        }
        let start = self.cursor;
        let end = start.checked_add_signed(self.step)?;
        self.cursor = end;
        Some(SubWindow { start, end })
    }
}

/// Exact length in nanoseconds; an i128 never overflows for any `TimeDelta`.
fn total_nanos(d: TimeDelta) -> i128 {
    i128::from(d.num_seconds()) * 1_000_000_000 + i128::from(d.subsec_nanos())
}
