// Telemetry data domain models
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    pub time_ms: i64,
    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(time_ms: i64, value: f64) -> Self {
        Self { time_ms, value }
    }
}

/// Inclusive time window in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl TimeWindow {
    pub fn new(start_ms: i64, end_ms: i64) -> Self {
        Self { start_ms, end_ms }
    }

    /// Span of the window; negative for an inverted window.
    pub fn duration_ms(&self) -> i64 {
        self.end_ms.saturating_sub(self.start_ms)
    }

    pub fn is_inverted(&self) -> bool {
        self.start_ms > self.end_ms
    }

    /// Same window with the bounds swapped if they are out of order
    pub fn normalized(self) -> Self {
        if self.is_inverted() {
            Self::new(self.end_ms, self.start_ms)
        } else {
            self
        }
    }

    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start_ms <= other.end_ms && other.start_ms <= self.end_ms
    }

    /// Overlapping part of two windows, if any
    pub fn intersect(&self, other: &TimeWindow) -> Option<TimeWindow> {
        if !self.overlaps(other) {
            return None;
        }
        Some(Self::new(
            self.start_ms.max(other.start_ms),
            self.end_ms.min(other.end_ms),
        ))
    }
}
