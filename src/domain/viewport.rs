// Viewport request and query result models
use super::telemetry::{TimeSeriesPoint, TimeWindow};
use serde::Serialize;

pub const NO_DATA_REASON: &str = "no data in selected range";

/// A viewer asking for the points of one time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportRequest {
    /// Bounds picked on the range selection control
    ExplicitRange(TimeWindow),
    /// Plot-area zoom or pan. `relayout` is `None` until the user has zoomed
    /// or panned; `active_range` is the range control's current selection.
    InteractiveZoomPan {
        relayout: Option<TimeWindow>,
        active_range: Option<TimeWindow>,
    },
}

impl ViewportRequest {
    pub fn explicit(start_ms: i64, end_ms: i64) -> Self {
        Self::ExplicitRange(TimeWindow::new(start_ms, end_ms))
    }

    pub fn zoom_pan(start_ms: i64, end_ms: i64) -> Self {
        Self::InteractiveZoomPan {
            relayout: Some(TimeWindow::new(start_ms, end_ms)),
            active_range: None,
        }
    }

    /// First render, before any zoom or pan happened
    pub fn initial(active_range: Option<TimeWindow>) -> Self {
        Self::InteractiveZoomPan {
            relayout: None,
            active_range,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QueryResult {
    Decimated {
        points: Vec<TimeSeriesPoint>,
        stride: usize,
        window: TimeWindow,
    },
    Empty {
        reason: String,
    },
}

impl QueryResult {
    pub fn no_data() -> Self {
        Self::Empty {
            reason: NO_DATA_REASON.to_string(),
        }
    }
}

#[cfg(test)]
impl QueryResult {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }

    pub fn points(&self) -> &[TimeSeriesPoint] {
        match self {
            Self::Decimated { points, .. } => points,
            Self::Empty { .. } => &[],
        }
    }
}
