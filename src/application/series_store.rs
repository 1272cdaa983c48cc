// In-memory full-resolution series with range lookup
use crate::domain::errors::StoreError;
use crate::domain::telemetry::{TimeSeriesPoint, TimeWindow};

/// Read-only after construction; share it behind an `Arc`.
#[derive(Debug)]
pub struct TimeSeriesStore {
    points: Vec<TimeSeriesPoint>,
}

impl TimeSeriesStore {
    /// Accepts points already sorted ascending by timestamp. Equal timestamps
    /// are allowed, a decrease is rejected.
    pub fn new(points: Vec<TimeSeriesPoint>) -> Result<Self, StoreError> {
        if points.is_empty() {
            return Err(StoreError::EmptyStore);
        }

        if let Some(index) = points
            .windows(2)
            .position(|pair| pair[1].time_ms < pair[0].time_ms)
        {
            return Err(StoreError::UnsortedInput {
                index: index + 1,
                previous_ms: points[index].time_ms,
                current_ms: points[index + 1].time_ms,
            });
        }

        Ok(Self { points })
    }

    pub fn bounds(&self) -> Result<TimeWindow, StoreError> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => Ok(TimeWindow::new(first.time_ms, last.time_ms)),
            _ => Err(StoreError::EmptyStore),
        }
    }

    /// All points with `start_ms <= time_ms <= end_ms`, in store order.
    pub fn range_query(&self, start_ms: i64, end_ms: i64) -> &[TimeSeriesPoint] {
        if start_ms > end_ms {
            return &[];
        }

        let start = self.points.partition_point(|p| p.time_ms < start_ms);
        let end = self.points.partition_point(|p| p.time_ms <= end_ms);
        &self.points[start..end]
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }
}

/// `count` points spaced `step_ms` apart starting at `start_ms`
#[cfg(test)]
pub(crate) fn uniform_points(start_ms: i64, count: usize, step_ms: i64) -> Vec<TimeSeriesPoint> {
    (0..count)
        .map(|i| TimeSeriesPoint::new(start_ms + i as i64 * step_ms, (i % 97) as f64 - 48.0))
        .collect()
}
