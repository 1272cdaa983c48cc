// Viewport resolver - decides which window a request actually queries
use crate::domain::telemetry::TimeWindow;
use crate::domain::viewport::ViewportRequest;

#[derive(Debug, Clone, Copy)]
pub struct ViewportResolver {
    bounds: TimeWindow,
}

impl ViewportResolver {
    pub fn new(bounds: TimeWindow) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> TimeWindow {
        self.bounds
    }

    /// Effective window for a request, always with `start_ms <= end_ms`.
    ///
    /// A zoom/pan carrying new bounds overrides any explicit range; without
    /// bounds it falls back to the active explicit range, then to the whole
    /// series. Inverted bounds are swapped and overshoot is clamped to the
    /// series. A window that misses the series entirely is returned as is so
    /// the store query comes back empty.
    pub fn resolve(&self, request: &ViewportRequest) -> TimeWindow {
        let candidate = match *request {
            ViewportRequest::ExplicitRange(window) => window,
            ViewportRequest::InteractiveZoomPan {
                relayout: Some(window),
                ..
            } => window,
            ViewportRequest::InteractiveZoomPan {
                relayout: None,
                active_range,
            } => active_range.unwrap_or(self.bounds),
        };

        let candidate = candidate.normalized();
        candidate.intersect(&self.bounds).unwrap_or(candidate)
    }
}
