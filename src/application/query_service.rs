// Query service - Use case for answering viewport queries
use crate::application::series_store::TimeSeriesStore;
use crate::application::viewport_resolver::ViewportResolver;
use crate::domain::decimation::DecimationPolicy;
use crate::domain::errors::StoreError;
use crate::domain::telemetry::TimeWindow;
use crate::domain::viewport::{QueryResult, ViewportRequest};
use std::sync::Arc;

#[derive(Clone)]
pub struct QueryService {
    store: Arc<TimeSeriesStore>,
    resolver: ViewportResolver,
    policy: DecimationPolicy,
}

impl QueryService {
    pub fn new(store: Arc<TimeSeriesStore>, policy: DecimationPolicy) -> Result<Self, StoreError> {
        let resolver = ViewportResolver::new(store.bounds()?);
        Ok(Self {
            store,
            resolver,
            policy,
        })
    }

    pub fn bounds(&self) -> TimeWindow {
        self.resolver.bounds()
    }

    pub fn policy(&self) -> &DecimationPolicy {
        &self.policy
    }

    pub fn store(&self) -> &TimeSeriesStore {
        &self.store
    }

    /// Answer one viewport query. Never fails: odd bounds are resolved by the
    /// resolver and windows without data come back as `QueryResult::Empty`.
    pub fn handle(&self, request: &ViewportRequest) -> QueryResult {
        let window = self.resolver.resolve(request);
        let filtered = self.store.range_query(window.start_ms, window.end_ms);

        tracing::debug!(
            "Filtered {} points for window {}..{}",
            filtered.len(),
            window.start_ms,
            window.end_ms
        );

        if filtered.is_empty() {
            return QueryResult::no_data();
        }

        // Stride follows the requested span, not the span of the data found
        let stride = self.policy.stride_for(window.duration_ms());
        let points: Vec<_> = filtered.iter().step_by(stride).copied().collect();

        tracing::debug!("Decimated to {} points with stride {}", points.len(), stride);

        QueryResult::Decimated {
            points,
            stride,
            window,
        }
    }
}
