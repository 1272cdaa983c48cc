// Source trait for loading the full-resolution series
use crate::application::series_store::TimeSeriesStore;
use crate::domain::telemetry::TimeSeriesPoint;
use async_trait::async_trait;
use std::time::Instant;

#[async_trait]
pub trait SeriesSource: Send + Sync {
    /// Human readable origin, used in startup logs
    fn describe(&self) -> String;

    /// Load every point, ascending by timestamp. Sortedness is checked by the
    /// store, not re-established here.
    async fn load_points(&self) -> anyhow::Result<Vec<TimeSeriesPoint>>;
}

/// One-time load of the series. Any failure here must stop startup.
pub async fn load_store(source: &dyn SeriesSource) -> anyhow::Result<TimeSeriesStore> {
    let started = Instant::now();
    let points = source.load_points().await?;
    let store = TimeSeriesStore::new(points)?;

    tracing::info!(
        "Loaded {} points from {} in {} ms",
        store.point_count(),
        source.describe(),
        started.elapsed().as_millis()
    );

    Ok(store)
}
