// HTTP request handlers
use crate::domain::telemetry::TimeWindow;
use crate::domain::viewport::ViewportRequest;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::infrastructure::timestamp::{format_timestamp_ms, parse_timestamp_ms};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Query string of `/series/query`.
///
/// `source=range` is a range-control selection and needs `start` and `end`.
/// `source=relayout` (the default) is a plot zoom/pan; when the event carried
/// no axis range, `start`/`end` are omitted and `active_start`/`active_end`
/// may name the range control's current selection.
#[derive(Debug, Default, Deserialize)]
pub struct ViewportQuery {
    pub source: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub active_start: Option<String>,
    pub active_end: Option<String>,
}

#[derive(Serialize)]
struct BoundsBody {
    start_ms: i64,
    end_ms: i64,
    start: String,
    end: String,
    points: usize,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Full extent of the loaded series
pub async fn series_bounds(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let bounds = state.query_service.bounds();
    let body = BoundsBody {
        start_ms: bounds.start_ms,
        end_ms: bounds.end_ms,
        start: format_timestamp_ms(bounds.start_ms),
        end: format_timestamp_ms(bounds.end_ms),
        points: state.query_service.store().point_count(),
    };

    respond(StatusCode::OK, &body, accepts_brotli(&headers)).await
}

/// Decimated points for one viewport
pub async fn query_series(
    Query(query): Query<ViewportQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let compress = accepts_brotli(&headers);

    let request = match to_request(&query) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!("Rejecting viewport query {:?}: {:#}", query, e);
            let body = ErrorBody {
                error: format!("{:#}", e),
            };
            return respond(StatusCode::BAD_REQUEST, &body, compress).await;
        }
    };

    let result = state.query_service.handle(&request);
    respond(StatusCode::OK, &result, compress).await
}

fn to_request(query: &ViewportQuery) -> anyhow::Result<ViewportRequest> {
    let bounds = parse_window(query.start.as_deref(), query.end.as_deref())?;

    match query.source.as_deref().unwrap_or("relayout") {
        "range" => match bounds {
            Some(window) => Ok(ViewportRequest::explicit(window.start_ms, window.end_ms)),
            None => anyhow::bail!("source=range needs both start and end"),
        },
        "relayout" => {
            let active_range =
                parse_window(query.active_start.as_deref(), query.active_end.as_deref())?;
            Ok(match bounds {
                Some(window) => ViewportRequest::zoom_pan(window.start_ms, window.end_ms),
                None => ViewportRequest::initial(active_range),
            })
        }
        other => anyhow::bail!("unknown source '{}', expected range or relayout", other),
    }
}

/// A window only when both ends are present; a lone bound counts as absent
fn parse_window(start: Option<&str>, end: Option<&str>) -> anyhow::Result<Option<TimeWindow>> {
    match (start, end) {
        (Some(start), Some(end)) => Ok(Some(TimeWindow::new(
            parse_timestamp_ms(start)?,
            parse_timestamp_ms(end)?,
        ))),
        _ => Ok(None),
    }
}

async fn respond<T: Serialize>(status: StatusCode, body: &T, compress: bool) -> Response {
    match json_response(status, body, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::query_service::QueryService;
    use crate::application::series_store::{uniform_points, TimeSeriesStore};
    use crate::domain::decimation::DecimationPolicy;
    use axum::http::{header, HeaderValue};

    const JULY_FIRST_MS: i64 = 1_719_792_000_000;

    /// Two minutes of 10 ms samples from 2024-07-01T00:00:00Z
    fn state() -> State<Arc<AppState>> {
        let store = TimeSeriesStore::new(uniform_points(JULY_FIRST_MS, 12_000, 10)).unwrap();
        let query_service =
            QueryService::new(Arc::new(store), DecimationPolicy::default()).unwrap();
        State(Arc::new(AppState { query_service }))
    }

    fn query(pairs: &[(&str, &str)]) -> Query<ViewportQuery> {
        let mut query = ViewportQuery::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "source" => query.source = value,
                "start" => query.start = value,
                "end" => query.end = value,
                "active_start" => query.active_start = value,
                "active_end" => query.active_end = value,
                _ => panic!("unknown key {}", key),
            }
        }
        Query(query)
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        assert_eq!(health_check().await, "ok");
    }

    #[tokio::test]
    async fn test_bounds() {
        let response = series_bounds(HeaderMap::new(), state()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["start_ms"], JULY_FIRST_MS);
        assert_eq!(json["end_ms"], JULY_FIRST_MS + 119_990);
        assert_eq!(json["start"], "2024-07-01T00:00:00.000Z");
        assert_eq!(json["points"], 12_000);
    }

    #[tokio::test]
    async fn test_initial_render_returns_full_series() {
        let response = query_series(query(&[]), HeaderMap::new(), state()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["status"], "decimated");
        assert_eq!(json["stride"], 50);
        assert_eq!(json["points"].as_array().unwrap().len(), 240);
    }

    #[tokio::test]
    async fn test_explicit_range_with_plotly_timestamps() {
        let response = query_series(
            query(&[
                ("source", "range"),
                ("start", "2024-07-01 00:00:10"),
                ("end", "2024-07-01 00:00:15.000"),
            ]),
            HeaderMap::new(),
            state(),
        )
        .await;

        let json = json_body(response).await;
        assert_eq!(json["status"], "decimated");
        assert_eq!(json["stride"], 1);
        assert_eq!(json["points"].as_array().unwrap().len(), 501);
        assert_eq!(json["points"][0]["time_ms"], JULY_FIRST_MS + 10_000);
    }

    #[tokio::test]
    async fn test_relayout_without_bounds_uses_active_range() {
        let response = query_series(
            query(&[
                ("start", "2024-07-01 00:00:10"),
                ("active_start", "1719792030"),
                ("active_end", "1719792040"),
            ]),
            HeaderMap::new(),
            state(),
        )
        .await;

        let json = json_body(response).await;
        assert_eq!(json["window"]["start_ms"], JULY_FIRST_MS + 30_000);
        assert_eq!(json["window"]["end_ms"], JULY_FIRST_MS + 40_000);
    }

    #[tokio::test]
    async fn test_out_of_range_is_empty_not_error() {
        let response = query_series(
            query(&[("source", "range"), ("start", "2023-01-01"), ("end", "2023-01-02")]),
            HeaderMap::new(),
            state(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["status"], "empty");
        assert_eq!(json["reason"], "no data in selected range");
    }

    #[tokio::test]
    async fn test_bad_requests() {
        for pairs in [
            vec![("source", "range"), ("start", "2024-07-01")],
            vec![("start", "not a time"), ("end", "2024-07-01")],
            vec![("source", "sideways")],
        ] {
            let response = query_series(query(&pairs), HeaderMap::new(), state()).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);

            let json = json_body(response).await;
            assert!(!json["error"].as_str().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_brotli_negotiation() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT_ENCODING, HeaderValue::from_static("br"));

        let response = query_series(query(&[]), headers, state()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_ENCODING], "br");
    }
}
