// CSV series source - loads `Timestamp,SensorValue` files
use crate::application::series_source::SeriesSource;
use crate::domain::telemetry::TimeSeriesPoint;
use crate::infrastructure::timestamp::parse_timestamp_ms;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct CsvSeriesSource {
    path: PathBuf,
}

impl CsvSeriesSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SeriesSource for CsvSeriesSource {
    fn describe(&self) -> String {
        format!("csv file {}", self.path.display())
    }

    async fn load_points(&self) -> Result<Vec<TimeSeriesPoint>> {
        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;

        parse_csv(&contents).with_context(|| format!("Failed to parse {}", self.path.display()))
    }
}

/// Parse CSV text into points, keeping file order.
///
/// The header row is optional and is only recognised when it names a column:
/// `Timestamp` or `time` for the time column, `SensorValue` or `value` for the
/// value column, falling back to the first and second columns. Without a
/// header the first row is data and must parse like any other.
pub fn parse_csv(contents: &str) -> Result<Vec<TimeSeriesPoint>> {
    let mut rows = contents
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .peekable();

    let mut time_idx = 0;
    let mut value_idx = 1;

    // A first row naming a known column is a header, anything else is data
    if let Some(&(_, first)) = rows.peek() {
        let columns: Vec<&str> = first.split(',').map(|c| c.trim().trim_matches('"')).collect();
        let is_header = columns
            .iter()
            .any(|c| is_time_column(c) || is_value_column(c));

        if is_header {
            time_idx = columns.iter().position(|c| is_time_column(c)).unwrap_or(0);
            value_idx = columns.iter().position(|c| is_value_column(c)).unwrap_or(1);
            rows.next();
        }
    }

    let mut points = Vec::new();
    for (line_no, line) in rows {
        let fields: Vec<&str> = line.split(',').map(|f| f.trim().trim_matches('"')).collect();

        let time_raw = fields
            .get(time_idx)
            .ok_or_else(|| anyhow!("line {}: missing time column", line_no))?;
        let value_raw = fields
            .get(value_idx)
            .ok_or_else(|| anyhow!("line {}: missing value column", line_no))?;

        let time_ms = parse_timestamp_ms(time_raw).with_context(|| format!("line {}", line_no))?;
        let value = value_raw
            .parse::<f64>()
            .with_context(|| format!("line {}: invalid value '{}'", line_no, value_raw))?;

        points.push(TimeSeriesPoint::new(time_ms, value));
    }

    Ok(points)
}

fn is_time_column(name: &str) -> bool {
    name.eq_ignore_ascii_case("timestamp") || name.eq_ignore_ascii_case("time")
}

fn is_value_column(name: &str) -> bool {
    name.eq_ignore_ascii_case("sensorvalue") || name.eq_ignore_ascii_case("value")
}
