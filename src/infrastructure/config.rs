use crate::domain::decimation::{DecimationPolicy, Tier};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub data: DataSettings,
    pub logging: LoggingSettings,
    #[serde(default)]
    pub decimation: DecimationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataSettings {
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DecimationConfig {
    #[serde(default = "default_tiers")]
    pub tiers: Vec<TierConfig>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TierConfig {
    pub min_duration_ms: i64,
    pub stride: usize,
}

impl Default for DecimationConfig {
    fn default() -> Self {
        Self {
            tiers: default_tiers(),
        }
    }
}

impl From<&TierConfig> for Tier {
    fn from(config: &TierConfig) -> Self {
        Tier::new(config.min_duration_ms, config.stride)
    }
}

impl DecimationConfig {
    pub fn to_policy(&self) -> anyhow::Result<DecimationPolicy> {
        Ok(DecimationPolicy::new(self.tiers.iter().map(Tier::from))?)
    }
}

fn default_tiers() -> Vec<TierConfig> {
    DecimationPolicy::default()
        .tiers()
        .iter()
        .map(|tier| TierConfig {
            min_duration_ms: tier.min_duration_ms,
            stride: tier.stride,
        })
        .collect()
}

fn builder() -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8000)?
        .set_default("data.path", "sensor_readings.csv")?
        .set_default("logging.level", "info")?)
}

/// Defaults, then `config/viewer.*` if present, then `VIEWER_*` env vars
/// (`VIEWER_SERVER__PORT=9000`).
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = builder()?
        .add_source(config::File::with_name("config/viewer").required(false))
        .add_source(
            config::Environment::with_prefix("VIEWER")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
