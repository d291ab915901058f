use chrono::FixedOffset;
use serde::Deserialize;

use crate::aggregation::AggregateOptions;
use crate::models::FieldMatch;

/// Widest real-world UTC offset (UTC+14:00 / UTC-12:00 fit inside).
const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub aggregation: AggregationConfig,
    #[serde(default)]
    pub chart: ChartConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Document store root, e.g. "https://example-rtdb.firebaseio.com".
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AggregationConfig {
    #[serde(default)]
    pub field_match: FieldMatch,
    /// Offset applied to packet timestamps before taking the calendar day.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChartConfig {
    /// Elements charted when a request does not name any.
    #[serde(default)]
    pub default_elements: Vec<String>,
}

impl AggregationConfig {
    /// Aggregation options; call on a validated config.
    pub fn options(&self) -> anyhow::Result<AggregateOptions> {
        let offset = FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            anyhow::anyhow!(
                "aggregation.utc_offset_minutes out of range: {}",
                self.utc_offset_minutes
            )
        })?;
        Ok(AggregateOptions {
            field_match: self.field_match,
            offset,
        })
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let mut config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        config.normalize();
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.server.host.is_empty(),
            "server.host must be non-empty"
        );
        let base_url = self.source.base_url.trim();
        anyhow::ensure!(!base_url.is_empty(), "source.base_url must be non-empty");
        anyhow::ensure!(
            base_url.starts_with("http://") || base_url.starts_with("https://"),
            "source.base_url must start with http:// or https://, got {}",
            base_url
        );
        anyhow::ensure!(
            self.source.timeout_secs > 0,
            "source.timeout_secs must be > 0, got {}",
            self.source.timeout_secs
        );
        anyhow::ensure!(
            self.aggregation.utc_offset_minutes.abs() <= MAX_UTC_OFFSET_MINUTES,
            "aggregation.utc_offset_minutes must be within +/-{}, got {}",
            MAX_UTC_OFFSET_MINUTES,
            self.aggregation.utc_offset_minutes
        );
        anyhow::ensure!(
            self.chart
                .default_elements
                .iter()
                .all(|e| !e.trim().is_empty()),
            "chart.default_elements must not contain empty names"
        );
        Ok(())
    }

    fn normalize(&mut self) {
        self.source.base_url = self.source.base_url.trim().trim_end_matches('/').to_string();
        let policy = self.aggregation.field_match;
        self.chart.default_elements = self
            .chart
            .default_elements
            .iter()
            .map(|e| policy.normalize(e))
            .collect();
    }
}
