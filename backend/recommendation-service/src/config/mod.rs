use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // HTTP server config
    pub http_host: String,
    pub http_port: u16,
    pub service_name: String,

    // Snapshots loaded once at startup
    pub similar_items_path: String,
    pub personal_recs_path: String,
    pub default_recs_path: String,

    // Event history collaborator (http(s):// or redis://)
    pub events_store_url: String,

    // Remote similar-items endpoint; local snapshot is used when unset
    pub similarity_service_url: Option<String>,

    // Online path
    pub upstream_timeout_ms: u64,
    pub recent_events_count: usize,
    pub similar_per_event: usize,

    // Observability
    pub log_format: String,
}

/// Tunables for the online ranking path.
#[derive(Debug, Clone)]
pub struct OnlineConfig {
    pub recent_events: usize,
    pub similar_per_event: usize,
    pub upstream_timeout: Duration,
}

impl Default for OnlineConfig {
    fn default() -> Self {
        Self {
            recent_events: 3,
            similar_per_event: 5,
            upstream_timeout: Duration::from_millis(500),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .set_default("http_host", "0.0.0.0")?
            .set_default("http_port", 8000)?
            .set_default("service_name", "recommendation-service")?
            .set_default("similar_items_path", "data/similar.json")?
            .set_default("personal_recs_path", "data/recommendations.json")?
            .set_default("default_recs_path", "data/top_popular.json")?
            .set_default("events_store_url", "http://127.0.0.1:8020")?
            .set_default("upstream_timeout_ms", 500)?
            .set_default("recent_events_count", 3)?
            .set_default("similar_per_event", 5)?
            .set_default("log_format", "text")?
            .add_source(config::Environment::default().separator("__"))
            .build()?;

        config.try_deserialize()
    }

    pub fn validate(&self) -> Result<()> {
        if self.http_port == 0 {
            return Err(anyhow!("HTTP port must be greater than 0"));
        }

        for (name, path) in [
            ("similar_items_path", &self.similar_items_path),
            ("personal_recs_path", &self.personal_recs_path),
            ("default_recs_path", &self.default_recs_path),
        ] {
            if path.is_empty() {
                return Err(anyhow!("{} is required", name));
            }
        }

        if self.events_store_url.is_empty() {
            return Err(anyhow!("Events store URL is required"));
        }

        if matches!(self.similarity_service_url.as_deref(), Some("")) {
            return Err(anyhow!("Similarity service URL must not be empty when set"));
        }

        if self.upstream_timeout_ms == 0 {
            return Err(anyhow!("Upstream timeout must be greater than 0"));
        }

        if self.recent_events_count == 0 || self.similar_per_event == 0 {
            return Err(anyhow!(
                "recent_events_count and similar_per_event must be greater than 0"
            ));
        }

        if !matches!(self.log_format.as_str(), "text" | "json") {
            return Err(anyhow!("log_format must be 'text' or 'json'"));
        }

        Ok(())
    }

    pub fn online(&self) -> OnlineConfig {
        OnlineConfig {
            recent_events: self.recent_events_count,
            similar_per_event: self.similar_per_event,
            upstream_timeout: Duration::from_millis(self.upstream_timeout_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            http_host: "0.0.0.0".to_string(),
            http_port: 8000,
            service_name: "recommendation-service".to_string(),
            similar_items_path: "data/similar.json".to_string(),
            personal_recs_path: "data/recommendations.json".to_string(),
            default_recs_path: "data/top_popular.json".to_string(),
            events_store_url: "http://127.0.0.1:8020".to_string(),
            similarity_service_url: None,
            upstream_timeout_ms: 500,
            recent_events_count: 3,
            similar_per_event: 5,
            log_format: "text".to_string(),
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_missing_default_recs_path() {
        let mut config = valid_config();
        config.default_recs_path = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_online_settings() {
        let mut config = valid_config();
        config.recent_events_count = 0;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.similarity_service_url = Some(String::new());
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.log_format = "xml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_online_config() {
        let online = valid_config().online();
        assert_eq!(online.recent_events, 3);
        assert_eq!(online.similar_per_event, 5);
        assert_eq!(online.upstream_timeout, Duration::from_millis(500));
    }
}
