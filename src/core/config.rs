use std::env;
use std::time::Duration;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;


#[derive(Deserialize, Debug, Clone)]
pub struct RealtimeConfig {
    pub server_host: String,
    pub server_port: u16,
    pub log_level: String,
    pub cors_origin: String,
    pub heartbeat_interval_secs: u64,
    pub heartbeat_timeout_secs: u64,
    pub connection_buffer: usize,
}


impl RealtimeConfig {

    pub fn new_config(mode: &str) -> Result<Self, ConfigError> {
        //layering the different sources, default values first, overwritten by the mode file and env-vars
        let config = Config::builder()
            .add_source(File::with_name("default.config.toml").required(false))
            .add_source(File::with_name(&format!("{mode}.config.toml")).required(false))
            .add_source(Environment::default())
            .build()?;
        config.try_deserialize()
    }

    pub fn run_mode() -> String {
        env::var("RENTALS_MODE").unwrap_or_else(|_| "development".into())
    }

    /// Never zero, the socket loop ticks on it.
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_secs.max(1))
    }

    pub fn heartbeat_timeout(&self) -> Duration {
        Duration::from_secs(self.heartbeat_timeout_secs)
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 5050,
            log_level: "info".to_string(),
            cors_origin: "http://localhost:5173".to_string(),
            heartbeat_interval_secs: 25,
            heartbeat_timeout_secs: 60,
            connection_buffer: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_heartbeat_interval_is_clamped() {
        let config = RealtimeConfig { heartbeat_interval_secs: 0, ..RealtimeConfig::default() };
        assert_eq!(config.heartbeat_interval(), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn clamped_interval_can_drive_a_ticker() {
        let config = RealtimeConfig { heartbeat_interval_secs: 0, ..RealtimeConfig::default() };
        let mut ticker = tokio::time::interval(config.heartbeat_interval());
        ticker.tick().await;
    }
}
