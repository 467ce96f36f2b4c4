use std::time::Duration;
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct ClientConfig {
    pub url: String,
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
    /// `None` keeps retrying until `disconnect` is called.
    #[serde(default)]
    pub max_reconnect_attempts: Option<u32>,
}

fn default_initial_backoff_ms() -> u64 {
    500
}

fn default_max_backoff_ms() -> u64 {
    5_000
}

impl ClientConfig {

    pub fn new(url: impl Into<String>) -> Self {
        ClientConfig {
            url: url.into(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            max_reconnect_attempts: None,
        }
    }

    /// Exponential delay before reconnect attempt `attempt` (1-based), capped at `max_backoff_ms`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let delay = self.initial_backoff_ms.saturating_mul(1u64 << exponent);
        Duration::from_millis(delay.min(self.max_backoff_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_until_the_cap() {
        let config = ClientConfig { initial_backoff_ms: 100, max_backoff_ms: 1_000, ..ClientConfig::new("ws://localhost") };
        let delays: Vec<u64> = (1..=6).map(|attempt| config.backoff(attempt).as_millis() as u64).collect();
        assert_eq!(delays, vec![100, 200, 400, 800, 1_000, 1_000]);
        assert_eq!(config.backoff(u32::MAX), Duration::from_millis(1_000));
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config: ClientConfig = serde_json::from_str(r#"{"url":"ws://localhost:5050/api/ws"}"#).unwrap();
        assert_eq!(config.initial_backoff_ms, 500);
        assert_eq!(config.max_backoff_ms, 5_000);
        assert!(config.max_reconnect_attempts.is_none());
    }
}
