//! Visualization-host link configuration.

use std::time::Duration;

use crate::link::{ReconnectPolicy, WsTransport};

/// Default address of the visualization host
pub const DEFAULT_HOST_URL: &str = "ws://localhost:9980";

/// Socket target and automatic reconnect tuning
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// WebSocket URL of the visualization host
    pub url: String,

    /// Automatic reconnect attempts before manual action is required
    pub max_reconnect_attempts: u32,

    /// Unit of the linear backoff (milliseconds)
    /// Formula: delay(attempt) = reconnect_base_ms * attempt
    pub reconnect_base_ms: u64,

    /// Bound on the TCP connect and on each handshake read/write (milliseconds)
    pub connect_timeout_ms: u64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_HOST_URL.to_string(),
            max_reconnect_attempts: 5,
            reconnect_base_ms: 2000,
            connect_timeout_ms: 3000,
        }
    }
}

impl LinkConfig {
    /// Reconnect policy derived from this configuration
    pub fn policy(&self) -> ReconnectPolicy {
        ReconnectPolicy {
            max_attempts: self.max_reconnect_attempts,
            base_delay: Duration::from_millis(self.reconnect_base_ms),
        }
    }

    /// WebSocket transport honoring the connect timeout
    pub fn transport(&self) -> WsTransport {
        WsTransport::new(Duration::from_millis(self.connect_timeout_ms))
    }

    /// Validate configuration (ws/wss URL, non-zero delay unit and timeout)
    pub fn validate(&self) -> Result<(), String> {
        if !(self.url.starts_with("ws://") || self.url.starts_with("wss://")) {
            return Err(format!(
                "Host URL must start with ws:// or wss://, got {}",
                self.url
            ));
        }
        if self.reconnect_base_ms == 0 {
            return Err("Reconnect base delay must be > 0".to_string());
        }
        if self.connect_timeout_ms == 0 {
            return Err("Connect timeout must be > 0".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_link_config() {
        let config = LinkConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.url, "ws://localhost:9980");

        let policy = config.policy();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.base_delay, Duration::from_millis(2000));
        assert_eq!(config.transport().timeout(), Duration::from_millis(3000));
    }

    #[test]
    fn test_zero_connect_timeout_is_rejected() {
        let config = LinkConfig {
            connect_timeout_ms: 0,
            ..LinkConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_websocket_url_is_rejected() {
        let config = LinkConfig {
            url: "http://localhost:9980".to_string(),
            ..LinkConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
