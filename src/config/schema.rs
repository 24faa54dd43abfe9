//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway
//! server. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream inventory API the `/api` prefix mirrors.
    pub upstream: UpstreamConfig,

    /// Messaging provider for the notification side-channel.
    pub notification: NotificationConfig,

    /// Cross-origin policy applied by the gateway itself.
    pub cors: CorsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3001").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3001".to_string(),
        }
    }
}

/// Upstream API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL substituted for the local `/api` prefix.
    pub base_url: String,

    /// Identification header sent with every forwarded request.
    pub user_agent: String,

    /// Largest inbound request body accepted for forwarding.
    pub max_request_body_bytes: usize,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.moysklad.ru/api/remap/1.2".to_string(),
            user_agent: concat!("inventory-gateway/", env!("CARGO_PKG_VERSION")).to_string(),
            max_request_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Messaging provider (Telegram Bot API) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Provider API root.
    pub api_base: String,

    /// Bot token; unset or placeholder disables delivery.
    pub bot_token: Option<String>,

    /// Numeric target chat; unset or placeholder disables delivery.
    pub chat_id: Option<String>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.telegram.org".to_string(),
            bot_token: None,
            chat_id: None,
        }
    }
}

/// Gateway CORS policy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins; empty allows any origin.
    pub allowed_origins: Vec<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format ("pretty" or "json").
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayServerConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:3001");
        assert_eq!(config.upstream.base_url, "https://api.moysklad.ru/api/remap/1.2");
        assert!(config.upstream.user_agent.starts_with("inventory-gateway/"));
        assert!(config.notification.bot_token.is_none());
        assert!(config.cors.allowed_origins.is_empty());
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_partial_toml() {
        let config: GatewayServerConfig = toml::from_str(
            r#"
            [upstream]
            base_url = "http://localhost:4000/api/remap/1.2"

            [notification]
            bot_token = "123:abc"
            chat_id = "42"
            "#,
        )
        .unwrap();
        assert_eq!(config.upstream.base_url, "http://localhost:4000/api/remap/1.2");
        assert_eq!(config.upstream.max_request_body_bytes, 2 * 1024 * 1024);
        assert_eq!(config.notification.chat_id.as_deref(), Some("42"));
        assert_eq!(config.notification.api_base, "https://api.telegram.org");
        assert_eq!(config.listener.bind_address, "0.0.0.0:3001");
    }
}
