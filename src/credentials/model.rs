//! Connection settings for the upstream inventory API.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::client::error::UniformError;

/// Timeout applied when a stored record carries none.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Endpoint, identity and secret used for direct upstream calls.
///
/// Field names on the wire match the record layout persisted by earlier
/// clients (`baseURL`, `username`, `password`, `timeout`), so existing
/// saved configurations keep loading.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GatewayConfig {
    /// Base URL of the upstream API, e.g. `https://api.moysklad.ru/api/remap/1.2`.
    #[serde(rename = "baseURL")]
    pub endpoint_base: String,

    /// Login used for basic authentication.
    #[serde(rename = "username")]
    pub identity: String,

    /// Password used for basic authentication.
    #[serde(rename = "password")]
    pub secret: String,

    /// Per-request timeout in milliseconds.
    #[serde(rename = "timeout", default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl GatewayConfig {
    pub fn new(
        endpoint_base: impl Into<String>,
        identity: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            endpoint_base: endpoint_base.into(),
            identity: identity.into(),
            secret: secret.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Check that the config can be used for an authenticated call.
    ///
    /// Runs before any network activity; failures are configuration errors.
    pub fn validate(&self) -> Result<(), UniformError> {
        if self.identity.trim().is_empty() || self.secret.trim().is_empty() {
            return Err(UniformError::configuration(
                "Identity and secret must both be set",
            ));
        }

        let url = url::Url::parse(&self.endpoint_base).map_err(|e| {
            UniformError::configuration(format!(
                "Invalid endpoint '{}': {}",
                self.endpoint_base, e
            ))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UniformError::configuration(format!(
                "Endpoint must use http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.timeout_ms == 0 {
            return Err(UniformError::configuration("Timeout must be greater than zero"));
        }

        Ok(())
    }
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("endpoint_base", &self.endpoint_base)
            .field("identity", &self.identity)
            .field("secret", &"<redacted>")
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::error::ErrorKind;

    fn config() -> GatewayConfig {
        GatewayConfig::new("https://api.example.com/api/remap/1.2", "admin@shop", "hunter2")
    }

    #[test]
    fn test_valid_config() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_empty_credentials_rejected() {
        let mut c = config();
        c.secret = "   ".into();
        let err = c.validate().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);

        let mut c = config();
        c.identity = String::new();
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_bad_endpoint_rejected() {
        let mut c = config();
        c.endpoint_base = "not a url".into();
        assert!(c.validate().is_err());

        c.endpoint_base = "ftp://files.example.com".into();
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(config()).unwrap();
        assert_eq!(json["baseURL"], "https://api.example.com/api/remap/1.2");
        assert_eq!(json["username"], "admin@shop");
        assert_eq!(json["password"], "hunter2");
        assert_eq!(json["timeout"], 30_000);
    }

    #[test]
    fn test_missing_timeout_defaults() {
        let c: GatewayConfig = serde_json::from_str(
            r#"{"baseURL":"https://x.example","username":"u","password":"p"}"#,
        )
        .unwrap();
        assert_eq!(c.timeout_ms, DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let out = format!("{:?}", config());
        assert!(!out.contains("hunter2"));
        assert!(out.contains("<redacted>"));
    }
}
