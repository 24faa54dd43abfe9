//! Configuration loading from disk and environment.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use crate::config::schema::GatewayServerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    InvalidEnv { var: &'static str, value: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::InvalidEnv { var, value } => {
                write!(f, "Invalid value for {}: '{}'", var, value)
            }
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Resolve the effective configuration: file (or defaults), then process
/// environment, then validation.
pub fn load(path: Option<&Path>) -> Result<GatewayServerConfig, ConfigError> {
    load_with(path, |var| std::env::var(var).ok())
}

/// [`load`] with environment variables read through `lookup`.
pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<GatewayServerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let config = match path {
        Some(path) => read_file(path)?,
        None => GatewayServerConfig::default(),
    };

    let config = apply_env_overrides(config, lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn read_file(path: &Path) -> Result<GatewayServerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// Apply environment overrides using `lookup` to read variables.
///
/// | Variable | Field |
/// |---|---|
/// | `PORT` | port of `listener.bind_address` |
/// | `GATEWAY_UPSTREAM_URL` | `upstream.base_url` |
/// | `TELEGRAM_BOT_TOKEN` | `notification.bot_token` |
/// | `TELEGRAM_CHAT_ID` | `notification.chat_id` |
/// | `TELEGRAM_API_BASE` | `notification.api_base` |
pub fn apply_env_overrides<F>(
    mut config: GatewayServerConfig,
    lookup: F,
) -> Result<GatewayServerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("PORT") {
        let port: u16 = port.trim().parse().map_err(|_| ConfigError::InvalidEnv {
            var: "PORT",
            value: port.clone(),
        })?;
        config.listener.bind_address = match config.listener.bind_address.parse::<SocketAddr>() {
            Ok(mut addr) => {
                addr.set_port(port);
                addr.to_string()
            }
            Err(_) => format!("0.0.0.0:{port}"),
        };
    }

    if let Some(url) = lookup("GATEWAY_UPSTREAM_URL") {
        config.upstream.base_url = url;
    }
    if let Some(token) = lookup("TELEGRAM_BOT_TOKEN") {
        config.notification.bot_token = Some(token);
    }
    if let Some(chat_id) = lookup("TELEGRAM_CHAT_ID") {
        config.notification.chat_id = Some(chat_id);
    }
    if let Some(api_base) = lookup("TELEGRAM_API_BASE") {
        config.notification.api_base = api_base;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn test_port_override_keeps_host() {
        let mut base = GatewayServerConfig::default();
        base.listener.bind_address = "127.0.0.1:3001".into();
        let config = apply_env_overrides(base, env(&[("PORT", "8088")])).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:8088");
    }

    #[test]
    fn test_bad_port_rejected() {
        let result = apply_env_overrides(GatewayServerConfig::default(), env(&[("PORT", "http")]));
        assert!(matches!(result, Err(ConfigError::InvalidEnv { var: "PORT", .. })));
    }

    #[test]
    fn test_telegram_overrides() {
        let config = apply_env_overrides(
            GatewayServerConfig::default(),
            env(&[("TELEGRAM_BOT_TOKEN", "123:abc"), ("TELEGRAM_CHAT_ID", "42")]),
        )
        .unwrap();
        assert_eq!(config.notification.bot_token.as_deref(), Some("123:abc"));
        assert_eq!(config.notification.chat_id.as_deref(), Some("42"));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[listener]\nbind_address = \"127.0.0.1:4000\"\n\n[cors]\nallowed_origins = [\"https://shop.example\"]"
        )
        .unwrap();

        let config = load_with(Some(file.path()), env(&[])).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:4000");
        assert_eq!(config.cors.allowed_origins, vec!["https://shop.example"]);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[listener]\nbind_address = \"127.0.0.1:4000\"").unwrap();

        let config = load_with(Some(file.path()), env(&[("PORT", "5000")])).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:5000");
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[upstream]\nmax_request_body_bytes = 0").unwrap();
        assert!(matches!(
            load_with(Some(file.path()), env(&[])),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load(Some(&dir.path().join("absent.toml"))),
            Err(ConfigError::Io(_))
        ));
    }
}
