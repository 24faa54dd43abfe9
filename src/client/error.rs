//! Uniform error shape surfaced to every caller of the client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure classes, independent of where the failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing or invalid credentials, detected before any network call.
    Configuration,
    /// DNS/TCP/TLS failure or timeout reaching the upstream or provider.
    Connectivity,
    /// Non-2xx response from the upstream.
    Upstream,
    /// Upstream body could not be decoded.
    Protocol,
    /// Failure while relaying, as opposed to a faithfully relayed upstream error.
    ProxyForwarding,
}

/// Every failed call becomes exactly one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct UniformError {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_code: Option<String>,
}

impl UniformError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            http_status: None,
            upstream_code: None,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    pub fn connectivity(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Connectivity, message)
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Protocol, message)
    }

    pub fn forwarding(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ProxyForwarding, message)
    }

    pub fn upstream(status: u16, message: impl Into<String>, code: Option<String>) -> Self {
        Self {
            kind: ErrorKind::Upstream,
            message: message.into(),
            http_status: Some(status),
            upstream_code: code,
        }
    }

    /// Translate a non-2xx upstream response body.
    ///
    /// Structured bodies contribute their message and code; anything else
    /// yields the generic message with the status kept.
    pub fn from_upstream_body(status: u16, body: &[u8]) -> Self {
        match serde_json::from_slice::<ApiErrorBody>(body) {
            Ok(parsed) => match parsed.first_detail() {
                Some(detail) => Self::upstream(status, detail.message(), detail.code_string()),
                None => Self::upstream(status, GENERIC_UPSTREAM_MESSAGE, None),
            },
            Err(_) => Self::upstream(status, GENERIC_UPSTREAM_MESSAGE, None),
        }
    }
}

impl From<reqwest::Error> for UniformError {
    fn from(e: reqwest::Error) -> Self {
        let mut err = if e.is_decode() {
            Self::protocol(format!("Malformed upstream body: {e}"))
        } else if e.is_timeout() {
            Self::connectivity(format!("Request timed out: {e}"))
        } else {
            Self::connectivity(format!("Upstream unreachable: {e}"))
        };
        err.http_status = e.status().map(|s| s.as_u16());
        err
    }
}

const GENERIC_UPSTREAM_MESSAGE: &str = "API Error";

/// Upstream error envelope: `{"error": {...}}` or `{"errors": [{...}]}`.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    error: Option<ApiErrorDetail>,
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
}

impl ApiErrorBody {
    fn first_detail(&self) -> Option<&ApiErrorDetail> {
        self.error
            .as_ref()
            .filter(|d| d.error.is_some())
            .or_else(|| self.errors.iter().find(|d| d.error.is_some()))
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

impl ApiErrorDetail {
    fn message(&self) -> String {
        self.error
            .clone()
            .unwrap_or_else(|| GENERIC_UPSTREAM_MESSAGE.to_string())
    }

    fn code_string(&self) -> Option<String> {
        match self.code.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}
