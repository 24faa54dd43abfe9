//! Authorization and content-negotiation headers for direct upstream calls.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING, AUTHORIZATION, CONTENT_TYPE};

use crate::client::error::UniformError;
use crate::credentials::GatewayConfig;

/// `Basic base64(identity:secret)`.
pub fn basic_authorization(identity: &str, secret: &str) -> String {
    let encoded = STANDARD.encode(format!("{identity}:{secret}"));
    format!("Basic {encoded}")
}

/// Build the full header set for one outbound call.
///
/// Called per request so a reconfiguration is picked up by the next call.
pub fn request_headers(config: &GatewayConfig) -> Result<HeaderMap, UniformError> {
    let auth = basic_authorization(&config.identity, &config.secret);
    let auth = HeaderValue::from_str(&auth).map_err(|_| {
        UniformError::configuration("Credentials contain characters not allowed in a header")
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, auth);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_encoding() {
        // RFC 7617 example.
        assert_eq!(
            basic_authorization("Aladdin", "open sesame"),
            "Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ=="
        );
    }

    #[test]
    fn test_request_headers() {
        let config = GatewayConfig::new("https://api.example.com", "admin@shop", "pw");
        let headers = request_headers(&config).unwrap();
        assert_eq!(
            headers[AUTHORIZATION],
            basic_authorization("admin@shop", "pw").as_str()
        );
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[ACCEPT_ENCODING], "gzip");
    }

    #[test]
    fn test_newline_in_identity_is_encoded() {
        let config = GatewayConfig::new("https://api.example.com", "line\nbreak", "pw");
        let headers = request_headers(&config).unwrap();
        assert!(!headers[AUTHORIZATION].to_str().unwrap().contains('\n'));
    }
}
