//! Upstream forwarding.
//!
//! # Responsibilities
//! - Rebuild the outbound request from a fixed header set
//! - Relay the upstream status, headers and body without reinterpretation
//! - Generate a gateway error only when upstream cannot be reached

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::{to_bytes, Body, Bytes},
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use futures_util::StreamExt;
use thiserror::Error;
use tower_http::limit::RequestBodyLimitLayer;

use crate::client::UniformError;
use crate::config::UpstreamConfig;
use crate::http::request::request_id;
use crate::http::response::json_error;
use crate::observability::metrics;
use crate::proxy::rewrite::{is_reserved, upstream_target, PROXY_PREFIX};
use crate::security::headers::filter_response_headers;

pub const UPSTREAM_ACCEPT: &str = "application/json;charset=utf-8";
pub const UPSTREAM_ACCEPT_ENCODING: &str = "gzip";

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("invalid proxy configuration: {0}")]
    Build(String),

    #[error("no upstream target for {0}")]
    Target(String),

    #[error("failed to read request body: {0}")]
    RequestBody(axum::Error),

    #[error("{0}")]
    Upstream(#[from] reqwest::Error),
}

impl ProxyError {
    pub fn to_uniform(&self) -> UniformError {
        UniformError::forwarding(format!("Proxy server error: {self}"))
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let err = self.to_uniform();
        let status = match self {
            ProxyError::RequestBody(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        json_error(status, err.message)
    }
}

/// Relays requests to the configured upstream base.
pub struct UpstreamForwarder {
    http: reqwest::Client,
    base_url: String,
    user_agent: HeaderValue,
    body_limit: usize,
}

impl UpstreamForwarder {
    pub fn new(config: &UpstreamConfig) -> Result<Self, ProxyError> {
        // Compressed upstream bodies are relayed as-is.
        let http = reqwest::Client::builder()
            .no_gzip()
            .build()
            .map_err(|e| ProxyError::Build(e.to_string()))?;
        Self::with_client(http, config)
    }

    pub fn with_client(http: reqwest::Client, config: &UpstreamConfig) -> Result<Self, ProxyError> {
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|_| ProxyError::Build(format!("invalid user agent '{}'", config.user_agent)))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            user_agent,
            body_limit: config.max_request_body_bytes,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn body_limit(&self) -> usize {
        self.body_limit
    }

    /// Outbound header set: fixed identification and negotiation headers,
    /// inbound `Authorization` verbatim, body headers only with a body.
    pub fn outbound_headers(&self, inbound: &HeaderMap, body: Option<&Bytes>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, self.user_agent.clone());
        headers.insert(header::ACCEPT, HeaderValue::from_static(UPSTREAM_ACCEPT));
        headers.insert(
            header::ACCEPT_ENCODING,
            HeaderValue::from_static(UPSTREAM_ACCEPT_ENCODING),
        );
        if let Some(auth) = inbound.get(header::AUTHORIZATION) {
            headers.insert(header::AUTHORIZATION, auth.clone());
        }
        if let Some(body) = body {
            let content_type = inbound
                .get(header::CONTENT_TYPE)
                .cloned()
                .unwrap_or_else(|| HeaderValue::from_static("application/json"));
            headers.insert(header::CONTENT_TYPE, content_type);
            headers.insert(header::CONTENT_LENGTH, HeaderValue::from(body.len()));
        }
        headers
    }

    /// Forward `request` and stream the upstream answer back.
    pub async fn forward(&self, request: Request) -> Result<Response, ProxyError> {
        let start = Instant::now();
        let request_id = request_id(&request).to_string();
        let (parts, body) = request.into_parts();

        let target = upstream_target(&self.base_url, &parts.uri)
            .ok_or_else(|| ProxyError::Target(parts.uri.path().to_string()))?;

        let body = if carries_body(&parts.method) {
            let bytes = to_bytes(body, self.body_limit)
                .await
                .map_err(ProxyError::RequestBody)?;
            (!bytes.is_empty()).then_some(bytes)
        } else {
            None
        };

        tracing::debug!(
            request_id = %request_id,
            method = %parts.method,
            target = %target,
            body_bytes = body.as_ref().map_or(0, Bytes::len),
            "Forwarding request"
        );

        let mut outbound = self
            .http
            .request(parts.method.clone(), &target)
            .headers(self.outbound_headers(&parts.headers, body.as_ref()));
        if let Some(body) = body {
            outbound = outbound.body(body);
        }

        let upstream = match outbound.send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::error!(
                    request_id = %request_id,
                    method = %parts.method,
                    target = %target,
                    error = %e,
                    "Upstream unreachable"
                );
                metrics::record_proxy_failure("connect");
                metrics::record_proxy_request(parts.method.as_str(), 500, start);
                return Err(ProxyError::Upstream(e));
            }
        };

        let status = upstream.status();
        metrics::record_proxy_request(parts.method.as_str(), status.as_u16(), start);
        tracing::debug!(
            request_id = %request_id,
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Upstream responded"
        );

        let headers = filter_response_headers(upstream.headers());
        let stream = upstream.bytes_stream().inspect(move |chunk| {
            if let Err(e) = chunk {
                tracing::error!(request_id = %request_id, error = %e, "Upstream body relay interrupted");
                metrics::record_proxy_failure("stream");
            }
        });

        let mut response = Response::new(Body::from_stream(stream));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Ok(response)
    }
}

impl std::fmt::Debug for UpstreamForwarder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamForwarder")
            .field("base_url", &self.base_url)
            .field("body_limit", &self.body_limit)
            .finish()
    }
}

fn carries_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct ProxyState {
    forwarder: Arc<UpstreamForwarder>,
}

impl ProxyState {
    pub fn new(forwarder: UpstreamForwarder) -> Self {
        Self {
            forwarder: Arc::new(forwarder),
        }
    }

    pub fn forwarder(&self) -> &UpstreamForwarder {
        &self.forwarder
    }
}

/// Catch-all handler for the mirrored prefix.
pub async fn proxy_handler(State(state): State<ProxyState>, request: Request) -> Response {
    if is_reserved(request.uri().path()) {
        return json_error(StatusCode::NOT_FOUND, "Not found");
    }
    match state.forwarder.forward(request).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

/// Routes for the mirrored prefix, without CORS or tracing layers.
pub fn router(state: ProxyState) -> Router {
    let limit = state.forwarder.body_limit();
    Router::new()
        .route(PROXY_PREFIX, any(proxy_handler))
        .route("/api/", any(proxy_handler))
        .route("/api/{*rest}", any(proxy_handler))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(limit))
}
