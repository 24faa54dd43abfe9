//! Authenticated HTTP client for direct upstream calls.
//!
//! # Responsibilities
//! - Hold the current connection config (swappable at any time)
//! - Derive the authorization header per request from that config
//! - Enforce the configured timeout
//! - Translate every failure into a [`UniformError`]
//!
//! # Design Decisions
//! - No retries; each failure is returned to the caller once
//! - The config is swapped atomically; in-flight requests keep the
//!   snapshot they started with, later requests see the new one

use arc_swap::ArcSwapOption;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::client::auth::request_headers;
use crate::client::error::UniformError;
use crate::credentials::GatewayConfig;

/// Cheap, always-present upstream resource used for the connectivity probe.
pub const PROBE_PATH: &str = "entity/organization";

/// Query parameters as ordered name/value pairs.
pub type QueryPairs = Vec<(&'static str, String)>;

pub struct AuthenticatedClient {
    http: reqwest::Client,
    config: ArcSwapOption<GatewayConfig>,
    connected: AtomicBool,
}

impl AuthenticatedClient {
    /// Create an unconfigured client.
    pub fn new() -> Result<Self, UniformError> {
        let http = reqwest::Client::builder().build().map_err(|e| {
            UniformError::configuration(format!("Failed to initialise HTTP transport: {e}"))
        })?;
        Ok(Self::with_http_client(http))
    }

    /// Create an unconfigured client over an existing transport.
    pub fn with_http_client(http: reqwest::Client) -> Self {
        Self {
            http,
            config: ArcSwapOption::empty(),
            connected: AtomicBool::new(false),
        }
    }

    /// Replace the in-memory config. Does not check reachability.
    ///
    /// Any reconfiguration invalidates the connected status until the next
    /// successful [`probe`](Self::probe).
    pub fn configure(&self, config: GatewayConfig) {
        tracing::info!(
            endpoint = %config.endpoint_base,
            timeout_ms = config.timeout_ms,
            "Client configured"
        );
        self.config.store(Some(Arc::new(config)));
        self.connected.store(false, Ordering::SeqCst);
    }

    /// Drop the config; later requests fail with a configuration error.
    pub fn reset(&self) {
        self.config.store(None);
        self.connected.store(false, Ordering::SeqCst);
    }

    pub fn config(&self) -> Option<Arc<GatewayConfig>> {
        self.config.load_full()
    }

    /// Result of the last probe since the last reconfiguration.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Issue a minimal read-only call; true only on a 2xx response.
    ///
    /// The result applies to the config the probe started with. If the
    /// client is reconfigured while the probe is in flight, the new config
    /// stays unconnected and the probe reports `false`.
    pub async fn probe(&self) -> bool {
        let Some(snapshot) = self.config.load_full() else {
            tracing::warn!("Connection probe skipped, client is not configured");
            self.connected.store(false, Ordering::SeqCst);
            return false;
        };

        let ok = match self
            .send_with::<()>(&snapshot, Method::GET, PROBE_PATH, Vec::new(), None)
            .await
        {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(kind = ?e.kind, error = %e, "Connection probe failed");
                false
            }
        };

        // Publish first, then confirm the checked config is still current;
        // a configure() racing past this point resets the flag itself.
        self.connected.store(ok, Ordering::SeqCst);
        if !self.is_current(&snapshot) {
            self.connected.store(false, Ordering::SeqCst);
            tracing::debug!(
                endpoint = %snapshot.endpoint_base,
                "Probe result discarded, config changed while probing"
            );
            return false;
        }
        ok
    }

    fn is_current(&self, snapshot: &Arc<GatewayConfig>) -> bool {
        self.config
            .load()
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, snapshot))
    }

    /// Perform a call and decode the JSON response body.
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        query: QueryPairs,
        body: Option<&B>,
    ) -> Result<T, UniformError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(method, path, query, body).await?;
        let bytes = response.bytes().await.map_err(UniformError::from)?;
        serde_json::from_slice(&bytes)
            .map_err(|e| UniformError::protocol(format!("Malformed upstream body: {e}")))
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: QueryPairs,
    ) -> Result<T, UniformError> {
        self.request::<T, ()>(Method::GET, path, query, None).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, UniformError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Vec::new(), Some(body)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, UniformError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, Vec::new(), Some(body)).await
    }

    /// DELETE whose success response carries no body worth decoding.
    pub async fn delete(&self, path: &str) -> Result<(), UniformError> {
        self.send::<()>(Method::DELETE, path, Vec::new(), None).await?;
        Ok(())
    }

    async fn send<B>(
        &self,
        method: Method,
        path: &str,
        query: QueryPairs,
        body: Option<&B>,
    ) -> Result<reqwest::Response, UniformError>
    where
        B: Serialize + ?Sized,
    {
        // Snapshot the config once; the header below is derived from it.
        let config = self
            .config
            .load_full()
            .ok_or_else(|| UniformError::configuration("Client is not configured"))?;
        self.send_with(&config, method, path, query, body).await
    }

    async fn send_with<B>(
        &self,
        config: &GatewayConfig,
        method: Method,
        path: &str,
        query: QueryPairs,
        body: Option<&B>,
    ) -> Result<reqwest::Response, UniformError>
    where
        B: Serialize + ?Sized,
    {
        config.validate()?;

        let url = join_url(&config.endpoint_base, path);
        let mut builder = self
            .http
            .request(method.clone(), &url)
            .headers(request_headers(config)?)
            .timeout(config.timeout());
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        if let Some(body) = body {
            let encoded = serde_json::to_vec(body)
                .map_err(|e| UniformError::protocol(format!("Failed to encode body: {e}")))?;
            builder = builder.body(encoded);
        }

        tracing::debug!(method = %method, url = %url, "Upstream request");

        let response = builder.send().await.map_err(|e| {
            tracing::warn!(method = %method, url = %url, error = %e, "Upstream unreachable");
            UniformError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let err = UniformError::from_upstream_body(status.as_u16(), &body);
            tracing::warn!(
                method = %method,
                url = %url,
                status = status.as_u16(),
                error = %err,
                "Upstream returned an error"
            );
            return Err(err);
        }

        Ok(response)
    }
}

impl std::fmt::Debug for AuthenticatedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedClient")
            .field("config", &self.config.load_full())
            .field("connected", &self.is_connected())
            .finish()
    }
}

/// Join the configured base and a resource path with exactly one slash.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{path}")
    }
}
