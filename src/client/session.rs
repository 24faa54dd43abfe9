//! Connect / resume workflow tying the client to the credential store.

use std::sync::Arc;

use crate::client::authenticated::AuthenticatedClient;
use crate::client::error::UniformError;
use crate::credentials::{CredentialStore, GatewayConfig, KeyValueStore, StoreError};

impl From<StoreError> for UniformError {
    fn from(e: StoreError) -> Self {
        UniformError::configuration(e.to_string())
    }
}

/// A client paired with the store its config is persisted in.
pub struct Session<S> {
    client: Arc<AuthenticatedClient>,
    store: CredentialStore<S>,
}

impl<S: KeyValueStore> Session<S> {
    pub fn new(client: Arc<AuthenticatedClient>, store: CredentialStore<S>) -> Self {
        Self { client, store }
    }

    pub fn client(&self) -> &Arc<AuthenticatedClient> {
        &self.client
    }

    pub fn store(&self) -> &CredentialStore<S> {
        &self.store
    }

    /// Apply a new config and persist it only if the probe succeeds.
    ///
    /// Returns the probe result. Invalid configs are rejected before any
    /// network call and leave the current client config untouched.
    pub async fn connect(&self, config: GatewayConfig) -> Result<bool, UniformError> {
        config.validate()?;
        self.client.configure(config.clone());

        let connected = self.client.probe().await;
        if connected {
            self.store.save(&config)?;
        } else {
            tracing::warn!(endpoint = %config.endpoint_base, "Not saving config, probe failed");
        }
        Ok(connected)
    }

    /// Load the saved config, apply it and probe.
    ///
    /// `Ok(false)` when nothing was saved or the upstream is unreachable.
    pub async fn resume(&self) -> Result<bool, UniformError> {
        match self.store.load()? {
            Some(config) => {
                self.client.configure(config);
                Ok(self.client.probe().await)
            }
            None => {
                tracing::info!("No saved connection config");
                Ok(false)
            }
        }
    }

    /// Forget the saved config and unconfigure the client.
    pub fn disconnect(&self) -> Result<(), UniformError> {
        self.store.clear()?;
        self.client.reset();
        Ok(())
    }
}
