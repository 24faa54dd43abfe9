//! Credential storage subsystem.
//!
//! # Data Flow
//! ```text
//! user input / CLI flags
//!     → model.rs (GatewayConfig, validated before use)
//!     → store.rs (CredentialStore, serialized under "apiConfig")
//!     → KeyValueStore (FileStore on disk, MemoryStore in-process)
//!
//! On process start:
//!     CredentialStore::load → GatewayConfig → AuthenticatedClient::configure
//! ```
//!
//! # Design Decisions
//! - The store never checks reachability; that belongs to the client probe
//! - Saving overwrites the previous record, no versioning or merge
//! - A record that fails to decode is reported, never treated as absent

pub mod model;
pub mod store;

pub use model::{GatewayConfig, DEFAULT_TIMEOUT_MS};
pub use store::{CredentialStore, FileStore, KeyValueStore, MemoryStore, StoreError, CONFIG_KEY};
