//! Inventory gateway library.
//!
//! Two independent ways of reaching the upstream inventory API:
//! - client-resident: [`credentials`] + [`client`] + [`catalog`] talk to the
//!   upstream directly with stored basic-auth credentials
//! - server-resident: [`http::GatewayServer`] mirrors `/api/*` onto the
//!   upstream ([`proxy`]) and exposes the [`notify`] side-channel

// Client-resident mode
pub mod catalog;
pub mod client;
pub mod credentials;

// Server-resident mode
pub mod config;
pub mod http;
pub mod notify;
pub mod proxy;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use catalog::Catalog;
pub use client::{AuthenticatedClient, ErrorKind, Session, UniformError};
pub use config::GatewayServerConfig;
pub use credentials::{CredentialStore, GatewayConfig};
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
