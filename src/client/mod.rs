//! Authenticated client subsystem (client-resident mode).
//!
//! # Data Flow
//! ```text
//! GatewayConfig (from credentials store or user input)
//!     → authenticated.rs (configure, probe, request)
//!     → auth.rs (Basic header + content negotiation, per request)
//!     → upstream API
//!     → error.rs (non-2xx / transport / decode → UniformError)
//! ```
//!
//! # Design Decisions
//! - Caller-owned client instance, no process-wide singleton
//! - Timeouts are ordinary connectivity failures
//! - session.rs persists a config only after a successful probe

pub mod auth;
pub mod authenticated;
pub mod error;
pub mod session;

pub use authenticated::{AuthenticatedClient, QueryPairs, PROBE_PATH};
pub use error::{ErrorKind, UniformError};
pub use session::Session;
