//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, defaults when absent)
//!     → loader.rs (environment overrides: PORT, TELEGRAM_*, ...)
//!     → validation.rs (semantic checks)
//!     → GatewayServerConfig (validated, immutable)
//!     → handed to the server and observability at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::GatewayServerConfig;
pub use schema::ListenerConfig;
pub use schema::UpstreamConfig;
pub use schema::NotificationConfig;
pub use schema::CorsConfig;
pub use schema::ObservabilityConfig;
