//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → cors.rs (gateway CORS policy, preflight answered here)
//!     → proxy / notification handlers
//! Upstream response
//!     → headers.rs (drop upstream CORS + hop-by-hop headers)
//!     → cors.rs (gateway CORS headers added once)
//! ```

pub mod cors;
pub mod headers;
