//! Reverse proxy gateway.
//!
//! # Data Flow
//! ```text
//! ANY /api/* (inbound)
//!     → rewrite.rs (reserved sub-path check, /api → upstream base)
//!     → forward.rs (fixed outbound headers, bounded body buffer)
//!     → upstream API
//!     → forward.rs (status mirrored, body streamed untouched)
//!     → security/headers.rs (upstream CORS + hop-by-hop headers dropped)
//!     → client
//! ```
//!
//! # Design Decisions
//! - Upstream statuses and bodies are relayed verbatim, errors included
//! - The gateway speaks only when upstream is unreachable (500)
//! - No retries; a dropped client cancels the upstream call

pub mod forward;
pub mod rewrite;

pub use forward::{router, ProxyError, ProxyState, UpstreamForwarder};
pub use rewrite::{is_reserved, upstream_target, PROXY_PREFIX, RESERVED_PREFIX};
