//! Header manipulation for relayed responses.
//!
//! # Responsibilities
//! - Strip upstream CORS headers (the gateway applies its own policy)
//! - Strip hop-by-hop headers
//! - Keep everything else, including repeated values, in order

use axum::http::{HeaderMap, HeaderName};

/// Prefix shared by every CORS response header.
pub const CORS_HEADER_PREFIX: &str = "access-control-";

/// Connection-scoped headers that never cross a proxy.
pub const HOP_BY_HOP_HEADERS: [&str; 7] = [
    "connection",
    "keep-alive",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

pub fn is_cors_header(name: &str) -> bool {
    name.len() >= CORS_HEADER_PREFIX.len()
        && name.as_bytes()[..CORS_HEADER_PREFIX.len()]
            .eq_ignore_ascii_case(CORS_HEADER_PREFIX.as_bytes())
}

pub fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP_HEADERS
        .iter()
        .any(|h| h.eq_ignore_ascii_case(name))
}

/// Denylist predicate applied to every upstream response header.
pub fn is_forwardable_response_header(name: &HeaderName) -> bool {
    let name = name.as_str();
    !is_cors_header(name) && !is_hop_by_hop(name)
}

/// Copy the forwardable subset of `upstream` into a fresh map.
pub fn filter_response_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(upstream.len());
    for (name, value) in upstream.iter() {
        if is_forwardable_response_header(name) {
            out.append(name.clone(), value.clone());
        }
    }
    out
}
