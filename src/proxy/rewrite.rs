//! Mapping of local `/api` paths onto the upstream base URL.

use axum::http::Uri;

/// Local prefix mirrored onto the upstream base.
pub const PROXY_PREFIX: &str = "/api";

/// Sub-path owned by the gateway itself; never relayed.
pub const RESERVED_PREFIX: &str = "/api/telegram/";

pub fn is_reserved(path: &str) -> bool {
    path.starts_with(RESERVED_PREFIX)
}

/// Build the absolute upstream URL for `uri`.
///
/// The `/api` prefix is replaced by `base`; the remaining path and the
/// raw query string are kept byte-for-byte. Returns `None` for paths
/// outside the prefix.
pub fn upstream_target(base: &str, uri: &Uri) -> Option<String> {
    let rest = uri.path().strip_prefix(PROXY_PREFIX)?;
    if !rest.is_empty() && !rest.starts_with('/') {
        return None;
    }

    let mut target = String::with_capacity(base.len() + rest.len() + 16);
    target.push_str(base.trim_end_matches('/'));
    target.push_str(rest);
    if let Some(query) = uri.query() {
        target.push('?');
        target.push_str(query);
    }
    Some(target)
}
