//! Client key extraction for rate limiting.

use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Determines the key a client's quota is tracked under.
///
/// Uses the peer socket IP. When `behind_proxy` is set, the first address of
/// `X-Forwarded-For` (or else `X-Real-IP`) wins, provided it parses as an IP;
/// anything else falls back to the peer address.
///
/// Enable `behind_proxy` only when a trusted reverse proxy sets these
/// headers, otherwise clients can pick their own quota key.
pub fn client_key(headers: &HeaderMap, peer: SocketAddr, behind_proxy: bool) -> String {
    if behind_proxy && let Some(ip) = forwarded_ip(headers) {
        return ip.to_string();
    }

    peer.ip().to_string()
}

fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let from_forwarded_for = headers
        .get(X_FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse().ok());

    from_forwarded_for.or_else(|| {
        headers
            .get(X_REAL_IP)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
    })
}
