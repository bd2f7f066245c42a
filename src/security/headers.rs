//! Header manipulation for forwarded traffic.
//!
//! # Responsibilities
//! - Add X-Forwarded-For, X-Forwarded-Proto, X-Forwarded-Host
//! - Strip hop-by-hop headers in both directions
//! - Remove client-supplied trusted headers, set the verified subject
//!
//! # Design Decisions
//! - Preserve original client IP in X-Forwarded-For (appended to any chain)
//! - `x-auth-subject` is only ever written by the gateway
//! - The `Authorization` header itself is forwarded untouched

use std::net::IpAddr;

use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};

/// Header carrying the verified subject to backends.
pub const X_AUTH_SUBJECT: HeaderName = HeaderName::from_static("x-auth-subject");

pub const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");
pub const X_FORWARDED_HOST: HeaderName = HeaderName::from_static("x-forwarded-host");
pub const X_FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");

/// Connection-scoped headers that never cross the gateway.
const HOP_BY_HOP: [HeaderName; 8] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Remove hop-by-hop headers, including any listed in `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in listed.iter().chain(HOP_BY_HOP.iter()) {
        headers.remove(name);
    }
}

/// Prepare inbound headers for the backend.
///
/// Drops hop-by-hop headers, `Host` (the client sets it from the backend URI)
/// and any client-supplied `x-auth-subject`, then records forwarding info.
pub fn prepare_upstream(headers: &mut HeaderMap, client_ip: Option<IpAddr>) {
    let host = headers.remove(header::HOST);
    strip_hop_by_hop(headers);
    headers.remove(X_AUTH_SUBJECT);

    if let Some(ip) = client_ip {
        let chain = match headers.get(X_FORWARDED_FOR).and_then(|v| v.to_str().ok()) {
            Some(existing) => format!("{}, {}", existing, ip),
            None => ip.to_string(),
        };
        if let Ok(value) = HeaderValue::from_str(&chain) {
            headers.insert(X_FORWARDED_FOR, value);
        }
    }
    if let Some(host) = host {
        headers.insert(X_FORWARDED_HOST, host);
    }
    headers.insert(X_FORWARDED_PROTO, HeaderValue::from_static("http"));
}

/// Attach the verified subject, if it is representable as a header value.
pub fn set_subject(headers: &mut HeaderMap, subject: &str) {
    match HeaderValue::from_str(subject) {
        Ok(value) => {
            headers.insert(X_AUTH_SUBJECT, value);
        }
        Err(_) => tracing::debug!("Subject claim is not a valid header value, not forwarded"),
    }
}
