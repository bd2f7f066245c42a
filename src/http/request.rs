//! Request handling and transformation.
//!
//! # Responsibilities
//! - Rewrite the URI onto the backend (prefix stripped, query kept)
//! - Prepare headers for forwarding
//! - Attach the verified subject when configured
//!
//! # Design Decisions
//! - The inbound body is passed through as a stream, never buffered
//! - Original request is consumed; only the rewritten copy is forwarded
//! - A URI that cannot be rebuilt is the client's fault (400)

use std::net::IpAddr;

use axum::body::Body;
use axum::http::uri::PathAndQuery;
use axum::http::{Request, Uri};

use crate::error::{GatewayError, GatewayResult};
use crate::security::headers;
use crate::security::Claims;

/// Build the backend URI for a forwarded request.
///
/// `forwarded_path` is the inbound path with the route prefix removed. When
/// the backend address carries a base path, the remainder is appended to it.
pub fn upstream_uri(backend: &Uri, forwarded_path: &str, query: Option<&str>) -> GatewayResult<Uri> {
    let base = backend.path().trim_end_matches('/');
    let mut target = String::with_capacity(base.len() + forwarded_path.len() + 1);
    target.push_str(base);
    target.push_str(forwarded_path);
    if let Some(query) = query {
        target.push('?');
        target.push_str(query);
    }

    let path_and_query: PathAndQuery = target
        .parse()
        .map_err(|e| GatewayError::BadRequest(format!("Cannot forward path `{}`: {}", forwarded_path, e)))?;

    let mut parts = backend.clone().into_parts();
    parts.path_and_query = Some(path_and_query);
    Uri::from_parts(parts).map_err(|e| GatewayError::BadRequest(format!("Cannot build upstream URI: {}", e)))
}

/// Turn the inbound request into the request sent to the backend.
pub fn prepare(
    request: Request<Body>,
    uri: Uri,
    client_ip: Option<IpAddr>,
    forward_subject: bool,
) -> Request<Body> {
    let (mut parts, body) = request.into_parts();

    headers::prepare_upstream(&mut parts.headers, client_ip);
    if forward_subject {
        if let Some(subject) = parts.extensions.get::<Claims>().and_then(|c| c.sub.as_deref()) {
            headers::set_subject(&mut parts.headers, subject);
        }
    }

    parts.uri = uri;
    Request::from_parts(parts, body)
}
