//! Response handling and transformation.
//!
//! # Responsibilities
//! - Transform backend response for client
//! - Remove hop-by-hop headers
//! - Handle response streaming efficiently
//!
//! # Design Decisions
//! - Streaming responses avoid buffering entire body
//! - Backend status codes are never rewritten
//! - Gateway-synthesized errors live in `crate::error`, not here

use axum::body::Body;
use axum::http::Response;
use hyper::body::Incoming;

use crate::security::headers::strip_hop_by_hop;

/// Convert a backend response into the response sent to the client.
pub fn from_upstream(response: Response<Incoming>) -> Response<Body> {
    let (mut parts, body) = response.into_parts();
    strip_hop_by_hop(&mut parts.headers);
    Response::from_parts(parts, Body::new(body))
}
