//! Gateway error taxonomy.
//!
//! Every failure the gateway itself produces maps to exactly one status code
//! and a JSON body of the form:
//!
//! ```json
//! { "error": "Bad gateway", "code": "bad_gateway", "message": "connection refused" }
//! ```
//!
//! Errors returned by a backend are not represented here; they pass through
//! unmodified.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Missing, malformed, forged or expired credential. The cause is never
    /// exposed to the caller.
    #[error("Unauthorized")]
    Unauthenticated,

    /// No registered prefix covers the path.
    #[error("No route matches `{0}`")]
    RouteNotFound(String),

    /// The backend could not be reached or did not answer in time.
    #[error("{0}")]
    BadGateway(String),

    /// The inbound request cannot be forwarded as given.
    #[error("{0}")]
    BadRequest(String),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Unauthenticated => StatusCode::UNAUTHORIZED,
            GatewayError::RouteNotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Stable machine-readable identifier.
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::Unauthenticated => "unauthenticated",
            GatewayError::RouteNotFound(_) => "route_not_found",
            GatewayError::BadGateway(_) => "bad_gateway",
            GatewayError::BadRequest(_) => "bad_request",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            GatewayError::Unauthenticated => "Unauthorized",
            GatewayError::RouteNotFound(_) => "Not found",
            GatewayError::BadGateway(_) => "Bad gateway",
            GatewayError::BadRequest(_) => "Bad request",
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: &'static str,
    pub code: &'static str,
    pub message: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.title(),
            code: self.code(),
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
