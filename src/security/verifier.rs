//! Bearer credential verification.
//!
//! # Responsibilities
//! - Extract the token from `Authorization: Bearer <token>`
//! - Verify the HMAC signature against the shared secret
//! - Reject expired (`exp`) and not-yet-valid (`nbf`) tokens
//! - Hand back the decoded claims
//!
//! # Design Decisions
//! - Stateless: a pure function of the header value and the secret
//! - Every failure collapses into `Unauthenticated`; the reason is only logged
//! - `exp` is optional, but enforced with zero leeway when present

use std::collections::HashSet;

use axum::http::{header, HeaderMap};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{GatewayError, GatewayResult};

/// Authorization scheme accepted by the gateway.
pub const BEARER: &str = "Bearer";

/// Decoded claims set of a verified credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Expiration time (seconds since the epoch).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,

    /// Issued at (seconds since the epoch).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,

    /// Every other claim, untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Verifies bearer credentials against a process-wide secret.
#[derive(Clone)]
pub struct AuthVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl AuthVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.required_spec_claims = HashSet::new();
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.validate_aud = false;

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verify the `Authorization` header of a request.
    pub fn verify_headers(&self, headers: &HeaderMap) -> GatewayResult<Claims> {
        let value = headers
            .get(header::AUTHORIZATION)
            .ok_or(GatewayError::Unauthenticated)?
            .to_str()
            .map_err(|_| GatewayError::Unauthenticated)?;
        self.verify(value)
    }

    /// Verify a raw `Authorization` header value.
    pub fn verify(&self, header_value: &str) -> GatewayResult<Claims> {
        let token = bearer_token(header_value).ok_or_else(|| {
            tracing::debug!("Authorization header is not a bearer credential");
            GatewayError::Unauthenticated
        })?;

        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Bearer credential rejected");
                GatewayError::Unauthenticated
            })
    }
}

impl std::fmt::Debug for AuthVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthVerifier")
            .field("algorithms", &self.validation.algorithms)
            .finish_non_exhaustive()
    }
}

/// Split `Scheme <token>` and return the token when the scheme is `Bearer`.
fn bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.trim().split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case(BEARER) && !token.is_empty() && !token.contains(' ') {
        Some(token)
    } else {
        None
    }
}
