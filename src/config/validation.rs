//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the route table: well-formed, unique prefixes, valid backends
//! - Validate value ranges (timeouts > 0)
//! - Require a secret whenever a route is protected
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use axum::http::Uri;
use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::health::HEALTH_PATH;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("route `{route}`: path prefix `{prefix}` must start with '/' and must not end with '/'")]
    MalformedPrefix { route: String, prefix: String },

    #[error("route `{route}`: path prefix `{prefix}` is already claimed by another route")]
    DuplicatePrefix { route: String, prefix: String },

    #[error("route `{route}`: path prefix `{prefix}` would shadow the health endpoint")]
    ShadowsHealth { route: String, prefix: String },

    #[error("route `{route}`: backend `{backend}` is not an absolute http URI ({reason})")]
    InvalidBackend {
        route: String,
        backend: String,
        reason: String,
    },

    #[error("timeout `{0}` must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("JWT secret is required because route `{0}` is protected")]
    MissingSecret(String),

    #[error("no routes configured")]
    NoRoutes,
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.routes.is_empty() {
        errors.push(ValidationError::NoRoutes);
    }

    let mut seen = HashSet::new();
    for route in &config.routes {
        let prefix = route.path_prefix.as_str();

        if !prefix.starts_with('/') || prefix.len() < 2 || prefix.ends_with('/') {
            errors.push(ValidationError::MalformedPrefix {
                route: route.name.clone(),
                prefix: prefix.to_string(),
            });
        } else if !seen.insert(prefix) {
            errors.push(ValidationError::DuplicatePrefix {
                route: route.name.clone(),
                prefix: prefix.to_string(),
            });
        }

        if HEALTH_PATH == prefix || HEALTH_PATH.starts_with(&format!("{}/", prefix)) {
            errors.push(ValidationError::ShadowsHealth {
                route: route.name.clone(),
                prefix: prefix.to_string(),
            });
        }

        if let Err(reason) = check_backend(&route.backend) {
            errors.push(ValidationError::InvalidBackend {
                route: route.name.clone(),
                backend: route.backend.clone(),
                reason,
            });
        }
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_secs"));
    }
    if config.timeouts.response_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("response_secs"));
    }

    if config.auth.jwt_secret.is_empty() {
        if let Some(route) = config.routes.iter().find(|r| r.protected) {
            errors.push(ValidationError::MissingSecret(route.name.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_backend(backend: &str) -> Result<(), String> {
    let uri: Uri = backend.parse().map_err(|e| format!("{}", e))?;
    match uri.scheme_str() {
        Some("http") => {}
        Some(other) => return Err(format!("unsupported scheme `{}`", other)),
        None => return Err("missing scheme".to_string()),
    }
    if uri.authority().is_none() {
        return Err("missing host".to_string());
    }
    if uri.query().is_some() {
        return Err("query strings are not allowed".to_string());
    }
    Ok(())
}
