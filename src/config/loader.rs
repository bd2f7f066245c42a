//! Configuration loading from disk and environment.

use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::config::schema::{GatewayConfig, LogFormat};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid {name}: {reason}")]
    Env { name: String, reason: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load the effective configuration: defaults, then the optional TOML file,
/// then environment overrides (including a `.env` file when present).
pub fn load(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    // A missing .env file is not an error.
    let _ = dotenvy::dotenv();
    load_with(path, |name| env::var(name).ok())
}

fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<GatewayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => read_file(path)?,
        None => GatewayConfig::default(),
    };
    apply_env_overrides(&mut config, lookup)?;

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn read_file(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Apply environment overrides on top of `config`.
///
/// `lookup` resolves a variable name to its value; `load` passes the process
/// environment.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(host) = get("HOST") {
        config.listener.host = host;
    }
    if let Some(port) = get("PORT") {
        config.listener.port = parse_value("PORT", &port)?;
    }

    if let Some(secret) = lookup("JWT_SECRET").filter(|v| !v.is_empty()) {
        config.auth.jwt_secret = secret;
    }
    if let Some(flag) = get("FORWARD_AUTH_SUBJECT") {
        config.auth.forward_subject = parse_value("FORWARD_AUTH_SUBJECT", &flag)?;
    }

    for route in &mut config.routes {
        let name = service_url_var(&route.name);
        if let Some(backend) = get(&name) {
            route.backend = backend;
        }
    }

    if let Some(secs) = get("UPSTREAM_CONNECT_TIMEOUT_SECS") {
        config.timeouts.connect_secs = parse_value("UPSTREAM_CONNECT_TIMEOUT_SECS", &secs)?;
    }
    if let Some(secs) = get("UPSTREAM_RESPONSE_TIMEOUT_SECS") {
        config.timeouts.response_secs = parse_value("UPSTREAM_RESPONSE_TIMEOUT_SECS", &secs)?;
    }

    if let Some(format) = get("LOG_FORMAT") {
        config.observability.log_format = match format.to_ascii_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            other => {
                return Err(ConfigError::Env {
                    name: "LOG_FORMAT".into(),
                    reason: format!("expected `pretty` or `json`, got `{}`", other),
                })
            }
        };
    }
    if let Some(addr) = get("METRICS_ADDRESS") {
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = addr;
    }

    Ok(())
}

/// Environment variable overriding a route's backend, e.g. `ORDERS_SERVICE_URL`.
pub fn service_url_var(route_name: &str) -> String {
    let name: String = route_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect();
    format!("{}_SERVICE_URL", name)
}

fn parse_value<T>(name: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Env {
        name: name.to_string(),
        reason: e.to_string(),
    })
}
