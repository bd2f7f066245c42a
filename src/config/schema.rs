//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits so they can be read from a TOML file and
//! printed back out with `--print-config`.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (host, port).
    pub listener: ListenerConfig,

    /// Credential verification settings.
    pub auth: AuthConfig,

    /// Upstream timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Route definitions mapping path prefixes to backends.
    pub routes: Vec<RouteConfig>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            auth: AuthConfig::default(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
            routes: vec![
                RouteConfig::public("auth", "/auth", "http://auth:3000"),
                RouteConfig::protected("products", "/products", "http://product:3001"),
                RouteConfig::protected("orders", "/orders", "http://order:3002"),
            ],
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    /// Port to bind.
    pub port: u16,
}

impl ListenerConfig {
    /// Full bind address in `host:port` form.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3003,
        }
    }
}

/// Credential verification configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Shared HMAC secret used to verify bearer tokens.
    pub jwt_secret: String,

    /// Send the verified `sub` claim to the backend as `x-auth-subject`.
    pub forward_subject: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            forward_subject: true,
        }
    }
}

// Keeps the secret out of logs.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &if self.jwt_secret.is_empty() { "<unset>" } else { "<redacted>" })
            .field("forward_subject", &self.forward_subject)
            .finish()
    }
}

/// Route configuration mapping a path prefix to one backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Route identifier for logging/metrics and `<NAME>_SERVICE_URL` overrides.
    pub name: String,

    /// Path prefix to match (e.g., "/orders").
    pub path_prefix: String,

    /// Backend address (e.g., "http://order:3002").
    pub backend: String,

    /// Require a valid bearer credential before forwarding.
    #[serde(default)]
    pub protected: bool,
}

impl RouteConfig {
    /// A route reachable without credentials.
    pub fn public(name: &str, path_prefix: &str, backend: &str) -> Self {
        Self {
            name: name.to_string(),
            path_prefix: path_prefix.to_string(),
            backend: backend.to_string(),
            protected: false,
        }
    }

    /// A route that requires a valid bearer credential.
    pub fn protected(name: &str, path_prefix: &str, backend: &str) -> Self {
        Self {
            protected: true,
            ..Self::public(name, path_prefix, backend)
        }
    }
}

/// Timeout configuration for upstream calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Time allowed for the backend to send response headers, in seconds.
    pub response_secs: u64,
}

impl TimeoutConfig {
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }

    pub fn response(&self) -> Duration {
        Duration::from_secs(self.response_secs)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            response_secs: 30,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "edge_gateway=info,tower_http=info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_topology() {
        let config = GatewayConfig::default();
        assert_eq!(config.listener.bind_address(), "0.0.0.0:3003");

        let prefixes: Vec<_> = config.routes.iter().map(|r| r.path_prefix.as_str()).collect();
        assert_eq!(prefixes, ["/auth", "/products", "/orders"]);
        assert!(!config.routes[0].protected);
        assert!(config.routes[1].protected && config.routes[2].protected);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [listener]
            port = 8080

            [[routes]]
            name = "users"
            path_prefix = "/users"
            backend = "http://users:4000"
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.host, "0.0.0.0");
        assert_eq!(config.listener.port, 8080);
        assert_eq!(config.timeouts.connect_secs, 5);
        assert_eq!(config.routes.len(), 1);
        assert!(!config.routes[0].protected);
    }

    #[test]
    fn debug_redacts_secret() {
        let auth = AuthConfig {
            jwt_secret: "hunter2".into(),
            forward_subject: true,
        };
        let printed = format!("{:?}", auth);
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("<redacted>"));
    }
}
