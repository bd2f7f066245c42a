//! Edge gateway library.
//!
//! Authenticates and routes HTTP traffic to a fixed set of backend services,
//! stripping the route prefix and isolating callers from backend failures.

// Core subsystems
pub mod config;
pub mod error;
pub mod http;
pub mod routing;

// Request gating
pub mod health;
pub mod security;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
