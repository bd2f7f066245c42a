//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults (auth, products, orders)
//!     → loader.rs (optional TOML file, then .env + environment overrides)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no runtime reconfiguration
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load, ConfigError};
pub use schema::{
    AuthConfig, GatewayConfig, ListenerConfig, LogFormat, ObservabilityConfig, RouteConfig,
    TimeoutConfig,
};
