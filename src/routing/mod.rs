//! Routing subsystem (the backend registry).
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → router.rs (route lookup)
//!     → matcher.rs (segment-aware prefix match + strip)
//!     → Return: RouteMatch { route, forwarded_path } or RouteNotFound
//!
//! Route Compilation (at startup):
//!     RouteConfig[]
//!     → Parse backend URIs
//!     → Sort by prefix length (longest first)
//!     → Freeze as immutable Router
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same route

pub mod matcher;
pub mod router;

pub use matcher::PathPrefixMatcher;
pub use router::{Route, RouteMatch, Router};
