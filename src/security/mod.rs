//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Request on a protected route:
//!     → verifier.rs (Bearer credential → Claims | Unauthenticated)
//!     → claims stored in request extensions
//!
//! Every forwarded request:
//!     → headers.rs (strip hop-by-hop, add X-Forwarded-*, trusted subject)
//!     → Pass to the reverse proxy core
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any verification failure
//! - No trust in client input (client-supplied trusted headers are removed)
//! - Protection is a property of the route table, not of the verifier

pub mod headers;
pub mod verifier;

pub use verifier::{AuthVerifier, Claims};
