//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to backend:
//!     → connector connect timeout (hyper-util HttpConnector)
//!     → timeouts.rs (deadline on the response headers)
//!     → On failure: surfaced once as 502, never retried
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every upstream call has a deadline
//! - No retries and no circuit breaking: one failed attempt is final
//! - Failures stay inside the request that caused them

pub mod timeouts;

pub use timeouts::{with_deadline, TimedOut};
