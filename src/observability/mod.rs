//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty for development, JSON for production)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured logging for machine parsing
//! - Request ID (x-request-id) flows from client to backend and back
//! - Metrics are cheap to record and no-ops when no exporter is installed

pub mod logging;
pub mod metrics;
