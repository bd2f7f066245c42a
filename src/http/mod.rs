//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, dispatch)
//!     → [routing layer decides backend]
//!     → [security verifies credential on protected routes]
//!     → request.rs (rewrite URI, prepare headers)
//!     → proxy.rs (send upstream, contain failures)
//!     → response.rs (strip hop-by-hop, stream body)
//!     → Send to client
//! ```

pub mod proxy;
pub mod request;
pub mod response;
pub mod server;

pub use proxy::Forwarder;
pub use server::{AppState, HttpServer};
