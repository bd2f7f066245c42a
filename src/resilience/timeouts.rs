//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap backend calls with a deadline
//! - Cancel operations cleanly on timeout (the inner future is dropped)
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors until the proxy core
//!   folds them into a 502

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no response within {}s", .0.as_secs_f64())]
pub struct TimedOut(pub Duration);

/// Run `fut`, giving up after `deadline`.
pub async fn with_deadline<F, T>(deadline: Duration, fut: F) -> Result<T, TimedOut>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(deadline, fut)
        .await
        .map_err(|_| TimedOut(deadline))
}
