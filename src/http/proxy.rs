//! Reverse proxy core.
//!
//! # Responsibilities
//! - Send the rewritten request to the resolved backend
//! - Stream the backend response back to the caller
//! - Contain every upstream failure in the request that triggered it
//!
//! # Design Decisions
//! - One pooled hyper-util client shared by all requests
//! - Connect timeout on the connector, response-header deadline per request
//! - Each forwarding attempt is its own error boundary: refused, reset or
//!   timed-out upstreams become a 502 for that caller only
//! - No retries
//! - Dropping the returned future (client went away) drops the upstream call

use std::error::Error as StdError;
use std::net::IpAddr;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::config::{AuthConfig, TimeoutConfig};
use crate::error::{GatewayError, GatewayResult};
use crate::http::{request, response};
use crate::resilience::with_deadline;
use crate::routing::RouteMatch;

/// Idle pooled connections are closed after this long.
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

/// Forwards requests to backends.
#[derive(Clone)]
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
    response_timeout: Duration,
    forward_subject: bool,
}

impl Forwarder {
    pub fn new(timeouts: &TimeoutConfig, auth: &AuthConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(timeouts.connect()));
        connector.set_nodelay(true);

        let client = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(POOL_IDLE_TIMEOUT)
            .build(connector);

        Self {
            client,
            response_timeout: timeouts.response(),
            forward_subject: auth.forward_subject,
        }
    }

    /// Forward `req` to the backend of `matched`.
    ///
    /// Backend responses are returned whatever their status; only the
    /// gateway's own failures come back as `Err`.
    pub async fn forward(
        &self,
        req: Request<Body>,
        matched: &RouteMatch<'_>,
        client_ip: Option<IpAddr>,
    ) -> GatewayResult<Response<Body>> {
        let route = matched.route;
        let uri = request::upstream_uri(&route.backend, matched.forwarded_path, req.uri().query())?;

        tracing::debug!(
            route = %route.name,
            method = %req.method(),
            upstream = %uri,
            "Forwarding request"
        );

        let upstream = request::prepare(req, uri, client_ip, self.forward_subject);

        match with_deadline(self.response_timeout, self.client.request(upstream)).await {
            Ok(Ok(res)) => Ok(response::from_upstream(res)),
            Ok(Err(e)) => {
                let message = describe(&e);
                tracing::warn!(
                    route = %route.name,
                    backend = %route.backend,
                    error = %message,
                    "Upstream request failed"
                );
                Err(GatewayError::BadGateway(message))
            }
            Err(elapsed) => {
                tracing::warn!(
                    route = %route.name,
                    backend = %route.backend,
                    timeout = ?elapsed.0,
                    "Upstream request timed out"
                );
                Err(GatewayError::BadGateway(format!("Backend `{}`: {}", route.name, elapsed)))
            }
        }
    }
}

impl std::fmt::Debug for Forwarder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Forwarder")
            .field("response_timeout", &self.response_timeout)
            .field("forward_subject", &self.forward_subject)
            .finish_non_exhaustive()
    }
}

/// Flatten an error and its sources into one line, e.g.
/// `client error (Connect): tcp connect error: Connection refused (os error 111)`.
fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
