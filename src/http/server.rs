//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the health endpoint and the gateway handler
//! - Wire up middleware (request ID, tracing, panic containment)
//! - Bind server to listener, shut down gracefully
//! - Dispatch requests: registry lookup → credential check → forward
//! - Observability (metrics, correlation IDs)

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{any, get},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::validation::validate_config;
use crate::config::{ConfigError, GatewayConfig};
use crate::error::GatewayError;
use crate::health::{self, HEALTH_PATH};
use crate::http::proxy::Forwarder;
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::routing::Router as ProxyRouter;
use crate::security::AuthVerifier;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ProxyRouter>,
    pub verifier: Arc<AuthVerifier>,
    pub forwarder: Forwarder,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// The configuration is validated first; an invalid route table or a
    /// missing secret is a startup error.
    pub fn new(config: GatewayConfig) -> Result<Self, ConfigError> {
        validate_config(&config).map_err(ConfigError::Validation)?;

        let proxy_router = ProxyRouter::from_config(&config.routes)
            .map_err(|e| ConfigError::Validation(vec![e]))?;

        let state = AppState {
            router: Arc::new(proxy_router),
            verifier: Arc::new(AuthVerifier::new(&config.auth.jwt_secret)),
            forwarder: Forwarder::new(&config.timeouts, &config.auth),
        };

        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route(HEALTH_PATH, get(health::liveness).fallback(unmatched))
            .route("/", any(gateway_handler))
            .route("/{*path}", any(gateway_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(middleware::from_fn(track_metrics))
                    .layer(CatchPanicLayer::new()),
            )
    }

    /// The assembled application, for serving on a custom transport.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.config.routes.len(),
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown::recv(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Route label attached to responses for metrics; absent means `none`.
#[derive(Debug, Clone)]
pub struct RouteLabel(pub String);

/// Main gateway handler.
/// Looks up the route, checks the credential when required, and forwards.
async fn gateway_handler(State(state): State<AppState>, mut request: Request<Body>) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let client_ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    // 1. Match Route
    let matched = match state.router.resolve(&path) {
        Ok(m) => m,
        Err(err) => {
            tracing::debug!(method = %method, path = %path, "No route matched");
            return err.into_response();
        }
    };
    let route_name = matched.route.name.as_str();

    // 2. Authenticate
    if matched.route.protected {
        match state.verifier.verify_headers(request.headers()) {
            Ok(claims) => {
                request.extensions_mut().insert(claims);
            }
            Err(err) => {
                tracing::debug!(route = %route_name, path = %path, "Credential rejected");
                return labelled(err.into_response(), route_name);
            }
        }
    }

    // 3. Forward
    let response = match state.forwarder.forward(request, &matched, client_ip).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    };
    labelled(response, route_name)
}

/// Non-GET methods on the health path fall through to "no route".
async fn unmatched(uri: Uri) -> GatewayError {
    GatewayError::RouteNotFound(uri.path().to_string())
}

fn labelled(mut response: Response, route: &str) -> Response {
    response.extensions_mut().insert(RouteLabel(route.to_string()));
    response
}

/// Record every response, including 404s, health checks and recovered panics.
async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let start_time = Instant::now();
    let method = request.method().clone();

    let response = next.run(request).await;

    let route = response
        .extensions()
        .get::<RouteLabel>()
        .map_or("none", |label| label.0.as_str());
    metrics::record_request(method.as_str(), response.status().as_u16(), route, start_time);
    response
}
