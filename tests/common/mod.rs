//! Shared utilities for integration testing.
#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::Json;
use edge_gateway::config::{GatewayConfig, RouteConfig};
use edge_gateway::{HttpServer, Shutdown};
use jsonwebtoken::{encode, get_current_timestamp, EncodingKey, Header};
use serde_json::{json, Value};
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

pub const SECRET: &str = "integration-secret";

/// A running gateway; shuts down when dropped.
pub struct TestGateway {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Gateway config pointing the three routes at the given backends.
pub fn gateway_config(auth: SocketAddr, products: SocketAddr, orders: SocketAddr) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.host = "127.0.0.1".into();
    config.listener.port = 0;
    config.auth.jwt_secret = SECRET.into();
    config.routes = vec![
        RouteConfig::public("auth", "/auth", &format!("http://{}", auth)),
        RouteConfig::protected("products", "/products", &format!("http://{}", products)),
        RouteConfig::protected("orders", "/orders", &format!("http://{}", orders)),
    ];
    config
}

/// Start the gateway on an ephemeral port.
pub async fn spawn_gateway(config: GatewayConfig) -> TestGateway {
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestGateway { addr, shutdown }
}

/// HTTP client that never goes through an environment proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Signed bearer token for `sub`, valid for ten minutes.
pub fn token(sub: &str) -> String {
    let claims = json!({ "sub": sub, "exp": get_current_timestamp() + 600 });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
}

/// Signed bearer token that expired a minute ago.
pub fn expired_token(sub: &str) -> String {
    let claims = json!({ "sub": sub, "exp": get_current_timestamp() - 60 });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
}

async fn serve(app: axum::Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// Backend that describes the request it received as JSON.
pub async fn start_echo_backend() -> SocketAddr {
    async fn echo(request: Request) -> Json<Value> {
        let (parts, body) = request.into_parts();
        let body = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        Json(json!({
            "method": parts.method.as_str(),
            "path": parts.uri.path(),
            "query": parts.uri.query(),
            "body": String::from_utf8_lossy(&body),
            "authorization": header("authorization"),
            "subject": header("x-auth-subject"),
            "forwarded_for": header("x-forwarded-for"),
            "request_id": header("x-request-id"),
        }))
    }

    serve(axum::Router::new().fallback(echo)).await
}

/// Start a programmable backend; `f` decides the status and body per request.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let f = Arc::new(f);
    let handler = move |_request: Request<Body>| {
        let f = f.clone();
        async move {
            let (status, body) = f().await;
            (
                StatusCode::from_u16(status).unwrap(),
                [("content-type", "application/json")],
                body,
            )
        }
    };
    serve(axum::Router::new().fallback(handler)).await
}

/// Backend that accepts connections and never answers.
pub async fn start_silent_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    addr
}

/// Backend that never answers and reports each connection the peer closes.
pub async fn start_eof_reporting_backend() -> (SocketAddr, mpsc::UnboundedReceiver<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let tx = tx.clone();
            tokio::spawn(async move {
                let mut buf = [0u8; 1024];
                loop {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => {
                            let _ = tx.send(());
                            return;
                        }
                        Ok(_) => {}
                    }
                }
            });
        }
    });
    (addr, rx)
}

/// An address nothing listens on (connections are refused).
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    // Give the kernel a moment to release the socket.
    tokio::time::sleep(Duration::from_millis(10)).await;
    addr
}
