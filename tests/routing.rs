//! Routing, prefix stripping and credential gating through a live gateway.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn health_is_ok_while_every_backend_is_down() {
    let down = common::closed_addr().await;
    let gateway = common::spawn_gateway(common::gateway_config(down, down, down)).await;

    let res = common::client().get(gateway.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({"status": "ok"}));
}

#[tokio::test]
async fn strips_prefix_before_forwarding() {
    let echo = common::start_echo_backend().await;
    let gateway = common::spawn_gateway(common::gateway_config(echo, echo, echo)).await;
    let client = common::client();
    let bearer = format!("Bearer {}", common::token("user-1"));

    let cases = [
        ("/orders/abc", "/abc"),
        ("/orders", "/"),
        ("/orders/", "/"),
        ("/products/api/products/42", "/api/products/42"),
        ("/auth/login", "/login"),
    ];
    for (path, expected) in cases {
        let res = client
            .get(gateway.url(path))
            .header("authorization", &bearer)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK, "{}", path);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["path"], expected, "{}", path);
    }
}

#[tokio::test]
async fn preserves_query_and_request_metadata() {
    let echo = common::start_echo_backend().await;
    let gateway = common::spawn_gateway(common::gateway_config(echo, echo, echo)).await;
    let bearer = format!("Bearer {}", common::token("user-7"));

    let res = common::client()
        .get(gateway.url("/orders/search?status=open&page=2"))
        .header("authorization", &bearer)
        .header("x-auth-subject", "admin")
        .header("x-request-id", "trace-abc")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["x-request-id"], "trace-abc");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["path"], "/search");
    assert_eq!(body["query"], "status=open&page=2");
    assert_eq!(body["subject"], "user-7");
    assert_eq!(body["authorization"], bearer.as_str());
    assert_eq!(body["forwarded_for"], "127.0.0.1");
    assert_eq!(body["request_id"], "trace-abc");
}

#[tokio::test]
async fn public_route_strips_spoofed_subject() {
    let echo = common::start_echo_backend().await;
    let gateway = common::spawn_gateway(common::gateway_config(echo, echo, echo)).await;

    let res = common::client()
        .get(gateway.url("/auth/me"))
        .header("x-auth-subject", "admin")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["subject"], Value::Null);
}

#[tokio::test]
async fn unregistered_path_never_reaches_a_backend() {
    let hits = Arc::new(AtomicU32::new(0));
    let h = hits.clone();
    let backend = common::start_programmable_backend(move || {
        let h = h.clone();
        async move {
            h.fetch_add(1, Ordering::SeqCst);
            (200, "{}".into())
        }
    })
    .await;
    let gateway = common::spawn_gateway(common::gateway_config(backend, backend, backend)).await;
    let client = common::client();

    for path in ["/", "/users", "/ordersx", "/health/deep"] {
        let res = client.get(gateway.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{}", path);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["code"], "route_not_found");
    }
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn protected_routes_reject_before_forwarding() {
    // Backends are unreachable: the 401 must come from the gateway itself.
    let down = common::closed_addr().await;
    let gateway = common::spawn_gateway(common::gateway_config(down, down, down)).await;
    let client = common::client();

    let attempts = [
        None,
        Some("Bearer".to_string()),
        Some(format!("Basic {}", common::token("user-1"))),
        Some("Bearer not-a-token".to_string()),
        Some(format!("Bearer {}", common::expired_token("user-1"))),
    ];
    for path in ["/products/api/products", "/orders/"] {
        for authorization in &attempts {
            let mut req = client.get(gateway.url(path));
            if let Some(value) = authorization {
                req = req.header("authorization", value);
            }
            let res = req.send().await.unwrap();
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{} {:?}", path, authorization);
            let body: Value = res.json().await.unwrap();
            assert_eq!(body["code"], "unauthenticated");
            assert_eq!(body["message"], "Unauthorized");
        }
    }
}

#[tokio::test]
async fn register_is_forwarded_verbatim_and_status_passes_through() {
    let calls = Arc::new(AtomicU32::new(0));
    let c = calls.clone();
    let auth = common::start_programmable_backend(move || {
        let c = c.clone();
        async move {
            if c.fetch_add(1, Ordering::SeqCst) == 0 {
                (201, r#"{"id":"u-1","email":"test@example.com"}"#.into())
            } else {
                (409, r#"{"message":"Email already registered"}"#.into())
            }
        }
    })
    .await;
    let down = common::closed_addr().await;
    let gateway = common::spawn_gateway(common::gateway_config(auth, down, down)).await;
    let client = common::client();
    let payload = json!({"email": "test@example.com", "password": "password123"});

    let first = client.post(gateway.url("/auth/register")).json(&payload).send().await.unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);
    assert_eq!(first.headers()["content-type"], "application/json");
    assert_eq!(first.json::<Value>().await.unwrap()["id"], "u-1");

    let second = client.post(gateway.url("/auth/register")).json(&payload).send().await.unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(
        second.json::<Value>().await.unwrap(),
        json!({"message": "Email already registered"})
    );

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn post_body_reaches_backend_unchanged() {
    let echo = common::start_echo_backend().await;
    let gateway = common::spawn_gateway(common::gateway_config(echo, echo, echo)).await;
    let payload = r#"{"email":"test@example.com","password":"password123"}"#;

    let res = common::client()
        .post(gateway.url("/auth/register"))
        .header("content-type", "application/json")
        .body(payload)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["method"], "POST");
    assert_eq!(body["path"], "/register");
    assert_eq!(body["body"], payload);
}
