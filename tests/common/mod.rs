#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use resume_vault::app::build_app;
use resume_vault::config::{AppConfig, DeletePolicy, JwtConfig, StoreKind};
use resume_vault::state::AppState;
use resume_vault::store::MemoryStore;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "correct-horse-battery-staple";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

pub fn test_config(delete_policy: DeletePolicy) -> AppConfig {
    AppConfig {
        app_env: "test".into(),
        store: StoreKind::Memory,
        database_url: None,
        jwt: JwtConfig::new(TEST_SECRET),
        delete_policy,
        cors_origins: vec!["http://localhost:3000".into()],
        listen_addr: ([127, 0, 0, 1], 0).into(),
    }
}

pub fn build_test_app() -> TestApp {
    build_test_app_with(DeletePolicy::Hard)
}

pub fn build_test_app_with(delete_policy: DeletePolicy) -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::from_parts(store.clone(), Arc::new(test_config(delete_policy)))
        .expect("state");
    TestApp {
        router: build_app(state),
        store,
    }
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let body = match body {
        Some(v) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn register(app: &Router, email: &str) -> Response<Body> {
    post_json(
        app,
        "/api/register",
        json!({
            "firstName": "Test",
            "lastName": "User",
            "email": email,
            "password": PASSWORD,
        }),
    )
    .await
}

pub async fn login(app: &Router, email: &str, password: &str) -> Response<Body> {
    post_json(
        app,
        "/api/login",
        json!({ "email": email, "password": password }),
    )
    .await
}

/// Register + login, returning the bearer token.
pub async fn signed_in(app: &Router, email: &str) -> String {
    assert_eq!(register(app, email).await.status(), StatusCode::OK);
    let res = login(app, email, PASSWORD).await;
    assert_eq!(res.status(), StatusCode::OK);
    body_json(res).await["token"]
        .as_str()
        .expect("token in login response")
        .to_string()
}

pub async fn create_resume(app: &Router, token: &str, title: &str, content: &str) -> Value {
    let res = send(
        app,
        Method::POST,
        "/api/resumes",
        Some(token),
        Some(json!({ "title": title, "content": content })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    body_json(res).await["resume"].clone()
}
