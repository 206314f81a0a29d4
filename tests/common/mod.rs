// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chirpy::config::Config;
use chirpy::db::JsonDb;
use chirpy::routes::create_router;
use chirpy::AppState;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

/// Router plus state over a throwaway document.
#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    // Keeps the document directory alive for the test's duration.
    pub dir: TempDir,
}

/// Open a fresh store in a temp directory.
#[allow(dead_code)]
pub async fn test_db() -> (JsonDb, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db = JsonDb::open(dir.path().join("database.json"))
        .await
        .expect("Failed to open document store");
    (db, dir)
}

/// Create a test app over an empty document.
#[allow(dead_code)]
pub async fn create_test_app() -> TestApp {
    let (db, dir) = test_db().await;
    let config = Config::test_default(db.path());
    let state = Arc::new(AppState::new(config, db));

    TestApp {
        router: create_router(state.clone()),
        state,
        dir,
    }
}

/// Send a request and decode the JSON body (`Null` when empty).
#[allow(dead_code)]
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// Build a JSON request with an optional `Authorization` header.
#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, auth: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

/// Build a body-less request with an optional `Authorization` header.
#[allow(dead_code)]
pub fn empty_request(method: &str, uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::empty()).unwrap()
}

/// Register and log in; returns (user id, access token, refresh token).
#[allow(dead_code)]
pub async fn signup_and_login(app: &Router, email: &str, password: &str) -> (u64, String, String) {
    let creds = serde_json::json!({ "email": email, "password": password });

    let (status, _) = send(app, json_request("POST", "/api/users", None, &creds)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(app, json_request("POST", "/api/login", None, &creds)).await;
    assert_eq!(status, StatusCode::OK);

    (
        body["id"].as_u64().unwrap(),
        body["token"].as_str().unwrap().to_string(),
        body["refresh_token"].as_str().unwrap().to_string(),
    )
}
