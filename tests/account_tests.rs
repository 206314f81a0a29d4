// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account and session endpoints over HTTP.

use axum::http::StatusCode;
use serde_json::json;

mod common;
use common::{create_test_app, empty_request, json_request, send, signup_and_login};

#[tokio::test]
async fn test_register_returns_public_view() {
    let app = create_test_app().await;
    let creds = json!({ "email": "a@x.com", "password": "secret" });

    let (status, body) = send(&app.router, json_request("POST", "/api/users", None, &creds)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 1);
    assert_eq!(body["email"], "a@x.com");
    assert_eq!(body["is_chirpy_red"], false);
    assert!(body.get("password").is_none());

    let stored = app.state.db.find_user_by_id(1).await.unwrap().unwrap();
    assert_ne!(stored.password, "secret");
}

#[tokio::test]
async fn test_register_rejects_bad_input() {
    let app = create_test_app().await;

    let (status, _) = send(
        &app.router,
        json_request("POST", "/api/users", None, &json!({ "email": "not-an-email", "password": "pw" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app.router,
        json_request("POST", "/api/users", None, &json!({ "email": "a@x.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = create_test_app().await;
    let creds = json!({ "email": "a@x.com", "password": "secret" });

    let (status, _) = send(&app.router, json_request("POST", "/api/users", None, &creds)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app.router, json_request("POST", "/api/users", None, &creds)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "duplicate_email");
}

#[tokio::test]
async fn test_login_response_shape() {
    let app = create_test_app().await;
    signup_and_login(&app.router, "a@x.com", "secret").await;

    let (status, body) = send(
        &app.router,
        json_request(
            "POST",
            "/api/login",
            None,
            &json!({ "email": "a@x.com", "password": "secret", "expires_in_seconds": 60 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["email"], "a@x.com");
    assert_eq!(body["is_chirpy_red"], false);
    assert_eq!(body["refresh_token"].as_str().unwrap().len(), 64);

    let verified = app
        .state
        .tokens
        .verify_access_token(body["token"].as_str().unwrap())
        .unwrap();
    assert_eq!(verified.expires_at - verified.issued_at, 60);
}

#[tokio::test]
async fn test_login_non_positive_ttl_defaults_to_an_hour() {
    let app = create_test_app().await;
    signup_and_login(&app.router, "a@x.com", "secret").await;

    for ttl in [-5, 0] {
        let (status, body) = send(
            &app.router,
            json_request(
                "POST",
                "/api/login",
                None,
                &json!({ "email": "a@x.com", "password": "secret", "expires_in_seconds": ttl }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "ttl {}", ttl);

        let verified = app
            .state
            .tokens
            .verify_access_token(body["token"].as_str().unwrap())
            .unwrap();
        assert_eq!(verified.expires_at - verified.issued_at, 3600);
    }
}

#[tokio::test]
async fn test_register_over_long_password() {
    let app = create_test_app().await;
    let creds = json!({ "email": "a@x.com", "password": "x".repeat(73) });

    let (status, body) = send(&app.router, json_request("POST", "/api/users", None, &creds)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
    assert!(app.state.db.find_user_by_email("a@x.com").await.unwrap().is_none());
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = create_test_app().await;
    signup_and_login(&app.router, "a@x.com", "secret").await;

    let (wrong_pw_status, wrong_pw_body) = send(
        &app.router,
        json_request("POST", "/api/login", None, &json!({ "email": "a@x.com", "password": "nope" })),
    )
    .await;
    let (unknown_status, unknown_body) = send(
        &app.router,
        json_request("POST", "/api/login", None, &json!({ "email": "b@x.com", "password": "nope" })),
    )
    .await;

    assert_eq!(wrong_pw_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_pw_body, unknown_body);
}

#[tokio::test]
async fn test_refresh_and_revoke() {
    let app = create_test_app().await;
    let (id, _, refresh) = signup_and_login(&app.router, "a@x.com", "secret").await;
    let auth = format!("Bearer {}", refresh);

    let (status, body) = send(&app.router, empty_request("POST", "/api/refresh", Some(&auth))).await;
    assert_eq!(status, StatusCode::OK);
    let verified = app
        .state
        .tokens
        .verify_access_token(body["token"].as_str().unwrap())
        .unwrap();
    assert_eq!(verified.user_id, id);

    let (status, body) = send(&app.router, empty_request("POST", "/api/revoke", Some(&auth))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, serde_json::Value::Null);

    let (status, _) = send(&app.router, empty_request("POST", "/api/refresh", Some(&auth))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app.router, empty_request("POST", "/api/revoke", Some(&auth))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_refresh_requires_bearer_header() {
    let app = create_test_app().await;

    let (status, _) = send(&app.router, empty_request("POST", "/api/refresh", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app.router, empty_request("POST", "/api/revoke", Some("Basic abc"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_access_token_cannot_refresh() {
    let app = create_test_app().await;
    let (_, access, _) = signup_and_login(&app.router, "a@x.com", "secret").await;

    let (status, _) = send(
        &app.router,
        empty_request("POST", "/api/refresh", Some(&format!("Bearer {}", access))),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_user() {
    let app = create_test_app().await;
    let (id, access, _) = signup_and_login(&app.router, "a@x.com", "secret").await;
    let update = json!({ "email": "new@x.com", "password": "changed" });

    let (status, _) = send(&app.router, json_request("PUT", "/api/users", None, &update)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app.router,
        json_request("PUT", "/api/users", Some(&format!("Bearer {}", access)), &update),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);
    assert_eq!(body["email"], "new@x.com");
    assert!(body.get("password").is_none());

    let (status, _) = send(&app.router, json_request("POST", "/api/login", None, &update)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_update_user_cannot_take_existing_email() {
    let app = create_test_app().await;
    signup_and_login(&app.router, "a@x.com", "secret").await;
    let (_, access, _) = signup_and_login(&app.router, "b@x.com", "secret").await;

    let (status, body) = send(
        &app.router,
        json_request(
            "PUT",
            "/api/users",
            Some(&format!("Bearer {}", access)),
            &json!({ "email": "a@x.com", "password": "secret" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "duplicate_email");
}
