// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error-to-response mapping.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use chirpy::error::AppError;

async fn body_of(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[test]
fn test_status_mapping() {
    let cases = [
        (AppError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
        (AppError::DuplicateEmail, StatusCode::BAD_REQUEST),
        (AppError::InvalidCredentials, StatusCode::UNAUTHORIZED),
        (AppError::Unauthenticated, StatusCode::UNAUTHORIZED),
        (AppError::MalformedHeader, StatusCode::UNAUTHORIZED),
        (AppError::Expired, StatusCode::UNAUTHORIZED),
        (AppError::Forbidden, StatusCode::FORBIDDEN),
        (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
        (
            AppError::StorageUnavailable("x".into()),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
        (
            AppError::CorruptDocument("x".into()),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
        (
            AppError::Internal(anyhow::anyhow!("x")),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (err, expected) in cases {
        assert_eq!(err.status(), expected, "{:?}", err);
    }
}

#[tokio::test]
async fn test_auth_failures_share_a_body() {
    let (_, expired) = body_of(AppError::Expired).await;
    let (_, malformed) = body_of(AppError::MalformedHeader).await;
    let (_, missing) = body_of(AppError::Unauthenticated).await;

    assert_eq!(expired, missing);
    assert_eq!(malformed, missing);
    assert_eq!(missing["error"], "unauthorized");
}

#[tokio::test]
async fn test_storage_errors_hide_details() {
    let (status, body) = body_of(AppError::CorruptDocument("/var/lib/db.json: bad".into())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "storage_error");
    assert!(body.get("details").is_none());
}
