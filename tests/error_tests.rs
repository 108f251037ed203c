// SPDX-License-Identifier: MIT

//! Error taxonomy to HTTP response mapping tests.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use ecotrack_points::error::AppError;

async fn response_parts(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 4096).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_validation_maps_to_422_with_details() {
    let (status, json) =
        response_parts(AppError::Validation("Quantity must be greater than zero".into())).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"], "validation_error");
    assert_eq!(json["details"], "Quantity must be greater than zero");
}

#[tokio::test]
async fn test_duplicate_submission_maps_to_409() {
    let (status, json) =
        response_parts(AppError::DuplicateSubmission("already logged".into())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "duplicate_submission");
}

#[tokio::test]
async fn test_invalid_state_and_status_are_distinct() {
    let (state_status, state_json) =
        response_parts(AppError::InvalidState("not rejected".into())).await;
    let (status_status, status_json) =
        response_parts(AppError::InvalidStatus("bad target".into())).await;

    assert_eq!(state_status, StatusCode::CONFLICT);
    assert_eq!(state_json["error"], "invalid_state");
    assert_eq!(status_status, StatusCode::BAD_REQUEST);
    assert_eq!(status_json["error"], "invalid_status");
}

#[tokio::test]
async fn test_transient_maps_to_503_and_hides_details() {
    let (status, json) = response_parts(AppError::Transient("commit conflict".into())).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["error"], "transient_error");
    assert!(json.get("details").is_none());
}

#[tokio::test]
async fn test_database_errors_hide_details() {
    let (status, json) = response_parts(AppError::Database("connection string".into())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "database_error");
    assert!(json.get("details").is_none());
}

#[tokio::test]
async fn test_not_found_and_forbidden() {
    let (status, json) = response_parts(AppError::NotFound("Completion x".into())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");

    let (status, json) = response_parts(AppError::Forbidden("not yours".into())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "forbidden");
}
