//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no router is
//! involved.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use skiadmin_api::error::AppError;
use skiadmin_core::error::{CoreError, FieldError, ValidationContext};

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn validation_error_returns_400_with_details() {
    let err = AppError::Core(CoreError::Validation {
        model: "Sport",
        context: ValidationContext::Model,
        errors: vec![FieldError::new("name", "must not be blank")],
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["context"], "MODEL");
    assert_eq!(json["model"], "Sport");
    assert_eq!(json["errors"][0]["field"], "name");
    assert_eq!(json["errors"][0]["message"], "must not be blank");
    assert_eq!(json["error"], "Invalid model: Sport: name: must not be blank");
}

#[tokio::test]
async fn business_rule_context_is_serialized_in_screaming_case() {
    let err = AppError::Core(CoreError::field(
        "Sport",
        ValidationContext::BusinessRule,
        "id",
        "sport is still offered by 1 ski lift(s)",
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["context"], "BUSINESS_RULE");
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "SkiLift",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Entity not found: SkiLift with id 42");
}

#[tokio::test]
async fn duplicate_error_returns_409() {
    let err = AppError::Core(CoreError::duplicate_name("Sport", "ski"));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "DUPLICATE");
    assert_eq!(json["error"], "Duplicate Sport: name 'ski' already exists");
}

#[tokio::test]
async fn bad_request_error_returns_400() {
    let err = AppError::BadRequest("Body id 3 does not match path id 4".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "Body id 3 does not match path id 4");
}

#[tokio::test]
async fn internal_error_returns_500_and_sanitizes_message() {
    let err = AppError::Core(CoreError::Internal(
        "connection refused to db.internal:5432".into(),
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}
