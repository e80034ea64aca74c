use crate::domain::model::FieldMap;
use crate::error::ServiceError;
use crate::transport::http::types::ApiResponse;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value as JsonValue;

pub type HandlerError = (StatusCode, Json<ApiResponse>);

pub fn json_422(err: JsonRejection, expected: &str) -> HandlerError {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse::fail(format!(
            "Invalid JSON body: {} (expected: {})",
            err, expected
        ))),
    )
}

/// Path ids must be positive integers.
pub fn parse_id(raw: &str) -> Result<i64, HandlerError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::fail(format!("Invalid id '{}'", raw))),
        )),
    }
}

/// Unwraps a visit body. Non-objects are unprocessable; an empty object is a
/// bad request and never reaches the service.
pub fn visit_body(body: Result<Json<JsonValue>, JsonRejection>) -> Result<FieldMap, HandlerError> {
    const EXPECTED: &str = "{\"name\", \"professional\", \"visitDate\", \"category\", \"notes\"}";
    let Json(value) = body.map_err(|e| json_422(e, EXPECTED))?;
    match value {
        JsonValue::Object(fields) if fields.is_empty() => Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::fail("Request body is empty")),
        )),
        JsonValue::Object(fields) => Ok(fields),
        _ => Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::fail(format!(
                "Invalid JSON body: expected an object {}",
                EXPECTED
            ))),
        )),
    }
}

pub fn not_found(id: i64) -> HandlerError {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::fail(format!("Visit {} not found", id))),
    )
}

/// Validation failures become 400 with every violated rule in
/// `data.errors`; store failures become 500.
pub fn service_error(err: ServiceError, production: bool) -> HandlerError {
    match err {
        ServiceError::Validation(v) => {
            tracing::warn!(errors = ?v.errors, "request failed validation");
            (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse {
                    success: false,
                    data: Some(serde_json::json!({ "errors": v.errors })),
                    error: Some("Validation failed".to_string()),
                }),
            )
        }
        ServiceError::Store(e) => {
            let message = if production {
                "Internal server error".to_string()
            } else {
                format!("Internal server error: {}", e)
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiResponse::fail(message)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{StoreError, ValidationError};

    #[test]
    fn ids_must_be_positive_integers() {
        assert_eq!(parse_id("42").unwrap(), 42);
        for bad in ["0", "-3", "abc", "1.5", ""] {
            assert_eq!(parse_id(bad).unwrap_err().0, StatusCode::BAD_REQUEST, "{}", bad);
        }
    }

    #[test]
    fn empty_object_is_a_bad_request() {
        let err = visit_body(Ok(Json(serde_json::json!({})))).unwrap_err();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
        let err = visit_body(Ok(Json(serde_json::json!([1, 2])))).unwrap_err();
        assert_eq!(err.0, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn production_hides_store_detail() {
        let err = || ServiceError::Store(StoreError::Unavailable("disk on fire".to_string()));
        let (status, Json(body)) = service_error(err(), true);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.as_deref(), Some("Internal server error"));

        let (_, Json(body)) = service_error(err(), false);
        assert!(body.error.unwrap().contains("disk on fire"));
    }

    #[test]
    fn validation_errors_are_listed() {
        let err = ServiceError::Validation(ValidationError::new(vec![
            "a".to_string(),
            "b".to_string(),
        ]));
        let (status, Json(body)) = service_error(err, false);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.data.unwrap()["errors"], serde_json::json!(["a", "b"]));
    }
}
