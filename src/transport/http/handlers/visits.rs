use crate::transport::http::handlers::common::{
    not_found, parse_id, service_error, visit_body, HandlerError,
};
use crate::transport::http::types::{ApiResponse, AppState, ListQuery};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use serde_json::Value as JsonValue;

fn respond<T: Serialize>(status: StatusCode, data: &T) -> axum::response::Response {
    match serde_json::to_value(data) {
        Ok(value) => (status, Json(ApiResponse::ok(value))).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::fail(format!("Could not encode response: {}", e))),
        )
            .into_response(),
    }
}

fn reject(err: HandlerError) -> axum::response::Response {
    err.into_response()
}

#[utoipa::path(
    get,
    path = "/api/visits",
    params(ListQuery),
    responses(
        (status = 200, description = "Visits, most recent visit date first unless order=asc", body = ApiResponse),
        (status = 400, description = "Unknown category", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn list_visits_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> impl IntoResponse {
    let direction = query.direction();
    let result = match query.category.as_deref().map(str::trim) {
        Some(category) if !category.is_empty() => {
            state.visits.list_by_category(category, direction).await
        }
        _ => state.visits.list_ordered(direction).await,
    };
    match result {
        Ok(rows) => respond(StatusCode::OK, &rows),
        Err(e) => reject(service_error(e, state.production)),
    }
}

#[utoipa::path(
    get,
    path = "/api/visits/statistics",
    responses(
        (status = 200, description = "Total and per-category counts", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn statistics_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.visits.statistics().await {
        Ok(stats) => respond(StatusCode::OK, &stats),
        Err(e) => reject(service_error(e, state.production)),
    }
}

#[utoipa::path(
    get,
    path = "/api/visits/{id}",
    params(
        ("id" = i64, Path, description = "Visit id")
    ),
    responses(
        (status = 200, description = "The visit", body = ApiResponse),
        (status = 400, description = "Invalid id", body = ApiResponse),
        (status = 404, description = "No visit with this id", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn get_visit_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> impl IntoResponse {
    let id = match parse_id(&raw_id) {
        Ok(id) => id,
        Err(resp) => return reject(resp),
    };
    match state.visits.find_by_id(id).await {
        Ok(Some(record)) => respond(StatusCode::OK, &record),
        Ok(None) => reject(not_found(id)),
        Err(e) => reject(service_error(e, state.production)),
    }
}

#[utoipa::path(
    post,
    path = "/api/visits",
    request_body = crate::transport::http::types::VisitInput,
    responses(
        (status = 201, description = "Visit created", body = ApiResponse),
        (status = 400, description = "Validation failed (rules listed in data.errors)", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn create_visit_handler(
    State(state): State<AppState>,
    body: Result<Json<JsonValue>, JsonRejection>,
) -> impl IntoResponse {
    let fields = match visit_body(body) {
        Ok(f) => f,
        Err(resp) => return reject(resp),
    };
    match state.visits.create(&fields).await {
        Ok(record) => respond(StatusCode::CREATED, &record),
        Err(e) => reject(service_error(e, state.production)),
    }
}

#[utoipa::path(
    put,
    path = "/api/visits/{id}",
    params(
        ("id" = i64, Path, description = "Visit id")
    ),
    request_body = crate::transport::http::types::VisitInput,
    responses(
        (status = 200, description = "Visit replaced", body = ApiResponse),
        (status = 400, description = "Invalid id or validation failed", body = ApiResponse),
        (status = 404, description = "No visit with this id", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn update_visit_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Result<Json<JsonValue>, JsonRejection>,
) -> impl IntoResponse {
    let id = match parse_id(&raw_id) {
        Ok(id) => id,
        Err(resp) => return reject(resp),
    };
    let fields = match visit_body(body) {
        Ok(f) => f,
        Err(resp) => return reject(resp),
    };
    match state.visits.update(id, &fields).await {
        Ok(Some(record)) => respond(StatusCode::OK, &record),
        Ok(None) => reject(not_found(id)),
        Err(e) => reject(service_error(e, state.production)),
    }
}

#[utoipa::path(
    delete,
    path = "/api/visits/{id}",
    params(
        ("id" = i64, Path, description = "Visit id")
    ),
    responses(
        (status = 200, description = "Visit removed", body = ApiResponse),
        (status = 400, description = "Invalid id", body = ApiResponse),
        (status = 404, description = "No visit with this id", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn delete_visit_handler(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> impl IntoResponse {
    let id = match parse_id(&raw_id) {
        Ok(id) => id,
        Err(resp) => return reject(resp),
    };
    match state.visits.remove(id).await {
        Ok(true) => respond(StatusCode::OK, &serde_json::json!({ "id": id, "removed": true })),
        Ok(false) => reject(not_found(id)),
        Err(e) => reject(service_error(e, state.production)),
    }
}

/// Any path no route matches.
pub async fn route_not_found_handler() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ApiResponse::fail("Route not found")))
}
