use crate::transport::http::types::{ApiResponse, AppState};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy (store reachable)", body = ApiResponse),
        (status = 503, description = "Service is unhealthy (store unreachable)", body = ApiResponse)
    )
)]
pub async fn healthcheck_handler(State(state): State<AppState>) -> impl IntoResponse {
    let backend = state.visits.store().backend_name();
    match state.visits.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::ok(
                serde_json::json!({ "status": "ok", "store": backend }),
            )),
        )
            .into_response(),
        Err(e) => {
            let error = if state.production {
                "Store ping failed".to_string()
            } else {
                format!("Store ping failed: {}", e)
            };
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    success: false,
                    data: Some(serde_json::json!({ "status": "unhealthy", "store": backend })),
                    error: Some(error),
                }),
            )
                .into_response()
        }
    }
}
