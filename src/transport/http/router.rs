use crate::domain::model::{Category, CategoryCounts, VisitRecord, VisitStatistics};
use crate::storage::OrderDirection;
use crate::transport::http::handlers::{health, visits};
use crate::transport::http::types::{ApiResponse, AppState, VisitInput};
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        visits::list_visits_handler,
        visits::statistics_handler,
        visits::get_visit_handler,
        visits::create_visit_handler,
        visits::update_visit_handler,
        visits::delete_visit_handler
    ),
    components(schemas(
        ApiResponse,
        VisitInput,
        VisitRecord,
        VisitStatistics,
        CategoryCounts,
        Category,
        OrderDirection
    ))
)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route(
            "/api/visits",
            get(visits::list_visits_handler).post(visits::create_visit_handler),
        )
        .route("/api/visits/statistics", get(visits::statistics_handler))
        .route(
            "/api/visits/:id",
            get(visits::get_visit_handler)
                .put(visits::update_visit_handler)
                .delete(visits::delete_visit_handler),
        )
        .fallback(visits::route_not_found_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
