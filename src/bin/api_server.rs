// src/bin/api_server.rs

use anyhow::Context;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use visit_registry::infra::config::AppConfig;
use visit_registry::infra::logging::init_logging;
use visit_registry::{sample_visits, storage, transport, VisitService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    init_logging(&config.log_level);
    tracing::info!(store = %config.store, production = config.production, "starting visit registry");

    // --- Store Initialization ---
    let store = storage::connect(&config.store)
        .await
        .with_context(|| format!("could not open {} store", config.store))?;
    store
        .init_schema()
        .await
        .context("could not create the visits schema")?;

    // --- Service Initialization ---
    let visits = VisitService::new(store);
    if config.seed_sample_data {
        let written = visits
            .seed_if_empty(&sample_visits())
            .await
            .context("could not seed sample visits")?;
        if written == 0 {
            tracing::info!("store already has visits, skipping sample data");
        }
    }

    let app_state = transport::http::AppState {
        visits,
        production: config.production,
    };

    // --- API Server Initialization ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let app = transport::http::create_router(app_state)
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()),
        )
        .layer(cors);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("could not bind {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "API server listening");
    tracing::info!("Swagger UI available at http://{}/swagger-ui", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("shutdown signal received");
            }
        })
        .await?;
    tracing::info!("graceful shutdown complete");
    Ok(())
}
