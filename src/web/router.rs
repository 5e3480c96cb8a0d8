//! Router configuration for the web API.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    add_files, create_bin, delete_bin, delete_file, download_file, get_bin, landing,
    upload_body_limit, AppState,
};
use super::middleware::create_cors_layer;
use super::openapi::ApiDoc;

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let body_limit = upload_body_limit(app_state.settings.max_bin_size);

    let bin_routes = Router::new()
        .route("/bins", post(create_bin))
        .route("/bins/:id", get(get_bin).post(add_files).delete(delete_bin))
        .route(
            "/bins/:id/files/:filename",
            get(download_file).delete(delete_file),
        )
        .layer(DefaultBodyLimit::max(body_limit));

    Router::new()
        .route("/", get(landing))
        .nest("/api/v1", bin_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Create the API documentation router.
pub fn create_swagger_router() -> Router {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
