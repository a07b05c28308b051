use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    middleware::{make_span_with_request_id, request_id_middleware},
    models::MoodTables,
    services::{CatalogProvider, FallbackCatalog, Recommender},
};

pub mod movies;
pub mod recommendations;

/// Shared application state
pub struct AppState {
    pub recommender: Recommender,
    pub provider: Arc<dyn CatalogProvider>,
    pub fallback: Arc<FallbackCatalog>,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn CatalogProvider>,
        fallback: Arc<FallbackCatalog>,
        moods: Arc<MoodTables>,
    ) -> Self {
        Self {
            recommender: Recommender::new(provider.clone(), fallback.clone(), moods),
            provider,
            fallback,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
}

/// API routes under /api
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/recommend", post(recommendations::recommend))
        .route("/search", get(movies::search))
        .route("/movie", get(movies::details))
        .route("/movies/hydrate", post(movies::hydrate))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
