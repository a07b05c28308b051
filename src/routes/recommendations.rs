use axum::{extract::State, Extension, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{Movie, RecommendationRequest},
    routes::AppState,
};

#[derive(Debug, Serialize)]
pub struct MovieListResponse {
    pub results: Vec<Movie>,
}

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<MovieListResponse>> {
    request.validate()?;

    tracing::info!(
        request_id = %request_id,
        language = request.effective_language(),
        mood = ?request.mood,
        favorite_genres = ?request.favorite_genres,
        "Processing recommendation request"
    );

    let results = state.recommender.recommend(&request).await;

    tracing::info!(
        request_id = %request_id,
        results = results.len(),
        "Recommendations completed"
    );

    Ok(Json(MovieListResponse { results }))
}
