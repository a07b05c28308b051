use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Movie, MovieId, DEFAULT_LANGUAGE},
    routes::{recommendations::MovieListResponse, AppState},
    services::movie_lookup,
};

/// Largest id list a single hydrate request may resolve
pub const MAX_HYDRATE_IDS: usize = 100;

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: Option<String>,
    #[serde(default = "default_language")]
    lang: String,
}

/// Handler for title search endpoint
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Json<MovieListResponse> {
    let results = match params.q.as_deref() {
        Some(q) => {
            movie_lookup::search_movies(state.provider.as_ref(), &state.fallback, q, &params.lang)
                .await
        }
        None => Vec::new(),
    };

    Json(MovieListResponse { results })
}

#[derive(Debug, Deserialize)]
pub struct DetailsQuery {
    #[serde(default)]
    id: Option<String>,
    #[serde(default = "default_language")]
    lang: String,
}

/// Handler for single-movie lookup
pub async fn details(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DetailsQuery>,
) -> AppResult<Json<Movie>> {
    let raw_id = params
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput("Missing movie id".to_string()))?;

    let id: MovieId = raw_id
        .trim()
        .parse()
        .map_err(|_| AppError::InvalidInput(format!("Invalid movie id: {}", raw_id)))?;

    movie_lookup::movie_details(state.provider.as_ref(), &state.fallback, id, &params.lang)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Movie {} not found", id)))
}

#[derive(Debug, Deserialize)]
pub struct HydrateRequest {
    ids: Vec<MovieId>,
    #[serde(default = "default_language")]
    language: String,
}

/// Handler resolving a batch of stored ids (watchlist, liked, ...)
pub async fn hydrate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<HydrateRequest>,
) -> AppResult<Json<MovieListResponse>> {
    if request.ids.len() > MAX_HYDRATE_IDS {
        return Err(AppError::InvalidInput(format!(
            "At most {} ids per request, got {}",
            MAX_HYDRATE_IDS,
            request.ids.len()
        )));
    }

    let results = movie_lookup::hydrate_movies(
        state.provider.clone(),
        state.fallback.clone(),
        request.ids,
        &request.language,
    )
    .await;

    Ok(Json(MovieListResponse { results }))
}
