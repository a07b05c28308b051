//! Pass-through lookups with fallback-catalog answers
//!
//! No relaxation or scoring happens here. A failing or unconfigured catalog
//! degrades to the bundled catalog instead of an error.

use std::collections::HashSet;
use std::sync::Arc;

use crate::{
    models::{Movie, MovieId, DEFAULT_LANGUAGE},
    services::{fallback::FallbackCatalog, providers::CatalogProvider},
};

/// Title search
///
/// English searches fall back to the bundled catalog when the provider is
/// unavailable or fails; other languages get an empty list.
pub async fn search_movies(
    provider: &dyn CatalogProvider,
    fallback: &FallbackCatalog,
    query: &str,
    language: &str,
) -> Vec<Movie> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    match provider.search(query, language).await {
        Ok(movies) => movies,
        Err(e) => {
            tracing::warn!(
                query = %query,
                provider = provider.name(),
                error = %e,
                "Search failed, using fallback catalog"
            );
            if language == DEFAULT_LANGUAGE {
                fallback.search(query)
            } else {
                Vec::new()
            }
        }
    }
}

/// Single-movie lookup; `None` when neither the catalog nor the bundled set has it
pub async fn movie_details(
    provider: &dyn CatalogProvider,
    fallback: &FallbackCatalog,
    id: MovieId,
    language: &str,
) -> Option<Movie> {
    match provider.movie_details(id, language).await {
        Ok(movie) => Some(movie),
        Err(e) => {
            tracing::debug!(
                movie_id = id,
                provider = provider.name(),
                error = %e,
                "Detail lookup failed, checking fallback catalog"
            );
            fallback.find(id).cloned()
        }
    }
}

/// Resolves many stored ids at once (e.g. a watchlist)
///
/// Each distinct id is looked up in its own task; results come back in
/// first-occurrence order of `ids`, deduplicated by identity. Ids that
/// resolve nowhere are dropped.
pub async fn hydrate_movies(
    provider: Arc<dyn CatalogProvider>,
    fallback: Arc<FallbackCatalog>,
    ids: Vec<MovieId>,
    language: &str,
) -> Vec<Movie> {
    let mut requested = HashSet::new();
    let mut tasks = Vec::new();

    for id in ids.into_iter().filter(|id| requested.insert(*id)) {
        let provider = provider.clone();
        let fallback = fallback.clone();
        let language = language.to_string();
        let task = tokio::spawn(async move {
            movie_details(provider.as_ref(), &fallback, id, &language).await
        });
        tasks.push(task);
    }

    let mut results = Vec::new();
    let mut seen = HashSet::new();
    let mut missing = 0;

    for task in tasks {
        match task.await {
            Ok(Some(movie)) => {
                if seen.insert(movie.id) {
                    results.push(movie);
                }
            }
            Ok(None) => missing += 1,
            Err(e) => {
                tracing::error!(error = %e, "Task join error");
                missing += 1;
            }
        }
    }

    if missing > 0 {
        tracing::warn!(
            resolved = results.len(),
            missing,
            "Some movies could not be hydrated"
        );
    }

    results
}
