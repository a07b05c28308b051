/// TMDB catalog provider
///
/// Endpoints used:
/// 1. Discovery: /discover/movie → page of movies matching filter parameters
/// 2. Search: /search/movie → page of movies matching a title query
/// 3. Details: /movie/{id} → one movie with full genre objects
///
/// Every call goes through `Transport`, which owns the credential, retries,
/// timeouts and the freshness window.
use crate::{
    db::CacheKey,
    error::CatalogResult,
    models::{ApiMovieDetails, Movie, MovieId, MoviePage},
    services::{providers::CatalogProvider, query_planner::DiscoverQuery, transport::Transport},
};

#[derive(Clone)]
pub struct TmdbProvider {
    transport: Transport,
}

impl TmdbProvider {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn discover(&self, query: &DiscoverQuery) -> CatalogResult<Vec<Movie>> {
        let page: MoviePage = self
            .transport
            .get_json(
                "/discover/movie",
                query,
                CacheKey::Discover(query.cache_key()),
            )
            .await?;

        tracing::debug!(
            results = page.results.len(),
            total_results = page.total_results,
            provider = "tmdb",
            "Discover completed"
        );

        Ok(page.results)
    }

    async fn search(&self, query: &str, language: &str) -> CatalogResult<Vec<Movie>> {
        let page: MoviePage = self
            .transport
            .get_json(
                "/search/movie",
                &[("query", query), ("language", language)],
                CacheKey::Search {
                    query: query.to_string(),
                    language: language.to_string(),
                },
            )
            .await?;

        tracing::info!(
            query = %query,
            results = page.results.len(),
            provider = "tmdb",
            "Title search completed"
        );

        Ok(page.results)
    }

    async fn movie_details(&self, id: MovieId, language: &str) -> CatalogResult<Movie> {
        let details: ApiMovieDetails = self
            .transport
            .get_json(
                &format!("/movie/{}", id),
                &[("language", language)],
                CacheKey::Details {
                    id,
                    language: language.to_string(),
                },
            )
            .await?;

        Ok(details.into())
    }

    fn has_credential(&self) -> bool {
        self.transport.has_credential()
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
