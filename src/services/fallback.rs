use std::collections::HashSet;

use crate::{
    error::{AppError, AppResult},
    models::{Movie, MovieId, RecommendationRequest},
};

/// Results a default-language request is padded up to
pub const MIN_RESULTS: usize = 10;
/// Hard cap on any recommendation list
pub const MAX_RESULTS: usize = 20;

const BUNDLED_CATALOG: &str = include_str!("../../data/fallback_movies.json");

/// Fixed, ordered set of English-language movies bundled with the service
///
/// Used to pad sparse results and to answer when the catalog API is
/// unreachable. Always iterated in its bundled order.
#[derive(Debug, Clone, Default)]
pub struct FallbackCatalog {
    movies: Vec<Movie>,
}

impl FallbackCatalog {
    /// Parses the catalog compiled into the binary
    pub fn bundled() -> AppResult<Self> {
        let movies: Vec<Movie> = serde_json::from_str(BUNDLED_CATALOG).map_err(|e| {
            AppError::Internal(format!("Failed to parse bundled fallback catalog: {}", e))
        })?;
        Ok(Self::new(movies))
    }

    /// Builds a catalog from `movies`, keeping the first entry per identity
    pub fn new(movies: Vec<Movie>) -> Self {
        Self {
            movies: dedup_by_id(movies),
        }
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    pub fn find(&self, id: MovieId) -> Option<&Movie> {
        self.movies.iter().find(|m| m.id == id)
    }

    /// Case-insensitive title substring search
    pub fn search(&self, query: &str) -> Vec<Movie> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.movies
            .iter()
            .filter(|m| m.title.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Entries satisfying the request's genre, year and rating filters
    ///
    /// Mood plays no part here.
    pub fn matching(&self, request: &RecommendationRequest) -> Vec<Movie> {
        self.movies
            .iter()
            .filter(|movie| {
                let matches_genre = request.favorite_genres.is_empty()
                    || movie.has_any_genre(&request.favorite_genres);

                let in_year_range = match request.year_range {
                    Some((from, to)) => movie
                        .release_year()
                        .is_some_and(|year| year >= from && year <= to),
                    None => true,
                };

                let matches_rating = request
                    .min_rating
                    .map_or(true, |min| movie.vote_average >= min);

                matches_genre && in_year_range && matches_rating
            })
            .cloned()
            .collect()
    }

    /// Pads `candidates` from the catalog up to `MIN_RESULTS`, caps at `MAX_RESULTS`
    ///
    /// Candidates keep their order and are deduplicated by identity; padding
    /// appends catalog entries not already present, in catalog order.
    pub fn guarantee(&self, candidates: Vec<Movie>) -> Vec<Movie> {
        let mut results = dedup_by_id(candidates);
        let mut seen: HashSet<MovieId> = results.iter().map(|m| m.id).collect();

        for movie in &self.movies {
            if results.len() >= MIN_RESULTS {
                break;
            }
            if seen.insert(movie.id) {
                results.push(movie.clone());
            }
        }

        results.truncate(MAX_RESULTS);
        results
    }

    /// Terminal local stage of the pipeline
    ///
    /// Whatever the network stages accumulated comes first, followed by the
    /// catalog entries matching the request, then padding. Non-default
    /// languages get nothing: the catalog is English-only.
    pub fn local_fallback(
        &self,
        request: &RecommendationRequest,
        accumulated: Vec<Movie>,
    ) -> Vec<Movie> {
        if !request.is_default_language() {
            return Vec::new();
        }

        let mut candidates = accumulated;
        candidates.extend(self.matching(request));
        self.guarantee(candidates)
    }
}

fn dedup_by_id(movies: Vec<Movie>) -> Vec<Movie> {
    let mut seen = HashSet::new();
    movies.into_iter().filter(|m| seen.insert(m.id)).collect()
}
