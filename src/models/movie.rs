use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Catalog identifier of a movie, stable across calls
pub type MovieId = u64;

/// Catalog genre identifier (e.g. 28 = Action, 27 = Horror)
pub type GenreId = u32;

/// A movie as returned by the catalog discovery and search endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// ISO calendar date, or empty when the catalog has none
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u32,
    #[serde(default)]
    pub genre_ids: Vec<GenreId>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub original_language: String,
    #[serde(default)]
    pub adult: bool,
}

impl Movie {
    /// Release year parsed from `release_date`, if it is a valid date
    pub fn release_year(&self) -> Option<i32> {
        NaiveDate::parse_from_str(&self.release_date, "%Y-%m-%d")
            .ok()
            .map(|date| date.year())
    }

    /// Returns true if any of the movie's genres is in `genres`
    pub fn has_any_genre(&self, genres: &[GenreId]) -> bool {
        self.genre_ids.iter().any(|id| genres.contains(id))
    }

    /// Number of the movie's genres that appear in `genres`
    pub fn genre_matches(&self, genres: &[GenreId]) -> usize {
        self.genre_ids.iter().filter(|id| genres.contains(id)).count()
    }
}

// ============================================================================
// Catalog API Types
// ============================================================================

/// One page of results from the discover and search endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoviePage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<Movie>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiGenre {
    pub id: GenreId,
    #[serde(default)]
    pub name: String,
}

/// Raw response from the movie detail endpoint
///
/// Detail records carry full genre objects instead of `genre_ids`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMovieDetails {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u32,
    #[serde(default)]
    pub genres: Vec<ApiGenre>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub original_language: String,
    #[serde(default)]
    pub adult: bool,
}

impl From<ApiMovieDetails> for Movie {
    fn from(details: ApiMovieDetails) -> Self {
        Movie {
            id: details.id,
            title: details.title,
            overview: details.overview.unwrap_or_default(),
            poster_path: details.poster_path,
            backdrop_path: details.backdrop_path,
            release_date: details.release_date.unwrap_or_default(),
            vote_average: details.vote_average,
            vote_count: details.vote_count,
            genre_ids: details.genres.into_iter().map(|g| g.id).collect(),
            popularity: details.popularity,
            original_language: details.original_language,
            adult: details.adult,
        }
    }
}
