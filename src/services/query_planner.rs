use serde::Serialize;

use super::relaxation::Stage;
use crate::models::{GenreId, MoodTables, RecommendationRequest, DEFAULT_LANGUAGE};

/// Genre-list separator meaning "all of"
pub const GENRE_AND: &str = ",";
/// Genre-list separator meaning "any of"
pub const GENRE_OR: &str = "|";

const POPULARITY_DESC: &str = "popularity.desc";
const STRICT_RATING_FLOOR: f64 = 5.0;
const DEFAULT_MIN_RATING: f64 = 6.0;
const DEFAULT_YEAR_RANGE: (i32, i32) = (1980, 2027);
const RELAXED_MIN_RATING: f64 = 4.0;
const RELAXED_FROM_DATE: &str = "1970-01-01";

/// Parameters for one call to the catalog discover endpoint
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DiscoverQuery {
    pub sort_by: String,
    pub with_original_language: String,
    /// Full locale used for localized titles and synopses
    pub language: String,
    pub page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_genres: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub without_genres: Option<String>,
    #[serde(rename = "vote_average.gte", skip_serializing_if = "Option::is_none")]
    pub min_vote_average: Option<f64>,
    #[serde(rename = "vote_count.gte", skip_serializing_if = "Option::is_none")]
    pub min_vote_count: Option<u32>,
    #[serde(rename = "primary_release_date.gte", skip_serializing_if = "Option::is_none")]
    pub release_date_from: Option<String>,
    #[serde(rename = "primary_release_date.lte", skip_serializing_if = "Option::is_none")]
    pub release_date_to: Option<String>,
}

impl DiscoverQuery {
    /// Popular titles in `language`, without any other constraint
    pub fn popular_in(language: &str) -> Self {
        Self {
            sort_by: POPULARITY_DESC.to_string(),
            with_original_language: language.to_string(),
            language: locale_for(language),
            page: 1,
            with_genres: None,
            without_genres: None,
            min_vote_average: None,
            min_vote_count: None,
            release_date_from: None,
            release_date_to: None,
        }
    }

    /// Stable string form used as the cache key
    pub fn cache_key(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self))
    }
}

/// Maps a two-letter language code to the catalog's locale code
///
/// Unknown codes pass through unchanged.
pub fn locale_for(language: &str) -> String {
    let locale = match language {
        "hi" => "hi-IN",
        "fr" => "fr-FR",
        "de" => "de-DE",
        "it" => "it-IT",
        "es" => "es-ES",
        "ja" => "ja-JP",
        "ko" => "ko-KR",
        other => other,
    };
    locale.to_string()
}

fn join_ids(ids: &[GenreId], separator: &str) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(separator)
}

/// "(any of preferred) AND (any of mood)", or whichever group is non-empty
pub fn compose_genres(preferred: &[GenreId], mood: &[GenreId]) -> Option<String> {
    match (preferred.is_empty(), mood.is_empty()) {
        (false, false) => Some(format!(
            "{}{}{}",
            join_ids(preferred, GENRE_OR),
            GENRE_AND,
            join_ids(mood, GENRE_OR)
        )),
        (false, true) => Some(join_ids(preferred, GENRE_OR)),
        (true, false) => Some(join_ids(mood, GENRE_OR)),
        (true, true) => None,
    }
}

/// Any of preferred or mood genres, first occurrence wins
pub fn union_genres(preferred: &[GenreId], mood: &[GenreId]) -> Option<String> {
    let mut union: Vec<GenreId> = Vec::with_capacity(preferred.len() + mood.len());
    for id in preferred.iter().chain(mood) {
        if !union.contains(id) {
            union.push(*id);
        }
    }

    if union.is_empty() {
        None
    } else {
        Some(join_ids(&union, GENRE_OR))
    }
}

/// Catalog queries derived from one `RecommendationRequest`
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    language: String,
    preferred: Vec<GenreId>,
    mood: Vec<GenreId>,
    excluded: Vec<GenreId>,
    min_rating: Option<f64>,
    year_range: Option<(i32, i32)>,
}

impl QueryPlan {
    pub fn new(request: &RecommendationRequest, tables: &MoodTables) -> Self {
        Self {
            language: request.effective_language().to_string(),
            preferred: request.favorite_genres.clone(),
            mood: tables.preferred(request.mood).to_vec(),
            excluded: tables.excluded(request.mood).to_vec(),
            min_rating: request.min_rating,
            year_range: request.year_range,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn is_default_language(&self) -> bool {
        self.language == DEFAULT_LANGUAGE
    }

    pub fn preferred_genres(&self) -> &[GenreId] {
        &self.preferred
    }

    pub fn mood_genres(&self) -> &[GenreId] {
        &self.mood
    }

    pub fn excluded_genres(&self) -> &[GenreId] {
        &self.excluded
    }

    /// The discover query for a network stage; `None` for the local stage
    pub fn query_for(&self, stage: Stage) -> Option<DiscoverQuery> {
        match stage {
            Stage::Strict => Some(self.strict_query()),
            Stage::Relaxed => Some(self.relaxed_query()),
            Stage::PopularInLanguage => Some(DiscoverQuery::popular_in(&self.language)),
            Stage::LocalFallback => None,
        }
    }

    fn filtered_base(&self) -> DiscoverQuery {
        DiscoverQuery {
            without_genres: if self.excluded.is_empty() {
                None
            } else {
                Some(join_ids(&self.excluded, GENRE_AND))
            },
            ..DiscoverQuery::popular_in(&self.language)
        }
    }

    fn strict_query(&self) -> DiscoverQuery {
        let (from, to) = self.year_range.unwrap_or(DEFAULT_YEAR_RANGE);
        let min_rating = self.min_rating.unwrap_or(DEFAULT_MIN_RATING);

        DiscoverQuery {
            with_genres: compose_genres(&self.preferred, &self.mood),
            min_vote_average: Some(min_rating.max(STRICT_RATING_FLOOR)),
            min_vote_count: Some(if self.is_default_language() { 100 } else { 5 }),
            release_date_from: Some(format!("{}-01-01", from)),
            release_date_to: Some(format!("{}-12-31", to)),
            ..self.filtered_base()
        }
    }

    fn relaxed_query(&self) -> DiscoverQuery {
        DiscoverQuery {
            with_genres: union_genres(&self.preferred, &self.mood),
            min_vote_average: Some(RELAXED_MIN_RATING),
            min_vote_count: Some(0),
            release_date_from: Some(RELAXED_FROM_DATE.to_string()),
            ..self.filtered_base()
        }
    }
}
