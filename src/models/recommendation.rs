use serde::{Deserialize, Serialize};

use super::{GenreId, Mood};
use crate::error::{AppError, AppResult};

/// Language every fallback path is written in
pub const DEFAULT_LANGUAGE: &str = "en";

/// User-supplied filter snapshot for one recommendation request
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRequest {
    #[serde(default)]
    pub favorite_genres: Vec<GenreId>,
    #[serde(default)]
    pub mood: Mood,
    #[serde(default)]
    pub language: Option<String>,
    /// Takes precedence over `language` when both are present
    #[serde(default)]
    pub preferred_language: Option<String>,
    /// Inclusive release-year range
    #[serde(default)]
    pub year_range: Option<(i32, i32)>,
    #[serde(default)]
    pub min_rating: Option<f64>,
}

impl RecommendationRequest {
    /// Effective two-letter language code for the request
    pub fn effective_language(&self) -> &str {
        let present = |lang: &&str| !lang.is_empty();
        self.preferred_language
            .as_deref()
            .filter(present)
            .or_else(|| self.language.as_deref().filter(present))
            .unwrap_or(DEFAULT_LANGUAGE)
    }

    /// Whether the request targets the default language
    pub fn is_default_language(&self) -> bool {
        self.effective_language() == DEFAULT_LANGUAGE
    }

    /// Rejects snapshots the pipeline cannot interpret
    pub fn validate(&self) -> AppResult<()> {
        if let Some((from, to)) = self.year_range {
            if from > to {
                return Err(AppError::InvalidInput(format!(
                    "yearRange lower bound {} is after upper bound {}",
                    from, to
                )));
            }
        }

        if let Some(rating) = self.min_rating {
            if !(0.0..=10.0).contains(&rating) {
                return Err(AppError::InvalidInput(format!(
                    "minRating must be between 0 and 10, got {}",
                    rating
                )));
            }
        }

        Ok(())
    }
}
