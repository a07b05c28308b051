//! Relaxation state machine
//!
//! Stages run in order, each widening the query, until enough unique
//! candidates have been accumulated. The transition function is pure so the
//! "should we advance" decision can be tested without any network.

use std::collections::HashSet;
use std::fmt::Display;

use crate::models::{Movie, MovieId};

/// Unique candidates needed before relaxation stops
pub const RELAXATION_THRESHOLD: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Requested filters, "(preferred) AND (mood)" genres
    Strict,
    /// Lower rating floor, wider years, "(preferred) OR (mood)" genres
    Relaxed,
    /// Popularity in the requested language only
    PopularInLanguage,
    /// Bundled catalog, no network; default language only
    LocalFallback,
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Strict => "strict",
            Stage::Relaxed => "relaxed",
            Stage::PopularInLanguage => "popular_in_language",
            Stage::LocalFallback => "local_fallback",
        };
        write!(f, "{}", name)
    }
}

/// What a network stage produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// The call succeeded, possibly with zero movies
    Fetched,
    /// Timeout, exhausted retries, bad status or unparsable body
    Failed,
    /// No credential: the network is unreachable for every stage
    Unavailable,
}

/// Decides the stage after `stage`, or `None` to stop relaxing
///
/// A failed stage counts as zero results. An unavailable network skips
/// straight to the local stage, which is only reachable for the default
/// language.
pub fn advance(
    stage: Stage,
    outcome: StageOutcome,
    accumulated: usize,
    default_language: bool,
) -> Option<Stage> {
    let local = if default_language {
        Some(Stage::LocalFallback)
    } else {
        None
    };

    if outcome == StageOutcome::Unavailable {
        return match stage {
            Stage::LocalFallback => None,
            _ => local,
        };
    }

    if accumulated >= RELAXATION_THRESHOLD {
        return None;
    }

    match stage {
        Stage::Strict => Some(Stage::Relaxed),
        Stage::Relaxed => Some(Stage::PopularInLanguage),
        Stage::PopularInLanguage => local,
        Stage::LocalFallback => None,
    }
}

/// Candidates merged across stages
///
/// Append-only: an identity, once accepted, is never removed or reordered.
#[derive(Debug, Default)]
pub struct Accumulator {
    movies: Vec<Movie>,
    seen: HashSet<MovieId>,
}

impl Accumulator {
    /// Appends movies whose identity is new, returning how many were added
    pub fn merge(&mut self, batch: Vec<Movie>) -> usize {
        let before = self.movies.len();
        for movie in batch {
            if self.seen.insert(movie.id) {
                self.movies.push(movie);
            }
        }
        self.movies.len() - before
    }

    pub(crate) fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn into_movies(self) -> Vec<Movie> {
        self.movies
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(acc: &Accumulator) -> Vec<MovieId> {
        acc.movies.iter().map(|m| m.id).collect()
    }

    fn movie(id: MovieId) -> Movie {
        Movie {
            id,
            title: format!("Movie {}", id),
            overview: String::new(),
            poster_path: None,
            backdrop_path: None,
            release_date: "2010-01-01".to_string(),
            vote_average: 7.0,
            vote_count: 100,
            genre_ids: vec![],
            popularity: 10.0,
            original_language: "en".to_string(),
            adult: false,
        }
    }

    #[test]
    fn test_advances_while_below_threshold() {
        let fetched = StageOutcome::Fetched;
        assert_eq!(advance(Stage::Strict, fetched, 3, true), Some(Stage::Relaxed));
        assert_eq!(
            advance(Stage::Relaxed, fetched, 4, true),
            Some(Stage::PopularInLanguage)
        );
        assert_eq!(
            advance(Stage::PopularInLanguage, fetched, 4, true),
            Some(Stage::LocalFallback)
        );
        assert_eq!(advance(Stage::LocalFallback, fetched, 4, true), None);
    }

    #[test]
    fn test_stops_at_threshold() {
        let fetched = StageOutcome::Fetched;
        assert_eq!(advance(Stage::Strict, fetched, 5, true), None);
        assert_eq!(advance(Stage::Relaxed, fetched, 12, false), None);
    }

    #[test]
    fn test_local_stage_is_default_language_only() {
        assert_eq!(
            advance(Stage::PopularInLanguage, StageOutcome::Fetched, 0, false),
            None
        );
        assert_eq!(
            advance(Stage::PopularInLanguage, StageOutcome::Failed, 2, true),
            Some(Stage::LocalFallback)
        );
    }

    #[test]
    fn test_failure_counts_as_zero_results() {
        assert_eq!(
            advance(Stage::Strict, StageOutcome::Failed, 0, false),
            Some(Stage::Relaxed)
        );
        assert_eq!(
            advance(Stage::Strict, StageOutcome::Failed, 0, true),
            advance(Stage::Strict, StageOutcome::Fetched, 0, true)
        );
    }

    #[test]
    fn test_unavailable_jumps_to_local_fallback() {
        assert_eq!(
            advance(Stage::Strict, StageOutcome::Unavailable, 0, true),
            Some(Stage::LocalFallback)
        );
        assert_eq!(advance(Stage::Strict, StageOutcome::Unavailable, 0, false), None);
    }

    #[test]
    fn test_merge_is_append_only_and_dedups() {
        let mut acc = Accumulator::default();
        assert_eq!(acc.merge(vec![movie(1), movie(2), movie(3)]), 3);
        assert_eq!(acc.merge(vec![movie(3), movie(4), movie(1), movie(5)]), 2);
        assert_eq!(ids(&acc), vec![1, 2, 3, 4, 5]);

        assert_eq!(acc.merge(vec![]), 0);
        assert_eq!(acc.merge(vec![movie(6), movie(6)]), 1);
        assert_eq!(ids(&acc), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(acc.len(), 6);
    }

    #[test]
    fn test_merge_keeps_first_copy() {
        let mut acc = Accumulator::default();
        acc.merge(vec![movie(1)]);

        let mut changed = movie(1);
        changed.title = "Different".to_string();
        acc.merge(vec![changed]);

        assert_eq!(acc.into_movies()[0].title, "Movie 1");
    }
}
