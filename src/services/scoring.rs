use crate::models::{GenreId, Movie};

const PREFERRED_GENRE_WEIGHT: f64 = 40.0;
const MOOD_GENRE_WEIGHT: f64 = 30.0;
const BOTH_MATCH_BONUS: f64 = 100.0;
const RATING_WEIGHT: f64 = 2.0;
const POPULARITY_DIVISOR: f64 = 50.0;
const POPULARITY_CAP: f64 = 10.0;

/// Genre sets a candidate is ranked against
#[derive(Debug, Clone, Copy)]
pub struct AffinityProfile<'a> {
    pub preferred: &'a [GenreId],
    pub mood: &'a [GenreId],
    pub excluded: &'a [GenreId],
}

#[derive(Debug, Clone)]
struct ScoredCandidate {
    movie: Movie,
    score: f64,
}

/// Affinity of `movie` to the preferred and mood genres
pub fn score(movie: &Movie, preferred: &[GenreId], mood: &[GenreId]) -> f64 {
    let preferred_matches = movie.genre_matches(preferred);
    let mood_matches = movie.genre_matches(mood);

    let mut score = preferred_matches as f64 * PREFERRED_GENRE_WEIGHT
        + mood_matches as f64 * MOOD_GENRE_WEIGHT;
    if preferred_matches > 0 && mood_matches > 0 {
        score += BOTH_MATCH_BONUS;
    }

    score + movie.vote_average * RATING_WEIGHT
        + (movie.popularity / POPULARITY_DIVISOR).min(POPULARITY_CAP)
}

/// Scores, drops excluded genres, and sorts by descending score
///
/// Equal scores keep their merge order. If the exclusion filter would leave
/// nothing, the unfiltered candidates are returned in their original order.
pub fn rank(candidates: Vec<Movie>, profile: &AffinityProfile<'_>) -> Vec<Movie> {
    let mut scored: Vec<ScoredCandidate> = candidates
        .iter()
        .map(|movie| ScoredCandidate {
            score: score(movie, profile.preferred, profile.mood),
            movie: movie.clone(),
        })
        .filter(|candidate| !candidate.movie.has_any_genre(profile.excluded))
        .collect();

    if scored.is_empty() {
        if !candidates.is_empty() {
            tracing::debug!(
                candidates = candidates.len(),
                "Exclusion filter removed every candidate, keeping unfiltered set"
            );
        }
        return candidates;
    }

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.into_iter().map(|candidate| candidate.movie).collect()
}
