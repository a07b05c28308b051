mod mood;
mod movie;
mod recommendation;

pub use mood::{Mood, MoodTables};
pub use movie::{ApiGenre, ApiMovieDetails, GenreId, Movie, MovieId, MoviePage};
pub use recommendation::{RecommendationRequest, DEFAULT_LANGUAGE};
