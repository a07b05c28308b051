pub mod fallback;
pub mod movie_lookup;
pub mod providers;
pub mod query_planner;
pub mod recommendations;
pub mod relaxation;
pub mod scoring;
pub mod transport;

pub use fallback::FallbackCatalog;
pub use providers::{CatalogProvider, TmdbProvider};
pub use recommendations::Recommender;
