/// Catalog data provider abstraction
///
/// The recommendation pipeline and the lookups talk to the catalog only
/// through this trait, so the network can be swapped for stubs in tests.
use crate::{
    error::CatalogResult,
    models::{Movie, MovieId},
    services::query_planner::DiscoverQuery,
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for movie catalog providers
///
/// All operations are idempotent reads. Failures are reported as
/// `CatalogError` and are never retried by callers; retrying is the
/// provider's transport's job.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// One page of discovery results for `query`
    async fn discover(&self, query: &DiscoverQuery) -> CatalogResult<Vec<Movie>>;

    /// Free-text title search
    async fn search(&self, query: &str, language: &str) -> CatalogResult<Vec<Movie>>;

    /// Full record for a single movie
    async fn movie_details(&self, id: MovieId, language: &str) -> CatalogResult<Movie>;

    /// Whether a credential is configured at all
    ///
    /// When false every call fails with `MissingCredential` without network
    /// traffic.
    fn has_credential(&self) -> bool;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
