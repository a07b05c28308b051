use std::sync::Arc;

use crate::{
    error::CatalogError,
    models::{Movie, MoodTables, RecommendationRequest},
    services::{
        fallback::{FallbackCatalog, MAX_RESULTS},
        providers::CatalogProvider,
        query_planner::QueryPlan,
        relaxation::{advance, Accumulator, Stage, StageOutcome},
        scoring::{self, AffinityProfile},
    },
};

/// Generates mood- and genre-aware movie recommendations
///
/// Runs the relaxation stages against the catalog until enough candidates are
/// found, ranks them by affinity, and pads default-language results from the
/// fallback catalog. Never fails: catalog errors only shrink the candidate
/// pool.
#[derive(Clone)]
pub struct Recommender {
    provider: Arc<dyn CatalogProvider>,
    fallback: Arc<FallbackCatalog>,
    moods: Arc<MoodTables>,
}

impl Recommender {
    pub fn new(
        provider: Arc<dyn CatalogProvider>,
        fallback: Arc<FallbackCatalog>,
        moods: Arc<MoodTables>,
    ) -> Self {
        Self {
            provider,
            fallback,
            moods,
        }
    }

    /// Ordered, duplicate-free recommendations for `request`
    ///
    /// At most `MAX_RESULTS` entries. Default-language requests get at least
    /// `MIN_RESULTS` when the fallback catalog is large enough; other
    /// languages may get an empty list.
    pub async fn recommend(&self, request: &RecommendationRequest) -> Vec<Movie> {
        let plan = QueryPlan::new(request, &self.moods);
        let mut accumulated = Accumulator::default();

        let mut stage = if self.provider.has_credential() {
            Stage::Strict
        } else {
            tracing::info!(
                provider = self.provider.name(),
                "No catalog credential, skipping network stages"
            );
            match advance(
                Stage::Strict,
                StageOutcome::Unavailable,
                0,
                plan.is_default_language(),
            ) {
                Some(stage) => stage,
                None => return Vec::new(),
            }
        };

        loop {
            let Some(query) = plan.query_for(stage) else {
                tracing::info!(
                    language = plan.language(),
                    accumulated = accumulated.len(),
                    "Using local fallback catalog"
                );
                return self
                    .fallback
                    .local_fallback(request, accumulated.into_movies());
            };

            let outcome = match self.provider.discover(&query).await {
                Ok(movies) => {
                    let fetched = movies.len();
                    let added = accumulated.merge(movies);
                    tracing::info!(
                        stage = %stage,
                        fetched,
                        added,
                        accumulated = accumulated.len(),
                        "Relaxation stage completed"
                    );
                    StageOutcome::Fetched
                }
                Err(CatalogError::MissingCredential) => StageOutcome::Unavailable,
                Err(e) => {
                    tracing::warn!(
                        stage = %stage,
                        error = %e,
                        "Relaxation stage failed, treating as zero results"
                    );
                    StageOutcome::Failed
                }
            };

            match advance(
                stage,
                outcome,
                accumulated.len(),
                plan.is_default_language(),
            ) {
                Some(next) => stage = next,
                None => break,
            }
        }

        let profile = AffinityProfile {
            preferred: plan.preferred_genres(),
            mood: plan.mood_genres(),
            excluded: plan.excluded_genres(),
        };
        let mut ranked = scoring::rank(accumulated.into_movies(), &profile);

        if plan.is_default_language() {
            self.fallback.guarantee(ranked)
        } else {
            ranked.truncate(MAX_RESULTS);
            ranked
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Mood, MovieId};
    use crate::services::fallback::MIN_RESULTS;
    use crate::services::providers::MockCatalogProvider;
    use mockall::Sequence;

    fn movie(id: MovieId, genre_ids: Vec<u32>, vote_average: f64) -> Movie {
        Movie {
            id,
            title: format!("Movie {}", id),
            overview: String::new(),
            poster_path: None,
            backdrop_path: None,
            release_date: "2012-03-01".to_string(),
            vote_average,
            vote_count: 300,
            genre_ids,
            popularity: 20.0,
            original_language: "en".to_string(),
            adult: false,
        }
    }

    fn catalog() -> Arc<FallbackCatalog> {
        Arc::new(FallbackCatalog::new(
            (1..=12)
                .map(|id| movie(9000 + id, vec![18], 7.0))
                .collect(),
        ))
    }

    fn recommender(provider: MockCatalogProvider) -> Recommender {
        Recommender::new(Arc::new(provider), catalog(), Arc::new(MoodTables::standard()))
    }

    fn ids(movies: &[Movie]) -> Vec<MovieId> {
        movies.iter().map(|m| m.id).collect()
    }

    #[tokio::test]
    async fn test_strict_stage_sufficient_stops_relaxing() {
        let mut provider = MockCatalogProvider::new();
        provider.expect_has_credential().return_const(true);
        provider.expect_name().return_const("mock");
        provider
            .expect_discover()
            .times(1)
            .returning(|_| Ok((1..=6).map(|id| movie(id, vec![28], 6.0)).collect()));

        let request = RecommendationRequest {
            favorite_genres: vec![28],
            ..Default::default()
        };
        let results = recommender(provider).recommend(&request).await;

        assert_eq!(&ids(&results)[..6], &[1, 2, 3, 4, 5, 6]);
        assert_eq!(results.len(), MIN_RESULTS);
    }

    #[tokio::test]
    async fn test_stages_run_in_order_and_merge() {
        let mut provider = MockCatalogProvider::new();
        let mut seq = Sequence::new();
        provider.expect_has_credential().return_const(true);
        provider.expect_name().return_const("mock");

        provider
            .expect_discover()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|q| q.release_date_to.is_some() && q.min_vote_count == Some(100))
            .returning(|_| Ok(vec![movie(1, vec![28], 7.0), movie(2, vec![28], 7.0)]));
        provider
            .expect_discover()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|q| q.min_vote_average == Some(4.0) && q.min_vote_count == Some(0))
            .returning(|_| Err(CatalogError::Timeout(std::time::Duration::from_secs(10))));
        provider
            .expect_discover()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|q| q.with_genres.is_none() && q.min_vote_average.is_none())
            .returning(|_| {
                Ok(vec![
                    movie(2, vec![28], 7.0),
                    movie(3, vec![35], 7.0),
                    movie(4, vec![35], 7.0),
                    movie(5, vec![35], 7.0),
                ])
            });

        let request = RecommendationRequest {
            favorite_genres: vec![28],
            ..Default::default()
        };
        let results = recommender(provider).recommend(&request).await;

        assert_eq!(&ids(&results)[..5], &[1, 2, 3, 4, 5]);
        assert_eq!(results.len(), MIN_RESULTS);
    }

    #[tokio::test]
    async fn test_all_stages_sparse_uses_local_fallback() {
        let mut provider = MockCatalogProvider::new();
        provider.expect_has_credential().return_const(true);
        provider.expect_name().return_const("mock");
        provider
            .expect_discover()
            .times(3)
            .returning(|_| Ok(vec![movie(1, vec![16], 5.0)]));

        let request = RecommendationRequest {
            mood: Mood::Thrilled,
            ..Default::default()
        };
        let results = recommender(provider).recommend(&request).await;

        // Local stage is mood-unaware: the excluded animation title survives
        assert_eq!(ids(&results)[0], 1);
        assert_eq!(results.len(), MIN_RESULTS);
    }

    #[tokio::test]
    async fn test_no_credential_skips_network() {
        let mut provider = MockCatalogProvider::new();
        provider.expect_has_credential().return_const(false);
        provider.expect_name().return_const("mock");
        provider.expect_discover().never();

        let results = recommender(provider)
            .recommend(&RecommendationRequest::default())
            .await;
        assert_eq!(ids(&results), (9001..=9010).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_no_credential_non_default_language_is_empty() {
        let mut provider = MockCatalogProvider::new();
        provider.expect_has_credential().return_const(false);
        provider.expect_name().return_const("mock");
        provider.expect_discover().never();

        let request = RecommendationRequest {
            language: Some("ja".to_string()),
            ..Default::default()
        };
        assert!(recommender(provider).recommend(&request).await.is_empty());
    }

    #[tokio::test]
    async fn test_non_default_language_is_not_padded() {
        let mut provider = MockCatalogProvider::new();
        provider.expect_has_credential().return_const(true);
        provider.expect_name().return_const("mock");
        provider
            .expect_discover()
            .times(3)
            .returning(|q| {
                assert_eq!(q.with_original_language, "de");
                assert_eq!(q.language, "de-DE");
                Ok(vec![movie(42, vec![18], 7.0)])
            });

        let request = RecommendationRequest {
            preferred_language: Some("de".to_string()),
            ..Default::default()
        };
        let results = recommender(provider).recommend(&request).await;
        assert_eq!(ids(&results), vec![42]);
    }

    #[tokio::test]
    async fn test_non_default_language_is_capped() {
        let mut provider = MockCatalogProvider::new();
        provider.expect_has_credential().return_const(true);
        provider.expect_name().return_const("mock");
        provider
            .expect_discover()
            .times(1)
            .returning(|_| Ok((1..=30).map(|id| movie(id, vec![18], 7.0)).collect()));

        let request = RecommendationRequest {
            language: Some("it".to_string()),
            ..Default::default()
        };
        let results = recommender(provider).recommend(&request).await;
        assert_eq!(results.len(), MAX_RESULTS);
    }
}
