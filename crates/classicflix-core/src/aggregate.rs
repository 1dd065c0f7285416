use classicflix_models::{Movie, MovieDetails};
use classicflix_sources::MetadataProvider;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_LIST_CAP: usize = 10;

/// Folds the answers of several metadata services into one details record
///
/// Providers are consulted in parallel but merged in the order they were
/// given, so earlier providers win scalar conflicts and list positions.
pub struct MetadataAggregator {
    providers: Vec<Arc<dyn MetadataProvider>>,
    list_cap: usize,
}

impl MetadataAggregator {
    pub fn new(providers: Vec<Arc<dyn MetadataProvider>>, list_cap: usize) -> Self {
        Self { providers, list_cap }
    }

    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.source_name()).collect()
    }

    /// Merge the local record with everything the providers know about it.
    /// Provider failures are logged and skipped.
    pub async fn aggregate(&self, movie: &Movie) -> MovieDetails {
        let reference = movie.external_ref();
        let eligible: Vec<&Arc<dyn MetadataProvider>> =
            self.providers.iter().filter(|p| p.supports(&reference)).collect();

        debug!(
            movie_id = %movie.id,
            reference = ?reference,
            providers = eligible.len(),
            "Aggregating metadata"
        );

        let lookups = eligible.iter().map(|provider| {
            let reference = &reference;
            async move { (provider.source_name(), provider.lookup(reference).await) }
        });
        let results = join_all(lookups).await;

        let mut merged = MovieDetails::from(movie);
        for (source, result) in results {
            match result {
                Ok(Some(details)) => merged.merge(&details, self.list_cap),
                Ok(None) => debug!(source, movie_id = %movie.id, "No match"),
                Err(e) => warn!(source, movie_id = %movie.id, error = %e, "Metadata lookup failed"),
            }
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use classicflix_models::ExternalRef;
    use classicflix_sources::SourceError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeProvider {
        name: &'static str,
        imdb_only: bool,
        answer: Option<MovieDetails>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl FakeProvider {
        fn answering(name: &'static str, answer: Option<MovieDetails>) -> Self {
            Self { name, imdb_only: false, answer, fail: false, calls: AtomicUsize::new(0) }
        }

        fn failing(name: &'static str) -> Self {
            Self { fail: true, ..Self::answering(name, None) }
        }

        fn imdb_only(mut self) -> Self {
            self.imdb_only = true;
            self
        }
    }

    #[async_trait]
    impl MetadataProvider for FakeProvider {
        fn source_name(&self) -> &str {
            self.name
        }

        fn supports(&self, reference: &ExternalRef) -> bool {
            !self.imdb_only || reference.is_imdb()
        }

        async fn lookup(&self, _reference: &ExternalRef) -> Result<Option<MovieDetails>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SourceError::Status { service: "fake", status: 500, message: "boom".to_string() });
            }
            Ok(self.answer.clone())
        }
    }

    fn nosferatu(wikidata_id: &str) -> Movie {
        Movie {
            id: "m1".to_string(),
            wikidata_id: Some(wikidata_id.to_string()),
            title: "Nosferatu".to_string(),
            year: 1922,
            genres: vec!["Horror".to_string()],
            ..Movie::default()
        }
    }

    fn details(director: &str, cast: &[&str]) -> MovieDetails {
        MovieDetails {
            director: Some(director.to_string()),
            cast: cast.iter().map(|c| c.to_string()).collect(),
            ..MovieDetails::default()
        }
    }

    #[tokio::test]
    async fn test_empty_responses_return_base_record() {
        let movie = nosferatu("Q151904");
        let aggregator = MetadataAggregator::new(
            vec![
                Arc::new(FakeProvider::answering("wikidata", None)),
                Arc::new(FakeProvider::answering("tmdb", Some(MovieDetails::default()))),
            ],
            DEFAULT_LIST_CAP,
        );
        assert_eq!(aggregator.aggregate(&movie).await, MovieDetails::from(&movie));
    }

    #[tokio::test]
    async fn test_earlier_provider_wins() {
        let aggregator = MetadataAggregator::new(
            vec![
                Arc::new(FakeProvider::answering("wikidata", Some(details("F. W. Murnau", &["Max Schreck"])))),
                Arc::new(FakeProvider::answering("tmdb", Some(details("Friedrich Murnau", &["max schreck", "Greta Schröder"])))),
            ],
            DEFAULT_LIST_CAP,
        );
        let merged = aggregator.aggregate(&nosferatu("tt0013442")).await;
        assert_eq!(merged.director.as_deref(), Some("F. W. Murnau"));
        assert_eq!(merged.cast, vec!["Max Schreck".to_string(), "Greta Schröder".to_string()]);
        assert_eq!(merged.genres, vec!["Horror".to_string()]);
    }

    #[tokio::test]
    async fn test_failing_provider_is_skipped() {
        let aggregator = MetadataAggregator::new(
            vec![
                Arc::new(FakeProvider::failing("wikidata")),
                Arc::new(FakeProvider::answering("omdb", Some(details("F. W. Murnau", &[])))),
            ],
            DEFAULT_LIST_CAP,
        );
        let merged = aggregator.aggregate(&nosferatu("tt0013442")).await;
        assert_eq!(merged.director.as_deref(), Some("F. W. Murnau"));
    }

    #[tokio::test]
    async fn test_imdb_only_providers_skip_other_references() {
        let omdb = Arc::new(FakeProvider::answering("omdb", Some(details("X", &[]))).imdb_only());
        let wikidata = Arc::new(FakeProvider::answering("wikidata", None));
        let aggregator = MetadataAggregator::new(vec![wikidata.clone(), omdb.clone()], DEFAULT_LIST_CAP);

        let merged = aggregator.aggregate(&nosferatu("Q151904")).await;
        assert!(merged.director.is_none());
        assert_eq!(omdb.calls.load(Ordering::SeqCst), 0);
        assert_eq!(wikidata.calls.load(Ordering::SeqCst), 1);

        aggregator.aggregate(&nosferatu("tt0013442")).await;
        assert_eq!(omdb.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_duplicate_source_is_idempotent() {
        let answer = details("F. W. Murnau", &["Max Schreck", "Alexander Granach"]);
        let once = MetadataAggregator::new(
            vec![Arc::new(FakeProvider::answering("a", Some(answer.clone())))],
            DEFAULT_LIST_CAP,
        );
        let twice = MetadataAggregator::new(
            vec![
                Arc::new(FakeProvider::answering("a", Some(answer.clone()))),
                Arc::new(FakeProvider::answering("b", Some(answer))),
            ],
            DEFAULT_LIST_CAP,
        );
        let movie = nosferatu("Q151904");
        assert_eq!(once.aggregate(&movie).await, twice.aggregate(&movie).await);
    }
}
