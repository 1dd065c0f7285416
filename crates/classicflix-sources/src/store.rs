use async_trait::async_trait;
use classicflix_models::{Movie, UserMovieInteraction};

use crate::error::SourceError;
use crate::supabase::MovieUpdates;
use crate::traits::CatalogStore;

/// Read-only stand-in used when the catalog service is unreachable
///
/// Serves the last cached snapshot; every write fails with [`SourceError::Offline`].
#[derive(Debug, Clone, Default)]
pub struct OfflineStore {
    snapshot: Vec<Movie>,
}

impl OfflineStore {
    pub fn new(snapshot: Vec<Movie>) -> Self {
        Self { snapshot }
    }
}

#[async_trait]
impl CatalogStore for OfflineStore {
    fn store_name(&self) -> &str {
        "offline"
    }

    fn is_authenticated(&self) -> bool {
        false
    }

    async fn fetch_movies(&self) -> Result<Vec<Movie>, SourceError> {
        Ok(self.snapshot.clone())
    }

    async fn add_movie(&self, _movie: &Movie) -> Result<Movie, SourceError> {
        Err(SourceError::Offline)
    }

    async fn update_movie(
        &self,
        _movie_id: &str,
        _wikidata_id: Option<&str>,
        _updates: &MovieUpdates,
    ) -> Result<(), SourceError> {
        Err(SourceError::Offline)
    }

    async fn get_interactions(&self) -> Result<Vec<UserMovieInteraction>, SourceError> {
        Ok(Vec::new())
    }

    async fn upsert_interaction(&self, _interaction: &UserMovieInteraction) -> Result<(), SourceError> {
        Err(SourceError::Offline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_offline_store_serves_snapshot_and_rejects_writes() {
        let movie = Movie {
            id: "m1".to_string(),
            title: "Metropolis".to_string(),
            ..Movie::default()
        };
        let store = OfflineStore::new(vec![movie.clone()]);

        assert_eq!(store.fetch_movies().await.unwrap(), vec![movie.clone()]);
        assert!(store.get_interactions().await.unwrap().is_empty());
        assert!(matches!(store.add_movie(&movie).await, Err(SourceError::Offline)));
        assert!(matches!(
            store.upsert_interaction(&UserMovieInteraction::empty("m1")).await,
            Err(SourceError::Offline)
        ));
    }
}
