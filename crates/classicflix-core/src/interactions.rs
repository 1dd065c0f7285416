use chrono::Utc;
use classicflix_models::{InteractionField, UserMovieInteraction};
use classicflix_sources::{CatalogStore, SourceError};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::cache::CacheManager;

/// Stored state for `movie_id`, or the untouched default
pub fn state_for(interactions: &[UserMovieInteraction], movie_id: &str) -> UserMovieInteraction {
    interactions
        .iter()
        .find(|i| i.movie_id == movie_id)
        .cloned()
        .unwrap_or_else(|| UserMovieInteraction::empty(movie_id))
}

/// Value a toggle writes: the flip of the stored flag, or `true` when the
/// movie has no record yet
pub fn toggled_value(interactions: &[UserMovieInteraction], movie_id: &str, field: InteractionField) -> bool {
    interactions
        .iter()
        .find(|i| i.movie_id == movie_id)
        .map(|existing| !existing.get(field))
        .unwrap_or(true)
}

/// The signed-in user's favorites, watched list, watch-later list and
/// playback positions
pub struct InteractionService {
    store: Arc<dyn CatalogStore>,
    cache: Option<CacheManager>,
    interactions: Vec<UserMovieInteraction>,
}

impl InteractionService {
    pub fn new(store: Arc<dyn CatalogStore>, cache: Option<CacheManager>) -> Self {
        Self {
            store,
            cache,
            interactions: Vec::new(),
        }
    }

    pub fn interactions(&self) -> &[UserMovieInteraction] {
        &self.interactions
    }

    pub fn state_for(&self, movie_id: &str) -> UserMovieInteraction {
        state_for(&self.interactions, movie_id)
    }

    /// Reload from the store; signed-out users have no interactions
    pub async fn refresh(&mut self) -> Result<(), SourceError> {
        if !self.store.is_authenticated() {
            self.interactions.clear();
            return Ok(());
        }
        match self.store.get_interactions().await {
            Ok(rows) => {
                debug!(count = rows.len(), "Interactions loaded");
                self.interactions = rows;
                if let Some(cache) = &self.cache {
                    if let Err(e) = cache.save_interactions(&self.interactions) {
                        warn!("Failed to cache interactions: {}", e);
                    }
                }
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Falling back to cached interactions");
                self.interactions = self
                    .cache
                    .as_ref()
                    .and_then(|c| c.load_interactions().ok().flatten())
                    .unwrap_or_default();
                Err(e)
            }
        }
    }

    fn require_login(&self) -> Result<(), SourceError> {
        if self.store.is_authenticated() {
            Ok(())
        } else {
            Err(SourceError::NotAuthenticated)
        }
    }

    async fn write(&mut self, updated: UserMovieInteraction) -> Result<UserMovieInteraction, SourceError> {
        self.store.upsert_interaction(&updated).await?;
        match self.interactions.iter_mut().find(|i| i.movie_id == updated.movie_id) {
            Some(existing) => *existing = updated.clone(),
            None => self.interactions.push(updated.clone()),
        }
        Ok(updated)
    }

    /// Flip one list membership for a movie and persist it
    pub async fn toggle(&mut self, movie_id: &str, field: InteractionField) -> Result<UserMovieInteraction, SourceError> {
        self.require_login()?;
        let value = toggled_value(&self.interactions, movie_id, field);
        let mut updated = self.state_for(movie_id);
        updated.set(field, value);
        updated.last_updated_at = Some(Utc::now());

        let updated = self.write(updated).await?;
        info!(movie_id, field = field.column(), value, "Interaction updated");
        Ok(updated)
    }

    /// Store the playback position, truncated to whole seconds
    pub async fn save_progress(&mut self, movie_id: &str, seconds: f64) -> Result<UserMovieInteraction, SourceError> {
        self.require_login()?;
        let mut updated = self.state_for(movie_id);
        updated.progress_seconds = if seconds.is_finite() && seconds > 0.0 {
            seconds.floor() as u64
        } else {
            0
        };
        updated.last_updated_at = Some(Utc::now());
        self.write(updated).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use classicflix_models::Movie;
    use classicflix_sources::{MovieUpdates, OfflineStore};
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        rows: Mutex<Vec<UserMovieInteraction>>,
    }

    #[async_trait]
    impl CatalogStore for MemoryStore {
        fn store_name(&self) -> &str {
            "memory"
        }

        fn is_authenticated(&self) -> bool {
            true
        }

        async fn fetch_movies(&self) -> Result<Vec<Movie>, SourceError> {
            Ok(Vec::new())
        }

        async fn add_movie(&self, movie: &Movie) -> Result<Movie, SourceError> {
            Ok(movie.clone())
        }

        async fn update_movie(
            &self,
            _movie_id: &str,
            _wikidata_id: Option<&str>,
            _updates: &MovieUpdates,
        ) -> Result<(), SourceError> {
            Ok(())
        }

        async fn get_interactions(&self) -> Result<Vec<UserMovieInteraction>, SourceError> {
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn upsert_interaction(&self, interaction: &UserMovieInteraction) -> Result<(), SourceError> {
            let mut rows = self.rows.lock().unwrap();
            rows.retain(|r| r.movie_id != interaction.movie_id);
            rows.push(interaction.clone());
            Ok(())
        }
    }

    #[test]
    fn test_state_for_defaults() {
        let stored = vec![UserMovieInteraction {
            is_favorite: true,
            ..UserMovieInteraction::empty("m1")
        }];
        assert!(state_for(&stored, "m1").is_favorite);
        assert_eq!(state_for(&stored, "m2"), UserMovieInteraction::empty("m2"));
    }

    #[test]
    fn test_toggled_value() {
        let stored = vec![UserMovieInteraction {
            is_watched: true,
            ..UserMovieInteraction::empty("m1")
        }];
        assert!(!toggled_value(&stored, "m1", InteractionField::Watched));
        assert!(toggled_value(&stored, "m1", InteractionField::Favorite));
        assert!(toggled_value(&stored, "m2", InteractionField::WatchLater));
    }

    #[tokio::test]
    async fn test_toggle_flips_and_persists() {
        let store = Arc::new(MemoryStore::default());
        let mut service = InteractionService::new(store.clone(), None);

        let first = service.toggle("m1", InteractionField::Favorite).await.unwrap();
        assert!(first.is_favorite);
        let second = service.toggle("m1", InteractionField::Favorite).await.unwrap();
        assert!(!second.is_favorite);

        let rows = store.get_interactions().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert!(!rows[0].is_favorite);
    }

    #[tokio::test]
    async fn test_progress_is_floored() {
        let store = Arc::new(MemoryStore::default());
        let mut service = InteractionService::new(store.clone(), None);
        service.toggle("m1", InteractionField::WatchLater).await.unwrap();

        let saved = service.save_progress("m1", 754.9).await.unwrap();
        assert_eq!(saved.progress_seconds, 754);
        assert!(saved.watch_later);

        let negative = service.save_progress("m2", -3.0).await.unwrap();
        assert_eq!(negative.progress_seconds, 0);
    }

    #[tokio::test]
    async fn test_refresh_loads_store_rows() {
        let store = Arc::new(MemoryStore::default());
        store
            .upsert_interaction(&UserMovieInteraction {
                is_watched: true,
                ..UserMovieInteraction::empty("m9")
            })
            .await
            .unwrap();
        let mut service = InteractionService::new(store, None);
        service.refresh().await.unwrap();
        assert!(service.state_for("m9").is_watched);
    }

    #[tokio::test]
    async fn test_signed_out_writes_require_login() {
        let mut service = InteractionService::new(Arc::new(OfflineStore::default()), None);
        assert!(matches!(
            service.toggle("m1", InteractionField::Watched).await,
            Err(SourceError::NotAuthenticated)
        ));
        assert!(matches!(service.save_progress("m1", 10.0).await, Err(SourceError::NotAuthenticated)));
        service.refresh().await.unwrap();
        assert!(service.interactions().is_empty());
    }
}
