use async_trait::async_trait;
use classicflix_config::Session;
use classicflix_models::{Movie, UserMovieInteraction};
use reqwest::Client;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::SourceError;
use crate::http;
use crate::supabase::api::{self, MovieUpdates, Rest};
use crate::supabase::{auth, normalize};
use crate::traits::CatalogStore;

#[derive(Clone)]
pub struct SupabaseClient {
    client: Arc<Client>,
    base_url: String,
    anon_key: String,
    session: Option<Session>,
}

impl SupabaseClient {
    pub fn new(base_url: String, anon_key: String) -> Self {
        Self {
            client: Arc::new(http::create_client()),
            base_url,
            anon_key,
            session: None,
        }
    }

    /// Attach a previously stored session; expired sessions are ignored
    pub fn with_session(mut self, session: Option<Session>) -> Self {
        self.session = session.filter(|s| !s.is_expired());
        self
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    fn rest(&self) -> Rest<'_> {
        Rest {
            client: &self.client,
            base_url: &self.base_url,
            anon_key: &self.anon_key,
            bearer: self
                .session
                .as_ref()
                .map(|s| s.access_token.as_str())
                .unwrap_or(self.anon_key.as_str()),
        }
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<Session, SourceError> {
        let session = auth::sign_in(&self.client, &self.base_url, &self.anon_key, email, password).await?;
        info!(user_id = %session.user_id, "Signed in to Supabase");
        self.session = Some(session.clone());
        Ok(session)
    }

    pub async fn sign_up(&mut self, email: &str, password: &str) -> Result<Option<Session>, SourceError> {
        let session = auth::sign_up(&self.client, &self.base_url, &self.anon_key, email, password).await?;
        match session {
            Some(ref s) => {
                info!(user_id = %s.user_id, "Account created and signed in");
                self.session = Some(s.clone());
            }
            None => info!(email = %email, "Account created, awaiting email confirmation"),
        }
        Ok(session)
    }

    /// End the session locally even when the server call fails
    pub async fn sign_out(&mut self) -> Result<(), SourceError> {
        let Some(session) = self.session.take() else {
            return Ok(());
        };
        auth::sign_out(&self.client, &self.base_url, &self.anon_key, &session.access_token).await
    }

    fn user_id(&self) -> Result<&str, SourceError> {
        self.session
            .as_ref()
            .map(|s| s.user_id.as_str())
            .ok_or(SourceError::NotAuthenticated)
    }
}

#[async_trait]
impl CatalogStore for SupabaseClient {
    fn store_name(&self) -> &str {
        "supabase"
    }

    fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    async fn fetch_movies(&self) -> Result<Vec<Movie>, SourceError> {
        let rest = self.rest();
        let (movies, technical, descriptions) = futures::try_join!(
            rest.select_all(api::MOVIES_TABLE),
            rest.select_all(api::TECHNICAL_TABLE),
            rest.select_all(api::DESCRIPTION_TABLE),
        )?;
        Ok(normalize::build_movies(&movies, &technical, &descriptions))
    }

    async fn add_movie(&self, movie: &Movie) -> Result<Movie, SourceError> {
        let millis = chrono::Utc::now().timestamp_millis();
        let mut stored = movie.clone();
        if stored.id.is_empty() {
            stored.id = format!("db-{}", millis);
        }
        if stored.wikidata_id.as_deref().map(str::is_empty).unwrap_or(true) {
            stored.wikidata_id = Some(format!("custom-{}", millis));
        }

        let (movie_row, description_row, technical_row) = api::insert_rows(&stored);
        let rest = self.rest();
        rest.insert(api::MOVIES_TABLE, &movie_row).await?;
        rest.insert(api::DESCRIPTION_TABLE, &description_row).await?;
        rest.insert(api::TECHNICAL_TABLE, &technical_row).await?;

        info!(id = %stored.id, title = %stored.title, "Added movie to catalog");
        Ok(stored)
    }

    async fn update_movie(
        &self,
        movie_id: &str,
        wikidata_id: Option<&str>,
        updates: &MovieUpdates,
    ) -> Result<(), SourceError> {
        let routed = api::split_updates(updates);
        let rest = self.rest();

        if !routed.movies.is_empty() {
            rest.update(api::MOVIES_TABLE, "id", movie_id, &routed.movies).await?;
        }

        match wikidata_id.filter(|id| !id.is_empty()) {
            Some(wikidata_id) => {
                if !routed.description.is_empty() {
                    rest.update(api::DESCRIPTION_TABLE, "wikidataId", wikidata_id, &routed.description)
                        .await?;
                }
                if !routed.technical.is_empty() {
                    rest.update(api::TECHNICAL_TABLE, "wikidataId", wikidata_id, &routed.technical)
                        .await?;
                }
            }
            None if !routed.description.is_empty() || !routed.technical.is_empty() => {
                warn!(movie_id = %movie_id, "No wikidataId, skipping description and technical updates");
            }
            None => {}
        }
        Ok(())
    }

    async fn get_interactions(&self) -> Result<Vec<UserMovieInteraction>, SourceError> {
        let Ok(user_id) = self.user_id() else {
            return Ok(Vec::new());
        };
        let filter = [("user_id", format!("eq.{}", user_id))];
        let rest = self.rest();

        match rest.select(api::INTERACTIONS_TABLE, &filter).await {
            Ok(rows) => Ok(rows),
            Err(e) => {
                warn!(error = %e, "Falling back to {}", api::LEGACY_INTERACTIONS_TABLE);
                rest.select(api::LEGACY_INTERACTIONS_TABLE, &filter).await
            }
        }
    }

    async fn upsert_interaction(&self, interaction: &UserMovieInteraction) -> Result<(), SourceError> {
        let user_id = self.user_id()?;
        let rest = self.rest();

        let row = api::interaction_row(user_id, interaction, true);
        match rest.upsert(api::INTERACTIONS_TABLE, &row, "user_id,movie_id").await {
            Err(e) if e.is_missing_table() => {
                let legacy = api::interaction_row(user_id, interaction, false);
                rest.upsert(api::LEGACY_INTERACTIONS_TABLE, &legacy, "user_id,movie_id").await
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(expired: bool) -> Session {
        let offset = if expired { -1 } else { 1 };
        Session {
            access_token: "jwt".to_string(),
            refresh_token: None,
            user_id: "u1".to_string(),
            email: None,
            expires_at: Some(chrono::Utc::now() + chrono::Duration::hours(offset)),
        }
    }

    #[test]
    fn test_with_session_drops_expired() {
        let client = SupabaseClient::new("https://x.supabase.co".into(), "anon".into());
        assert!(!client.clone().with_session(Some(session(true))).is_authenticated());
        assert!(client.with_session(Some(session(false))).is_authenticated());
    }

    #[test]
    fn test_rest_bearer_falls_back_to_anon_key() {
        let client = SupabaseClient::new("https://x.supabase.co".into(), "anon".into());
        assert_eq!(client.rest().bearer, "anon");
        let client = client.with_session(Some(session(false)));
        assert_eq!(client.rest().bearer, "jwt");
    }

    #[tokio::test]
    async fn test_upsert_requires_login() {
        let client = SupabaseClient::new("https://x.supabase.co".into(), "anon".into());
        let result = client.upsert_interaction(&UserMovieInteraction::empty("m1")).await;
        assert!(matches!(result, Err(SourceError::NotAuthenticated)));
        assert!(client.get_interactions().await.unwrap().is_empty());
    }
}
