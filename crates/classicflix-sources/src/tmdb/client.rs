use async_trait::async_trait;
use classicflix_models::{ExternalRef, Movie, MovieDetails};
use reqwest::Client;
use std::sync::Arc;

use crate::error::SourceError;
use crate::http;
use crate::tmdb::api;
use crate::traits::{MetadataProvider, MovieSearch};

#[derive(Clone)]
pub struct TmdbClient {
    client: Arc<Client>,
    api_key: String,
    language: String,
}

impl TmdbClient {
    pub fn new(api_key: String, language: String) -> Self {
        Self {
            client: Arc::new(http::create_client()),
            api_key,
            language,
        }
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Movie>, SourceError> {
        tracing::debug!(query = %query, language = %self.language, "Searching TMDb movies");
        api::search(&self.client, &self.api_key, query, &self.language).await
    }

    /// Details by TMDb id (`653` or `tmdb-653`); unknown ids yield `None`
    pub async fn details(&self, tmdb_id: &str) -> Result<Option<MovieDetails>, SourceError> {
        tracing::debug!(tmdb_id = %tmdb_id, "Fetching TMDb movie details");
        match api::details(&self.client, &self.api_key, tmdb_id, &self.language).await {
            Ok(details) => Ok(Some(details)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn find_by_imdb(&self, imdb_id: &str) -> Result<Option<MovieDetails>, SourceError> {
        let Some(tmdb_id) = api::find_by_imdb(&self.client, &self.api_key, imdb_id, &self.language).await? else {
            tracing::debug!(imdb_id = %imdb_id, "No TMDb movie for IMDb id");
            return Ok(None);
        };
        self.details(&tmdb_id.to_string()).await
    }
}

#[async_trait]
impl MetadataProvider for TmdbClient {
    fn source_name(&self) -> &str {
        "tmdb"
    }

    async fn lookup(&self, reference: &ExternalRef) -> Result<Option<MovieDetails>, SourceError> {
        match reference {
            ExternalRef::Imdb(imdb_id) => self.find_by_imdb(imdb_id).await,
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl MovieSearch for TmdbClient {
    fn source_name(&self) -> &str {
        "tmdb"
    }

    async fn search(&self, query: &str) -> Result<Vec<Movie>, SourceError> {
        TmdbClient::search(self, query).await
    }
}
