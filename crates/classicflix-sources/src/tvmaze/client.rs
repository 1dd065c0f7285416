use async_trait::async_trait;
use classicflix_models::{ExternalRef, Movie, MovieDetails};
use reqwest::Client;
use std::sync::Arc;

use crate::error::SourceError;
use crate::http;
use crate::traits::{MetadataProvider, MovieSearch};
use crate::tvmaze::api;

#[derive(Clone)]
pub struct TvMazeClient {
    client: Arc<Client>,
}

impl TvMazeClient {
    pub fn new() -> Self {
        Self {
            client: Arc::new(http::create_client()),
        }
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Movie>, SourceError> {
        tracing::debug!(query = %query, "Searching TVMaze shows");
        api::search(&self.client, query).await
    }

    pub async fn details(&self, tvmaze_id: &str) -> Result<MovieDetails, SourceError> {
        api::details(&self.client, tvmaze_id).await
    }

    pub async fn lookup_by_imdb(&self, imdb_id: &str) -> Result<Option<MovieDetails>, SourceError> {
        api::lookup_by_imdb(&self.client, imdb_id).await
    }
}

impl Default for TvMazeClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetadataProvider for TvMazeClient {
    fn source_name(&self) -> &str {
        "tvmaze"
    }

    async fn lookup(&self, reference: &ExternalRef) -> Result<Option<MovieDetails>, SourceError> {
        match reference {
            ExternalRef::Imdb(imdb_id) => self.lookup_by_imdb(imdb_id).await,
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl MovieSearch for TvMazeClient {
    fn source_name(&self) -> &str {
        "tvmaze"
    }

    async fn search(&self, query: &str) -> Result<Vec<Movie>, SourceError> {
        TvMazeClient::search(self, query).await
    }
}
