use async_trait::async_trait;
use classicflix_models::{ExternalRef, Movie, MovieDetails};
use reqwest::Client;
use std::sync::Arc;

use crate::error::SourceError;
use crate::http;
use crate::omdb::api;
use crate::traits::{MetadataProvider, MovieSearch};

#[derive(Clone)]
pub struct OmdbClient {
    client: Arc<Client>,
    api_key: String,
}

impl OmdbClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Arc::new(http::create_client()),
            api_key,
        }
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Movie>, SourceError> {
        tracing::debug!(query = %query, "Searching OMDb");
        api::search(&self.client, &self.api_key, query).await
    }

    pub async fn details(&self, imdb_id: &str) -> Result<Option<MovieDetails>, SourceError> {
        tracing::debug!(imdb_id = %imdb_id, "Fetching OMDb details");
        api::details(&self.client, &self.api_key, imdb_id).await
    }
}

#[async_trait]
impl MetadataProvider for OmdbClient {
    fn source_name(&self) -> &str {
        "omdb"
    }

    async fn lookup(&self, reference: &ExternalRef) -> Result<Option<MovieDetails>, SourceError> {
        match reference {
            ExternalRef::Imdb(imdb_id) => self.details(imdb_id).await,
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl MovieSearch for OmdbClient {
    fn source_name(&self) -> &str {
        "omdb"
    }

    async fn search(&self, query: &str) -> Result<Vec<Movie>, SourceError> {
        OmdbClient::search(self, query).await
    }
}
