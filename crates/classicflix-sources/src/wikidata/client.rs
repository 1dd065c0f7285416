use async_trait::async_trait;
use classicflix_models::{ExternalRef, MovieDetails};
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;

use crate::error::SourceError;
use crate::http;
use crate::traits::MetadataProvider;
use crate::wikidata::sparql;

pub const DEFAULT_ENDPOINT: &str = "https://query.wikidata.org/sparql";
const SERVICE: &str = "wikidata";

#[derive(Clone)]
pub struct WikidataClient {
    client: Arc<Client>,
    endpoint: String,
}

impl WikidataClient {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: Arc::new(http::create_client()),
            endpoint,
        }
    }

    /// Run a query, POSTing first and falling back to GET
    pub async fn execute(&self, query: &str) -> Result<Value, SourceError> {
        match self.execute_post(query).await {
            Ok(body) => return Ok(body),
            Err(e) => tracing::debug!(error = %e, "SPARQL POST failed, retrying with GET"),
        }

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("query", query), ("format", "json"), ("origin", "*")])
            .send()
            .await?;
        http::read_json(SERVICE, response).await
    }

    async fn execute_post(&self, query: &str) -> Result<Value, SourceError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Accept", "application/sparql-results+json")
            .form(&[("query", query), ("format", "json")])
            .send()
            .await?;
        http::read_json(SERVICE, response).await
    }

    pub async fn movie_by_qid(&self, qid: &str) -> Result<Option<MovieDetails>, SourceError> {
        let qid = qid.trim().to_uppercase();
        if !qid.starts_with('Q') {
            return Ok(None);
        }
        let body = self.execute(&sparql::movie_by_qid_query(&qid)).await?;
        Ok(sparql::parse_movie_by_qid(&qid, &body))
    }

    /// Extended credits by QID, IMDb id or English title
    pub async fn extended_details(&self, query: &str) -> Result<Option<MovieDetails>, SourceError> {
        let body = self.execute(&sparql::extended_details_query(query)).await?;
        Ok(sparql::parse_extended_details(&body))
    }

    /// Gallery thumbnails, at most ten
    pub async fn images(&self, query: &str) -> Result<Vec<String>, SourceError> {
        let body = self.execute(&sparql::images_query(query)).await?;
        Ok(sparql::parse_images(&body))
    }
}

impl Default for WikidataClient {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT.to_string())
    }
}

#[async_trait]
impl MetadataProvider for WikidataClient {
    fn source_name(&self) -> &str {
        "wikidata"
    }

    fn supports(&self, _reference: &ExternalRef) -> bool {
        true
    }

    async fn lookup(&self, reference: &ExternalRef) -> Result<Option<MovieDetails>, SourceError> {
        let extended = self.extended_details(reference.query()).await?;
        let ExternalRef::Qid(qid) = reference else {
            return Ok(extended);
        };

        match (self.movie_by_qid(qid).await?, extended) {
            (Some(mut base), Some(extended)) => {
                base.merge(&extended, usize::MAX);
                Ok(Some(base))
            }
            (base, extended) => Ok(base.or(extended)),
        }
    }
}
