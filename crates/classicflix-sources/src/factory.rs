//! Builds the metadata clients and the catalog store from configuration.

use classicflix_config::{Config, CredentialStore};
use std::sync::Arc;
use tracing::warn;

use crate::error::SourceError;
use crate::supabase::SupabaseClient;
use crate::traits::{MetadataProvider, MovieSearch};
use crate::{OfdbClient, OmdbClient, TmdbClient, TvMazeClient, WikidataClient};

/// Factory for one metadata service
pub trait ProviderFactory: Send + Sync {
    fn source_name(&self) -> &'static str;

    /// Create the client; `Ok(None)` when the service is disabled
    fn create(&self, config: &Config, credentials: &CredentialStore) -> Result<Option<Source>, SourceError>;
}

/// A constructed client and the roles it can play
#[derive(Clone)]
pub struct Source {
    pub metadata: Option<Arc<dyn MetadataProvider>>,
    pub search: Option<Arc<dyn MovieSearch>>,
}

fn require(value: Option<String>, name: &'static str) -> Result<String, SourceError> {
    value.ok_or(SourceError::MissingCredential(name))
}

struct WikidataFactory;
struct TmdbFactory;
struct OmdbFactory;
struct TvMazeFactory;
struct OfdbFactory;

impl ProviderFactory for WikidataFactory {
    fn source_name(&self) -> &'static str {
        "wikidata"
    }

    fn create(&self, config: &Config, _credentials: &CredentialStore) -> Result<Option<Source>, SourceError> {
        Ok(config.sources.wikidata.as_ref().filter(|c| c.enabled).map(|c| Source {
            metadata: Some(Arc::new(WikidataClient::new(c.endpoint.clone())) as Arc<dyn MetadataProvider>),
            search: None,
        }))
    }
}

impl ProviderFactory for TmdbFactory {
    fn source_name(&self) -> &'static str {
        "tmdb"
    }

    fn create(&self, config: &Config, credentials: &CredentialStore) -> Result<Option<Source>, SourceError> {
        let Some(tmdb) = config.sources.tmdb.as_ref().filter(|c| c.enabled) else {
            return Ok(None);
        };
        let api_key = require(credentials.get_tmdb_api_key(), "tmdb_api_key")?;
        let client = Arc::new(TmdbClient::new(api_key, tmdb.language.clone()));
        Ok(Some(Source {
            metadata: Some(client.clone()),
            search: Some(client),
        }))
    }
}

impl ProviderFactory for OmdbFactory {
    fn source_name(&self) -> &'static str {
        "omdb"
    }

    fn create(&self, config: &Config, credentials: &CredentialStore) -> Result<Option<Source>, SourceError> {
        if !config.is_omdb_enabled() {
            return Ok(None);
        }
        let api_key = require(credentials.get_omdb_api_key(), "omdb_api_key")?;
        let client = Arc::new(OmdbClient::new(api_key));
        Ok(Some(Source {
            metadata: Some(client.clone()),
            search: Some(client),
        }))
    }
}

impl ProviderFactory for TvMazeFactory {
    fn source_name(&self) -> &'static str {
        "tvmaze"
    }

    fn create(&self, config: &Config, _credentials: &CredentialStore) -> Result<Option<Source>, SourceError> {
        if !config.is_tvmaze_enabled() {
            return Ok(None);
        }
        let client = Arc::new(TvMazeClient::new());
        Ok(Some(Source {
            metadata: Some(client.clone()),
            search: Some(client),
        }))
    }
}

impl ProviderFactory for OfdbFactory {
    fn source_name(&self) -> &'static str {
        "ofdb"
    }

    fn create(&self, config: &Config, _credentials: &CredentialStore) -> Result<Option<Source>, SourceError> {
        Ok(config.sources.ofdb.as_ref().filter(|c| c.enabled).map(|c| Source {
            metadata: None,
            search: Some(Arc::new(OfdbClient::new(c.proxy_url.clone())) as Arc<dyn MovieSearch>),
        }))
    }
}

/// All configured services, kept in merge priority order
/// (Wikidata, TMDb, OMDb, TVMaze, then search-only OFDb)
pub struct ProviderRegistry {
    sources: Vec<(&'static str, Source)>,
}

impl ProviderRegistry {
    fn factories() -> Vec<Box<dyn ProviderFactory>> {
        vec![
            Box::new(WikidataFactory),
            Box::new(TmdbFactory),
            Box::new(OmdbFactory),
            Box::new(TvMazeFactory),
            Box::new(OfdbFactory),
        ]
    }

    /// Build every enabled service. A service whose credential is missing is
    /// skipped with a warning rather than failing the whole registry.
    pub fn from_config(config: &Config, credentials: &CredentialStore) -> Self {
        let mut sources = Vec::new();
        for factory in Self::factories() {
            match factory.create(config, credentials) {
                Ok(Some(source)) => sources.push((factory.source_name(), source)),
                Ok(None) => {}
                Err(e) => warn!(source = factory.source_name(), error = %e, "Skipping metadata source"),
            }
        }
        Self { sources }
    }

    pub fn empty() -> Self {
        Self { sources: Vec::new() }
    }

    /// Register a source after the built-in ones
    pub fn register(&mut self, name: &'static str, source: Source) {
        self.sources.push((name, source));
    }

    pub fn metadata_providers(&self) -> Vec<Arc<dyn MetadataProvider>> {
        self.sources.iter().filter_map(|(_, s)| s.metadata.clone()).collect()
    }

    pub fn searchers(&self) -> Vec<Arc<dyn MovieSearch>> {
        self.sources.iter().filter_map(|(_, s)| s.search.clone()).collect()
    }

    pub fn searcher(&self, name: &str) -> Option<Arc<dyn MovieSearch>> {
        self.sources
            .iter()
            .find(|(n, _)| *n == name)
            .and_then(|(_, s)| s.search.clone())
    }

    pub fn registered_sources(&self) -> Vec<&'static str> {
        self.sources.iter().map(|(n, _)| *n).collect()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.sources.iter().any(|(n, _)| *n == name)
    }
}

/// The Supabase catalog store, carrying any stored session
pub fn create_catalog_store(config: &Config, credentials: &CredentialStore) -> Result<SupabaseClient, SourceError> {
    if !config.supabase.enabled {
        return Err(SourceError::Offline);
    }
    let anon_key = require(credentials.get_supabase_anon_key(), "supabase_anon_key")?;
    Ok(SupabaseClient::new(config.supabase.url.clone(), anon_key).with_session(credentials.get_session()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use classicflix_config::{OmdbConfig, SourceConfig, TvMazeConfig, WikidataConfig};
    use std::path::PathBuf;

    fn credentials() -> CredentialStore {
        CredentialStore::new(PathBuf::from("/nonexistent/classicflix/credentials.toml"))
    }

    #[test]
    fn test_registry_orders_by_priority() {
        let mut creds = credentials();
        creds.set_omdb_api_key("key".to_string());

        let config = Config {
            sources: SourceConfig {
                omdb: Some(OmdbConfig { enabled: true }),
                tvmaze: Some(TvMazeConfig { enabled: true }),
                wikidata: Some(WikidataConfig::enabled()),
                ..SourceConfig::default()
            },
            ..Config::default()
        };

        let registry = ProviderRegistry::from_config(&config, &creds);
        assert_eq!(registry.registered_sources(), vec!["wikidata", "omdb", "tvmaze"]);
        let names: Vec<String> = registry
            .metadata_providers()
            .iter()
            .map(|p| p.source_name().to_string())
            .collect();
        assert_eq!(names, vec!["wikidata", "omdb", "tvmaze"]);
        assert!(registry.searcher("omdb").is_some());
        assert!(registry.searcher("wikidata").is_none());
    }

    #[test]
    fn test_registry_skips_tmdb_without_key() {
        if std::env::var("TMDB_API_KEY").is_ok() {
            return;
        }
        let config = Config::starter();
        let registry = ProviderRegistry::from_config(&config, &credentials());
        assert!(!registry.is_registered("tmdb"));
        assert!(registry.is_registered("ofdb"));
    }

    #[test]
    fn test_register_appends_after_builtin_sources() {
        let mut registry = ProviderRegistry::empty();
        registry.register(
            "ofdb",
            Source {
                metadata: None,
                search: Some(Arc::new(OfdbClient::new("https://proxy.example/get?url=".to_string()))),
            },
        );
        assert_eq!(registry.registered_sources(), vec!["ofdb"]);
        assert!(registry.metadata_providers().is_empty());
        assert_eq!(registry.searchers().len(), 1);
    }
}
