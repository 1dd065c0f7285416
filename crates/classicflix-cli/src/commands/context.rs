use classicflix_config::{Config, CredentialStore, PathManager};
use classicflix_core::{CacheManager, CatalogService, InteractionService, MetadataAggregator, VideoResolver};
use classicflix_sources::{create_catalog_store, CatalogStore, MediaHosts, ProviderRegistry, SourceError, SupabaseClient};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::sync::Arc;
use tracing::{debug, warn};

/// Everything a command needs, loaded once per invocation
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
    pub credentials: CredentialStore,
    pub cache: Option<CacheManager>,
    pub offline: bool,
}

impl AppContext {
    pub fn load(offline: bool) -> Result<Self> {
        let paths = PathManager::default();
        let config_file = paths.config_file();
        let config = Config::load_or_default(&config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
        config
            .validate()
            .map_err(|e| eyre!("Invalid configuration in {}: {}", config_file.display(), e))?;

        let credentials_file = paths.credentials_file();
        let mut credentials = CredentialStore::new(credentials_file.clone());
        credentials
            .load()
            .map_err(|e| eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e))?;

        let cache = match CacheManager::new(&paths) {
            Ok(cache) => Some(cache),
            Err(e) => {
                warn!("Cache unavailable: {}", e);
                None
            }
        };

        Ok(Self {
            paths,
            config,
            credentials,
            cache,
            offline,
        })
    }

    pub fn registry(&self) -> ProviderRegistry {
        ProviderRegistry::from_config(&self.config, &self.credentials)
    }

    pub fn aggregator(&self) -> MetadataAggregator {
        let registry = self.registry();
        debug!(sources = ?registry.registered_sources(), "Metadata sources");
        MetadataAggregator::new(registry.metadata_providers(), self.config.aggregation.list_cap)
    }

    pub fn resolver(&self) -> VideoResolver {
        VideoResolver::new(Arc::new(MediaHosts::new()), self.config.player.embed_origin.clone())
    }

    /// The remote store, unless running offline or it is not configured
    pub fn supabase(&self) -> Option<SupabaseClient> {
        if self.offline {
            return None;
        }
        match create_catalog_store(&self.config, &self.credentials) {
            Ok(client) => Some(client),
            Err(SourceError::Offline) => None,
            Err(e) => {
                warn!(error = %e, "Catalog store unavailable, using cached catalog");
                None
            }
        }
    }

    /// Store for commands that must write; reports why it is unavailable
    pub fn require_supabase(&self) -> Result<SupabaseClient> {
        if self.offline {
            return Err(eyre!("{}: writes are disabled with --offline", SourceError::Offline));
        }
        create_catalog_store(&self.config, &self.credentials).map_err(|e| match e {
            SourceError::MissingCredential(name) => eyre!(
                "Missing credential '{}'. Set it with: classicflix config credential {}",
                name,
                name
            ),
            other => eyre!("{}", other),
        })
    }

    pub fn catalog(&self) -> CatalogService {
        match self.supabase() {
            Some(client) => CatalogService::new(Arc::new(client), self.cache.clone()),
            None => CatalogService::offline(self.cache.clone()),
        }
    }

    pub fn interactions_with(&self, store: Arc<dyn CatalogStore>) -> InteractionService {
        InteractionService::new(store, self.cache.clone())
    }

    pub fn save_credentials(&self) -> Result<()> {
        self.credentials.save().map_err(|e| {
            eyre!(
                "Failed to save credentials to {}: {}",
                self.paths.credentials_file().display(),
                e
            )
        })
    }
}
