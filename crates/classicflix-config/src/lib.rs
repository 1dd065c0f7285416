pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{AggregationConfig, CatalogConfig, Config, LoggingConfig, OfdbConfig, OmdbConfig, PlayerConfig, SourceConfig, SupabaseConfig, TmdbConfig, TvMazeConfig, WikidataConfig};
pub use credentials::{CredentialStore, Session};
pub use paths::{PathManager, container_base_path};
