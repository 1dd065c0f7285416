pub mod traits;
pub mod error;
pub mod http;
pub mod text;
pub mod factory;
pub mod omdb;
pub mod tmdb;
pub mod tvmaze;
pub mod ofdb;
pub mod wikidata;
pub mod wikimedia;
pub mod archive;
pub mod supabase;
pub mod store;

pub use traits::{CatalogStore, MediaLookup, MetadataProvider, MovieSearch};
pub use error::SourceError;
pub use factory::{create_catalog_store, ProviderFactory, ProviderRegistry, Source};
pub use omdb::OmdbClient;
pub use tmdb::TmdbClient;
pub use tvmaze::TvMazeClient;
pub use ofdb::OfdbClient;
pub use wikidata::WikidataClient;
pub use wikimedia::WikimediaClient;
pub use archive::{ArchiveClient, ArchiveFile, MediaHosts};
pub use supabase::{MovieUpdates, SupabaseClient};
pub use store::OfflineStore;
