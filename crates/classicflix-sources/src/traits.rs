use async_trait::async_trait;
use classicflix_models::{ExternalRef, Movie, MovieDetails, UserMovieInteraction};

use crate::archive::ArchiveFile;
use crate::error::SourceError;
use crate::supabase::MovieUpdates;

/// A metadata service the aggregator can fan out to
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    fn source_name(&self) -> &str;

    /// Whether this provider can answer for the given reference.
    /// Most services only resolve IMDb ids.
    fn supports(&self, reference: &ExternalRef) -> bool {
        reference.is_imdb()
    }

    /// Look up partial details. `Ok(None)` means the service had no match.
    async fn lookup(&self, reference: &ExternalRef) -> Result<Option<MovieDetails>, SourceError>;
}

/// Free-text search producing candidate catalog entries
#[async_trait]
pub trait MovieSearch: Send + Sync {
    fn source_name(&self) -> &str;

    async fn search(&self, query: &str) -> Result<Vec<Movie>, SourceError>;
}

/// Lookups the video resolver needs from media hosts
#[async_trait]
pub trait MediaLookup: Send + Sync {
    /// File listing of an archive.org item
    async fn archive_files(&self, identifier: &str) -> Result<Vec<ArchiveFile>, SourceError>;

    /// Direct upload URL of a Wikimedia Commons file, if the file exists
    async fn commons_file_url(&self, file_name: &str) -> Result<Option<String>, SourceError>;
}

/// Persistent catalog and per-user interaction storage
#[async_trait]
pub trait CatalogStore: Send + Sync {
    fn store_name(&self) -> &str;

    fn is_authenticated(&self) -> bool;

    async fn fetch_movies(&self) -> Result<Vec<Movie>, SourceError>;

    /// Insert a movie and return it with the ids the store assigned
    async fn add_movie(&self, movie: &Movie) -> Result<Movie, SourceError>;

    async fn update_movie(
        &self,
        movie_id: &str,
        wikidata_id: Option<&str>,
        updates: &MovieUpdates,
    ) -> Result<(), SourceError>;

    async fn get_interactions(&self) -> Result<Vec<UserMovieInteraction>, SourceError>;

    async fn upsert_interaction(&self, interaction: &UserMovieInteraction) -> Result<(), SourceError>;
}
