use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use classicflix_config::PathManager;
use classicflix_models::{Movie, MovieDetails, UserMovieInteraction};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// How long aggregated details are reused before providers are asked again
pub const DETAILS_TTL_HOURS: i64 = 24;

#[derive(Serialize, Deserialize)]
struct CachedDetails {
    cached_at: DateTime<Utc>,
    details: MovieDetails,
}

/// On-disk snapshots of the last catalog fetch and aggregated details
#[derive(Clone)]
pub struct CacheManager {
    cache_dir: PathBuf,
    catalog_file: PathBuf,
    interactions_file: PathBuf,
    details_ttl: Duration,
}

impl CacheManager {
    pub fn new(path_manager: &PathManager) -> Result<Self> {
        let cache_dir = path_manager.cache_dir();
        std::fs::create_dir_all(&cache_dir)?;
        Ok(Self {
            cache_dir,
            catalog_file: path_manager.catalog_cache_file(),
            interactions_file: path_manager.interactions_cache_file(),
            details_ttl: Duration::hours(DETAILS_TTL_HOURS),
        })
    }

    pub fn with_details_ttl(mut self, ttl: Duration) -> Self {
        self.details_ttl = ttl;
        self
    }

    fn details_dir(&self) -> PathBuf {
        self.cache_dir.join("details")
    }

    /// Percent-encoded so distinct ids never share a file and `/` cannot escape the directory
    fn details_path(&self, movie_id: &str) -> PathBuf {
        self.details_dir().join(format!("{}.json", urlencoding::encode(movie_id)))
    }

    pub fn catalog_exists(&self) -> bool {
        self.catalog_file.exists()
    }

    pub fn load_catalog(&self) -> Result<Option<Vec<Movie>>> {
        load_json(&self.catalog_file, "catalog")
    }

    pub fn save_catalog(&self, movies: &[Movie]) -> Result<()> {
        save_json(&self.catalog_file, "catalog", &movies)?;
        debug!("Cache saved: catalog ({} movies)", movies.len());
        Ok(())
    }

    pub fn load_interactions(&self) -> Result<Option<Vec<UserMovieInteraction>>> {
        load_json(&self.interactions_file, "interactions")
    }

    pub fn save_interactions(&self, interactions: &[UserMovieInteraction]) -> Result<()> {
        save_json(&self.interactions_file, "interactions", &interactions)
    }

    /// Cached details for `movie_id`; entries older than the TTL are deleted and reported as a miss
    pub fn load_details(&self, movie_id: &str) -> Result<Option<MovieDetails>> {
        let Some(entry) = load_json::<CachedDetails>(&self.details_path(movie_id), "details")? else {
            return Ok(None);
        };
        if Utc::now() - entry.cached_at >= self.details_ttl {
            debug!("Cache expired: details for {}", movie_id);
            self.remove_details(movie_id)?;
            return Ok(None);
        }
        Ok(Some(entry.details))
    }

    pub fn save_details(&self, movie_id: &str, details: &MovieDetails) -> Result<()> {
        let entry = CachedDetails {
            cached_at: Utc::now(),
            details: details.clone(),
        };
        save_json(&self.details_path(movie_id), "details", &entry)
    }

    pub fn remove_details(&self, movie_id: &str) -> Result<()> {
        let path = self.details_path(movie_id);
        if path.exists() {
            std::fs::remove_file(&path)?;
            debug!("Cache removed: details for {}", movie_id);
        }
        Ok(())
    }

    pub fn clear_cache(&self) -> Result<()> {
        if self.cache_dir.exists() {
            std::fs::remove_dir_all(&self.cache_dir)?;
            std::fs::create_dir_all(&self.cache_dir)?;
            info!("Cleared cache directory: {:?}", self.cache_dir);
        }
        Ok(())
    }
}

/// Read a JSON cache file; a corrupted file is deleted and reported as a miss
fn load_json<T: DeserializeOwned>(path: &Path, label: &str) -> Result<Option<T>> {
    if !path.exists() {
        debug!("Cache miss: {} (file does not exist)", label);
        return Ok(None);
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<T>(&content) {
            Ok(data) => {
                info!("Cache hit: {}", label);
                Ok(Some(data))
            }
            Err(e) => {
                warn!("Cache corruption detected for {}: {}. Deleting corrupted file.", label, e);
                if let Err(rm_err) = std::fs::remove_file(path) {
                    warn!("Failed to delete corrupted cache file: {}", rm_err);
                }
                Ok(None)
            }
        },
        Err(e) => {
            warn!("Failed to read cache file for {}: {}", label, e);
            Ok(None)
        }
    }
}

fn save_json<T: Serialize + ?Sized>(path: &Path, label: &str, data: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(data).map_err(|e| {
        warn!("Failed to serialize cache data for {}: {}", label, e);
        anyhow!("Failed to serialize cache: {}", e)
    })?;
    std::fs::write(path, json).map_err(|e| {
        warn!("Failed to write cache file for {}: {}", label, e);
        anyhow!("Failed to write cache: {}", e)
    })
}
