use anyhow::{bail, Result};
use classicflix_models::{ColorKind, Movie, MovieDetails};
use classicflix_sources::{CatalogStore, MovieUpdates, OfflineStore};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{info, warn};

use crate::cache::CacheManager;

pub use classicflix_sources::supabase::normalize::{ensure_list, to_https};

/// Display name for the free-form language column
pub fn canonical_language(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" || trimmed == "undefined" {
        return "Unknown".to_string();
    }
    let lower = trimmed.to_lowercase();
    if lower.starts_with("pt") || lower.contains("portug") {
        return "Portuguese".to_string();
    }
    if lower.starts_with("en") || lower.contains("engl") || lower.contains("ingl") {
        return "English".to_string();
    }
    if lower.contains("silent") || lower.contains("mudo") {
        return "Silent".to_string();
    }
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "Unknown".to_string(),
    }
}

pub fn unique_directors(movies: &[Movie]) -> Vec<String> {
    movies
        .iter()
        .map(|m| m.director.trim())
        .filter(|d| !d.is_empty() && *d != "Unknown")
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn unique_awards(movies: &[Movie]) -> Vec<String> {
    movies
        .iter()
        .flat_map(|m| m.awards.iter())
        .filter(|a| !a.trim().is_empty())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Facet counts shown next to the catalog filters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogStats {
    pub total: usize,
    pub languages: BTreeMap<String, usize>,
    pub genres: BTreeMap<String, usize>,
    pub themes: BTreeMap<String, usize>,
}

impl CatalogStats {
    pub fn from_movies(movies: &[Movie]) -> Self {
        let mut stats = CatalogStats {
            total: movies.len(),
            ..CatalogStats::default()
        };
        for movie in movies {
            *stats.languages.entry(canonical_language(&movie.language)).or_default() += 1;
            for genre in &movie.genres {
                *stats.genres.entry(genre.clone()).or_default() += 1;
            }
            for theme in &movie.themes {
                *stats.themes.entry(theme.clone()).or_default() += 1;
            }
        }
        stats
    }
}

/// New catalog entry from looked-up details. The store assigns the ids.
pub fn movie_from_details(details: &MovieDetails, source_label: &str) -> Movie {
    Movie {
        id: String::new(),
        wikidata_id: details.wikidata_id.clone(),
        title: details.title.clone().unwrap_or_default(),
        original_title: details.original_title.clone(),
        description: details.description.clone().unwrap_or_default(),
        genres: details.genres.clone(),
        year: details.year.unwrap_or_default(),
        language: details.language.clone().unwrap_or_default(),
        poster_url: to_https(details.poster_url.as_deref()),
        video_url: details.video_url.clone(),
        rating: details.rating.clone().unwrap_or_default(),
        duration: details.duration.clone().unwrap_or_default(),
        director: details.director.clone().unwrap_or_default(),
        director_id: details.director_id.clone(),
        source_label: Some(source_label.to_string()),
        cast: details.cast.clone(),
        writers: details.writers.clone(),
        awards: details.awards.clone(),
        cinematographers: details.cinematographers.clone(),
        composers: details.composers.clone(),
        color: details.color.as_deref().and_then(ColorKind::from_label),
        themes: details.themes.clone(),
        ..Movie::default()
    }
}

const LIST_FIELDS: &[&str] = &["genres", "cast", "cinematographers", "composers", "themes", "awards"];
const BOOL_FIELDS: &[&str] = &["hasSubtitles"];
const INT_FIELDS: &[&str] = &["year"];
const TEXT_FIELDS: &[&str] = &[
    "title", "titlePt", "originalTitle", "language", "posterUrl", "videoUrl", "trailerUrl", "description",
    "descriptionPt", "descriptionHi", "descriptionRu", "descriptionIt", "duration", "director", "type",
    "sourceLabel", "rating",
];

/// Build a store update from `field=value` edits. List fields take a comma
/// list; an unknown field or a malformed value is rejected.
pub fn parse_edits(edits: &[(String, String)]) -> Result<MovieUpdates> {
    let mut updates = MovieUpdates::new();
    for (field, raw) in edits {
        let field = field.trim();
        let value = if LIST_FIELDS.contains(&field) {
            Value::from(
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>(),
            )
        } else if BOOL_FIELDS.contains(&field) {
            match raw.trim().to_lowercase().as_str() {
                "true" | "yes" | "1" => Value::Bool(true),
                "false" | "no" | "0" => Value::Bool(false),
                other => bail!("{} expects true or false, got '{}'", field, other),
            }
        } else if INT_FIELDS.contains(&field) {
            match raw.trim().parse::<i64>() {
                Ok(n) => Value::from(n),
                Err(_) => bail!("{} expects a number, got '{}'", field, raw),
            }
        } else if TEXT_FIELDS.contains(&field) {
            Value::String(raw.trim().to_string())
        } else {
            bail!("Unknown movie field '{}'", field);
        };
        updates.insert(field.to_string(), value);
    }
    Ok(updates)
}

/// Find a movie by id, wikidata id or exact (case-insensitive) title
pub fn find_movie<'a>(movies: &'a [Movie], key: &str) -> Option<&'a Movie> {
    let key = key.trim();
    movies
        .iter()
        .find(|m| m.id == key || m.wikidata_id.as_deref() == Some(key))
        .or_else(|| {
            movies
                .iter()
                .find(|m| m.title.eq_ignore_ascii_case(key) || m.display_title().eq_ignore_ascii_case(key))
        })
}

/// Catalog access with an on-disk snapshot for offline use
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
    cache: Option<CacheManager>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>, cache: Option<CacheManager>) -> Self {
        Self { store, cache }
    }

    /// Read-only service over the cached snapshot
    pub fn offline(cache: Option<CacheManager>) -> Self {
        let snapshot = cache
            .as_ref()
            .and_then(|c| c.load_catalog().ok().flatten())
            .unwrap_or_default();
        Self::new(Arc::new(OfflineStore::new(snapshot)), cache)
    }

    pub fn store(&self) -> &Arc<dyn CatalogStore> {
        &self.store
    }

    fn cached_catalog(&self) -> Vec<Movie> {
        match self.cache.as_ref().map(|c| c.load_catalog()) {
            Some(Ok(Some(movies))) => movies,
            Some(Err(e)) => {
                warn!("Failed to load cached catalog: {}", e);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    /// Fetch the catalog. An unreachable or empty store falls back to the
    /// cached snapshot, and a fresh fetch replaces that snapshot.
    pub async fn load(&self) -> Vec<Movie> {
        match self.store.fetch_movies().await {
            Ok(movies) if !movies.is_empty() => {
                info!(store = self.store.store_name(), movies = movies.len(), "Catalog loaded");
                if let Some(cache) = &self.cache {
                    if let Err(e) = cache.save_catalog(&movies) {
                        warn!("Failed to cache catalog: {}", e);
                    }
                }
                movies
            }
            Ok(_) => {
                warn!(store = self.store.store_name(), "Store returned no movies, using cached catalog");
                self.cached_catalog()
            }
            Err(e) => {
                warn!(store = self.store.store_name(), error = %e, "Catalog fetch failed, using cached catalog");
                self.cached_catalog()
            }
        }
    }

    pub async fn add(&self, movie: &Movie) -> Result<Movie> {
        if movie.title.trim().is_empty() {
            bail!("A movie needs a title");
        }
        Ok(self.store.add_movie(movie).await?)
    }

    pub async fn update(&self, movie: &Movie, updates: &MovieUpdates) -> Result<()> {
        if updates.is_empty() {
            bail!("Nothing to update");
        }
        self.store
            .update_movie(&movie.id, movie.wikidata_id.as_deref(), updates)
            .await?;
        info!(id = %movie.id, fields = updates.len(), "Movie updated");

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.remove_details(&movie.id) {
                warn!(id = %movie.id, "Failed to drop cached details: {}", e);
            }
        }
        Ok(())
    }
}
