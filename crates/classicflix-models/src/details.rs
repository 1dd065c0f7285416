use serde::{Deserialize, Serialize};
use crate::movie::Movie;

/// Partial movie record in the shape every metadata source produces
///
/// Sources fill in whatever they know. The aggregator folds several of these
/// into one display record with [`MovieDetails::merge`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wikidata_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default)]
    pub cast: Vec<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub themes: Vec<String>,
    #[serde(default)]
    pub cinematographers: Vec<String>,
    #[serde(default)]
    pub composers: Vec<String>,
    #[serde(default)]
    pub awards: Vec<String>,
    #[serde(default)]
    pub writers: Vec<String>,
    #[serde(default)]
    pub producers: Vec<String>,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub art_directors: Vec<String>,
    #[serde(default)]
    pub distributors: Vec<String>,
    #[serde(default)]
    pub based_on: Vec<String>,
    #[serde(default)]
    pub production_companies: Vec<String>,
}

/// Placeholder values some sources use instead of leaving a field out
const EMPTY_MARKERS: &[&str] = &["N/A", "Unknown"];

fn non_empty(value: &Option<String>) -> bool {
    value
        .as_deref()
        .map(|v| {
            let v = v.trim();
            !v.is_empty() && !EMPTY_MARKERS.contains(&v)
        })
        .unwrap_or(false)
}

fn fill_scalar(target: &mut Option<String>, other: &Option<String>) {
    if !non_empty(target) && non_empty(other) {
        *target = other.clone();
    }
}

fn normalize_key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Append entries of `other` that `target` does not already hold, stopping
/// once `target` reaches `cap`. Existing entries are left untouched.
fn union_capped(target: &mut Vec<String>, other: &[String], cap: usize) {
    for candidate in other {
        if target.len() >= cap {
            break;
        }
        let trimmed = candidate.trim();
        if trimmed.is_empty() {
            continue;
        }
        let key = normalize_key(trimmed);
        if !target.iter().any(|existing| normalize_key(existing) == key) {
            target.push(trimmed.to_string());
        }
    }
}

impl MovieDetails {
    /// Merge another source into this record
    ///
    /// Scalars keep the value already present unless it is empty; lists are
    /// unioned without duplicates and capped at `list_cap` entries.
    pub fn merge(&mut self, other: &MovieDetails, list_cap: usize) {
        fill_scalar(&mut self.title, &other.title);
        fill_scalar(&mut self.original_title, &other.original_title);
        fill_scalar(&mut self.description, &other.description);
        if self.year.map(|y| y <= 0).unwrap_or(true) {
            if let Some(year) = other.year.filter(|y| *y > 0) {
                self.year = Some(year);
            }
        }
        fill_scalar(&mut self.poster_url, &other.poster_url);
        fill_scalar(&mut self.director, &other.director);
        fill_scalar(&mut self.director_id, &other.director_id);
        fill_scalar(&mut self.duration, &other.duration);
        fill_scalar(&mut self.rating, &other.rating);
        fill_scalar(&mut self.language, &other.language);
        fill_scalar(&mut self.color, &other.color);
        fill_scalar(&mut self.wikidata_id, &other.wikidata_id);
        fill_scalar(&mut self.video_url, &other.video_url);

        union_capped(&mut self.cast, &other.cast, list_cap);
        union_capped(&mut self.genres, &other.genres, list_cap);
        union_capped(&mut self.themes, &other.themes, list_cap);
        union_capped(&mut self.cinematographers, &other.cinematographers, list_cap);
        union_capped(&mut self.composers, &other.composers, list_cap);
        union_capped(&mut self.awards, &other.awards, list_cap);
        union_capped(&mut self.writers, &other.writers, list_cap);
        union_capped(&mut self.producers, &other.producers, list_cap);
        union_capped(&mut self.countries, &other.countries, list_cap);
        union_capped(&mut self.art_directors, &other.art_directors, list_cap);
        union_capped(&mut self.distributors, &other.distributors, list_cap);
        union_capped(&mut self.based_on, &other.based_on, list_cap);
        union_capped(&mut self.production_companies, &other.production_companies, list_cap);
    }

    /// True when the record carries no information at all
    pub fn is_empty(&self) -> bool {
        *self == MovieDetails::default()
    }
}

fn some_if_present(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl From<&Movie> for MovieDetails {
    fn from(movie: &Movie) -> Self {
        Self {
            title: some_if_present(&movie.title),
            original_title: movie.original_title.clone(),
            description: some_if_present(&movie.description),
            year: Some(movie.year).filter(|y| *y > 0),
            poster_url: some_if_present(&movie.poster_url),
            director: some_if_present(&movie.director),
            director_id: movie.director_id.clone(),
            duration: some_if_present(&movie.duration),
            rating: some_if_present(&movie.rating),
            language: some_if_present(&movie.language),
            color: movie.color.map(|c| c.label().to_string()),
            wikidata_id: movie.wikidata_id.clone(),
            video_url: movie.video_url.clone(),
            cast: movie.cast.clone(),
            genres: movie.genres.clone(),
            themes: movie.themes.clone(),
            cinematographers: movie.cinematographers.clone(),
            composers: movie.composers.clone(),
            awards: movie.awards.clone(),
            writers: movie.writers.clone(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_merge_keeps_first_non_empty_scalar() {
        let mut base = MovieDetails {
            title: Some("Nosferatu".to_string()),
            director: Some("Unknown".to_string()),
            ..MovieDetails::default()
        };
        let other = MovieDetails {
            title: Some("Nosferatu, eine Symphonie des Grauens".to_string()),
            director: Some("F. W. Murnau".to_string()),
            year: Some(1922),
            ..MovieDetails::default()
        };

        base.merge(&other, 10);
        assert_eq!(base.title.as_deref(), Some("Nosferatu"));
        assert_eq!(base.director.as_deref(), Some("F. W. Murnau"));
        assert_eq!(base.year, Some(1922));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut base = MovieDetails {
            cast: strings(&["Max Schreck"]),
            ..MovieDetails::default()
        };
        let other = MovieDetails {
            cast: strings(&["Max Schreck", "Gustav von Wangenheim", " greta schröder "]),
            genres: strings(&["Horror"]),
            ..MovieDetails::default()
        };

        base.merge(&other, 10);
        let once = base.clone();
        base.merge(&other, 10);
        assert_eq!(base, once);
        assert_eq!(base.cast, strings(&["Max Schreck", "Gustav von Wangenheim", "greta schröder"]));
    }

    #[test]
    fn test_merge_dedup_is_case_insensitive() {
        let mut base = MovieDetails {
            genres: strings(&["Horror"]),
            ..MovieDetails::default()
        };
        base.merge(&MovieDetails { genres: strings(&["horror", "Fantasy"]), ..MovieDetails::default() }, 10);
        assert_eq!(base.genres, strings(&["Horror", "Fantasy"]));
    }

    #[test]
    fn test_merge_caps_external_entries_only() {
        let local: Vec<String> = (0..12).map(|i| format!("Actor {}", i)).collect();
        let mut base = MovieDetails { cast: local.clone(), ..MovieDetails::default() };
        base.merge(&MovieDetails { cast: strings(&["Newcomer"]), ..MovieDetails::default() }, 10);
        assert_eq!(base.cast, local);

        let mut small = MovieDetails::default();
        let many: Vec<String> = (0..15).map(|i| format!("Actor {}", i)).collect();
        small.merge(&MovieDetails { cast: many, ..MovieDetails::default() }, 10);
        assert_eq!(small.cast.len(), 10);
    }

    #[test]
    fn test_from_movie_skips_empty_scalars() {
        let movie = Movie {
            id: "m1".to_string(),
            title: "Metropolis".to_string(),
            year: 1927,
            ..Movie::default()
        };
        let details = MovieDetails::from(&movie);
        assert_eq!(details.title.as_deref(), Some("Metropolis"));
        assert_eq!(details.year, Some(1927));
        assert!(details.description.is_none());
        assert!(details.poster_url.is_none());
    }
}
