use serde::{Deserialize, Serialize};
use crate::language::AppLanguage;

/// A catalog entry as stored in the `movies` table and its joined detail tables.
///
/// List fields are never null once deserialized; a missing column becomes an
/// empty vector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wikidata_id: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_pt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_pt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_hi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_ru: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_it: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub has_subtitles: bool,
    #[serde(default)]
    pub poster_url: String,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailer_url: Option<String>,
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub director: String,
    /// Wikidata QID of the director
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director_id: Option<String>,
    #[serde(rename = "type", default)]
    pub movie_type: MovieType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_label: Option<String>,
    #[serde(default)]
    pub cast: Vec<String>,
    #[serde(default)]
    pub writers: Vec<String>,
    #[serde(default)]
    pub awards: Vec<String>,
    #[serde(default)]
    pub cinematographers: Vec<String>,
    #[serde(default)]
    pub composers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorKind>,
    #[serde(default)]
    pub themes: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum MovieType {
    #[default]
    Movie,
    Series,
}

impl MovieType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovieType::Movie => "Movie",
            MovieType::Series => "Series",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ColorKind {
    Color,
    #[serde(rename = "Black & White")]
    BlackAndWhite,
    Mixed,
}

impl ColorKind {
    pub fn label(&self) -> &'static str {
        match self {
            ColorKind::Color => "Color",
            ColorKind::BlackAndWhite => "Black & White",
            ColorKind::Mixed => "Mixed",
        }
    }

    /// Parse a color label as written by editors or returned by Wikidata
    /// ("black-and-white", "color", ...).
    pub fn from_label(label: &str) -> Option<Self> {
        let lower = label.trim().to_lowercase();
        if lower.is_empty() {
            return None;
        }
        if lower.contains("black") || lower.contains("b&w") || lower.contains("preto") {
            Some(ColorKind::BlackAndWhite)
        } else if lower.contains("mixed") || lower.contains("misto") {
            Some(ColorKind::Mixed)
        } else if lower.contains("colo") || lower.contains("cor") {
            Some(ColorKind::Color)
        } else {
            None
        }
    }
}

/// How a movie can be looked up in external metadata services
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalRef {
    /// Wikidata entity id, e.g. `Q12345`
    Qid(String),
    /// IMDb title id, e.g. `tt0017136`
    Imdb(String),
    /// No usable identifier; fall back to an exact title match
    Title(String),
}

impl ExternalRef {
    pub fn is_imdb(&self) -> bool {
        matches!(self, ExternalRef::Imdb(_))
    }

    /// The raw query string handed to services that accept any of the three forms
    pub fn query(&self) -> &str {
        match self {
            ExternalRef::Qid(q) | ExternalRef::Imdb(q) | ExternalRef::Title(q) => q,
        }
    }
}

pub fn is_qid(value: &str) -> bool {
    has_numeric_suffix(value, "Q")
}

pub fn is_imdb_id(value: &str) -> bool {
    has_numeric_suffix(value, "tt")
}

fn has_numeric_suffix(value: &str, prefix: &str) -> bool {
    value
        .strip_prefix(prefix)
        .map(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false)
}

impl Movie {
    pub fn localized_title(&self, lang: AppLanguage) -> &str {
        match (lang, self.title_pt.as_deref()) {
            (AppLanguage::Pt, Some(pt)) if !pt.is_empty() => pt,
            _ => &self.title,
        }
    }

    pub fn localized_description(&self, lang: AppLanguage) -> &str {
        let localized = match lang {
            AppLanguage::Pt => self.description_pt.as_deref(),
            AppLanguage::Hi => self.description_hi.as_deref(),
            AppLanguage::Ru => self.description_ru.as_deref(),
            AppLanguage::It => self.description_it.as_deref(),
            AppLanguage::En => None,
        };
        match localized {
            Some(text) if !text.is_empty() => text,
            _ => &self.description,
        }
    }

    /// Title shown on catalog cards: Portuguese title first
    pub fn display_title(&self) -> &str {
        match self.title_pt.as_deref() {
            Some(pt) if !pt.is_empty() => pt,
            _ => &self.title,
        }
    }

    pub fn has_real_poster(&self) -> bool {
        !self.poster_url.is_empty() && !self.poster_url.contains("placehold.co")
    }

    pub fn external_ref(&self) -> ExternalRef {
        let id = self
            .wikidata_id
            .as_deref()
            .map(str::trim)
            .unwrap_or_default();
        if is_qid(&id.to_uppercase()) {
            ExternalRef::Qid(id.to_uppercase())
        } else if is_imdb_id(id) {
            ExternalRef::Imdb(id.to_string())
        } else if let Some(imdb) = self.id.strip_prefix("omdb-").filter(|rest| is_imdb_id(rest)) {
            ExternalRef::Imdb(imdb.to_string())
        } else {
            ExternalRef::Title(self.title.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: &str, wikidata_id: Option<&str>) -> Movie {
        Movie {
            id: id.to_string(),
            wikidata_id: wikidata_id.map(str::to_string),
            title: "Nosferatu".to_string(),
            ..Movie::default()
        }
    }

    #[test]
    fn test_external_ref_classification() {
        assert_eq!(movie("1", Some("Q151904")).external_ref(), ExternalRef::Qid("Q151904".to_string()));
        assert_eq!(movie("1", Some("q151904")).external_ref(), ExternalRef::Qid("Q151904".to_string()));
        assert_eq!(movie("1", Some("tt0013442")).external_ref(), ExternalRef::Imdb("tt0013442".to_string()));
        assert_eq!(movie("omdb-tt0013442", None).external_ref(), ExternalRef::Imdb("tt0013442".to_string()));
        assert_eq!(movie("1", Some("custom-1700000000")).external_ref(), ExternalRef::Title("Nosferatu".to_string()));
        assert_eq!(movie("1", None).external_ref(), ExternalRef::Title("Nosferatu".to_string()));
    }

    #[test]
    fn test_localized_fields_fall_back_to_default() {
        let mut m = movie("1", None);
        m.description = "A vampire".to_string();
        m.description_pt = Some("Um vampiro".to_string());
        m.title_pt = Some(String::new());

        assert_eq!(m.localized_title(AppLanguage::Pt), "Nosferatu");
        assert_eq!(m.localized_description(AppLanguage::Pt), "Um vampiro");
        assert_eq!(m.localized_description(AppLanguage::Ru), "A vampire");
    }

    #[test]
    fn test_deserialize_fills_missing_lists() {
        let json = r#"{"id":"m1","title":"Metropolis","year":1927,"type":"Movie","color":"Black & White"}"#;
        let m: Movie = serde_json::from_str(json).unwrap();
        assert!(m.genres.is_empty());
        assert!(m.cast.is_empty());
        assert_eq!(m.color, Some(ColorKind::BlackAndWhite));
        assert_eq!(m.movie_type, MovieType::Movie);
    }

    #[test]
    fn test_placeholder_poster_is_not_real() {
        let mut m = movie("1", None);
        assert!(!m.has_real_poster());
        m.poster_url = "https://placehold.co/400x600".to_string();
        assert!(!m.has_real_poster());
        m.poster_url = "https://upload.wikimedia.org/poster.jpg".to_string();
        assert!(m.has_real_poster());
    }
}
