//! Turning raw PostgREST rows into catalog records.
//!
//! The catalog is split over three tables joined on `wikidataId`:
//! `movies` (identity, links, awards), `technicaldetails` (credits, genres,
//! duration, rating) and `description` (per-language synopses).

use classicflix_models::{ColorKind, Movie, MovieType};
use serde_json::Value;
use std::collections::HashMap;

/// Coerce a column that may hold a JSON array, a Postgres array literal
/// (`{a,"b c"}`) or a plain comma list into a list of strings
pub fn ensure_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) => {
            let inner = s
                .strip_prefix('{')
                .and_then(|rest| rest.strip_suffix('}'))
                .unwrap_or(s);
            inner
                .split(',')
                .map(|part| part.replace('"', "").trim().to_string())
                .filter(|part| !part.is_empty())
                .collect()
        }
        _ => Vec::new(),
    }
}

/// Upgrade `http://` links to `https://`; a missing link becomes empty
pub fn to_https(url: Option<&str>) -> String {
    match url {
        None => String::new(),
        Some(url) => match url.strip_prefix("http://") {
            Some(rest) => format!("https://{}", rest),
            None => url.to_string(),
        },
    }
}

fn text<'a>(row: &'a Value, key: &str) -> Option<&'a str> {
    row.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn owned(row: &Value, key: &str) -> Option<String> {
    text(row, key).map(str::to_string)
}

fn year(row: &Value) -> i32 {
    match row.get("year") {
        Some(Value::Number(n)) => n.as_i64().map(|y| y as i32).unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn flag(row: &Value, key: &str) -> bool {
    match row.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

fn list(row: &Value, key: &str) -> Vec<String> {
    row.get(key).map(ensure_list).unwrap_or_default()
}

fn index_by_wikidata_id(rows: &[Value]) -> HashMap<&str, &Value> {
    rows.iter()
        .filter_map(|row| text(row, "wikidataId").map(|id| (id, row)))
        .collect()
}

/// Join the three catalog tables into normalized movies
pub fn build_movies(movies: &[Value], technical: &[Value], descriptions: &[Value]) -> Vec<Movie> {
    let tech_by_id = index_by_wikidata_id(technical);
    let desc_by_id = index_by_wikidata_id(descriptions);
    let empty = Value::Object(Default::default());

    movies
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let wikidata_id = owned(item, "wikidataId");
            let key = wikidata_id.as_deref().unwrap_or_default();
            let tech = tech_by_id.get(key).copied().unwrap_or(&empty);
            let desc = desc_by_id.get(key).copied().unwrap_or(&empty);

            Movie {
                id: match item.get("id") {
                    Some(Value::String(id)) if !id.is_empty() => id.clone(),
                    Some(Value::Number(id)) => id.to_string(),
                    _ => format!("db-{}", index),
                },
                wikidata_id,
                title: owned(item, "title").unwrap_or_default(),
                title_pt: owned(item, "titlePt"),
                original_title: owned(item, "originalTitle"),
                year: year(item),
                language: owned(item, "language").unwrap_or_else(|| "Unknown".to_string()),
                has_subtitles: flag(item, "hasSubtitles"),
                poster_url: to_https(text(item, "posterUrl")),
                video_url: text(item, "videoUrl").map(|u| to_https(Some(u))),
                trailer_url: text(item, "trailerUrl").map(|u| to_https(Some(u))),
                awards: list(item, "awards"),
                color: text(item, "color").and_then(ColorKind::from_label),
                description: owned(desc, "description")
                    .or_else(|| owned(item, "description"))
                    .unwrap_or_default(),
                description_pt: owned(desc, "descriptionPt"),
                description_hi: owned(desc, "descriptionHi"),
                description_ru: owned(desc, "descriptionRu"),
                description_it: owned(desc, "descriptionIt"),
                duration: owned(tech, "duration").unwrap_or_default(),
                genres: list(tech, "genres"),
                director: owned(tech, "director").unwrap_or_else(|| "Unknown".to_string()),
                director_id: owned(tech, "directorId"),
                movie_type: match text(tech, "type") {
                    Some("Series") => MovieType::Series,
                    _ => MovieType::Movie,
                },
                source_label: owned(tech, "sourceLabel"),
                rating: owned(tech, "rating").unwrap_or_default(),
                cast: list(tech, "cast_members"),
                writers: list(tech, "writers"),
                cinematographers: list(tech, "cinematographers"),
                composers: list(tech, "composers"),
                themes: list(tech, "themes"),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ensure_list_shapes() {
        assert_eq!(ensure_list(&json!(["Drama", " Horror "])), vec!["Drama", "Horror"]);
        assert_eq!(ensure_list(&json!("{Drama,\"Film Noir\"}")), vec!["Drama", "Film Noir"]);
        assert_eq!(ensure_list(&json!("Drama, Comedy")), vec!["Drama", "Comedy"]);
        assert_eq!(ensure_list(&json!("{}")), Vec::<String>::new());
        assert!(ensure_list(&Value::Null).is_empty());
        assert!(ensure_list(&json!(42)).is_empty());
    }

    #[test]
    fn test_to_https() {
        assert_eq!(to_https(Some("http://archive.org/x.mp4")), "https://archive.org/x.mp4");
        assert_eq!(to_https(Some("https://archive.org/x.mp4")), "https://archive.org/x.mp4");
        assert_eq!(to_https(None), "");
    }

    #[test]
    fn test_build_movies_joins_on_wikidata_id() {
        let movies = vec![
            json!({
                "id": "m1", "wikidataId": "Q151904", "title": "Nosferatu", "titlePt": "Nosferatu, uma Sinfonia do Horror",
                "year": 1922, "language": "German", "hasSubtitles": true,
                "posterUrl": "http://upload.wikimedia.org/p.jpg", "videoUrl": "http://archive.org/details/nosferatu",
                "awards": "{\"Best Horror\"}"
            }),
            json!({"title": "Orphan", "year": "1931"}),
        ];
        let technical = vec![json!({
            "wikidataId": "Q151904", "duration": "1h 34m", "genres": ["Horror"], "director": "F. W. Murnau",
            "type": "Movie", "rating": "7.9", "cast_members": "Max Schreck, Greta Schröder", "themes": null
        })];
        let descriptions = vec![json!({
            "wikidataId": "Q151904", "description": "A vampire...", "descriptionPt": "Um vampiro..."
        })];

        let result = build_movies(&movies, &technical, &descriptions);
        assert_eq!(result.len(), 2);

        let nosferatu = &result[0];
        assert_eq!(nosferatu.id, "m1");
        assert!(nosferatu.has_subtitles);
        assert_eq!(nosferatu.poster_url, "https://upload.wikimedia.org/p.jpg");
        assert_eq!(nosferatu.video_url.as_deref(), Some("https://archive.org/details/nosferatu"));
        assert_eq!(nosferatu.awards, vec!["Best Horror"]);
        assert_eq!(nosferatu.genres, vec!["Horror"]);
        assert_eq!(nosferatu.cast, vec!["Max Schreck", "Greta Schröder"]);
        assert!(nosferatu.themes.is_empty());
        assert_eq!(nosferatu.director, "F. W. Murnau");
        assert_eq!(nosferatu.description_pt.as_deref(), Some("Um vampiro..."));

        let orphan = &result[1];
        assert_eq!(orphan.id, "db-1");
        assert_eq!(orphan.year, 1931);
        assert_eq!(orphan.language, "Unknown");
        assert_eq!(orphan.director, "Unknown");
        assert!(orphan.genres.is_empty());
        assert_eq!(orphan.poster_url, "");
    }
}
