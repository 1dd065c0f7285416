use classicflix_models::{Movie, UserMovieInteraction};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};

use crate::error::Result;
use crate::http;

pub(crate) const SERVICE: &str = "supabase";
const PAGE_STEP: usize = 1000;

pub const MOVIES_TABLE: &str = "movies";
pub const TECHNICAL_TABLE: &str = "technicaldetails";
pub const DESCRIPTION_TABLE: &str = "description";
pub const INTERACTIONS_TABLE: &str = "user_movie_interactions";
pub const LEGACY_INTERACTIONS_TABLE: &str = "user_interactions";

/// Field edits keyed by the camelCase movie field names (`title`, `videoUrl`, `cast`, ...)
pub type MovieUpdates = Map<String, Value>;

const MOVIE_FIELDS: &[&str] = &[
    "title", "titlePt", "originalTitle", "year", "language", "hasSubtitles", "posterUrl", "videoUrl",
    "trailerUrl", "awards", "wikidataId",
];
const DESCRIPTION_FIELDS: &[&str] = &[
    "description", "descriptionPt", "descriptionHi", "descriptionRu", "descriptionIt", "wikidataId",
];
const TECHNICAL_FIELDS: &[&str] = &[
    "duration", "genres", "director", "type", "sourceLabel", "cast", "cinematographers", "composers",
    "themes", "rating", "wikidataId",
];

/// Updates routed to the table that owns each column
#[derive(Debug, Default, PartialEq)]
pub struct TableUpdates {
    pub movies: Map<String, Value>,
    pub description: Map<String, Value>,
    pub technical: Map<String, Value>,
}

/// Column name in `technicaldetails` for a movie field
fn technical_column(field: &str) -> &str {
    match field {
        "cast" => "cast_members",
        other => other,
    }
}

/// Route each edited field to its table. A title change is written to all
/// three tables since each keeps its own copy.
pub fn split_updates(updates: &MovieUpdates) -> TableUpdates {
    let mut routed = TableUpdates::default();
    for (key, value) in updates {
        if MOVIE_FIELDS.contains(&key.as_str()) {
            routed.movies.insert(key.clone(), value.clone());
        }
        if DESCRIPTION_FIELDS.contains(&key.as_str()) {
            routed.description.insert(key.clone(), value.clone());
        }
        if TECHNICAL_FIELDS.contains(&key.as_str()) {
            routed.technical.insert(technical_column(key).to_string(), value.clone());
        }
    }
    if let Some(title) = updates.get("title") {
        routed.description.insert("title".to_string(), title.clone());
        routed.technical.insert("title".to_string(), title.clone());
    }
    routed
}

/// The three insert rows for a new catalog entry; `movie` must already carry its ids
pub fn insert_rows(movie: &Movie) -> (Value, Value, Value) {
    let movie_row = json!({
        "id": movie.id,
        "wikidataId": movie.wikidata_id,
        "title": movie.title,
        "titlePt": movie.title_pt,
        "originalTitle": movie.original_title,
        "year": movie.year,
        "language": movie.language,
        "hasSubtitles": movie.has_subtitles,
        "posterUrl": movie.poster_url,
        "videoUrl": movie.video_url,
        "trailerUrl": movie.trailer_url,
        "awards": movie.awards,
    });
    let description_row = json!({
        "wikidataId": movie.wikidata_id,
        "title": movie.title,
        "description": movie.description,
        "descriptionPt": movie.description_pt,
        "descriptionHi": movie.description_hi,
        "descriptionRu": movie.description_ru,
        "descriptionIt": movie.description_it,
    });
    let technical_row = json!({
        "wikidataId": movie.wikidata_id,
        "title": movie.title,
        "duration": movie.duration,
        "genres": movie.genres,
        "director": movie.director,
        "type": movie.movie_type.as_str(),
        "sourceLabel": movie.source_label,
        "cast_members": movie.cast,
        "cinematographers": movie.cinematographers,
        "composers": movie.composers,
        "themes": movie.themes,
        "rating": movie.rating,
    });
    (movie_row, description_row, technical_row)
}

/// Row written to the interactions table
pub fn interaction_row(user_id: &str, interaction: &UserMovieInteraction, with_timestamp: bool) -> Value {
    let mut row = json!({
        "user_id": user_id,
        "movie_id": interaction.movie_id,
        "is_favorite": interaction.is_favorite,
        "is_watched": interaction.is_watched,
        "watch_later": interaction.watch_later,
        "progress_seconds": interaction.progress_seconds,
    });
    if with_timestamp {
        let at = interaction.last_updated_at.unwrap_or_else(chrono::Utc::now);
        row["last_updated_at"] = json!(at.to_rfc3339());
    }
    row
}

/// Connection parameters shared by every PostgREST call
pub struct Rest<'a> {
    pub client: &'a Client,
    pub base_url: &'a str,
    pub anon_key: &'a str,
    pub bearer: &'a str,
}

impl<'a> Rest<'a> {
    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url.trim_end_matches('/'), table)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", self.anon_key)
            .header("Authorization", format!("Bearer {}", self.bearer))
    }

    pub async fn select<T: DeserializeOwned>(&self, table: &str, filters: &[(&str, String)]) -> Result<Vec<T>> {
        let mut params: Vec<(&str, String)> = vec![("select", "*".to_string())];
        params.extend(filters.iter().cloned());
        let request = self.authorize(self.client.get(self.table_url(table)).query(&params));
        let response = request.send().await?;
        http::read_json(SERVICE, response).await
    }

    /// Every row of a table, paging past the server's row limit
    pub async fn select_all(&self, table: &str) -> Result<Vec<Value>> {
        let mut rows = Vec::new();
        let mut offset = 0;
        loop {
            let page: Vec<Value> = self
                .select(
                    table,
                    &[("offset", offset.to_string()), ("limit", PAGE_STEP.to_string())],
                )
                .await?;
            let fetched = page.len();
            rows.extend(page);
            if fetched < PAGE_STEP {
                break;
            }
            offset += PAGE_STEP;
        }
        tracing::debug!(table, rows = rows.len(), "Fetched table");
        Ok(rows)
    }

    pub async fn insert(&self, table: &str, row: &Value) -> Result<()> {
        let request = self
            .authorize(self.client.post(self.table_url(table)))
            .header("Prefer", "return=minimal")
            .json(&[row]);
        http::check_status(SERVICE, request.send().await?).await?;
        Ok(())
    }

    pub async fn upsert(&self, table: &str, row: &Value, on_conflict: &str) -> Result<()> {
        let request = self
            .authorize(self.client.post(self.table_url(table)))
            .query(&[("on_conflict", on_conflict)])
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&[row]);
        http::check_status(SERVICE, request.send().await?).await?;
        Ok(())
    }

    pub async fn update(&self, table: &str, column: &str, value: &str, changes: &Map<String, Value>) -> Result<()> {
        let request = self
            .authorize(self.client.patch(self.table_url(table)))
            .query(&[(column, format!("eq.{}", value))])
            .header("Prefer", "return=minimal")
            .json(changes);
        http::check_status(SERVICE, request.send().await?).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classicflix_models::MovieType;

    fn updates(value: Value) -> MovieUpdates {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_split_updates_routes_fields() {
        let routed = split_updates(&updates(json!({
            "videoUrl": "https://archive.org/details/x",
            "descriptionPt": "Um filme",
            "cast": ["A", "B"],
            "rating": "7.0",
            "unknownField": 1
        })));

        assert_eq!(routed.movies.len(), 1);
        assert_eq!(routed.movies["videoUrl"], json!("https://archive.org/details/x"));
        assert_eq!(routed.description.len(), 1);
        assert_eq!(routed.description["descriptionPt"], json!("Um filme"));
        assert_eq!(routed.technical["cast_members"], json!(["A", "B"]));
        assert_eq!(routed.technical["rating"], json!("7.0"));
        assert!(!routed.technical.contains_key("cast"));
    }

    #[test]
    fn test_split_updates_copies_title_everywhere() {
        let routed = split_updates(&updates(json!({"title": "Metropolis"})));
        assert_eq!(routed.movies["title"], json!("Metropolis"));
        assert_eq!(routed.description["title"], json!("Metropolis"));
        assert_eq!(routed.technical["title"], json!("Metropolis"));
    }

    #[test]
    fn test_insert_rows_use_store_columns() {
        let movie = Movie {
            id: "db-1".to_string(),
            wikidata_id: Some("custom-1".to_string()),
            title: "Haxan".to_string(),
            cast: vec!["Benjamin Christensen".to_string()],
            movie_type: MovieType::Movie,
            ..Movie::default()
        };
        let (movie_row, description_row, technical_row) = insert_rows(&movie);
        assert_eq!(movie_row["id"], json!("db-1"));
        assert_eq!(description_row["wikidataId"], json!("custom-1"));
        assert_eq!(technical_row["cast_members"], json!(["Benjamin Christensen"]));
        assert_eq!(technical_row["type"], json!("Movie"));
    }

    #[test]
    fn test_interaction_row_timestamp_is_optional() {
        let interaction = UserMovieInteraction {
            progress_seconds: 42,
            ..UserMovieInteraction::empty("m1")
        };
        let with = interaction_row("u1", &interaction, true);
        assert_eq!(with["progress_seconds"], json!(42));
        assert!(with.get("last_updated_at").is_some());

        let without = interaction_row("u1", &interaction, false);
        assert!(without.get("last_updated_at").is_none());
    }
}
