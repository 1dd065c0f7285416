use classicflix_models::{Movie, MovieDetails, MovieType};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::error::{Result, SourceError};
use crate::http;
use crate::text::{parse_year, present, strip_html};

const API_BASE: &str = "https://api.tvmaze.com";
pub(crate) const SERVICE: &str = "tvmaze";

#[derive(Debug, Deserialize)]
struct SearchHit {
    show: Show,
}

#[derive(Debug, Deserialize, Default)]
struct Image {
    medium: Option<String>,
    original: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct ShowRating {
    average: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
struct Externals {
    imdb: Option<String>,
    thetvdb: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct Person {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CastCredit {
    person: Person,
}

#[derive(Debug, Deserialize, Default)]
struct Embedded {
    #[serde(default)]
    cast: Vec<CastCredit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Show {
    id: u64,
    name: String,
    language: Option<String>,
    #[serde(default)]
    genres: Vec<String>,
    premiered: Option<String>,
    average_runtime: Option<u32>,
    #[serde(default)]
    rating: ShowRating,
    image: Option<Image>,
    summary: Option<String>,
    #[serde(default)]
    externals: Externals,
    official_site: Option<String>,
    #[serde(rename = "_embedded", default)]
    embedded: Embedded,
}

impl Show {
    fn year(&self) -> Option<i32> {
        self.premiered.as_deref().and_then(parse_year)
    }

    fn description(&self) -> Option<String> {
        self.summary.as_deref().map(strip_html).filter(|s| !s.is_empty())
    }

    fn poster(&self) -> Option<String> {
        self.image
            .as_ref()
            .and_then(|i| present(i.original.as_deref()).or_else(|| present(i.medium.as_deref())))
    }

    fn duration(&self) -> Option<String> {
        self.average_runtime.filter(|m| *m > 0).map(|m| format!("{}m", m))
    }

    fn rating(&self) -> Option<String> {
        self.rating.average.map(|r| r.to_string())
    }

    fn into_details(self) -> MovieDetails {
        MovieDetails {
            title: present(Some(self.name.as_str())),
            description: self.description(),
            year: self.year(),
            poster_url: self.poster(),
            duration: self.duration(),
            rating: self.rating(),
            language: present(self.language.as_deref()),
            wikidata_id: present(self.externals.imdb.as_deref()),
            cast: self.embedded.cast.iter().map(|c| c.person.name.clone()).collect(),
            genres: self.genres,
            ..MovieDetails::default()
        }
    }

    fn into_movie(self) -> Movie {
        let wikidata_id = present(self.externals.imdb.as_deref())
            .or_else(|| self.externals.thetvdb.map(|id| id.to_string()));
        Movie {
            id: format!("tvmaze-{}", self.id),
            title: self.name.clone(),
            original_title: Some(self.name.clone()),
            description: self.description().unwrap_or_default(),
            year: self.year().unwrap_or(0),
            poster_url: self.poster().unwrap_or_default(),
            language: self.language.clone().unwrap_or_else(|| "English".to_string()),
            rating: self.rating().unwrap_or_default(),
            duration: self.duration().unwrap_or_default(),
            movie_type: MovieType::Series,
            wikidata_id,
            video_url: present(self.official_site.as_deref()),
            source_label: Some("TVMaze".to_string()),
            genres: self.genres,
            ..Movie::default()
        }
    }
}

pub fn parse_search(body: &str) -> Result<Vec<Movie>> {
    let hits: Vec<SearchHit> = serde_json::from_str(body).map_err(|e| SourceError::parse(SERVICE, e))?;
    Ok(hits.into_iter().map(|hit| hit.show.into_movie()).collect())
}

pub fn parse_show(body: &str) -> Result<MovieDetails> {
    let show: Show = serde_json::from_str(body).map_err(|e| SourceError::parse(SERVICE, e))?;
    Ok(show.into_details())
}

pub async fn search(client: &Client, query: &str) -> Result<Vec<Movie>> {
    let url = format!("{}/search/shows?q={}", API_BASE, urlencoding::encode(query));
    let response = client.get(&url).send().await?;
    let response = http::check_status(SERVICE, response).await?;
    parse_search(&response.text().await?)
}

pub async fn details(client: &Client, tvmaze_id: &str) -> Result<MovieDetails> {
    let clean_id = tvmaze_id.trim_start_matches("tvmaze-");
    let url = format!("{}/shows/{}?embed=cast", API_BASE, clean_id);
    let response = client.get(&url).send().await?;
    let response = http::check_status(SERVICE, response).await?;
    parse_show(&response.text().await?)
}

/// The lookup endpoint redirects to the show when it exists and answers 404 otherwise
pub async fn lookup_by_imdb(client: &Client, imdb_id: &str) -> Result<Option<MovieDetails>> {
    let url = format!("{}/lookup/shows?imdb={}", API_BASE, urlencoding::encode(imdb_id));
    let response = client.get(&url).send().await?;
    if response.status() == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    let response = http::check_status(SERVICE, response).await?;
    parse_show(&response.text().await?).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn show_json() -> serde_json::Value {
        json!({
            "id": 1871,
            "name": "The Twilight Zone",
            "language": "English",
            "genres": ["Drama", "Science-Fiction"],
            "premiered": "1959-10-02",
            "averageRuntime": 25,
            "rating": {"average": 8.9},
            "image": {"medium": "https://static.tvmaze.com/m.jpg", "original": "https://static.tvmaze.com/o.jpg"},
            "summary": "<p>Rod Serling's <b>anthology</b> series.</p>",
            "externals": {"imdb": "tt0052520", "thetvdb": 73587},
            "officialSite": null,
            "_embedded": {"cast": [{"person": {"name": "Rod Serling"}}]}
        })
    }

    #[test]
    fn test_parse_show_details() {
        let details = parse_show(&show_json().to_string()).unwrap();
        assert_eq!(details.title.as_deref(), Some("The Twilight Zone"));
        assert_eq!(details.description.as_deref(), Some("Rod Serling's anthology series."));
        assert_eq!(details.year, Some(1959));
        assert_eq!(details.duration.as_deref(), Some("25m"));
        assert_eq!(details.rating.as_deref(), Some("8.9"));
        assert_eq!(details.poster_url.as_deref(), Some("https://static.tvmaze.com/o.jpg"));
        assert_eq!(details.cast, vec!["Rod Serling"]);
        assert_eq!(details.wikidata_id.as_deref(), Some("tt0052520"));
    }

    #[test]
    fn test_parse_search_builds_series_candidates() {
        let body = json!([{"score": 0.9, "show": show_json()}]).to_string();
        let movies = parse_search(&body).unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].id, "tvmaze-1871");
        assert_eq!(movies[0].movie_type, MovieType::Series);
        assert_eq!(movies[0].wikidata_id.as_deref(), Some("tt0052520"));
        assert_eq!(movies[0].genres, vec!["Drama", "Science-Fiction"]);
    }

    #[test]
    fn test_parse_show_with_missing_fields() {
        let body = json!({"id": 5, "name": "Untitled", "summary": null, "image": null}).to_string();
        let details = parse_show(&body).unwrap();
        assert_eq!(details.title.as_deref(), Some("Untitled"));
        assert!(details.description.is_none());
        assert!(details.poster_url.is_none());
        assert!(details.cast.is_empty());
    }
}
