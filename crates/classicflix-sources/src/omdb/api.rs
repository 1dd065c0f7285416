use classicflix_models::{Movie, MovieDetails, MovieType};
use reqwest::Client;
use serde::Deserialize;

use crate::error::{Result, SourceError};
use crate::http;
use crate::text::{parse_year, split_list};

const API_BASE: &str = "https://www.omdbapi.com/";
pub(crate) const SERVICE: &str = "omdb";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OmdbSearchResponse {
    #[serde(default)]
    search: Vec<OmdbSearchItem>,
    response: String,
}

#[derive(Debug, Deserialize)]
struct OmdbSearchItem {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Poster", default)]
    poster: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OmdbTitle {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year")]
    year: String,
    #[serde(rename = "Runtime")]
    runtime: String,
    #[serde(rename = "Genre")]
    genre: String,
    #[serde(rename = "Director")]
    director: String,
    #[serde(rename = "Writer")]
    writer: String,
    #[serde(rename = "Actors")]
    actors: String,
    #[serde(rename = "Plot")]
    plot: String,
    #[serde(rename = "Language")]
    language: String,
    #[serde(rename = "Country")]
    country: String,
    #[serde(rename = "Awards")]
    awards: String,
    #[serde(rename = "Poster")]
    poster: String,
    #[serde(rename = "imdbRating")]
    imdb_rating: String,
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Production")]
    production: String,
    #[serde(rename = "Response")]
    response: String,
}

/// OMDb writes "N/A" for anything it does not know
fn known(value: &str) -> Option<&str> {
    let value = value.trim();
    if value.is_empty() || value == "N/A" {
        None
    } else {
        Some(value)
    }
}

fn known_list(value: &str) -> Vec<String> {
    known(value).map(split_list).unwrap_or_default()
}

pub fn parse_search(body: &str) -> Result<Vec<Movie>> {
    let response: OmdbSearchResponse = serde_json::from_str(body).map_err(|e| SourceError::parse(SERVICE, e))?;
    if response.response != "True" {
        return Ok(Vec::new());
    }

    Ok(response
        .search
        .into_iter()
        .map(|item| Movie {
            id: format!("omdb-{}", item.imdb_id),
            wikidata_id: Some(item.imdb_id),
            title: item.title,
            year: parse_year(&item.year).unwrap_or(0),
            poster_url: known(&item.poster).unwrap_or_default().to_string(),
            movie_type: MovieType::Movie,
            source_label: Some("OMDb".to_string()),
            ..Movie::default()
        })
        .collect())
}

pub fn parse_details(body: &str) -> Result<Option<MovieDetails>> {
    let title: OmdbTitle = serde_json::from_str(body).map_err(|e| SourceError::parse(SERVICE, e))?;
    if title.response != "True" {
        return Ok(None);
    }

    Ok(Some(MovieDetails {
        title: known(&title.title).map(str::to_string),
        original_title: known(&title.title).map(str::to_string),
        description: known(&title.plot).map(str::to_string),
        year: parse_year(&title.year),
        poster_url: known(&title.poster).map(str::to_string),
        director: known(&title.director).map(str::to_string),
        duration: known(&title.runtime).map(str::to_string),
        rating: known(&title.imdb_rating).map(str::to_string),
        language: known_list(&title.language).into_iter().next(),
        wikidata_id: known(&title.imdb_id).map(str::to_string),
        cast: known_list(&title.actors),
        genres: known_list(&title.genre),
        writers: known_list(&title.writer),
        awards: known(&title.awards).map(|a| vec![a.to_string()]).unwrap_or_default(),
        countries: known_list(&title.country),
        production_companies: known(&title.production).map(|p| vec![p.to_string()]).unwrap_or_default(),
        ..MovieDetails::default()
    }))
}

fn build_request(client: &Client, params: &[(&str, &str)]) -> Result<reqwest::Request> {
    Ok(client.get(API_BASE).query(params).build()?)
}

async fn get_text(client: &Client, params: &[(&str, &str)]) -> Result<String> {
    let request = build_request(client, params)?;
    let response = client.execute(request).await?;
    let response = http::check_status(SERVICE, response).await?;
    Ok(response.text().await?)
}

pub async fn search(client: &Client, api_key: &str, query: &str) -> Result<Vec<Movie>> {
    let body = get_text(client, &[("apikey", api_key), ("s", query), ("type", "movie")]).await?;
    parse_search(&body)
}

pub async fn details(client: &Client, api_key: &str, imdb_id: &str) -> Result<Option<MovieDetails>> {
    let body = get_text(client, &[("apikey", api_key), ("i", imdb_id), ("plot", "full")]).await?;
    parse_details(&body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_search_results() {
        let body = json!({
            "Search": [
                {"Title": "Nosferatu", "Year": "1922", "imdbID": "tt0013442", "Type": "movie", "Poster": "https://img/n.jpg"},
                {"Title": "Metropolis", "Year": "1927", "imdbID": "tt0017136", "Type": "movie", "Poster": "N/A"}
            ],
            "totalResults": "2",
            "Response": "True"
        })
        .to_string();

        let movies = parse_search(&body).unwrap();
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].id, "omdb-tt0013442");
        assert_eq!(movies[0].wikidata_id.as_deref(), Some("tt0013442"));
        assert_eq!(movies[0].year, 1922);
        assert_eq!(movies[1].poster_url, "");
    }

    #[test]
    fn test_request_encodes_key_and_query() {
        let client = Client::new();
        let request = build_request(&client, &[("apikey", "k&s=x y"), ("s", "His Girl Friday"), ("type", "movie")]).unwrap();
        let pairs: Vec<(String, String)> = request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(pairs[0], ("apikey".to_string(), "k&s=x y".to_string()));
        assert_eq!(pairs[1], ("s".to_string(), "His Girl Friday".to_string()));
        assert_eq!(pairs.len(), 3);
    }

    #[test]
    fn test_parse_search_no_results() {
        let body = json!({"Response": "False", "Error": "Movie not found!"}).to_string();
        assert!(parse_search(&body).unwrap().is_empty());
    }

    #[test]
    fn test_parse_details_treats_na_as_absent() {
        let body = json!({
            "Title": "The General",
            "Year": "1926",
            "Runtime": "67 min",
            "Genre": "Action, Adventure, Comedy",
            "Director": "Clyde Bruckman, Buster Keaton",
            "Writer": "N/A",
            "Actors": "Buster Keaton, Marion Mack",
            "Plot": "A train engineer...",
            "Language": "None, English",
            "Country": "United States",
            "Awards": "N/A",
            "Poster": "N/A",
            "imdbRating": "8.1",
            "imdbID": "tt0017925",
            "Production": "N/A",
            "Response": "True"
        })
        .to_string();

        let details = parse_details(&body).unwrap().unwrap();
        assert_eq!(details.title.as_deref(), Some("The General"));
        assert_eq!(details.year, Some(1926));
        assert_eq!(details.duration.as_deref(), Some("67 min"));
        assert_eq!(details.genres, vec!["Action", "Adventure", "Comedy"]);
        assert_eq!(details.cast, vec!["Buster Keaton", "Marion Mack"]);
        assert_eq!(details.language.as_deref(), Some("None"));
        assert!(details.writers.is_empty());
        assert!(details.awards.is_empty());
        assert!(details.poster_url.is_none());
        assert!(details.production_companies.is_empty());
    }

    #[test]
    fn test_parse_details_not_found() {
        let body = json!({"Response": "False", "Error": "Incorrect IMDb ID."}).to_string();
        assert!(parse_details(&body).unwrap().is_none());
    }
}
