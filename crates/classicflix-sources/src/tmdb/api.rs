use classicflix_models::{Movie, MovieDetails, MovieType};
use reqwest::Client;
use serde::Deserialize;

use crate::error::{Result, SourceError};
use crate::http;
use crate::text::{parse_year, present};

const API_BASE: &str = "https://api.themoviedb.org/3";
const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";
pub(crate) const SERVICE: &str = "tmdb";

/// Billed cast members kept from the credits
const CAST_LIMIT: usize = 8;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<TmdbMovie>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovie {
    id: u64,
    #[serde(default)]
    title: String,
    original_title: Option<String>,
    overview: Option<String>,
    release_date: Option<String>,
    poster_path: Option<String>,
    vote_average: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CrewMember {
    name: String,
    #[serde(default)]
    job: String,
}

#[derive(Debug, Deserialize, Default)]
struct Credits {
    #[serde(default)]
    cast: Vec<Named>,
    #[serde(default)]
    crew: Vec<CrewMember>,
}

#[derive(Debug, Deserialize, Default)]
struct ExternalIds {
    imdb_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbMovieDetails {
    #[serde(default)]
    title: String,
    original_title: Option<String>,
    overview: Option<String>,
    release_date: Option<String>,
    poster_path: Option<String>,
    vote_average: Option<f64>,
    runtime: Option<u32>,
    imdb_id: Option<String>,
    #[serde(default)]
    genres: Vec<Named>,
    #[serde(default)]
    production_countries: Vec<Named>,
    #[serde(default)]
    production_companies: Vec<Named>,
    #[serde(default)]
    credits: Credits,
    #[serde(default)]
    external_ids: ExternalIds,
}

#[derive(Debug, Deserialize)]
struct FindResponse {
    #[serde(default)]
    movie_results: Vec<TmdbMovie>,
}

fn poster_url(path: Option<&str>) -> Option<String> {
    present(path).map(|p| format!("{}{}", IMAGE_BASE, p))
}

fn format_rating(vote_average: Option<f64>) -> Option<String> {
    vote_average.filter(|v| *v > 0.0).map(|v| format!("{:.1}", v))
}

/// Runtime in minutes as `Xh Ym`
pub fn format_runtime(minutes: u32) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

fn crew_with_jobs(crew: &[CrewMember], jobs: &[&str]) -> Vec<String> {
    crew.iter()
        .filter(|member| jobs.contains(&member.job.as_str()))
        .map(|member| member.name.clone())
        .collect()
}

fn names(items: &[Named]) -> Vec<String> {
    items.iter().map(|n| n.name.clone()).collect()
}

pub fn parse_search(body: &str) -> Result<Vec<Movie>> {
    let response: SearchResponse = serde_json::from_str(body).map_err(|e| SourceError::parse(SERVICE, e))?;
    Ok(response
        .results
        .into_iter()
        .map(|item| Movie {
            id: format!("tmdb-{}", item.id),
            title: item.title,
            original_title: present(item.original_title.as_deref()),
            description: item.overview.unwrap_or_default(),
            year: item.release_date.as_deref().and_then(parse_year).unwrap_or(0),
            poster_url: poster_url(item.poster_path.as_deref()).unwrap_or_default(),
            rating: format_rating(item.vote_average).unwrap_or_default(),
            movie_type: MovieType::Movie,
            source_label: Some("TMDb".to_string()),
            ..Movie::default()
        })
        .collect())
}

pub fn parse_details(body: &str) -> Result<MovieDetails> {
    let data: TmdbMovieDetails = serde_json::from_str(body).map_err(|e| SourceError::parse(SERVICE, e))?;
    let crew = &data.credits.crew;

    Ok(MovieDetails {
        title: present(Some(data.title.as_str())),
        original_title: present(data.original_title.as_deref()),
        description: present(data.overview.as_deref()),
        year: data.release_date.as_deref().and_then(parse_year),
        poster_url: poster_url(data.poster_path.as_deref()),
        director: crew_with_jobs(crew, &["Director"]).into_iter().next(),
        duration: data.runtime.filter(|m| *m > 0).map(format_runtime),
        rating: format_rating(data.vote_average),
        wikidata_id: present(data.external_ids.imdb_id.as_deref()).or_else(|| present(data.imdb_id.as_deref())),
        cast: data
            .credits
            .cast
            .iter()
            .take(CAST_LIMIT)
            .map(|c| c.name.clone())
            .collect(),
        genres: names(&data.genres),
        cinematographers: crew_with_jobs(crew, &["Director of Photography"]),
        composers: crew_with_jobs(crew, &["Original Music Composer", "Music"]),
        producers: crew_with_jobs(crew, &["Producer"]),
        art_directors: crew_with_jobs(crew, &["Art Direction", "Production Design"]),
        countries: names(&data.production_countries),
        production_companies: names(&data.production_companies),
        ..MovieDetails::default()
    })
}

/// TMDb id of the first movie matching an IMDb id
pub fn parse_find(body: &str) -> Result<Option<u64>> {
    let response: FindResponse = serde_json::from_str(body).map_err(|e| SourceError::parse(SERVICE, e))?;
    Ok(response.movie_results.first().map(|m| m.id))
}

async fn get_text(client: &Client, url: &str, params: &[(&str, &str)]) -> Result<String> {
    let response = client.get(url).query(params).send().await?;
    let response = http::check_status(SERVICE, response).await?;
    Ok(response.text().await?)
}

pub async fn search(client: &Client, api_key: &str, query: &str, language: &str) -> Result<Vec<Movie>> {
    let url = format!("{}/search/movie", API_BASE);
    let body = get_text(
        client,
        &url,
        &[("api_key", api_key), ("query", query), ("language", language)],
    )
    .await?;
    parse_search(&body)
}

pub async fn details(client: &Client, api_key: &str, tmdb_id: &str, language: &str) -> Result<MovieDetails> {
    let clean_id = tmdb_id.trim_start_matches("tmdb-");
    let url = format!("{}/movie/{}", API_BASE, clean_id);
    let body = get_text(
        client,
        &url,
        &[
            ("api_key", api_key),
            ("language", language),
            ("append_to_response", "credits,external_ids"),
        ],
    )
    .await?;
    parse_details(&body)
}

pub async fn find_by_imdb(client: &Client, api_key: &str, imdb_id: &str, language: &str) -> Result<Option<u64>> {
    let url = format!("{}/find/{}", API_BASE, imdb_id);
    let body = get_text(
        client,
        &url,
        &[
            ("api_key", api_key),
            ("external_source", "imdb_id"),
            ("language", language),
        ],
    )
    .await?;
    parse_find(&body)
}
