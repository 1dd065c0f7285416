//! OFDb search through a CORS-style proxy.
//!
//! OFDb has no JSON API, so the search page is fetched through a proxy that
//! wraps it in a `{"contents": "<html>"}` envelope and is then scraped.

use async_trait::async_trait;
use chrono::Datelike;
use classicflix_models::{Movie, MovieType};
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use serde::Deserialize;
use std::sync::{Arc, OnceLock};

use crate::error::{Result, SourceError};
use crate::http;
use crate::traits::MovieSearch;

const SEARCH_URL: &str = "https://www.ofdb.de/view.php?page=suchergebnis&Kat=All&SText=";
const SITE_BASE: &str = "https://www.ofdb.de/";
const SERVICE: &str = "ofdb";
const MAX_RESULTS: usize = 10;

#[derive(Debug, Deserialize)]
struct ProxyEnvelope {
    contents: Option<String>,
}

fn year_pattern() -> &'static Regex {
    static YEAR: OnceLock<Regex> = OnceLock::new();
    YEAR.get_or_init(|| Regex::new(r"\((\d{4})\)").expect("valid year regex"))
}

fn year_in(text: &str) -> Option<i32> {
    year_pattern()
        .captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Parse the OFDb search result page into candidate movies
pub fn parse_search_page(html: &str) -> Vec<Movie> {
    let document = Html::parse_document(html);
    let (Ok(row_selector), Ok(link_selector), Ok(font_selector)) = (
        Selector::parse(r#"tr[valign="top"]"#),
        Selector::parse(r#"a[href^="film/"]"#),
        Selector::parse(r#"font[size="1"]"#),
    ) else {
        return Vec::new();
    };

    let current_year = chrono::Utc::now().year();
    let mut results = Vec::new();

    for row in document.select(&row_selector) {
        let Some(link) = row.select(&link_selector).next() else {
            continue;
        };
        let title_full = link.text().collect::<String>();
        let href = link.value().attr("href").unwrap_or_default();
        let Some(ofdb_id) = href.split('/').nth(1).filter(|id| !id.is_empty()) else {
            continue;
        };

        let year = year_in(&title_full).or_else(|| {
            row.select(&font_selector)
                .next()
                .and_then(|font| year_in(&font.text().collect::<String>()))
        });

        let title = year_pattern().replace(&title_full, "").trim().to_string();

        results.push(Movie {
            id: format!("ofdb-{}", ofdb_id),
            title: if title.is_empty() { "Unknown".to_string() } else { title },
            year: year.unwrap_or(current_year),
            movie_type: MovieType::Movie,
            video_url: Some(format!("{}{}", SITE_BASE, href)),
            source_label: Some("OFDb".to_string()),
            description: "Details available on OFDb.de".to_string(),
            ..Movie::default()
        });

        if results.len() >= MAX_RESULTS {
            break;
        }
    }

    results
}

/// Unwrap the proxy envelope; a missing `contents` means no page
pub fn parse_envelope(body: &str) -> Result<Option<String>> {
    let envelope: ProxyEnvelope = serde_json::from_str(body).map_err(|e| SourceError::parse(SERVICE, e))?;
    Ok(envelope.contents)
}

#[derive(Clone)]
pub struct OfdbClient {
    client: Arc<Client>,
    proxy_url: String,
}

impl OfdbClient {
    pub fn new(proxy_url: String) -> Self {
        Self {
            client: Arc::new(http::create_client()),
            proxy_url,
        }
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Movie>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let target = format!("{}{}", SEARCH_URL, urlencoding::encode(query));
        let url = format!("{}{}", self.proxy_url, urlencoding::encode(&target));
        tracing::debug!(query = %query, "Searching OFDb through proxy");

        let response = self.client.get(&url).send().await?;
        let response = http::check_status(SERVICE, response).await?;
        match parse_envelope(&response.text().await?)? {
            Some(html) => Ok(parse_search_page(&html)),
            None => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl MovieSearch for OfdbClient {
    fn source_name(&self) -> &str {
        "ofdb"
    }

    async fn search(&self, query: &str) -> Result<Vec<Movie>> {
        OfdbClient::search(self, query).await
    }
}
