use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;

use crate::error::{Result, SourceError};
use crate::http;

const COMMONS_API: &str = "https://commons.wikimedia.org/w/api.php";
const FILE_PATH_MARKER: &str = "commons.wikimedia.org/wiki/Special:FilePath/";
const SERVICE: &str = "wikimedia";

/// File name referenced by a `Special:FilePath` URL, percent-decoded
pub fn file_path_name(url: &str) -> Option<String> {
    let (_, encoded) = url.split_once(FILE_PATH_MARKER)?;
    let encoded = encoded.split(['?', '#']).next().unwrap_or_default();
    if encoded.is_empty() {
        return None;
    }
    let decoded = urlencoding::decode(encoded)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| encoded.to_string());
    Some(decoded)
}

/// Sized rendition of an upload.wikimedia.org original
///
/// Thumbnails and non-Commons URLs are returned unchanged.
pub fn wikimedia_thumbnail(url: &str, width: u32) -> String {
    if url.is_empty() || !url.contains("upload.wikimedia.org") || url.contains("/thumb/") {
        return url.to_string();
    }
    let Ok(mut parsed) = reqwest::Url::parse(url) else {
        return url.to_string();
    };
    let others: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(k, _)| k != "width")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    {
        let mut pairs = parsed.query_pairs_mut();
        pairs.clear();
        for (k, v) in &others {
            pairs.append_pair(k, v);
        }
        pairs.append_pair("width", &width.to_string());
    }
    parsed.to_string()
}

/// First `imageinfo[].url` of an imageinfo query response
pub fn parse_imageinfo(body: &Value) -> Option<String> {
    body.get("query")?
        .get("pages")?
        .as_object()?
        .values()
        .next()?
        .get("imageinfo")?
        .as_array()?
        .first()?
        .get("url")?
        .as_str()
        .map(str::to_string)
}

#[derive(Clone)]
pub struct WikimediaClient {
    client: Arc<Client>,
}

impl WikimediaClient {
    pub fn new() -> Self {
        Self {
            client: Arc::new(http::create_client()),
        }
    }

    /// Direct upload URL for a Commons file name
    pub async fn file_url(&self, file_name: &str) -> Result<Option<String>> {
        let title = format!("File:{}", file_name);
        let response = self
            .client
            .get(COMMONS_API)
            .query(&[
                ("action", "query"),
                ("titles", title.as_str()),
                ("prop", "imageinfo"),
                ("iiprop", "url"),
                ("format", "json"),
                ("origin", "*"),
            ])
            .send()
            .await?;
        let body: Value = http::read_json(SERVICE, response).await?;
        Ok(parse_imageinfo(&body))
    }

    /// Resolve a `Special:FilePath` URL to the upload it redirects to
    pub async fn resolve_file_path(&self, url: &str) -> Result<Option<String>> {
        let file_name = file_path_name(url)
            .ok_or_else(|| SourceError::parse(SERVICE, format!("not a Special:FilePath URL: {}", url)))?;
        self.file_url(&file_name).await
    }
}

impl Default for WikimediaClient {
    fn default() -> Self {
        Self::new()
    }
}
