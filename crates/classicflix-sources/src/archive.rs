use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{Result, SourceError};
use crate::http;
use crate::traits::MediaLookup;
use crate::wikimedia::WikimediaClient;

const METADATA_BASE: &str = "https://archive.org/metadata";
const SERVICE: &str = "archive.org";

/// One entry of an archive.org item's file list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveFile {
    pub name: String,
    #[serde(default)]
    pub format: Option<String>,
}

impl ArchiveFile {
    pub fn new(name: &str, format: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            format: format.map(str::to_string),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ItemMetadata {
    #[serde(default)]
    files: Vec<ArchiveFile>,
}

pub fn parse_metadata(body: &str) -> Result<Vec<ArchiveFile>> {
    let metadata: ItemMetadata = serde_json::from_str(body).map_err(|e| SourceError::parse(SERVICE, e))?;
    Ok(metadata.files)
}

#[derive(Clone)]
pub struct ArchiveClient {
    client: Arc<Client>,
}

impl ArchiveClient {
    pub fn new() -> Self {
        Self {
            client: Arc::new(http::create_client()),
        }
    }

    pub async fn metadata(&self, identifier: &str) -> Result<Vec<ArchiveFile>> {
        let url = format!("{}/{}", METADATA_BASE, urlencoding::encode(identifier));
        tracing::debug!(identifier = %identifier, "Fetching archive.org metadata");
        let response = self.client.get(&url).send().await?;
        let response = http::check_status(SERVICE, response).await?;
        parse_metadata(&response.text().await?)
    }
}

impl Default for ArchiveClient {
    fn default() -> Self {
        Self::new()
    }
}

/// The real media hosts behind the video resolver
#[derive(Clone, Default)]
pub struct MediaHosts {
    archive: ArchiveClient,
    commons: WikimediaClient,
}

impl MediaHosts {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MediaLookup for MediaHosts {
    async fn archive_files(&self, identifier: &str) -> Result<Vec<ArchiveFile>> {
        self.archive.metadata(identifier).await
    }

    async fn commons_file_url(&self, file_name: &str) -> Result<Option<String>> {
        self.commons.file_url(file_name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_metadata_files() {
        let body = r#"{
            "created": 1700000000,
            "files": [
                {"name": "nosferatu.mp4", "format": "h.264", "size": "1"},
                {"name": "nosferatu.ogv", "format": "Ogg Video"},
                {"name": "__ia_thumb.jpg"}
            ]
        }"#;
        let files = parse_metadata(body).unwrap();
        assert_eq!(files.len(), 3);
        assert_eq!(files[0], ArchiveFile::new("nosferatu.mp4", Some("h.264")));
        assert_eq!(files[2].format, None);
    }

    #[test]
    fn test_parse_metadata_for_unknown_item() {
        assert!(parse_metadata("{}").unwrap().is_empty());
    }
}
