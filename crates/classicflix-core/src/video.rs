//! Turns the free-form `videoUrl` of a catalog entry into something a player
//! can open: a direct media file or a provider embed page.

use classicflix_models::{ResolvedVideo, VideoProvider};
use classicflix_sources::wikimedia::file_path_name;
use classicflix_sources::{ArchiveFile, MediaLookup};
use regex::Regex;
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

pub use classicflix_sources::wikimedia::wikimedia_thumbnail;

fn youtube_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)(?:youtube\.com/(?:[^/]+/.+/|(?:v|e(?:mbed)?)/|.*[?&]v=)|youtu\.be/)([^"&?/\s]{11})"#)
            .expect("valid youtube regex")
    })
}

fn vimeo_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)vimeo\.com/(\d+)").expect("valid vimeo regex"))
}

fn media_extension_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\.(mp4|webm|ogg|m4v)$").expect("valid extension regex"))
}

pub fn youtube_id(url: &str) -> Option<&str> {
    youtube_re().captures(url).and_then(|c| c.get(1)).map(|m| m.as_str())
}

pub fn vimeo_id(url: &str) -> Option<&str> {
    vimeo_re().captures(url).and_then(|c| c.get(1)).map(|m| m.as_str())
}

pub fn has_media_extension(url: &str) -> bool {
    media_extension_re().is_match(url)
}

/// Item identifier of an archive.org `/details/{id}` or `/download/{id}` URL
pub fn archive_identifier(url: &str) -> Option<&str> {
    if !url.contains("archive.org") {
        return None;
    }
    let rest = ["archive.org/details/", "archive.org/download/"]
        .iter()
        .find_map(|marker| url.split_once(marker).map(|(_, rest)| rest))?;
    let id = rest.split(['/', '?', '#']).next().unwrap_or_default();
    (!id.is_empty()).then_some(id)
}

fn is_trailer(file: &ArchiveFile) -> bool {
    file.name.to_lowercase().contains("trailer")
}

/// Preferred playable file: h.264 mp4, then MPEG4 mp4, then any mp4.
/// Trailers are never chosen.
pub fn select_best_file(files: &[ArchiveFile]) -> Option<&ArchiveFile> {
    let candidates: Vec<&ArchiveFile> = files
        .iter()
        .filter(|f| f.name.ends_with(".mp4") && !is_trailer(f))
        .collect();
    let with_format = |format: &str| {
        candidates
            .iter()
            .copied()
            .find(|f| f.format.as_deref() == Some(format))
    };
    with_format("h.264")
        .or_else(|| with_format("MPEG4"))
        .or_else(|| candidates.first().copied())
}

pub fn archive_download_url(identifier: &str, file_name: &str) -> String {
    format!(
        "https://archive.org/download/{}/{}",
        identifier,
        urlencoding::encode(file_name)
    )
}

/// Embeddable form of a YouTube trailer link
pub fn trailer_embed_url(url: &str) -> String {
    if url.contains("youtube.com/watch?v=") {
        return url.replace("watch?v=", "embed/");
    }
    if let Some((_, id)) = url.split_once("youtu.be/") {
        return format!("https://www.youtube.com/embed/{}", id);
    }
    url.to_string()
}

pub struct VideoResolver {
    lookup: Arc<dyn MediaLookup>,
    embed_origin: Option<String>,
}

impl VideoResolver {
    pub fn new(lookup: Arc<dyn MediaLookup>, embed_origin: Option<String>) -> Self {
        Self { lookup, embed_origin }
    }

    fn youtube_embed(&self, id: &str) -> String {
        let mut url = format!("https://www.youtube.com/embed/{}?autoplay=1&rel=0&enablejsapi=1", id);
        if let Some(origin) = self.embed_origin.as_deref().filter(|o| !o.is_empty()) {
            url.push_str("&origin=");
            url.push_str(&urlencoding::encode(origin));
        }
        url.push_str("&modestbranding=1");
        url
    }

    /// Resolve a stored video reference. Lookup failures degrade to an embed
    /// page or the input itself; this never fails.
    pub async fn resolve(&self, url: &str) -> ResolvedVideo {
        let url = url.trim();
        if url.is_empty() {
            return ResolvedVideo::direct("", VideoProvider::Direct);
        }

        if let Some(identifier) = archive_identifier(url) {
            return self.resolve_archive(url, identifier).await;
        }
        if let Some(id) = youtube_id(url) {
            return ResolvedVideo::embed(self.youtube_embed(id), VideoProvider::YouTube);
        }
        if let Some(id) = vimeo_id(url) {
            return ResolvedVideo::embed(
                format!("https://player.vimeo.com/video/{}?autoplay=1", id),
                VideoProvider::Vimeo,
            );
        }
        if let Some(file_name) = file_path_name(url) {
            return self.resolve_commons(url, &file_name).await;
        }

        ResolvedVideo::direct(url, VideoProvider::Direct)
    }

    async fn resolve_archive(&self, url: &str, identifier: &str) -> ResolvedVideo {
        match self.lookup.archive_files(identifier).await {
            Ok(files) => {
                if let Some(file) = select_best_file(&files) {
                    debug!(identifier, file = %file.name, "Resolved archive.org file");
                    return ResolvedVideo::direct(archive_download_url(identifier, &file.name), VideoProvider::Archive);
                }
                debug!(identifier, files = files.len(), "No playable archive.org file");
            }
            Err(e) => warn!(identifier, error = %e, "archive.org metadata lookup failed"),
        }

        if has_media_extension(url) {
            ResolvedVideo::direct(url, VideoProvider::Archive)
        } else {
            ResolvedVideo::embed(
                format!("https://archive.org/embed/{}?autoplay=1", identifier),
                VideoProvider::Archive,
            )
        }
    }

    async fn resolve_commons(&self, url: &str, file_name: &str) -> ResolvedVideo {
        match self.lookup.commons_file_url(file_name).await {
            Ok(Some(direct)) => ResolvedVideo::direct(direct, VideoProvider::Wikimedia),
            Ok(None) => ResolvedVideo::direct(url, VideoProvider::Wikimedia),
            Err(e) => {
                warn!(file = file_name, error = %e, "Commons file lookup failed");
                ResolvedVideo::direct(url, VideoProvider::Wikimedia)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use classicflix_sources::SourceError;

    #[derive(Default)]
    struct FakeHosts {
        files: Vec<ArchiveFile>,
        commons: Option<String>,
        fail: bool,
    }

    #[async_trait]
    impl MediaLookup for FakeHosts {
        async fn archive_files(&self, _identifier: &str) -> Result<Vec<ArchiveFile>, SourceError> {
            if self.fail {
                return Err(SourceError::parse("archive", "bad json"));
            }
            Ok(self.files.clone())
        }

        async fn commons_file_url(&self, _file_name: &str) -> Result<Option<String>, SourceError> {
            if self.fail {
                return Err(SourceError::Status { service: "wikimedia", status: 503, message: String::new() });
            }
            Ok(self.commons.clone())
        }
    }

    fn resolver(hosts: FakeHosts) -> VideoResolver {
        VideoResolver::new(Arc::new(hosts), None)
    }

    fn files(entries: &[(&str, Option<&str>)]) -> Vec<ArchiveFile> {
        entries.iter().map(|(name, format)| ArchiveFile::new(name, *format)).collect()
    }

    #[tokio::test]
    async fn test_unrecognized_url_is_unchanged() {
        let resolved = resolver(FakeHosts::default()).resolve("https://example.com/film.avi").await;
        assert_eq!(resolved, ResolvedVideo::direct("https://example.com/film.avi", VideoProvider::Direct));

        let empty = resolver(FakeHosts::default()).resolve("").await;
        assert_eq!(empty.playable_url, "");
        assert!(empty.is_direct_media);
    }

    #[tokio::test]
    async fn test_youtube_embed_with_origin() {
        let with_origin = VideoResolver::new(Arc::new(FakeHosts::default()), Some("https://classicflix.app".to_string()));
        let resolved = with_origin.resolve("https://youtu.be/dQw4w9WgXcQ").await;
        assert!(!resolved.is_direct_media);
        assert_eq!(
            resolved.playable_url,
            "https://www.youtube.com/embed/dQw4w9WgXcQ?autoplay=1&rel=0&enablejsapi=1&origin=https%3A%2F%2Fclassicflix.app&modestbranding=1"
        );

        let without = resolver(FakeHosts::default())
            .resolve("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=10")
            .await;
        assert_eq!(
            without.playable_url,
            "https://www.youtube.com/embed/dQw4w9WgXcQ?autoplay=1&rel=0&enablejsapi=1&modestbranding=1"
        );
    }

    #[tokio::test]
    async fn test_vimeo_embed() {
        let resolved = resolver(FakeHosts::default()).resolve("https://vimeo.com/76979871").await;
        assert_eq!(resolved, ResolvedVideo::embed("https://player.vimeo.com/video/76979871?autoplay=1", VideoProvider::Vimeo));
    }

    #[tokio::test]
    async fn test_archive_prefers_h264_and_skips_trailers() {
        let hosts = FakeHosts {
            files: files(&[
                ("Nosferatu Trailer.mp4", Some("h.264")),
                ("nosferatu_512kb.mp4", Some("MPEG4")),
                ("Nosferatu 1922.mp4", Some("h.264")),
            ]),
            ..FakeHosts::default()
        };
        let resolved = resolver(hosts).resolve("https://archive.org/details/nosferatu1922").await;
        assert_eq!(
            resolved,
            ResolvedVideo::direct("https://archive.org/download/nosferatu1922/Nosferatu%201922.mp4", VideoProvider::Archive)
        );
    }

    #[tokio::test]
    async fn test_archive_never_returns_trailer() {
        let hosts = FakeHosts {
            files: files(&[("trailer.mp4", Some("MPEG4")), ("feature.mp4", None)]),
            ..FakeHosts::default()
        };
        let resolved = resolver(hosts).resolve("https://archive.org/details/feature").await;
        assert_eq!(resolved.playable_url, "https://archive.org/download/feature/feature.mp4");

        let only_trailers = FakeHosts {
            files: files(&[("TRAILER.mp4", Some("h.264"))]),
            ..FakeHosts::default()
        };
        let resolved = resolver(only_trailers).resolve("https://archive.org/details/feature").await;
        assert_eq!(resolved, ResolvedVideo::embed("https://archive.org/embed/feature?autoplay=1", VideoProvider::Archive));
    }

    #[tokio::test]
    async fn test_archive_failure_falls_back() {
        let failing = || FakeHosts { fail: true, ..FakeHosts::default() };

        let resolved = resolver(failing()).resolve("https://archive.org/download/thekid/thekid.mp4").await;
        assert_eq!(resolved, ResolvedVideo::direct("https://archive.org/download/thekid/thekid.mp4", VideoProvider::Archive));

        let resolved = resolver(failing()).resolve("https://archive.org/details/thekid").await;
        assert_eq!(resolved.playable_url, "https://archive.org/embed/thekid?autoplay=1");
        assert!(!resolved.is_direct_media);
    }

    #[tokio::test]
    async fn test_commons_file_path() {
        let url = "https://commons.wikimedia.org/wiki/Special:FilePath/Nosferatu%20(1922).webm";
        let hosts = FakeHosts {
            commons: Some("https://upload.wikimedia.org/wikipedia/commons/a/ab/Nosferatu_(1922).webm".to_string()),
            ..FakeHosts::default()
        };
        let resolved = resolver(hosts).resolve(url).await;
        assert_eq!(resolved.playable_url, "https://upload.wikimedia.org/wikipedia/commons/a/ab/Nosferatu_(1922).webm");
        assert!(resolved.is_direct_media);

        let resolved = resolver(FakeHosts { fail: true, ..FakeHosts::default() }).resolve(url).await;
        assert_eq!(resolved, ResolvedVideo::direct(url, VideoProvider::Wikimedia));
    }

    #[test]
    fn test_archive_identifier() {
        assert_eq!(archive_identifier("https://archive.org/details/Metropolis1927/"), Some("Metropolis1927"));
        assert_eq!(archive_identifier("https://archive.org/download/Metropolis1927/m.mp4"), Some("Metropolis1927"));
        assert_eq!(archive_identifier("https://archive.org/search?q=x"), None);
    }

    #[test]
    fn test_trailer_embed_url() {
        assert_eq!(trailer_embed_url("https://www.youtube.com/watch?v=abc"), "https://www.youtube.com/embed/abc");
        assert_eq!(trailer_embed_url("https://youtu.be/abc"), "https://www.youtube.com/embed/abc");
        assert_eq!(trailer_embed_url("https://vimeo.com/1"), "https://vimeo.com/1");
    }
}
