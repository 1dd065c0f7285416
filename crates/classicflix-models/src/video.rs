use serde::{Deserialize, Serialize};

/// Outcome of resolving a catalog video reference
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedVideo {
    pub playable_url: String,
    /// True for a directly addressable media file, false for an embeddable player page
    pub is_direct_media: bool,
    pub provider: VideoProvider,
}

impl ResolvedVideo {
    pub fn direct(url: impl Into<String>, provider: VideoProvider) -> Self {
        Self { playable_url: url.into(), is_direct_media: true, provider }
    }

    pub fn embed(url: impl Into<String>, provider: VideoProvider) -> Self {
        Self { playable_url: url.into(), is_direct_media: false, provider }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum VideoProvider {
    Archive,
    YouTube,
    Vimeo,
    Wikimedia,
    /// Unrecognized host; the URL is handed to the player as-is
    Direct,
}
