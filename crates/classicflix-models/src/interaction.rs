use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-user state for one movie, keyed by (user_id, movie_id) in the store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct UserMovieInteraction {
    pub movie_id: String,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub is_watched: bool,
    #[serde(default)]
    pub watch_later: bool,
    #[serde(default)]
    pub progress_seconds: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_at: Option<DateTime<Utc>>,
}

impl UserMovieInteraction {
    /// State of a movie the user has never touched
    pub fn empty(movie_id: &str) -> Self {
        Self {
            movie_id: movie_id.to_string(),
            ..Self::default()
        }
    }

    pub fn get(&self, field: InteractionField) -> bool {
        match field {
            InteractionField::Favorite => self.is_favorite,
            InteractionField::Watched => self.is_watched,
            InteractionField::WatchLater => self.watch_later,
        }
    }

    pub fn set(&mut self, field: InteractionField, value: bool) {
        match field {
            InteractionField::Favorite => self.is_favorite = value,
            InteractionField::Watched => self.is_watched = value,
            InteractionField::WatchLater => self.watch_later = value,
        }
    }
}

/// The boolean lists a user can toggle a movie in and out of
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InteractionField {
    Favorite,
    Watched,
    WatchLater,
}

impl InteractionField {
    /// Column name in `user_movie_interactions`
    pub fn column(&self) -> &'static str {
        match self {
            InteractionField::Favorite => "is_favorite",
            InteractionField::Watched => "is_watched",
            InteractionField::WatchLater => "watch_later",
        }
    }
}
