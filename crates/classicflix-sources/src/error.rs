use thiserror::Error;

/// Errors surfaced by the HTTP clients and catalog stores
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} returned {status}: {message}")]
    Status {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("could not parse {service} response: {message}")]
    Parse {
        service: &'static str,
        message: String,
    },

    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("offline mode")]
    Offline,

    #[error("login required")]
    NotAuthenticated,
}

impl SourceError {
    pub fn parse(service: &'static str, message: impl std::fmt::Display) -> Self {
        SourceError::Parse {
            service,
            message: message.to_string(),
        }
    }

    /// True for a PostgREST "relation does not exist" response
    pub fn is_missing_table(&self) -> bool {
        matches!(
            self,
            SourceError::Status { message, .. } if message.contains("42P01") || message.contains("PGRST205")
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::Status { status: 404, .. })
    }
}

pub type Result<T> = std::result::Result<T, SourceError>;
