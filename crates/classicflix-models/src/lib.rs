pub mod movie;
pub mod details;
pub mod filter;
pub mod interaction;
pub mod language;
pub mod video;
pub mod constants;

pub use movie::{ColorKind, ExternalRef, Movie, MovieType};
pub use details::MovieDetails;
pub use filter::{DurationCategory, FilterState, RatingCategory};
pub use interaction::{InteractionField, UserMovieInteraction};
pub use language::AppLanguage;
pub use video::{ResolvedVideo, VideoProvider};
