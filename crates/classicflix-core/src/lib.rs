pub mod aggregate;
pub mod cache;
pub mod catalog;
pub mod filter;
pub mod interactions;
pub mod video;

pub use aggregate::MetadataAggregator;
pub use cache::CacheManager;
pub use catalog::{canonical_language, ensure_list, to_https, unique_awards, unique_directors, CatalogService, CatalogStats};
pub use filter::{filter_movies, paginate, parse_duration_minutes, parse_rating};
pub use interactions::InteractionService;
pub use video::{trailer_embed_url, wikimedia_thumbnail, VideoResolver};
