//! Catalog filtering. Every active field of [`FilterState`] adds one predicate
//! and a movie must satisfy all of them.

use classicflix_models::{ColorKind, DurationCategory, FilterState, Movie, RatingCategory};
use regex::Regex;
use std::sync::OnceLock;

use crate::catalog::canonical_language;

fn hours_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(\d+)\s*h").expect("valid hours regex"))
}

fn minutes_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(\d+)\s*m").expect("valid minutes regex"))
}

fn bare_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\d+)\s*$").expect("valid number regex"))
}

fn rating_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\d+(?:[.,]\d+)?)").expect("valid rating regex"))
}

fn top30_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\.\s+").expect("valid rank regex"))
}

fn capture_u32(re: &Regex, text: &str) -> Option<u32> {
    re.captures(text).and_then(|c| c[1].parse().ok())
}

/// Runtime in minutes from `"1h 34m"`, `"94m"`, `"94 min"` or a bare `"94"`
pub fn parse_duration_minutes(duration: &str) -> Option<u32> {
    let hours = capture_u32(hours_re(), duration);
    let minutes = capture_u32(minutes_re(), duration);
    match (hours, minutes) {
        (None, None) => capture_u32(bare_number_re(), duration),
        (h, m) => Some(h.unwrap_or(0).saturating_mul(60).saturating_add(m.unwrap_or(0))),
    }
}

/// Numeric rating from `"7.8"`, `"7,8"` or `"7.8/10"`
pub fn parse_rating(rating: &str) -> Option<f64> {
    rating_re()
        .captures(rating)
        .and_then(|c| c[1].replace(',', ".").parse().ok())
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

fn matches_search(movie: &Movie, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    contains_ci(&movie.title, &query)
        || movie.title_pt.as_deref().map(|t| contains_ci(t, &query)).unwrap_or(false)
        || contains_ci(&movie.description, &query)
        || contains_ci(&movie.director, &query)
}

fn matches_top30(movie: &Movie, entry: &str) -> bool {
    let wanted = top30_prefix_re().replace(entry, "").to_lowercase();
    movie.display_title().to_lowercase().contains(&wanted)
}

fn matches_rating(movie: &Movie, category_id: &str) -> bool {
    match (RatingCategory::by_id(category_id), parse_rating(&movie.rating)) {
        (Some(category), Some(value)) => category.contains(value),
        _ => false,
    }
}

fn matches_duration(movie: &Movie, category: DurationCategory) -> bool {
    parse_duration_minutes(&movie.duration)
        .map(|minutes| DurationCategory::for_minutes(minutes) == category)
        .unwrap_or(false)
}

fn matches_color(movie: &Movie, label: &str) -> bool {
    match (movie.color, ColorKind::from_label(label)) {
        (Some(color), Some(wanted)) => color == wanted,
        _ => false,
    }
}

/// True when `movie` passes every active predicate of `filters`
pub fn matches(movie: &Movie, filters: &FilterState) -> bool {
    if filters.has_poster_only && !movie.has_real_poster() {
        return false;
    }
    if let Some(entry) = &filters.selected_top30 {
        if !matches_top30(movie, entry) {
            return false;
        }
    }
    if !matches_search(movie, &filters.search_query) {
        return false;
    }
    if let Some(genre) = &filters.selected_genre {
        if !movie.genres.contains(genre) {
            return false;
        }
    }
    if let Some(theme) = &filters.selected_theme {
        if !movie.themes.contains(theme) {
            return false;
        }
    }
    if let Some(award) = &filters.selected_award {
        if !movie.awards.contains(award) {
            return false;
        }
    }
    if let Some(director) = &filters.selected_director {
        if &movie.director != director {
            return false;
        }
    }
    if let Some(language) = &filters.selected_language {
        if &canonical_language(&movie.language) != language {
            return false;
        }
    }
    if let Some(year) = filters.selected_year {
        if movie.year != year {
            return false;
        }
    }
    if let Some(decade) = filters.selected_decade {
        if movie.year < decade || movie.year >= decade + 10 {
            return false;
        }
    }
    if let Some(rating) = &filters.selected_rating {
        if !matches_rating(movie, rating) {
            return false;
        }
    }
    if let Some(color) = &filters.selected_color {
        if !matches_color(movie, color) {
            return false;
        }
    }
    if let Some(source) = &filters.selected_source {
        let label = movie.source_label.as_deref().unwrap_or_default();
        if !label.eq_ignore_ascii_case(source) {
            return false;
        }
    }
    if let Some(duration) = filters.selected_duration {
        if !matches_duration(movie, duration) {
            return false;
        }
    }
    if let Some(subtitles) = filters.has_subtitles {
        if movie.has_subtitles != subtitles {
            return false;
        }
    }
    true
}

/// Movies passing `filters`, in catalog order
pub fn filter_movies<'a>(movies: &'a [Movie], filters: &FilterState) -> Vec<&'a Movie> {
    movies.iter().filter(|movie| matches(movie, filters)).collect()
}

/// One page (1-based) of `items`; past the end yields an empty slice
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let page_size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(title: &str, year: i32, genres: &[&str]) -> Movie {
        Movie {
            id: title.to_lowercase(),
            title: title.to_string(),
            year,
            genres: genres.iter().map(|g| g.to_string()).collect(),
            ..Movie::default()
        }
    }

    fn titles(movies: Vec<&Movie>) -> Vec<&str> {
        movies.into_iter().map(|m| m.title.as_str()).collect()
    }

    #[test]
    fn test_decade_bounds() {
        let filters = FilterState {
            selected_decade: Some(1920),
            ..FilterState::default()
        };
        assert!(matches(&movie("Metropolis", 1925, &[]), &filters));
        assert!(matches(&movie("Early", 1920, &[]), &filters));
        assert!(!matches(&movie("Talkie", 1930, &[]), &filters));
        assert!(!matches(&movie("Edison", 1919, &[]), &filters));
    }

    #[test]
    fn test_predicates_are_conjunctive() {
        let nosferatu = movie("Nosferatu", 1922, &["Horror"]);
        let mut filters = FilterState {
            selected_decade: Some(1920),
            ..FilterState::default()
        };
        assert!(matches(&nosferatu, &filters));

        filters.selected_genre = Some("Comedy".to_string());
        assert!(!matches(&nosferatu, &filters));
    }

    #[test]
    fn test_empty_filters_keep_everything() {
        let movies = vec![movie("A", 1920, &[]), movie("B", 1950, &[])];
        assert_eq!(filter_movies(&movies, &FilterState::default()).len(), 2);
    }

    #[test]
    fn test_search_matches_title_pt_description_and_director() {
        let mut m = movie("The General", 1926, &["Comedy"]);
        m.title_pt = Some("A General".to_string());
        m.description = "A train chase".to_string();
        m.director = "Buster Keaton".to_string();

        for query in ["general", "A GENERAL", "train", "keaton"] {
            let filters = FilterState {
                search_query: query.to_string(),
                ..FilterState::default()
            };
            assert!(matches(&m, &filters), "query {:?}", query);
        }
        let filters = FilterState {
            search_query: "chaplin".to_string(),
            ..FilterState::default()
        };
        assert!(!matches(&m, &filters));
    }

    #[test]
    fn test_top30_strips_rank_prefix() {
        let mut m = movie("Nosferatu", 1922, &[]);
        m.title_pt = Some("Nosferatu".to_string());
        let filters = FilterState {
            selected_top30: Some("3. Nosferatu".to_string()),
            ..FilterState::default()
        };
        assert!(matches(&m, &filters));

        let filters = FilterState {
            selected_top30: Some("4. Metrópolis".to_string()),
            ..FilterState::default()
        };
        assert!(!matches(&m, &filters));
    }

    #[test]
    fn test_language_uses_canonical_name() {
        let mut m = movie("Limite", 1931, &[]);
        m.language = "pt-BR".to_string();
        let filters = FilterState {
            selected_language: Some("Portuguese".to_string()),
            ..FilterState::default()
        };
        assert!(matches(&m, &filters));
    }

    #[test]
    fn test_rating_and_duration_exclude_unparsable() {
        let mut m = movie("Haxan", 1922, &[]);
        m.rating = "7.6".to_string();
        m.duration = "1h 31m".to_string();

        let by_rating = FilterState {
            selected_rating: Some("moderado".to_string()),
            ..FilterState::default()
        };
        let by_duration = FilterState {
            selected_duration: Some(DurationCategory::Long),
            ..FilterState::default()
        };
        assert!(matches(&m, &by_rating));
        assert!(matches(&m, &by_duration));

        m.rating = "N/A".to_string();
        m.duration = String::new();
        assert!(!matches(&m, &by_rating));
        assert!(!matches(&m, &by_duration));
    }

    #[test]
    fn test_source_color_and_subtitles() {
        let mut m = movie("Sherlock Jr.", 1924, &[]);
        m.source_label = Some("Archive.org".to_string());
        m.color = Some(ColorKind::BlackAndWhite);
        m.has_subtitles = true;

        let filters = FilterState {
            selected_source: Some("archive.org".to_string()),
            selected_color: Some("Black & White".to_string()),
            has_subtitles: Some(true),
            ..FilterState::default()
        };
        assert!(matches(&m, &filters));

        m.has_subtitles = false;
        assert!(!matches(&m, &filters));
    }

    #[test]
    fn test_poster_only() {
        let mut m = movie("Plan 9", 1957, &[]);
        m.poster_url = "https://placehold.co/400x600".to_string();
        let filters = FilterState {
            has_poster_only: true,
            ..FilterState::default()
        };
        assert!(!matches(&m, &filters));
    }

    #[test]
    fn test_parse_duration_minutes() {
        assert_eq!(parse_duration_minutes("1h 34m"), Some(94));
        assert_eq!(parse_duration_minutes("2h"), Some(120));
        assert_eq!(parse_duration_minutes("94m"), Some(94));
        assert_eq!(parse_duration_minutes("94 min"), Some(94));
        assert_eq!(parse_duration_minutes("94"), Some(94));
        assert_eq!(parse_duration_minutes("unknown"), None);
    }

    #[test]
    fn test_huge_duration_saturates_into_giant() {
        assert_eq!(parse_duration_minutes("80000000h"), Some(u32::MAX));
        assert_eq!(parse_duration_minutes("80000000h 30m"), Some(u32::MAX));

        let movie = Movie {
            duration: "80000000h".to_string(),
            ..Movie::default()
        };
        let filters = FilterState {
            selected_duration: Some(DurationCategory::Giant),
            ..FilterState::default()
        };
        assert!(matches(&movie, &filters));
    }

    #[test]
    fn test_paginate() {
        let items: Vec<u32> = (0..100).collect();
        assert_eq!(paginate(&items, 1, 48).len(), 48);
        assert_eq!(paginate(&items, 3, 48), &[96, 97, 98, 99]);
        assert!(paginate(&items, 4, 48).is_empty());
        assert_eq!(paginate(&items, 0, 48)[0], 0);
    }

    #[test]
    fn test_filter_keeps_order() {
        let movies = vec![
            movie("Nosferatu", 1922, &["Horror"]),
            movie("The Kid", 1921, &["Comedy"]),
            movie("Haxan", 1922, &["Horror"]),
        ];
        let filters = FilterState {
            selected_genre: Some("Horror".to_string()),
            ..FilterState::default()
        };
        assert_eq!(titles(filter_movies(&movies, &filters)), vec!["Nosferatu", "Haxan"]);
    }
}
