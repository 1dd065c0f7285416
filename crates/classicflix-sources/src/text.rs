//! Small normalizers shared by the API parsers.

use regex::Regex;
use std::sync::OnceLock;

/// Year from the leading four digits of `1922`, `1922-03-04` or `1922–1925`
pub fn parse_year(value: &str) -> Option<i32> {
    let digits: String = value.trim().chars().take(4).collect();
    if digits.len() == 4 && digits.chars().all(|c| c.is_ascii_digit()) {
        digits.parse().ok()
    } else {
        None
    }
}

/// Split a comma list, trimming entries and dropping empty ones
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn strip_html(html: &str) -> String {
    static TAG: OnceLock<Regex> = OnceLock::new();
    let tag = TAG.get_or_init(|| Regex::new(r"<[^>]*>?").expect("valid tag regex"));
    tag.replace_all(html, "").trim().to_string()
}

/// `Some(value)` unless it is blank
pub fn present(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_year_variants() {
        assert_eq!(parse_year("1922"), Some(1922));
        assert_eq!(parse_year("1931-02-14"), Some(1931));
        assert_eq!(parse_year("1949–1957"), Some(1949));
        assert_eq!(parse_year("N/A"), None);
        assert_eq!(parse_year(""), None);
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<p>A <b>silent</b> classic.</p>"), "A silent classic.");
        assert_eq!(strip_html("plain"), "plain");
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("Drama, Horror ,, Fantasy"), vec!["Drama", "Horror", "Fantasy"]);
        assert!(split_list("").is_empty());
    }
}
