//! SPARQL query text and result-binding parsers for the Wikidata endpoint.

use classicflix_models::movie::{is_imdb_id, is_qid};
use classicflix_models::MovieDetails;
use serde_json::Value;

use crate::text::parse_year;
use crate::wikimedia::wikimedia_thumbnail;

const POSTER_WIDTH: u32 = 600;
const GALLERY_WIDTH: u32 = 800;

/// Graph pattern binding `?movie` to the entity a query string names
///
/// QIDs bind directly, IMDb ids go through P345, anything else is an exact
/// (case-insensitive) English label match on films.
pub fn movie_selector(query: &str) -> String {
    if is_qid(query) {
        format!("VALUES ?movie {{ wd:{} }}", query)
    } else if is_imdb_id(query) {
        format!("?movie wdt:P345 \"{}\".", query)
    } else {
        let safe = query.replace('\\', "\\\\").replace('"', "\\\"");
        format!(
            "?movie wdt:P31/wdt:P279* wd:Q11424.\n            ?movie rdfs:label ?label.\n            FILTER(LCASE(STR(?label)) = LCASE(\"{}\"))",
            safe
        )
    }
}

pub fn movie_by_qid_query(qid: &str) -> String {
    format!(
        r#"
      SELECT ?itemLabel ?description ?image ?director ?directorLabel ?pubDate ?duration ?iaId
        (GROUP_CONCAT(DISTINCT ?castLabel; SEPARATOR="|") AS ?castList)
        (GROUP_CONCAT(DISTINCT ?composerLabel; SEPARATOR="|") AS ?composerList)
        (GROUP_CONCAT(DISTINCT ?dopLabel; SEPARATOR="|") AS ?dopList)
        (GROUP_CONCAT(DISTINCT ?subjectLabel; SEPARATOR="|") AS ?themeList)
        (GROUP_CONCAT(DISTINCT ?genreLabel; SEPARATOR="|") AS ?genreList)
      WHERE {{
        BIND(wd:{qid} AS ?item)
        OPTIONAL {{ ?item rdfs:label ?itemLabel. FILTER(LANG(?itemLabel) = "en") }}
        OPTIONAL {{ ?item schema:description ?description. FILTER(LANG(?description) = "en") }}
        OPTIONAL {{ ?item wdt:P18 ?image. }}
        OPTIONAL {{ ?item wdt:P57 ?director. ?director rdfs:label ?directorLabel. FILTER(LANG(?directorLabel) = "en") }}
        OPTIONAL {{ ?item wdt:P577 ?pubDate. }}
        OPTIONAL {{ ?item wdt:P2047 ?duration. }}
        OPTIONAL {{ ?item wdt:P724 ?iaId. }}
        OPTIONAL {{ ?item wdt:P161 ?castItem. ?castItem rdfs:label ?castLabel. FILTER(LANG(?castLabel) = "en") }}
        OPTIONAL {{ ?item wdt:P86 ?compItem. ?compItem rdfs:label ?composerLabel. FILTER(LANG(?composerLabel) = "en") }}
        OPTIONAL {{ ?item wdt:P344 ?dopItem. ?dopItem rdfs:label ?dopLabel. FILTER(LANG(?dopLabel) = "en") }}
        OPTIONAL {{ ?item wdt:P921 ?subItem. ?subItem rdfs:label ?subjectLabel. FILTER(LANG(?subjectLabel) = "en") }}
        OPTIONAL {{ ?item wdt:P136 ?genreItem. ?genreItem rdfs:label ?genreLabel. FILTER(LANG(?genreLabel) = "en") }}
      }} GROUP BY ?itemLabel ?description ?image ?director ?directorLabel ?pubDate ?duration ?iaId
    "#
    )
}

fn labelled_subquery(var: &str, property_path: &str, limit: usize) -> String {
    format!(
        "{{ SELECT ?movie ?{var}Label WHERE {{ {property_path} SERVICE wikibase:label {{ bd:serviceParam wikibase:language \"en,pt\". ?{var} rdfs:label ?{var}Label }} }} LIMIT {limit} }}"
    )
}

pub fn extended_details_query(query: &str) -> String {
    let unions = [
        labelled_subquery("cast", "?movie wdt:P161 ?cast.", 15),
        labelled_subquery("composer", "?movie wdt:P86 ?composer.", 3),
        labelled_subquery("dop", "?movie wdt:P344 ?dop.", 3),
        labelled_subquery("subject", "?movie wdt:P921 ?subject.", 5),
        labelled_subquery("producer", "?movie wdt:P162 ?producer.", 5),
        labelled_subquery("country", "?movie wdt:P495 ?country.", 3),
        labelled_subquery("artDir", "?movie wdt:P3174 ?artDir.", 3),
        labelled_subquery("distrib", "?movie wdt:P750 ?distrib.", 3),
        labelled_subquery("basedOn", "{ ?movie wdt:P144 ?basedOn. } UNION { ?movie wdt:P1877 ?basedOn. }", 2),
    ]
    .join("\n        UNION\n        ");

    format!(
        r#"
      SELECT ?originalTitle ?colorLabel
        (GROUP_CONCAT(DISTINCT ?castLabel; SEPARATOR="|") AS ?castList)
        (GROUP_CONCAT(DISTINCT ?composerLabel; SEPARATOR="|") AS ?composerList)
        (GROUP_CONCAT(DISTINCT ?dopLabel; SEPARATOR="|") AS ?dopList)
        (GROUP_CONCAT(DISTINCT ?subjectLabel; SEPARATOR="|") AS ?themeList)
        (GROUP_CONCAT(DISTINCT ?producerLabel; SEPARATOR="|") AS ?producerList)
        (GROUP_CONCAT(DISTINCT ?countryLabel; SEPARATOR="|") AS ?countryList)
        (GROUP_CONCAT(DISTINCT ?artDirLabel; SEPARATOR="|") AS ?artDirList)
        (GROUP_CONCAT(DISTINCT ?distribLabel; SEPARATOR="|") AS ?distribList)
        (GROUP_CONCAT(DISTINCT ?basedOnLabel; SEPARATOR="|") AS ?basedOnList)
      WHERE {{
        {{ SELECT ?movie WHERE {{ {selector} }} LIMIT 1 }}
        OPTIONAL {{ ?movie wdt:P1476 ?originalTitle. }}
        OPTIONAL {{ ?movie wdt:P462 ?color. ?color rdfs:label ?colorLabel. FILTER(LANG(?colorLabel) = "en") }}
        {unions}
      }} GROUP BY ?originalTitle ?colorLabel
    "#,
        selector = movie_selector(query),
        unions = unions,
    )
}

pub fn images_query(query: &str) -> String {
    format!(
        r#"
        SELECT ?image WHERE {{
            {{ SELECT ?movie WHERE {{ {} }} LIMIT 1 }}
            ?movie wdt:P18 ?image.
        }} LIMIT 10
    "#,
        movie_selector(query)
    )
}

fn bindings(body: &Value) -> &[Value] {
    body.get("results")
        .and_then(|r| r.get("bindings"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn value<'a>(binding: &'a Value, name: &str) -> Option<&'a str> {
    binding
        .get(name)
        .and_then(|v| v.get("value"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Split a `GROUP_CONCAT(...; SEPARATOR="|")` value
fn split_group(binding: &Value, name: &str, limit: usize) -> Vec<String> {
    value(binding, name)
        .map(|v| {
            v.split('|')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .take(limit)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Last path segment of an entity URI, e.g. `http://www.wikidata.org/entity/Q123` -> `Q123`
fn entity_id(uri: &str) -> Option<String> {
    uri.rsplit('/').next().filter(|s| !s.is_empty()).map(str::to_string)
}

pub fn parse_movie_by_qid(qid: &str, body: &Value) -> Option<MovieDetails> {
    let b = bindings(body).first()?;

    Some(MovieDetails {
        wikidata_id: Some(qid.to_string()),
        title: value(b, "itemLabel").map(str::to_string),
        description: value(b, "description").map(str::to_string),
        poster_url: value(b, "image").map(|url| wikimedia_thumbnail(url, POSTER_WIDTH)),
        director: value(b, "directorLabel").map(str::to_string),
        director_id: value(b, "director").and_then(entity_id),
        year: value(b, "pubDate").and_then(parse_year),
        duration: value(b, "duration")
            .and_then(|d| d.parse::<f64>().ok())
            .map(|minutes| format!("{}m", minutes.floor() as i64)),
        video_url: value(b, "iaId").map(|ia| format!("https://archive.org/download/{ia}/{ia}.mp4")),
        cast: split_group(b, "castList", 8),
        genres: split_group(b, "genreList", 3),
        themes: split_group(b, "themeList", 5),
        cinematographers: split_group(b, "dopList", 2),
        composers: split_group(b, "composerList", 2),
        ..MovieDetails::default()
    })
}

pub fn parse_extended_details(body: &Value) -> Option<MovieDetails> {
    let b = bindings(body).first()?;

    Some(MovieDetails {
        original_title: value(b, "originalTitle").map(str::to_string),
        color: value(b, "colorLabel").map(str::to_string),
        cast: split_group(b, "castList", usize::MAX),
        composers: split_group(b, "composerList", usize::MAX),
        cinematographers: split_group(b, "dopList", usize::MAX),
        themes: split_group(b, "themeList", usize::MAX),
        producers: split_group(b, "producerList", usize::MAX),
        countries: split_group(b, "countryList", usize::MAX),
        art_directors: split_group(b, "artDirList", usize::MAX),
        distributors: split_group(b, "distribList", usize::MAX),
        based_on: split_group(b, "basedOnList", usize::MAX),
        ..MovieDetails::default()
    })
}

pub fn parse_images(body: &Value) -> Vec<String> {
    bindings(body)
        .iter()
        .filter_map(|b| value(b, "image"))
        .map(|url| wikimedia_thumbnail(url, GALLERY_WIDTH))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn literal(v: &str) -> Value {
        json!({"type": "literal", "value": v})
    }

    #[test]
    fn test_movie_selector_forms() {
        assert_eq!(movie_selector("Q151904"), "VALUES ?movie { wd:Q151904 }");
        assert_eq!(movie_selector("tt0013442"), "?movie wdt:P345 \"tt0013442\".");
        let by_title = movie_selector("Say \"Hi\"");
        assert!(by_title.contains(r#"LCASE("Say \"Hi\"")"#));
        assert!(by_title.contains("wd:Q11424"));
    }

    #[test]
    fn test_extended_query_embeds_selector() {
        let query = extended_details_query("tt0013442");
        assert!(query.contains("wdt:P345 \"tt0013442\""));
        assert!(query.contains("?basedOnLabel"));
        assert!(query.contains("GROUP BY ?originalTitle ?colorLabel"));
    }

    #[test]
    fn test_parse_movie_by_qid() {
        let body = json!({"results": {"bindings": [{
            "itemLabel": literal("Nosferatu"),
            "description": literal("1922 film by F. W. Murnau"),
            "image": {"type": "uri", "value": "http://commons.wikimedia.org/wiki/Special:FilePath/Nosferatu.jpg"},
            "director": {"type": "uri", "value": "http://www.wikidata.org/entity/Q55411"},
            "directorLabel": literal("F. W. Murnau"),
            "pubDate": literal("1922-03-04T00:00:00Z"),
            "duration": literal("94.5"),
            "iaId": literal("nosferatu_1922"),
            "castList": literal("Max Schreck|Gustav von Wangenheim|Greta Schröder"),
            "genreList": literal("horror film|silent film|drama film|fantasy film"),
            "themeList": literal(""),
            "dopList": literal("Fritz Arno Wagner"),
            "composerList": literal("Hans Erdmann")
        }]}});

        let details = parse_movie_by_qid("Q151904", &body).unwrap();
        assert_eq!(details.wikidata_id.as_deref(), Some("Q151904"));
        assert_eq!(details.title.as_deref(), Some("Nosferatu"));
        assert_eq!(details.director.as_deref(), Some("F. W. Murnau"));
        assert_eq!(details.director_id.as_deref(), Some("Q55411"));
        assert_eq!(details.year, Some(1922));
        assert_eq!(details.duration.as_deref(), Some("94m"));
        assert_eq!(
            details.video_url.as_deref(),
            Some("https://archive.org/download/nosferatu_1922/nosferatu_1922.mp4")
        );
        assert_eq!(details.cast.len(), 3);
        assert_eq!(details.genres.len(), 3);
        assert!(details.themes.is_empty());
        // Not an upload.wikimedia.org URL, left as is
        assert_eq!(
            details.poster_url.as_deref(),
            Some("http://commons.wikimedia.org/wiki/Special:FilePath/Nosferatu.jpg")
        );
    }

    #[test]
    fn test_parse_movie_by_qid_without_bindings() {
        assert!(parse_movie_by_qid("Q1", &json!({"results": {"bindings": []}})).is_none());
        assert!(parse_movie_by_qid("Q1", &json!({})).is_none());
    }

    #[test]
    fn test_parse_extended_details_splits_lists() {
        let body = json!({"results": {"bindings": [{
            "originalTitle": literal("Nosferatu, eine Symphonie des Grauens"),
            "colorLabel": literal("black-and-white"),
            "producerList": literal("Albin Grau|Enrico Dieckmann"),
            "countryList": literal("Germany"),
            "basedOnList": literal("Dracula")
        }]}});

        let details = parse_extended_details(&body).unwrap();
        assert_eq!(details.original_title.as_deref(), Some("Nosferatu, eine Symphonie des Grauens"));
        assert_eq!(details.color.as_deref(), Some("black-and-white"));
        assert_eq!(details.producers, vec!["Albin Grau", "Enrico Dieckmann"]);
        assert_eq!(details.countries, vec!["Germany"]);
        assert_eq!(details.based_on, vec!["Dracula"]);
        assert!(details.cast.is_empty());
    }

    #[test]
    fn test_parse_images_uses_thumbnails() {
        let body = json!({"results": {"bindings": [
            {"image": {"type": "uri", "value": "https://upload.wikimedia.org/wikipedia/commons/a/a1/Still.jpg"}}
        ]}});
        assert_eq!(
            parse_images(&body),
            vec!["https://upload.wikimedia.org/wikipedia/commons/a/a1/Still.jpg?width=800"]
        );
    }
}
