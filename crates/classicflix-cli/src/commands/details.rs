use crate::commands::context::AppContext;
use crate::commands::ui::Spinner;
use crate::output::{section_header, Output};
use classicflix_core::catalog::find_movie;
use classicflix_core::trailer_embed_url;
use classicflix_models::movie::{is_imdb_id, is_qid};
use classicflix_models::{AppLanguage, Movie, MovieDetails};
use classicflix_sources::WikidataClient;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use owo_colors::OwoColorize;
use serde_json::json;

/// A catalog entry by id, wikidata id or title. A bare QID or IMDb id that is
/// not in the catalog becomes a transient entry so it can still be looked up.
pub fn target_movie(movies: &[Movie], key: &str) -> Option<Movie> {
    if let Some(movie) = find_movie(movies, key) {
        return Some(movie.clone());
    }
    let key = key.trim();
    let id = if is_qid(&key.to_uppercase()) { key.to_uppercase() } else { key.to_string() };
    if is_qid(&id) || is_imdb_id(&id) {
        return Some(Movie {
            id: id.clone(),
            wikidata_id: Some(id),
            ..Movie::default()
        });
    }
    None
}

fn field_line(output: &Output, label: &str, value: &str) {
    if !value.trim().is_empty() {
        output.println(format!("  {:<18} {}", format!("{}:", label).bright_black(), value));
    }
}

fn list_line(output: &Output, label: &str, values: &[String]) {
    field_line(output, label, &values.join(", "));
}

fn print_details(movie: &Movie, details: &MovieDetails, lang: AppLanguage, output: &Output) {
    let title = details.title.as_deref().unwrap_or(movie.localized_title(lang));
    let heading = match details.year {
        Some(year) => format!("{} ({})", title, year),
        None => title.to_string(),
    };
    section_header(&heading, output);

    let description = match movie.localized_description(lang) {
        "" => details.description.as_deref().unwrap_or_default(),
        localized => localized,
    };
    if !description.is_empty() {
        output.println(format!("  {}", description));
        output.println("");
    }

    field_line(output, "Original title", details.original_title.as_deref().unwrap_or_default());
    field_line(output, "Director", details.director.as_deref().unwrap_or_default());
    field_line(output, "Duration", details.duration.as_deref().unwrap_or_default());
    field_line(output, "Rating", details.rating.as_deref().unwrap_or_default());
    field_line(output, "Language", details.language.as_deref().unwrap_or_default());
    field_line(output, "Color", details.color.as_deref().unwrap_or_default());
    list_line(output, "Genres", &details.genres);
    list_line(output, "Themes", &details.themes);
    list_line(output, "Cast", &details.cast);
    list_line(output, "Writers", &details.writers);
    list_line(output, "Cinematography", &details.cinematographers);
    list_line(output, "Music", &details.composers);
    list_line(output, "Producers", &details.producers);
    list_line(output, "Art direction", &details.art_directors);
    list_line(output, "Countries", &details.countries);
    list_line(output, "Companies", &details.production_companies);
    list_line(output, "Distributors", &details.distributors);
    list_line(output, "Based on", &details.based_on);
    list_line(output, "Awards", &details.awards);
    field_line(output, "Wikidata", details.wikidata_id.as_deref().unwrap_or_default());
    field_line(output, "Video", details.video_url.as_deref().unwrap_or_default());
    if let Some(trailer) = movie.trailer_url.as_deref().filter(|t| !t.is_empty()) {
        field_line(output, "Trailer", &trailer_embed_url(trailer));
    }
    field_line(output, "Poster", details.poster_url.as_deref().unwrap_or_default());
}

pub async fn run_details(key: String, refresh: bool, lang: Option<AppLanguage>, ctx: &AppContext, output: &Output) -> Result<()> {
    let movies = ctx.catalog().load().await;
    let movie = target_movie(&movies, &key).ok_or_else(|| eyre!("No catalog entry matches '{}'", key))?;
    let lang = lang.unwrap_or(ctx.config.catalog.language);

    let cached = match (&ctx.cache, refresh) {
        (Some(cache), false) => cache.load_details(&movie.id).unwrap_or_else(|e| {
            tracing::warn!("Failed to read cached details: {}", e);
            None
        }),
        _ => None,
    };

    let details = match cached {
        Some(details) => details,
        None => {
            let aggregator = ctx.aggregator();
            let spinner = Spinner::start(
                format!("Fetching details from {}...", aggregator.provider_names().join(", ")),
                output.is_human() && !output.is_quiet(),
            );
            let details = aggregator.aggregate(&movie).await;
            spinner.finish();
            if let Some(cache) = &ctx.cache {
                if let Err(e) = cache.save_details(&movie.id, &details) {
                    tracing::warn!("Failed to cache details: {}", e);
                }
            }
            details
        }
    };

    if output.is_human() {
        print_details(&movie, &details, lang, output);
    } else {
        output.data(&json!({ "movie": movie, "details": details }));
    }
    Ok(())
}

pub async fn run_gallery(key: String, ctx: &AppContext, output: &Output) -> Result<()> {
    let endpoint = ctx
        .config
        .sources
        .wikidata
        .as_ref()
        .filter(|w| w.enabled)
        .map(|w| w.endpoint.clone())
        .ok_or_else(|| eyre!("Wikidata is disabled. Enable it with: classicflix config set sources.wikidata.enabled true"))?;

    let movies = ctx.catalog().load().await;
    let query = match target_movie(&movies, &key) {
        Some(movie) => movie.external_ref().query().to_string(),
        None => key.clone(),
    };

    let spinner = Spinner::start(format!("Searching images for {}...", query), output.is_human() && !output.is_quiet());
    let images = WikidataClient::new(endpoint).images(&query).await;
    spinner.finish();

    let images = images.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Image lookup failed");
        Vec::new()
    });

    if !output.is_human() {
        output.data(&json!({ "query": query, "images": images }));
    } else if images.is_empty() {
        output.info(format!("No images found for {}", query));
    } else {
        for image in &images {
            output.println(image);
        }
    }
    Ok(())
}
