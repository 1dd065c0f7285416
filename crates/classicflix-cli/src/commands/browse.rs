use crate::commands::context::AppContext;
use crate::output::Output;
use clap::Args;
use classicflix_core::{filter_movies, paginate};
use classicflix_models::{AppLanguage, DurationCategory, FilterState, Movie, RatingCategory};
use color_eyre::Result;
use comfy_table::{Cell, Color, Table};
use serde_json::json;

#[derive(Args, Debug, Default)]
pub struct BrowseArgs {
    /// Free-text search over title, Portuguese title, description and director
    #[arg(short, long)]
    pub search: Option<String>,

    #[arg(long)]
    pub genre: Option<String>,

    /// Canonical language name (English, Portuguese, Silent, ...)
    #[arg(long)]
    pub language: Option<String>,

    #[arg(long)]
    pub year: Option<i32>,

    /// First year of a decade, e.g. 1920
    #[arg(long)]
    pub decade: Option<i32>,

    /// Rating band: pessimo, ruim, moderado, bom, excelente
    #[arg(long, value_parser = parse_rating_category)]
    pub rating: Option<String>,

    /// Color, Black & White or Mixed
    #[arg(long)]
    pub color: Option<String>,

    #[arg(long)]
    pub theme: Option<String>,

    /// Source label (case-insensitive)
    #[arg(long)]
    pub source: Option<String>,

    /// Runtime band: very_short, short, medium, long, giant
    #[arg(long, value_parser = parse_duration_category)]
    pub duration: Option<DurationCategory>,

    #[arg(long)]
    pub subtitles: Option<bool>,

    #[arg(long)]
    pub director: Option<String>,

    #[arg(long)]
    pub award: Option<String>,

    /// Only entries with a real poster
    #[arg(long)]
    pub poster_only: bool,

    /// Entry of the most-watched list, e.g. "3. Nosferatu"
    #[arg(long)]
    pub top30: Option<String>,

    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Entries per page (defaults to catalog.page_size)
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Display language for titles (en, pt, it, hi, ru)
    #[arg(long, value_parser = parse_app_language)]
    pub lang: Option<AppLanguage>,
}

fn parse_rating_category(value: &str) -> Result<String, String> {
    RatingCategory::by_id(value)
        .map(|c| c.id.to_string())
        .ok_or_else(|| format!("Unknown rating band '{}'", value))
}

fn parse_duration_category(value: &str) -> Result<DurationCategory, String> {
    DurationCategory::from_id(value).ok_or_else(|| format!("Unknown duration band '{}'", value))
}

pub fn parse_app_language(value: &str) -> Result<AppLanguage, String> {
    AppLanguage::from_code(value).ok_or_else(|| format!("Unsupported language '{}'", value))
}

impl BrowseArgs {
    pub fn filter_state(&self) -> FilterState {
        FilterState {
            search_query: self.search.clone().unwrap_or_default(),
            selected_genre: self.genre.clone(),
            selected_language: self.language.clone(),
            selected_year: self.year,
            selected_decade: self.decade,
            selected_rating: self.rating.clone(),
            selected_color: self.color.clone(),
            selected_theme: self.theme.clone(),
            selected_source: self.source.clone(),
            selected_duration: self.duration,
            has_subtitles: self.subtitles,
            selected_director: self.director.clone(),
            selected_award: self.award.clone(),
            has_poster_only: self.poster_only,
            selected_top30: self.top30.clone(),
        }
    }
}

pub fn movie_row(movie: &Movie, lang: AppLanguage) -> Vec<Cell> {
    let year = if movie.year > 0 { movie.year.to_string() } else { "-".to_string() };
    vec![
        Cell::new(movie.localized_title(lang)).fg(Color::White),
        Cell::new(year),
        Cell::new(&movie.director),
        Cell::new(classicflix_core::canonical_language(&movie.language)),
        Cell::new(movie.genres.join(", ")),
        Cell::new(if movie.rating.is_empty() { "-" } else { movie.rating.as_str() }),
        Cell::new(movie.id.as_str()).fg(Color::DarkGrey),
    ]
}

pub fn movie_table(movies: &[&Movie], lang: AppLanguage) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Title", "Year", "Director", "Language", "Genres", "Rating", "Id"]);
    for movie in movies {
        table.add_row(movie_row(movie, lang));
    }
    table
}

pub async fn run_browse(args: BrowseArgs, ctx: &AppContext, output: &Output) -> Result<()> {
    let movies = ctx.catalog().load().await;
    let filters = args.filter_state();
    let matched = filter_movies(&movies, &filters);

    let page_size = args.page_size.unwrap_or(ctx.config.catalog.page_size).max(1);
    let page = paginate(&matched, args.page, page_size);
    let pages = matched.len().div_ceil(page_size).max(1);
    let lang = args.lang.unwrap_or(ctx.config.catalog.language);

    tracing::debug!(total = movies.len(), matched = matched.len(), page = args.page, "Browse");

    if !output.is_human() {
        output.data(&json!({
            "total": movies.len(),
            "matched": matched.len(),
            "page": args.page.max(1),
            "pages": pages,
            "pageSize": page_size,
            "movies": page,
        }));
        return Ok(());
    }

    if movies.is_empty() {
        output.warn("The catalog is empty. Check the Supabase settings with 'classicflix config show'.");
        return Ok(());
    }
    if matched.is_empty() {
        output.info("No titles found.");
        if filters.is_active() {
            output.info("Try fewer filters, or list accepted values with 'classicflix filters'.");
        }
        return Ok(());
    }

    output.table(movie_table(page, lang));
    output.info(format!(
        "Page {} of {} ({} of {} titles)",
        args.page.max(1),
        pages,
        matched.len(),
        movies.len()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_state_from_args() {
        let args = BrowseArgs {
            search: Some("keaton".to_string()),
            decade: Some(1920),
            duration: Some(DurationCategory::Long),
            poster_only: true,
            ..BrowseArgs::default()
        };
        let filters = args.filter_state();
        assert_eq!(filters.search_query, "keaton");
        assert_eq!(filters.selected_decade, Some(1920));
        assert_eq!(filters.selected_duration, Some(DurationCategory::Long));
        assert!(filters.has_poster_only);
        assert!(filters.selected_genre.is_none());
    }

    #[test]
    fn test_value_parsers() {
        assert_eq!(parse_rating_category("bom").unwrap(), "bom");
        assert!(parse_rating_category("great").is_err());
        assert_eq!(parse_duration_category("very-short").unwrap(), DurationCategory::VeryShort);
        assert_eq!(parse_app_language("pt-BR").unwrap(), AppLanguage::Pt);
    }
}
