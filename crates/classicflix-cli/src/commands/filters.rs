use crate::commands::context::AppContext;
use crate::output::{section_header, Output};
use classicflix_models::constants::{COLORS, DECADES, GENRES, LANGUAGES, MOST_WATCHED_MOVIES, RATING_CATEGORIES, THEMES};
use classicflix_models::{AppLanguage, DurationCategory};
use color_eyre::Result;
use serde_json::json;

fn duration_label(category: DurationCategory) -> &'static str {
    match category {
        DurationCategory::VeryShort => "up to 5 min",
        DurationCategory::Short => "6-20 min",
        DurationCategory::Medium => "21-40 min",
        DurationCategory::Long => "41-120 min",
        DurationCategory::Giant => "over 2 h",
    }
}

/// Values accepted by the `browse` filters
pub fn run_filters(lang: Option<AppLanguage>, ctx: &AppContext, output: &Output) -> Result<()> {
    let lang = lang.unwrap_or(ctx.config.catalog.language);
    let rating_label = |label_en: &'static str, label_pt: &'static str| {
        if lang == AppLanguage::Pt {
            label_pt
        } else {
            label_en
        }
    };

    if !output.is_human() {
        let ratings: Vec<_> = RATING_CATEGORIES
            .iter()
            .map(|c| json!({ "id": c.id, "label": rating_label(c.label_en, c.label_pt), "min": c.min, "max": c.max }))
            .collect();
        let durations: Vec<_> = DurationCategory::ALL
            .iter()
            .map(|d| json!({ "id": d.id(), "label": duration_label(*d) }))
            .collect();
        output.data(&json!({
            "genres": GENRES,
            "languages": LANGUAGES,
            "colors": COLORS,
            "decades": DECADES,
            "themes": THEMES,
            "ratings": ratings,
            "durations": durations,
            "top30": MOST_WATCHED_MOVIES,
        }));
        return Ok(());
    }

    section_header("Genres (--genre)", output);
    output.println(format!("  {}", GENRES.join(", ")));
    section_header("Languages (--language)", output);
    output.println(format!("  {}", LANGUAGES.join(", ")));
    section_header("Colors (--color)", output);
    output.println(format!("  {}", COLORS.join(", ")));
    section_header("Decades (--decade)", output);
    output.println(format!(
        "  {}",
        DECADES.iter().map(|d| d.to_string()).collect::<Vec<_>>().join(", ")
    ));
    section_header("Themes (--theme)", output);
    output.println(format!("  {}", THEMES.join(", ")));

    section_header("Ratings (--rating)", output);
    for category in RATING_CATEGORIES {
        output.println(format!("  {:<10} {}", category.id, rating_label(category.label_en, category.label_pt)));
    }
    section_header("Durations (--duration)", output);
    for category in DurationCategory::ALL {
        output.println(format!("  {:<10} {}", category.id(), duration_label(category)));
    }
    section_header("Most watched (--top30)", output);
    for entry in MOST_WATCHED_MOVIES {
        output.println(format!("  {}", entry));
    }
    Ok(())
}
