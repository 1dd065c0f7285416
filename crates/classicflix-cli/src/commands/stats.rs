use crate::commands::context::AppContext;
use crate::output::{section_header, Output};
use classicflix_core::{unique_awards, unique_directors, CatalogStats};
use color_eyre::Result;
use comfy_table::{Cell, CellAlignment, Table};
use serde_json::json;
use std::collections::BTreeMap;

fn count_table(title: &str, counts: &BTreeMap<String, usize>) -> Table {
    let mut rows: Vec<(&String, &usize)> = counts.iter().collect();
    rows.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    let mut table = Table::new();
    table.set_header(vec![title, "Titles"]);
    for (name, count) in rows {
        table.add_row(vec![Cell::new(name), Cell::new(count).set_alignment(CellAlignment::Right)]);
    }
    table
}

pub async fn run_stats(ctx: &AppContext, output: &Output) -> Result<()> {
    let movies = ctx.catalog().load().await;
    let stats = CatalogStats::from_movies(&movies);
    let directors = unique_directors(&movies);
    let awards = unique_awards(&movies);

    if !output.is_human() {
        output.data(&json!({
            "stats": stats,
            "directors": directors,
            "awards": awards,
        }));
        return Ok(());
    }

    section_header(&format!("Catalog: {} titles", stats.total), output);
    output.info(format!("{} directors, {} distinct awards", directors.len(), awards.len()));
    if stats.total == 0 {
        return Ok(());
    }
    output.table(count_table("Language", &stats.languages));
    output.table(count_table("Genre", &stats.genres));
    if !stats.themes.is_empty() {
        output.table(count_table("Theme", &stats.themes));
    }
    Ok(())
}
