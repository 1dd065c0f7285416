use crate::commands::browse::movie_row;
use crate::commands::context::AppContext;
use crate::commands::details::target_movie;
use crate::commands::ui::Spinner;
use crate::output::Output;
use classicflix_core::catalog::movie_from_details;
use classicflix_models::{AppLanguage, Movie};
use classicflix_sources::{MovieSearch, ProviderRegistry};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

/// Where a new catalog entry comes from
pub enum AddOrigin {
    Identifier(String),
    Search { source: String, query: String, pick: usize },
}

fn searchers_for(registry: &ProviderRegistry, source: Option<&str>) -> Result<Vec<Arc<dyn MovieSearch>>> {
    match source {
        Some(name) => {
            let name = name.to_lowercase();
            registry.searcher(&name).map(|s| vec![s]).ok_or_else(|| {
                eyre!(
                    "'{}' is not an enabled search source (enabled: {})",
                    name,
                    registry.registered_sources().join(", ")
                )
            })
        }
        None => Ok(registry.searchers()),
    }
}

async fn search_all(searchers: &[Arc<dyn MovieSearch>], query: &str) -> Vec<(String, Movie)> {
    let mut results = Vec::new();
    for searcher in searchers {
        match searcher.search(query).await {
            Ok(movies) => {
                tracing::debug!(source = searcher.source_name(), results = movies.len(), "Search finished");
                results.extend(movies.into_iter().map(|m| (searcher.source_name().to_string(), m)));
            }
            Err(e) => tracing::warn!(source = searcher.source_name(), error = %e, "Search failed"),
        }
    }
    results
}

pub async fn run_lookup(source: Option<String>, query: String, ctx: &AppContext, output: &Output) -> Result<()> {
    let registry = ctx.registry();
    let searchers = searchers_for(&registry, source.as_deref())?;
    if searchers.is_empty() {
        output.warn("No search sources are enabled. Enable one with: classicflix config set sources.omdb.enabled true");
        return Ok(());
    }

    let spinner = Spinner::start(format!("Searching for '{}'...", query), output.is_human() && !output.is_quiet());
    let results = search_all(&searchers, &query).await;
    spinner.finish();

    if !output.is_human() {
        let entries: Vec<_> = results
            .iter()
            .map(|(source, movie)| json!({ "source": source, "movie": movie }))
            .collect();
        output.data(&json!({ "query": query, "results": entries }));
        return Ok(());
    }

    if results.is_empty() {
        output.info(format!("No results for '{}'", query));
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["#", "Source", "Title", "Year", "Director", "Language", "Genres", "Rating", "Id"]);
    let mut per_source: HashMap<&str, usize> = HashMap::new();
    for (source, movie) in &results {
        let index = per_source.entry(source.as_str()).or_default();
        *index += 1;
        let mut row = vec![Cell::new(*index), Cell::new(source)];
        row.extend(movie_row(movie, AppLanguage::En));
        table.add_row(row);
    }
    output.table(table);
    output.info(format!("{} result(s). Add one with: classicflix add --from <source> --query \"{}\" --pick <n>", results.len(), query));
    Ok(())
}

fn source_label_for(origin: &AddOrigin) -> String {
    match origin {
        AddOrigin::Identifier(_) => "Wikidata".to_string(),
        AddOrigin::Search { source, .. } => match source.to_lowercase().as_str() {
            "omdb" => "OMDb".to_string(),
            "tmdb" => "TMDb".to_string(),
            "tvmaze" => "TVMaze".to_string(),
            "ofdb" => "OFDb".to_string(),
            other => other.to_string(),
        },
    }
}

/// Look an entry up, merge every provider's details and insert it into the catalog
pub async fn run_add(origin: AddOrigin, video_url: Option<String>, dry_run: bool, ctx: &AppContext, output: &Output) -> Result<()> {
    let spinner = Spinner::start("Looking up title...", output.is_human() && !output.is_quiet());
    let seed = match &origin {
        AddOrigin::Identifier(id) => target_movie(&[], id),
        AddOrigin::Search { source, query, pick } => {
            let registry = ctx.registry();
            let searchers = searchers_for(&registry, Some(source))?;
            let mut results = search_all(&searchers, query).await;
            if *pick == 0 || *pick > results.len() {
                spinner.finish();
                return Err(eyre!("--pick must be between 1 and {} for '{}'", results.len(), query));
            }
            Some(results.swap_remove(*pick - 1).1)
        }
    };
    let Some(seed) = seed else {
        spinner.finish();
        return Err(eyre!("Expected a Wikidata QID or an IMDb id"));
    };

    spinner.set_message(format!("Collecting details for {}...", seed.external_ref().query()));
    let details = ctx.aggregator().aggregate(&seed).await;
    spinner.finish();

    let mut movie = movie_from_details(&details, &source_label_for(&origin));
    if movie.title.is_empty() {
        movie.title = seed.title.clone();
    }
    if let Some(url) = video_url.filter(|u| !u.trim().is_empty()) {
        movie.video_url = Some(url.trim().to_string());
    }
    if movie.title.trim().is_empty() {
        return Err(eyre!("No provider returned a title; nothing to add"));
    }

    if dry_run {
        if output.is_human() {
            output.info(format!("Dry run: would add '{}' ({})", movie.title, movie.year));
        }
        output.data(&json!({ "dryRun": true, "movie": movie }));
        return Ok(());
    }

    let store = ctx.require_supabase()?;
    let service = classicflix_core::CatalogService::new(Arc::new(store), ctx.cache.clone());
    let added = service.add(&movie).await.map_err(|e| eyre!("{}", e))?;

    if output.is_human() {
        output.success(format!("Added '{}' (id {})", added.title, added.id));
    } else {
        output.data(&json!({ "movie": added }));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_label_for_origin() {
        assert_eq!(source_label_for(&AddOrigin::Identifier("Q1".to_string())), "Wikidata");
        let origin = AddOrigin::Search {
            source: "TMDB".to_string(),
            query: "Nosferatu".to_string(),
            pick: 1,
        };
        assert_eq!(source_label_for(&origin), "TMDb");
    }

    #[test]
    fn test_searchers_for_unknown_source() {
        let registry = ProviderRegistry::empty();
        assert!(searchers_for(&registry, Some("letterboxd")).is_err());
        assert!(searchers_for(&registry, None).unwrap().is_empty());
    }
}
