use crate::commands::context::AppContext;
use crate::output::Output;
use classicflix_core::catalog::{find_movie, parse_edits};
use classicflix_core::CatalogService;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;
use std::sync::Arc;

/// Parse a `field=value` pair from the command line
pub fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected field=value, got '{}'", raw))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in '{}'", raw));
    }
    Ok((field.to_string(), value.to_string()))
}

pub async fn run_edit(key: String, assignments: Vec<(String, String)>, ctx: &AppContext, output: &Output) -> Result<()> {
    if assignments.is_empty() {
        return Err(eyre!("Nothing to change. Pass one or more --set field=value"));
    }
    let updates = parse_edits(&assignments).map_err(|e| eyre!("{}", e))?;

    let store = ctx.require_supabase()?;
    let service = CatalogService::new(Arc::new(store), ctx.cache.clone());
    let movies = service.load().await;
    let movie = find_movie(&movies, &key).ok_or_else(|| eyre!("No catalog entry matches '{}'", key))?;

    service.update(movie, &updates).await.map_err(|e| eyre!("{}", e))?;

    let fields: Vec<&String> = updates.keys().collect();
    if output.is_human() {
        output.success(format!(
            "Updated {} on '{}'",
            fields.iter().map(|f| f.as_str()).collect::<Vec<_>>().join(", "),
            movie.title
        ));
    } else {
        output.data(&json!({ "id": movie.id, "updated": updates }));
    }
    Ok(())
}
