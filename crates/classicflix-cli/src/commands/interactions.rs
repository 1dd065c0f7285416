use crate::commands::browse::movie_table;
use crate::commands::context::AppContext;
use crate::output::{section_header, Output};
use clap::ValueEnum;
use classicflix_core::catalog::find_movie;
use classicflix_core::{CatalogService, InteractionService};
use classicflix_models::{AppLanguage, InteractionField, Movie, UserMovieInteraction};
use classicflix_sources::{SourceError, SupabaseClient};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListKind {
    Favorite,
    Watched,
    WatchLater,
}

impl From<ListKind> for InteractionField {
    fn from(kind: ListKind) -> Self {
        match kind {
            ListKind::Favorite => InteractionField::Favorite,
            ListKind::Watched => InteractionField::Watched,
            ListKind::WatchLater => InteractionField::WatchLater,
        }
    }
}

fn list_label(field: InteractionField) -> &'static str {
    match field {
        InteractionField::Favorite => "Favorites",
        InteractionField::Watched => "Watched",
        InteractionField::WatchLater => "Watch later",
    }
}

fn signed_in_store(ctx: &AppContext) -> Result<SupabaseClient> {
    let store = ctx.require_supabase()?;
    if store.session().is_none() {
        return Err(eyre!("{}. Sign in with: classicflix auth login <email>", SourceError::NotAuthenticated));
    }
    Ok(store)
}

async fn load_movie(store: &SupabaseClient, ctx: &AppContext, key: &str) -> Result<Movie> {
    let catalog = CatalogService::new(Arc::new(store.clone()), ctx.cache.clone());
    let movies = catalog.load().await;
    find_movie(&movies, key)
        .cloned()
        .ok_or_else(|| eyre!("No catalog entry matches '{}'", key))
}

async fn service_for(store: &SupabaseClient, ctx: &AppContext) -> InteractionService {
    let mut service = ctx.interactions_with(Arc::new(store.clone()));
    if let Err(e) = service.refresh().await {
        tracing::warn!(error = %e, "Using cached interactions");
    }
    service
}

fn describe(interaction: &UserMovieInteraction) -> serde_json::Value {
    json!({
        "movieId": interaction.movie_id,
        "favorite": interaction.is_favorite,
        "watched": interaction.is_watched,
        "watchLater": interaction.watch_later,
        "progressSeconds": interaction.progress_seconds,
        "lastUpdatedAt": interaction.last_updated_at,
    })
}

/// Toggle a movie in or out of one of the user's lists
pub async fn run_mark(key: String, list: ListKind, ctx: &AppContext, output: &Output) -> Result<()> {
    let store = signed_in_store(ctx)?;
    let movie = load_movie(&store, ctx, &key).await?;
    let mut service = service_for(&store, ctx).await;

    let field = InteractionField::from(list);
    let updated = service.toggle(&movie.id, field).await?;

    if output.is_human() {
        let verb = if updated.get(field) { "Added to" } else { "Removed from" };
        output.success(format!("{} {}: {}", verb, list_label(field), movie.title));
    } else {
        output.data(&describe(&updated));
    }
    Ok(())
}

pub async fn run_progress(key: String, seconds: f64, ctx: &AppContext, output: &Output) -> Result<()> {
    let store = signed_in_store(ctx)?;
    let movie = load_movie(&store, ctx, &key).await?;
    let mut service = service_for(&store, ctx).await;

    let updated = service.save_progress(&movie.id, seconds).await?;

    if output.is_human() {
        let secs = updated.progress_seconds;
        output.success(format!(
            "Saved position {}:{:02}:{:02} for {}",
            secs / 3600,
            (secs % 3600) / 60,
            secs % 60,
            movie.title
        ));
    } else {
        output.data(&describe(&updated));
    }
    Ok(())
}

/// Show the user's favorites, watched and watch-later lists
pub async fn run_lists(only: Option<ListKind>, lang: Option<AppLanguage>, ctx: &AppContext, output: &Output) -> Result<()> {
    let store = signed_in_store(ctx)?;
    let catalog = CatalogService::new(Arc::new(store.clone()), ctx.cache.clone());
    let movies = catalog.load().await;
    let service = service_for(&store, ctx).await;
    let lang = lang.unwrap_or(ctx.config.catalog.language);

    let fields: Vec<InteractionField> = match only {
        Some(kind) => vec![kind.into()],
        None => vec![InteractionField::Favorite, InteractionField::Watched, InteractionField::WatchLater],
    };

    let members = |field: InteractionField| -> Vec<&Movie> {
        movies
            .iter()
            .filter(|m| service.state_for(&m.id).get(field))
            .collect()
    };

    if !output.is_human() {
        let mut lists = serde_json::Map::new();
        for field in &fields {
            let ids: Vec<&str> = members(*field).iter().map(|m| m.id.as_str()).collect();
            lists.insert(field.column().to_string(), json!(ids));
        }
        let progress: Vec<_> = service
            .interactions()
            .iter()
            .filter(|i| i.progress_seconds > 0)
            .map(describe)
            .collect();
        output.data(&json!({ "lists": lists, "inProgress": progress }));
        return Ok(());
    }

    for field in fields {
        let list = members(field);
        section_header(&format!("{} ({})", list_label(field), list.len()), output);
        if list.is_empty() {
            output.println("  (empty)");
        } else {
            output.table(movie_table(&list, lang));
        }
    }
    Ok(())
}
