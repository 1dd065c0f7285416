use super::prompts;
use crate::commands::context::AppContext;
use crate::commands::ui::is_interactive;
use crate::output::{mask_string, Output};
use classicflix_config::Config;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use serde_json::json;

/// Credential names accepted by `config credential`
pub const CREDENTIAL_NAMES: &[&str] = &["supabase_anon_key", "omdb_api_key", "tmdb_api_key"];

fn enabled_cell(enabled: bool) -> Cell {
    Cell::new(if enabled { "✓".green().to_string() } else { "✗".red().to_string() })
}

fn section_table(title: &str) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new(title).fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    table
}

fn credential_value(ctx: &AppContext, name: &str) -> Option<String> {
    match name {
        "supabase_anon_key" => ctx.credentials.get_supabase_anon_key(),
        "omdb_api_key" => ctx.credentials.get_omdb_api_key(),
        "tmdb_api_key" => ctx.credentials.get_tmdb_api_key(),
        other => ctx.credentials.get(other).cloned(),
    }
}

pub fn run_show(full: bool, ctx: &AppContext, output: &Output) -> Result<()> {
    let config = &ctx.config;
    let config_file = ctx.paths.config_file();
    let credentials: Vec<(&str, String)> = CREDENTIAL_NAMES
        .iter()
        .map(|name| {
            let value = credential_value(ctx, name).unwrap_or_default();
            (*name, if full { value } else { mask_string(&value) })
        })
        .collect();

    if !output.is_human() {
        let mut creds = serde_json::Map::new();
        for (name, value) in &credentials {
            creds.insert(name.to_string(), json!(value));
        }
        output.data(&json!({
            "configFile": config_file.display().to_string(),
            "exists": config_file.exists(),
            "config": config,
            "credentials": creds,
            "signedIn": ctx.credentials.get_session().is_some(),
        }));
        return Ok(());
    }

    if !config_file.exists() {
        output.warn(format!("No configuration file at {}; showing defaults", config_file.display()));
        output.info("Create one with: classicflix config init");
    } else {
        output.info(format!("Config file: {}", config_file.display()));
    }

    let mut locations = section_table("Locations");
    locations.add_row(vec![Cell::new("Config directory"), Cell::new(ctx.paths.config_dir().display())]);
    locations.add_row(vec![Cell::new("Data directory"), Cell::new(ctx.paths.data_dir().display())]);
    locations.add_row(vec![Cell::new("Log directory"), Cell::new(ctx.paths.log_dir().display())]);
    output.table(locations);

    let mut supabase = section_table("Supabase");
    supabase.add_row(vec![Cell::new("Enabled"), enabled_cell(config.supabase.enabled)]);
    supabase.add_row(vec![Cell::new("URL"), Cell::new(&config.supabase.url)]);
    output.table(supabase);

    let mut sources = section_table("Metadata sources");
    sources.add_row(vec![Cell::new("Wikidata"), enabled_cell(config.is_wikidata_enabled())]);
    sources.add_row(vec![Cell::new("TMDb"), enabled_cell(config.is_tmdb_enabled())]);
    sources.add_row(vec![Cell::new("OMDb"), enabled_cell(config.is_omdb_enabled())]);
    sources.add_row(vec![Cell::new("TVMaze"), enabled_cell(config.is_tvmaze_enabled())]);
    sources.add_row(vec![Cell::new("OFDb"), enabled_cell(config.is_ofdb_enabled())]);
    if let Some(tmdb) = &config.sources.tmdb {
        sources.add_row(vec![Cell::new("TMDb language"), Cell::new(&tmdb.language)]);
    }
    if let Some(wikidata) = &config.sources.wikidata {
        sources.add_row(vec![Cell::new("SPARQL endpoint"), Cell::new(&wikidata.endpoint)]);
    }
    if let Some(ofdb) = &config.sources.ofdb {
        sources.add_row(vec![Cell::new("OFDb proxy"), Cell::new(&ofdb.proxy_url)]);
    }
    output.table(sources);

    let mut catalog = section_table("Catalog");
    catalog.add_row(vec![Cell::new("Page size"), Cell::new(config.catalog.page_size)]);
    catalog.add_row(vec![Cell::new("Language"), Cell::new(config.catalog.language.code())]);
    catalog.add_row(vec![Cell::new("List cap"), Cell::new(config.aggregation.list_cap)]);
    catalog.add_row(vec![
        Cell::new("Embed origin"),
        Cell::new(config.player.embed_origin.as_deref().unwrap_or("<not set>")),
    ]);
    output.table(catalog);

    let mut creds = section_table("Credentials");
    for (name, value) in credentials {
        creds.add_row(vec![Cell::new(name), Cell::new(value)]);
    }
    output.table(creds);
    Ok(())
}

pub fn run_init(force: bool, ctx: &mut AppContext, output: &Output) -> Result<()> {
    let config_file = ctx.paths.config_file();
    if config_file.exists() && !force {
        let overwrite = is_interactive()
            && !output.is_quiet()
            && prompts::prompt_yes_no(&format!("{} already exists. Overwrite it?", config_file.display()), Some(false))?;
        if !overwrite {
            output.warn(format!("{} already exists. Use --force to overwrite it.", config_file.display()));
            return Ok(());
        }
    }

    ctx.paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create directories: {}", e))?;

    let config = Config::starter();
    config
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to write {}: {}", config_file.display(), e))?;
    ctx.config = config;
    output.success(format!("Wrote {}", config_file.display()));

    if ctx.credentials.get_supabase_anon_key().is_none() && is_interactive() && !output.is_quiet() {
        output.println(format!(
            "\n{}",
            "The catalog store needs the Supabase anon key (Project settings > API).".bright_black()
        ));
        let key = prompts::prompt_password("Supabase anon key (leave empty to skip)")?;
        if !key.trim().is_empty() {
            ctx.credentials.set_supabase_anon_key(key.trim().to_string());
            ctx.save_credentials()?;
            output.success("Saved supabase_anon_key");
        }
    }
    Ok(())
}

pub fn run_set(key: String, value: String, ctx: &mut AppContext, output: &Output) -> Result<()> {
    ctx.config
        .set_value(&key, &value)
        .map_err(|e| eyre!("Cannot set '{}': {}", key, e))?;

    let config_file = ctx.paths.config_file();
    ctx.config
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to write {}: {}", config_file.display(), e))?;

    if value.trim().is_empty() {
        output.success(format!("Reset {} to its default", key));
    } else {
        output.success(format!("Set {} = {}", key, value.trim()));
    }
    Ok(())
}

pub fn run_credential(name: String, value: Option<String>, ctx: &mut AppContext, output: &Output) -> Result<()> {
    let name = name.trim().to_lowercase();
    if !CREDENTIAL_NAMES.contains(&name.as_str()) {
        return Err(eyre!("Unknown credential '{}'. Expected one of: {}", name, CREDENTIAL_NAMES.join(", ")));
    }

    let value = match value {
        Some(v) => v,
        None => prompts::prompt_password(&name)?,
    };
    let value = value.trim().to_string();

    if value.is_empty() {
        ctx.credentials.remove(&name);
        ctx.save_credentials()?;
        output.success(format!("Removed {}", name));
        return Ok(());
    }

    ctx.credentials.set(name.clone(), value);
    ctx.save_credentials()?;
    output.success(format!("Saved {}", name));
    Ok(())
}
