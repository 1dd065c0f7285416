use crate::commands::context::AppContext;
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::fs;

pub fn run_clear(all: bool, cache: bool, credentials: bool, session: bool, ctx: &mut AppContext, output: &Output) -> Result<()> {
    if all {
        clear_cache(ctx, output)?;
        clear_credentials(ctx, output)?;
        output.success("Cache, credentials and session cleared");
        return Ok(());
    }

    let mut cleared_anything = false;

    if cache {
        clear_cache(ctx, output)?;
        cleared_anything = true;
    }

    if credentials {
        clear_credentials(ctx, output)?;
        cleared_anything = true;
    } else if session {
        clear_session(ctx, output)?;
        cleared_anything = true;
    }

    if !cleared_anything {
        output.warn("No clear option specified. Use --cache, --credentials, --session, or --all");
        output.println("\nExample: classicflix clear --cache");
    }

    Ok(())
}

fn clear_cache(ctx: &AppContext, output: &Output) -> Result<()> {
    match &ctx.cache {
        Some(cache) => {
            cache
                .clear_cache()
                .map_err(|e| eyre!("Failed to clear cache at {}: {}", ctx.paths.cache_dir().display(), e))?;
            output.success(format!("Cleared catalog cache: {}", ctx.paths.cache_dir().display()));
        }
        None => output.info("No catalog cache found to clear"),
    }
    Ok(())
}

fn clear_credentials(ctx: &mut AppContext, output: &Output) -> Result<()> {
    let credentials_file = ctx.paths.credentials_file();

    if credentials_file.exists() {
        fs::remove_file(&credentials_file)
            .map_err(|e| eyre!("Failed to remove credentials file at {}: {}", credentials_file.display(), e))?;
        for key in ctx.credentials.get_all_keys() {
            ctx.credentials.remove(&key);
        }
        output.success(format!("Cleared credentials: {}", credentials_file.display()));
    } else {
        output.info("No credentials file found to clear");
    }

    Ok(())
}

fn clear_session(ctx: &mut AppContext, output: &Output) -> Result<()> {
    if ctx.credentials.get_session().is_none() {
        output.info("No stored session to clear");
        return Ok(());
    }
    ctx.credentials.clear_session();
    ctx.save_credentials()?;
    output.success("Cleared stored session");
    Ok(())
}
