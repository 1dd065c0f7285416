use crate::commands::context::AppContext;
use crate::commands::ui::Spinner;
use crate::output::Output;
use classicflix_core::catalog::find_movie;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use owo_colors::OwoColorize;
use serde_json::json;

fn looks_like_url(value: &str) -> bool {
    let value = value.trim();
    value.starts_with("http://") || value.starts_with("https://")
}

/// Resolve a catalog entry (or a raw URL) to something a player can open
pub async fn run_play(target: String, ctx: &AppContext, output: &Output) -> Result<()> {
    let (title, url) = if looks_like_url(&target) {
        (None, target.trim().to_string())
    } else {
        let movies = ctx.catalog().load().await;
        let movie = find_movie(&movies, &target).ok_or_else(|| eyre!("No catalog entry matches '{}'", target))?;
        let url = movie
            .video_url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| eyre!("'{}' has no video URL", movie.title))?;
        (Some(movie.title.clone()), url)
    };

    let spinner = Spinner::start("Resolving video...", output.is_human() && !output.is_quiet());
    let resolved = ctx.resolver().resolve(&url).await;
    spinner.finish();

    tracing::debug!(source = %url, playable = %resolved.playable_url, provider = ?resolved.provider, "Resolved video");

    if !output.is_human() {
        output.data(&json!({ "title": title, "source": url, "video": resolved }));
        return Ok(());
    }

    if resolved.playable_url.is_empty() {
        output.warn("Nothing to play");
        return Ok(());
    }

    if let Some(title) = title {
        output.println(format!("{}", title.bold()));
    }
    let kind = if resolved.is_direct_media { "direct media" } else { "embed" };
    output.println(format!("  {:<10} {:?} ({})", "Provider:".bright_black(), resolved.provider, kind));
    output.println(format!("  {:<10} {}", "URL:".bright_black(), resolved.playable_url));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looks_like_url() {
        assert!(looks_like_url("https://archive.org/details/nosferatu"));
        assert!(looks_like_url("  http://example.com/a.mp4"));
        assert!(!looks_like_url("Nosferatu"));
        assert!(!looks_like_url("Q151904"));
    }
}
