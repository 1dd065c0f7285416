use clap::{ArgAction, Parser, Subcommand};
use classicflix_models::AppLanguage;
use commands::browse::{parse_app_language, BrowseArgs};
use commands::context::AppContext;
use commands::interactions::ListKind;
use commands::lookup::AddOrigin;
use commands::{auth, browse, clear, config, details, edit, filters, interactions, lookup, play, stats};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "classicflix")]
#[command(about = "ClassicFlix - Browse and curate a catalog of classic films")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Also write logs to a file, rotated daily (defaults to the data directory's logs/classicflix.log)
    #[arg(long, global = true, value_name = "PATH", num_args = 0..=1)]
    log_file: Option<Option<PathBuf>>,

    /// Use the cached catalog only; no catalog store requests
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List and filter the catalog
    #[command(long_about = "List the catalog one page at a time. Filters combine: every given filter must match. Falls back to the cached catalog when the store is unreachable.")]
    Browse {
        #[command(flatten)]
        args: BrowseArgs,
    },
    /// List the values each browse filter accepts
    Filters {
        #[arg(long, value_parser = parse_app_language)]
        lang: Option<AppLanguage>,
    },
    /// Show merged details for a title
    #[command(long_about = "Show a title's details merged from every enabled metadata source (Wikidata, TMDb, OMDb, TVMaze). Results are cached per title; use --refresh to query the sources again. Accepts a catalog id, a title, a Wikidata QID or an IMDb id.")]
    Details {
        /// Catalog id, title, QID or IMDb id
        movie: String,

        /// Ignore cached details and query the sources again
        #[arg(long, action = ArgAction::SetTrue)]
        refresh: bool,

        /// Display language (en, pt, it, hi, ru)
        #[arg(long, value_parser = parse_app_language)]
        lang: Option<AppLanguage>,
    },
    /// List Wikimedia images for a title
    Gallery {
        /// Catalog id, title, QID or IMDb id
        movie: String,
    },
    /// Resolve a title's video to a playable or embeddable URL
    #[command(visible_alias = "resolve")]
    Play {
        /// Catalog id, title, or a video URL
        target: String,
    },
    /// Search external sources for candidate titles
    #[command(visible_alias = "search")]
    Lookup {
        /// Search text
        query: String,

        /// Only search this source (omdb, tmdb, tvmaze, ofdb)
        #[arg(long)]
        source: Option<String>,
    },
    /// Add a title to the catalog from external metadata
    #[command(long_about = "Look a title up in every enabled metadata source, merge the results and insert it into the catalog. Identify the title with --id (Wikidata QID or IMDb id) or pick a search result with --from <source> --query <text> --pick <n>.")]
    Add {
        /// Wikidata QID or IMDb id
        #[arg(long, conflicts_with_all = ["from", "query"])]
        id: Option<String>,

        /// Search source to pick from
        #[arg(long, requires = "query")]
        from: Option<String>,

        /// Search text for --from
        #[arg(long)]
        query: Option<String>,

        /// 1-based index into the --from search results (default 1)
        #[arg(long)]
        pick: Option<usize>,

        /// Video URL to attach (archive.org, YouTube, Vimeo, Commons or a direct file)
        #[arg(long)]
        video_url: Option<String>,

        /// Show the entry that would be added without writing it
        #[arg(long, action = ArgAction::SetTrue)]
        dry_run: bool,
    },
    /// Change fields of a catalog entry
    Edit {
        /// Catalog id, title or QID
        movie: String,

        /// field=value; list fields take a comma list (repeatable)
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = edit::parse_assignment)]
        set: Vec<(String, String)>,
    },
    /// Toggle a title in one of your lists
    Mark {
        movie: String,

        #[arg(value_enum)]
        list: ListKind,
    },
    /// Save the playback position for a title
    Progress {
        movie: String,

        /// Position in seconds
        seconds: f64,
    },
    /// Show your favorites, watched and watch-later lists
    Lists {
        /// Show only this list
        #[arg(long, value_enum)]
        only: Option<ListKind>,

        #[arg(long, value_parser = parse_app_language)]
        lang: Option<AppLanguage>,
    },
    /// Sign in, sign up or out of the catalog store
    Auth {
        #[command(subcommand)]
        cmd: AuthCommands,
    },
    /// Catalog facet counts
    Stats,
    /// Configure settings and credentials
    #[command(long_about = "Manage configuration and credentials for ClassicFlix. Running without a subcommand shows the current configuration.")]
    Config {
        #[command(subcommand)]
        cmd: Option<ConfigCommands>,
    },
    /// Clear cached data
    #[command(long_about = "Clear cached data or stored credentials. Use --cache to clear the catalog and details cache, --credentials to remove stored credentials, --session to sign out locally, or --all to clear everything.")]
    Clear {
        /// Clear all cache and credentials
        #[arg(long, action = ArgAction::SetTrue, conflicts_with = "credentials")]
        all: bool,

        /// Clear the catalog and details cache
        #[arg(long, action = ArgAction::SetTrue)]
        cache: bool,

        /// Clear stored credentials
        #[arg(long, action = ArgAction::SetTrue)]
        credentials: bool,

        /// Clear the stored session only
        #[arg(long, action = ArgAction::SetTrue)]
        session: bool,
    },
}

#[derive(Subcommand)]
enum AuthCommands {
    /// Sign in with email and password (password is prompted, or read from CLASSICFLIX_PASSWORD)
    Login { email: Option<String> },
    /// Create an account
    Signup { email: Option<String> },
    /// Sign out and forget the stored session
    Logout,
    /// Show the stored session
    Status,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks sensitive data)
    Show {
        /// Show credentials unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Write a starter configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
    /// Set an option by dotted key, e.g. `sources.tmdb.enabled true`
    Set {
        key: String,
        /// New value; an empty string restores the default
        value: String,
    },
    /// Store a credential (supabase_anon_key, omdb_api_key, tmdb_api_key)
    Credential {
        name: String,
        /// Value; prompted when omitted, empty removes it
        value: Option<String>,
    },
}

fn add_origin(id: Option<String>, from: Option<String>, query: Option<String>, pick: Option<usize>) -> color_eyre::Result<AddOrigin> {
    match (id, from, query) {
        (Some(id), _, _) => Ok(AddOrigin::Identifier(id)),
        (None, Some(source), Some(query)) => Ok(AddOrigin::Search {
            source,
            query,
            pick: pick.unwrap_or(1),
        }),
        _ => Err(color_eyre::eyre::eyre!("Pass --id <QID|IMDb id> or --from <source> --query <text> --pick <n>")),
    }
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let mut ctx = AppContext::load(cli.offline)?;

    let log_config = ctx.config.logging.as_ref();
    logging::init_logging(logging::LogSettings {
        verbose: cli.verbose,
        quiet: cli.quiet,
        default_level: log_config.map(|l| l.level.clone()).unwrap_or_else(|| "warn".to_string()),
        json: log_config.map(|l| l.json),
        log_file: match cli.log_file.clone() {
            Some(path) => Some(path.unwrap_or_else(|| ctx.paths.log_file())),
            None => log_config.and_then(|l| l.file.clone()),
        },
    })
    .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Browse { args } => browse::run_browse(args, &ctx, &output).await,
        Commands::Filters { lang } => filters::run_filters(lang, &ctx, &output),
        Commands::Details { movie, refresh, lang } => details::run_details(movie, refresh, lang, &ctx, &output).await,
        Commands::Gallery { movie } => details::run_gallery(movie, &ctx, &output).await,
        Commands::Play { target } => play::run_play(target, &ctx, &output).await,
        Commands::Lookup { query, source } => lookup::run_lookup(source, query, &ctx, &output).await,
        Commands::Add {
            id,
            from,
            query,
            pick,
            video_url,
            dry_run,
        } => {
            let origin = add_origin(id, from, query, pick)?;
            lookup::run_add(origin, video_url, dry_run, &ctx, &output).await
        }
        Commands::Edit { movie, set } => edit::run_edit(movie, set, &ctx, &output).await,
        Commands::Mark { movie, list } => interactions::run_mark(movie, list, &ctx, &output).await,
        Commands::Progress { movie, seconds } => interactions::run_progress(movie, seconds, &ctx, &output).await,
        Commands::Lists { only, lang } => interactions::run_lists(only, lang, &ctx, &output).await,
        Commands::Auth { cmd } => match cmd {
            AuthCommands::Login { email } => auth::run_login(email, &mut ctx, &output).await,
            AuthCommands::Signup { email } => auth::run_signup(email, &mut ctx, &output).await,
            AuthCommands::Logout => auth::run_logout(&mut ctx, &output).await,
            AuthCommands::Status => auth::run_status(&ctx, &output),
        },
        Commands::Stats => stats::run_stats(&ctx, &output).await,
        Commands::Config { cmd } => match cmd.unwrap_or(ConfigCommands::Show { full: false }) {
            ConfigCommands::Show { full } => config::run_show(full, &ctx, &output),
            ConfigCommands::Init { force } => config::run_init(force, &mut ctx, &output),
            ConfigCommands::Set { key, value } => config::run_set(key, value, &mut ctx, &output),
            ConfigCommands::Credential { name, value } => config::run_credential(name, value, &mut ctx, &output),
        },
        Commands::Clear {
            all,
            cache,
            credentials,
            session,
        } => clear::run_clear(all, cache, credentials, session, &mut ctx, &output),
    }
}
