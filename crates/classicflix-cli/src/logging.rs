use anyhow::Result;
use std::io;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::{self, time::ChronoUtc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Where and how log lines are written
pub struct LogSettings {
    pub verbose: u8,
    pub quiet: bool,
    /// Base level when neither `-v` nor `RUST_LOG` is given
    pub default_level: String,
    /// Forced JSON output; `None` decides from `RUST_LOG_JSON` and the terminal
    pub json: Option<bool>,
    pub log_file: Option<PathBuf>,
}

fn build_filter(settings: &LogSettings) -> EnvFilter {
    if settings.quiet {
        return EnvFilter::new("error");
    }
    // -v keeps HTTP and HTML parser internals at warn; -vv shows everything
    let fallback = match settings.verbose {
        0 => format!("{},html5ever=warn,selectors=warn", settings.default_level),
        1 => "debug,hyper=warn,reqwest=warn,html5ever=warn,selectors=warn".to_string(),
        _ => "trace".to_string(),
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

fn use_json(settings: &LogSettings) -> bool {
    if let Ok(v) = std::env::var("RUST_LOG_JSON") {
        return v == "true";
    }
    settings.json.unwrap_or_else(|| !io::stdout().is_terminal())
}

pub fn init_logging(settings: LogSettings) -> Result<()> {
    let filter = build_filter(&settings);
    let json = use_json(&settings);
    let registry = Registry::default().with(filter);

    if let Some(log_path) = settings.log_file {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Rotated daily: classicflix.2026-01-17, ...
        let log_dir = log_path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Log file path has no parent directory"))?;
        let log_filename = log_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid log filename"))?;
        let log_prefix = log_filename.rsplitn(2, '.').nth(1).unwrap_or(log_filename);

        let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, log_prefix);

        if json {
            let json_layer = fmt::layer()
                .json()
                .with_timer(ChronoUtc::rfc_3339())
                .with_writer(file_appender);
            registry.with(json_layer).init();
        } else {
            let fmt_layer = fmt::layer()
                .with_timer(ChronoUtc::rfc_3339())
                .with_ansi(false)
                .with_writer(file_appender);
            registry.with(fmt_layer).init();
        }
    } else if json {
        let json_layer = fmt::layer()
            .json()
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(io::stderr);
        registry.with(json_layer).init();
    } else {
        let fmt_layer = fmt::layer()
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(io::stderr);
        registry.with(fmt_layer).init();
    }

    Ok(())
}
