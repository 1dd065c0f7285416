use classicflix_models::AppLanguage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_SUPABASE_URL: &str = "https://rqtlqqmdldpsrtuviedy.supabase.co";

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub supabase: SupabaseConfig,
    #[serde(default)]
    pub sources: SourceConfig,
    #[serde(default)]
    pub aggregation: AggregationConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SupabaseConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_supabase_url")]
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct SourceConfig {
    #[serde(default)]
    pub omdb: Option<OmdbConfig>,
    #[serde(default)]
    pub tmdb: Option<TmdbConfig>,
    #[serde(default)]
    pub tvmaze: Option<TvMazeConfig>,
    #[serde(default)]
    pub ofdb: Option<OfdbConfig>,
    #[serde(default)]
    pub wikidata: Option<WikidataConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OmdbConfig {
    pub enabled: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TmdbConfig {
    pub enabled: bool,
    /// Language passed to TMDb lookups
    #[serde(default = "default_tmdb_language")]
    pub language: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TvMazeConfig {
    pub enabled: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OfdbConfig {
    pub enabled: bool,
    /// Proxy that wraps the fetched page in a `{"contents": ...}` envelope
    #[serde(default = "default_ofdb_proxy")]
    pub proxy_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WikidataConfig {
    pub enabled: bool,
    #[serde(default = "default_sparql_endpoint")]
    pub endpoint: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AggregationConfig {
    /// Maximum entries kept in each merged list field
    #[serde(default = "default_list_cap")]
    pub list_cap: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct PlayerConfig {
    /// Origin passed to YouTube embeds (the page the player is hosted on)
    #[serde(default)]
    pub embed_origin: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CatalogConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default)]
    pub language: AppLanguage,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_json_logging")]
    pub json: bool,
    pub file: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

fn default_supabase_url() -> String {
    std::env::var("SUPABASE_URL").unwrap_or_else(|_| DEFAULT_SUPABASE_URL.to_string())
}

fn default_tmdb_language() -> String {
    "pt-BR".to_string()
}

fn default_ofdb_proxy() -> String {
    "https://api.allorigins.win/get?url=".to_string()
}

fn default_sparql_endpoint() -> String {
    "https://query.wikidata.org/sparql".to_string()
}

fn default_list_cap() -> usize {
    10
}

fn default_page_size() -> usize {
    classicflix_models::constants::PAGE_SIZE
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_json_logging() -> bool {
    use std::io::IsTerminal;
    !std::io::stdout().is_terminal()
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            url: default_supabase_url(),
        }
    }
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self { list_cap: default_list_cap() }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            language: AppLanguage::default(),
        }
    }
}

impl TmdbConfig {
    pub fn enabled() -> Self {
        Self { enabled: true, language: default_tmdb_language() }
    }
}

impl OfdbConfig {
    pub fn enabled() -> Self {
        Self { enabled: true, proxy_url: default_ofdb_proxy() }
    }
}

impl WikidataConfig {
    pub fn enabled() -> Self {
        Self { enabled: true, endpoint: default_sparql_endpoint() }
    }
}

impl SourceConfig {
    /// Every metadata source switched on with its stock settings
    pub fn all_enabled() -> Self {
        Self {
            omdb: Some(OmdbConfig { enabled: true }),
            tmdb: Some(TmdbConfig::enabled()),
            tvmaze: Some(TvMazeConfig { enabled: true }),
            ofdb: Some(OfdbConfig::enabled()),
            wikidata: Some(WikidataConfig::enabled()),
        }
    }
}

fn parse_scalar(raw: &str) -> toml::Value {
    let raw = raw.trim();
    match raw {
        "true" => toml::Value::Boolean(true),
        "false" => toml::Value::Boolean(false),
        _ => match raw.parse::<i64>() {
            Ok(n) => toml::Value::Integer(n),
            Err(_) => toml::Value::String(raw.to_string()),
        },
    }
}

impl Config {
    /// Configuration written on first run
    pub fn starter() -> Self {
        Self {
            sources: SourceConfig::all_enabled(),
            ..Self::default()
        }
    }

    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file, or the starter config when none exists yet
    pub fn load_or_default(path: &PathBuf) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::starter())
        }
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.aggregation.list_cap == 0 {
            return Err(anyhow::anyhow!("aggregation.list_cap must be at least 1"));
        }

        if self.catalog.page_size == 0 {
            return Err(anyhow::anyhow!("catalog.page_size must be at least 1"));
        }

        if self.supabase.enabled && !self.supabase.url.starts_with("http") {
            return Err(anyhow::anyhow!("supabase.url must be an http(s) URL, got '{}'", self.supabase.url));
        }

        if let Some(ref wikidata) = self.sources.wikidata {
            if wikidata.enabled && !wikidata.endpoint.starts_with("http") {
                return Err(anyhow::anyhow!("sources.wikidata.endpoint must be an http(s) URL"));
            }
        }

        if let Some(ref ofdb) = self.sources.ofdb {
            if ofdb.enabled && ofdb.proxy_url.is_empty() {
                return Err(anyhow::anyhow!("sources.ofdb.proxy_url cannot be empty when OFDb is enabled"));
            }
        }

        Ok(())
    }

    /// Set one option by dotted key, e.g. `sources.tmdb.language` or
    /// `aggregation.list_cap`. An empty value removes the key so it falls
    /// back to its default.
    pub fn set_value(&mut self, key: &str, raw: &str) -> anyhow::Result<()> {
        let parts: Vec<&str> = key.split('.').map(str::trim).collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(anyhow::anyhow!("Invalid config key '{}'", key));
        }

        let mut root = toml::Value::try_from(&*self)?;
        let (last, parents) = parts
            .split_last()
            .ok_or_else(|| anyhow::anyhow!("Invalid config key '{}'", key))?;

        let mut table = root
            .as_table_mut()
            .ok_or_else(|| anyhow::anyhow!("Config is not a table"))?;
        for part in parents {
            table = table
                .entry(part.to_string())
                .or_insert_with(|| toml::Value::Table(toml::map::Map::new()))
                .as_table_mut()
                .ok_or_else(|| anyhow::anyhow!("'{}' in '{}' is not a section", part, key))?;
        }

        if raw.trim().is_empty() {
            table.remove(*last);
        } else {
            table.insert(last.to_string(), parse_scalar(raw));
        }

        let updated: Config = root
            .try_into()
            .map_err(|e| anyhow::anyhow!("Invalid value for '{}': {}", key, e))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    pub fn is_omdb_enabled(&self) -> bool {
        self.sources.omdb.as_ref().map(|c| c.enabled).unwrap_or(false)
    }

    pub fn is_tmdb_enabled(&self) -> bool {
        self.sources.tmdb.as_ref().map(|c| c.enabled).unwrap_or(false)
    }

    pub fn is_tvmaze_enabled(&self) -> bool {
        self.sources.tvmaze.as_ref().map(|c| c.enabled).unwrap_or(false)
    }

    pub fn is_ofdb_enabled(&self) -> bool {
        self.sources.ofdb.as_ref().map(|c| c.enabled).unwrap_or(false)
    }

    pub fn is_wikidata_enabled(&self) -> bool {
        self.sources.wikidata.as_ref().map(|c| c.enabled).unwrap_or(false)
    }

    /// Get list of enabled metadata services
    pub fn get_configured_services(&self) -> Vec<String> {
        let mut services = Vec::new();

        if self.is_wikidata_enabled() {
            services.push("wikidata".to_string());
        }
        if self.is_tmdb_enabled() {
            services.push("tmdb".to_string());
        }
        if self.is_omdb_enabled() {
            services.push("omdb".to_string());
        }
        if self.is_tvmaze_enabled() {
            services.push("tvmaze".to_string());
        }
        if self.is_ofdb_enabled() {
            services.push("ofdb".to_string());
        }

        services
    }
}
