use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

/// Outbound scraper configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScraperConfig {
    #[serde(default = "default_desktop_search_url")]
    pub desktop_search_url: String,

    #[serde(default = "default_mobile_search_url")]
    pub mobile_search_url: String,

    /// Origin relative item hrefs are resolved against.
    #[serde(default = "default_site_origin")]
    pub site_origin: String,

    /// Prefix for synthesized mobile item URLs.
    #[serde(default = "default_mobile_item_url")]
    pub mobile_item_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_desktop_user_agent")]
    pub desktop_user_agent: String,

    #[serde(default = "default_mobile_user_agent")]
    pub mobile_user_agent: String,
}

/// Strategy sequencing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    #[serde(default = "default_query")]
    pub default_query: String,

    #[serde(default = "default_desktop_max_items")]
    pub desktop_max_items: usize,

    #[serde(default = "default_mobile_max_items")]
    pub mobile_max_items: usize,

    #[serde(default = "default_generated_max_items")]
    pub generated_max_items: usize,
}

// ── Defaults ─────────────────────────────────────────────────────────────────

fn default_bind_addr() -> String {
    "127.0.0.1:3000".to_string()
}
fn default_desktop_search_url() -> String {
    "https://www.ebay.com/sch/i.html".to_string()
}
fn default_mobile_search_url() -> String {
    "https://m.ebay.com/sch/i.html".to_string()
}
fn default_site_origin() -> String {
    "https://www.ebay.com".to_string()
}
fn default_mobile_item_url() -> String {
    "https://m.ebay.com/itm/".to_string()
}
fn default_timeout_secs() -> u64 {
    15
}
fn default_desktop_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}
fn default_mobile_user_agent() -> String {
    "Mozilla/5.0 (iPhone; CPU iPhone OS 14_7_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.1.2 Mobile/15E148 Safari/604.1".to_string()
}
fn default_query() -> String {
    "vintage watches".to_string()
}
fn default_desktop_max_items() -> usize {
    10
}
fn default_mobile_max_items() -> usize {
    8
}
fn default_generated_max_items() -> usize {
    8
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_addr: default_bind_addr() }
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            desktop_search_url: default_desktop_search_url(),
            mobile_search_url: default_mobile_search_url(),
            site_origin: default_site_origin(),
            mobile_item_url: default_mobile_item_url(),
            timeout_secs: default_timeout_secs(),
            desktop_user_agent: default_desktop_user_agent(),
            mobile_user_agent: default_mobile_user_agent(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_query: default_query(),
            desktop_max_items: default_desktop_max_items(),
            mobile_max_items: default_mobile_max_items(),
            generated_max_items: default_generated_max_items(),
        }
    }
}

// ── Loader ───────────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load configuration from file + environment overrides
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(
                config::File::with_name("config/default")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::File::with_name("config/local")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(config::Environment::with_prefix("SCOUT").separator("__"))
            .build()?;

        let app_cfg: AppConfig = cfg.try_deserialize().unwrap_or_else(|e| {
            warn!("Invalid configuration ({}), using defaults", e);
            AppConfig::default()
        });
        Ok(app_cfg)
    }
}
