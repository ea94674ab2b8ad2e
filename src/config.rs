use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::router::{BackTarget, HistoryMode};

pub const DEFAULT_API_BASE_URL: &str = "https://www.thecocktaildb.com/api/json/v1/1";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://www.thecocktaildb.com/images/ingredients";

/// Application configuration
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the cocktail service, without trailing slash
    pub api_base_url: String,
    /// Base URL ingredient thumbnails are served from
    pub image_base_url: String,
    /// When set, the unfiltered listing uses `search.php?f={letter}` instead of `search.php?s=`
    pub default_first_letter: Option<String>,
    /// How "try another random recipe" updates history
    pub history_mode: HistoryMode,
    /// Where the detail view's back action leads
    pub back_target: BackTarget,
    /// File backing the recipe-of-the-day cache
    pub cache_path: PathBuf,
    /// Request timeout in seconds; the transport default applies when unset
    pub timeout_secs: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            default_first_letter: None,
            history_mode: HistoryMode::default(),
            back_target: BackTarget::default(),
            cache_path: PathBuf::from("cocktail_cache.json"),
            timeout_secs: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with COCKTAILS__ prefix
    /// 2. cocktails.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: COCKTAILS__HISTORY_MODE
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Load configuration from `cocktails.toml` and `COCKTAILS__*` environment variables
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("cocktails").required(false))
        .add_source(
            Environment::with_prefix("COCKTAILS")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
