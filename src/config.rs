use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

use crate::FinderError;

/// What to do with a candidate whose detail lookup failed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailFailure {
    /// Drop the candidate without a trace
    #[default]
    Skip,
    /// Render a "details unavailable" card in its place
    Placeholder,
}

/// Main finder configuration
#[derive(Debug, Deserialize, Clone)]
pub struct FinderConfig {
    /// Spoonacular API key (can also be set via SPOONACULAR_API_KEY)
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL of the recipe API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Base URL that card links point at
    #[serde(default = "default_recipe_base_url")]
    pub recipe_base_url: String,
    /// Number of candidates requested from the search endpoint
    #[serde(default = "default_result_limit")]
    pub result_limit: u32,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Policy for candidates whose details cannot be fetched
    #[serde(default)]
    pub detail_failure: DetailFailure,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            recipe_base_url: default_recipe_base_url(),
            result_limit: default_result_limit(),
            timeout: default_timeout(),
            detail_failure: DetailFailure::default(),
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    "https://api.spoonacular.com".to_string()
}

fn default_recipe_base_url() -> String {
    "https://spoonacular.com/recipes".to_string()
}

fn default_result_limit() -> u32 {
    5
}

fn default_timeout() -> u64 {
    30
}

impl FinderConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with KITCHEN__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: KITCHEN__API_KEY, KITCHEN__RESULT_LIMIT
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    /// Parse configuration from a TOML string, ignoring the environment
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// The configured API key, falling back to SPOONACULAR_API_KEY
    pub fn resolve_api_key(&self) -> Result<String, FinderError> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| std::env::var("SPOONACULAR_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
            .ok_or(FinderError::MissingApiKey)
    }
}

/// Load configuration from file and environment variables
pub fn load_config() -> Result<FinderConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Environment variables with KITCHEN_ prefix
        // Use double underscore after the prefix: KITCHEN__DETAIL_FAILURE=placeholder
        .add_source(
            Environment::with_prefix("KITCHEN")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
