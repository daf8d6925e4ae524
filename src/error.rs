use thiserror::Error;

/// Errors that can occur while finding recipes
#[derive(Error, Debug)]
pub enum FinderError {
    /// The ingredient text was empty after trimming
    #[error("Please enter some ingredients!")]
    EmptyInput,

    /// Transport failure talking to the recipe API
    #[error("Failed to reach recipe API: {0}")]
    Network(#[source] reqwest::Error),

    /// The recipe API answered with a non-success status
    #[error("Recipe API returned {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    /// Response body was not the JSON we expected
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// No API key in config, KITCHEN__API_KEY or SPOONACULAR_API_KEY
    #[error("No Spoonacular API key configured (set KITCHEN__API_KEY or SPOONACULAR_API_KEY)")]
    MissingApiKey,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    Builder(String),
}

// The request URL carries the API key in its query, so it never goes into the error
impl From<reqwest::Error> for FinderError {
    fn from(e: reqwest::Error) -> Self {
        FinderError::Network(e.without_url())
    }
}
