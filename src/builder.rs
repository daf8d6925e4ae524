use std::time::Duration;

use crate::client::{RecipeSource, SpoonacularClient};
use crate::config::{DetailFailure, FinderConfig};
use crate::pipeline::{RecipeFinder, StagePolicy};
use crate::FinderError;

/// Builder for configuring a [`RecipeFinder`]
#[derive(Default)]
pub struct RecipeFinderBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    recipe_base_url: Option<String>,
    limit: Option<u32>,
    timeout: Option<Duration>,
    detail_failure: Option<DetailFailure>,
    source: Option<Box<dyn RecipeSource>>,
}

impl RecipeFinderBuilder {
    /// Start from a loaded configuration; later calls override it
    pub fn config(mut self, config: &FinderConfig) -> Self {
        self.api_key = config.api_key.clone().or(self.api_key);
        self.base_url = Some(config.base_url.clone());
        self.recipe_base_url = Some(config.recipe_base_url.clone());
        self.limit = Some(config.result_limit);
        self.timeout = Some(Duration::from_secs(config.timeout));
        self.detail_failure = Some(config.detail_failure);
        self
    }

    /// Set the Spoonacular API key
    ///
    /// # Example
    /// ```
    /// use kitchen_finder::RecipeFinder;
    ///
    /// let builder = RecipeFinder::builder().api_key("your-api-key");
    /// ```
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Point the client at a different API host (proxies, tests)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Base URL used when building card links
    pub fn recipe_base_url(mut self, url: impl Into<String>) -> Self {
        self.recipe_base_url = Some(url.into());
        self
    }

    /// Number of candidates to request per search
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set a timeout for HTTP requests
    ///
    /// # Example
    /// ```
    /// use kitchen_finder::RecipeFinder;
    /// use std::time::Duration;
    ///
    /// let builder = RecipeFinder::builder()
    ///     .api_key("your-api-key")
    ///     .timeout(Duration::from_secs(10));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Choose what happens to candidates whose details cannot be fetched
    pub fn detail_failure(mut self, policy: DetailFailure) -> Self {
        self.detail_failure = Some(policy);
        self
    }

    /// Use a custom recipe source instead of the Spoonacular client
    pub fn source(mut self, source: Box<dyn RecipeSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Build the finder
    ///
    /// # Errors
    /// Returns `FinderError` if:
    /// - No API key was given and none is found in SPOONACULAR_API_KEY
    /// - The page size is zero
    /// - The HTTP client cannot be created
    pub fn build(self) -> Result<RecipeFinder, FinderError> {
        let defaults = FinderConfig::default();

        let limit = self.limit.unwrap_or(defaults.result_limit);
        if limit == 0 {
            return Err(FinderError::Builder(
                "Result limit must be at least 1".to_string(),
            ));
        }

        let source = match self.source {
            Some(source) => source,
            None => {
                let api_key = FinderConfig {
                    api_key: self.api_key,
                    ..FinderConfig::default()
                }
                .resolve_api_key()?;
                let timeout = self
                    .timeout
                    .unwrap_or(Duration::from_secs(defaults.timeout));
                Box::new(SpoonacularClient::new(
                    api_key,
                    self.base_url.unwrap_or(defaults.base_url),
                    timeout,
                )?)
            }
        };

        Ok(RecipeFinder::new(
            source,
            limit,
            self.recipe_base_url.unwrap_or(defaults.recipe_base_url),
            StagePolicy::from(self.detail_failure.unwrap_or_default()),
        ))
    }
}
