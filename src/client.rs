use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::model::{RecipeDetail, SearchResult};
use crate::FinderError;

/// Anything that can look recipes up by ingredients and by id
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Find up to `limit` candidate recipes for the ingredient text
    async fn search(&self, ingredients: &str, limit: u32)
        -> Result<Vec<SearchResult>, FinderError>;

    /// Fetch the details (instructions) of one recipe
    async fn details(&self, recipe_id: u64) -> Result<RecipeDetail, FinderError>;
}

/// HTTP client for the Spoonacular recipe API
pub struct SpoonacularClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl SpoonacularClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FinderError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (compatible; KitchenFinder/0.1)")
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FinderError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FinderError::Status { status, url });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl RecipeSource for SpoonacularClient {
    async fn search(
        &self,
        ingredients: &str,
        limit: u32,
    ) -> Result<Vec<SearchResult>, FinderError> {
        self.get_json(
            "recipes/findByIngredients",
            &[
                ("ingredients", ingredients.to_string()),
                ("number", limit.to_string()),
            ],
        )
        .await
    }

    async fn details(&self, recipe_id: u64) -> Result<RecipeDetail, FinderError> {
        self.get_json(&format!("recipes/{}/information", recipe_id), &[])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn client_for(server: &Server) -> SpoonacularClient {
        SpoonacularClient::new("test-key", server.url(), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_search_sends_encoded_query() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/recipes/findByIngredients")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("ingredients".into(), "eggs, spinach".into()),
                Matcher::UrlEncoded("number".into(), "5".into()),
                Matcher::UrlEncoded("apiKey".into(), "test-key".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id": 1, "title": "Egg Bake", "image": "i1.jpg"}]"#)
            .create_async()
            .await;

        let results = client_for(&server).search("eggs, spinach", 5).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 1);
        assert_eq!(results[0].title, "Egg Bake");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_status_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/recipes/findByIngredients")
            .match_query(Matcher::Any)
            .with_status(402)
            .with_body(r#"{"status": "failure"}"#)
            .create_async()
            .await;

        let result = client_for(&server).search("eggs", 5).await;
        assert!(matches!(result, Err(FinderError::Status { status, .. }) if status == 402));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_decode_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/recipes/findByIngredients")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let result = client_for(&server).search("eggs", 5).await;
        assert!(matches!(result, Err(FinderError::Decode(_))));
    }

    #[tokio::test]
    async fn test_details() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/recipes/42/information")
            .match_query(Matcher::UrlEncoded("apiKey".into(), "test-key".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": 42, "title": "Soup", "instructions": "Boil."}"#)
            .create_async()
            .await;

        let detail = client_for(&server).details(42).await.unwrap();
        assert_eq!(detail.instructions.as_deref(), Some("Boil."));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_network_error_does_not_expose_api_key() {
        let client = SpoonacularClient::new(
            "secret-key-123",
            "http://127.0.0.1:9",
            Duration::from_secs(2),
        )
        .unwrap();

        let search_err = client.search("eggs", 5).await.unwrap_err();
        assert!(matches!(search_err, FinderError::Network(_)));
        assert!(!search_err.to_string().contains("secret-key-123"));
        assert!(!format!("{:?}", search_err).contains("secret-key-123"));

        let details_err = client.details(1).await.unwrap_err();
        assert!(!details_err.to_string().contains("secret-key-123"));
    }

    #[tokio::test]
    async fn test_status_error_does_not_expose_api_key() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/recipes/7/information")
            .match_query(Matcher::Any)
            .with_status(401)
            .create_async()
            .await;

        let err = client_for(&server).details(7).await.unwrap_err();
        assert!(err.to_string().contains("/recipes/7/information"));
        assert!(!err.to_string().contains("test-key"));
    }

    #[tokio::test]
    async fn test_details_network_error() {
        // Nothing listens on port 9 of localhost
        let client =
            SpoonacularClient::new("k", "http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let result = client.details(1).await;
        assert!(matches!(result, Err(FinderError::Network(_))));
    }
}
