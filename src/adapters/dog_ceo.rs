use crate::adapters::http::{fetch_json, trim_base};
use crate::core::normalizer::normalize;
use crate::domain::model::{BreedCatalog, CatalogEntry, Species};
use crate::domain::ports::BreedImageProvider;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
struct BreedListResponse {
    #[serde(default)]
    message: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    message: Option<String>,
}

/// Dog CEO API：兩層 breed → sub-breed 分類，不需要認證
#[derive(Debug, Clone)]
pub struct DogCeoClient {
    client: Client,
    base_url: String,
}

impl DogCeoClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
        }
    }

    async fn image_at(&self, url: String) -> Result<Option<String>> {
        let body: ImageResponse = fetch_json(self.client.get(&url)).await?;
        Ok(body.message.filter(|m| !m.is_empty()))
    }
}

#[async_trait]
impl BreedImageProvider for DogCeoClient {
    fn species(&self) -> Species {
        Species::Dog
    }

    async fn fetch_catalog(&self) -> Result<BreedCatalog> {
        let url = format!("{}/breeds/list/all", self.base_url);
        let body: BreedListResponse = fetch_json(self.client.get(&url)).await?;

        let entries = body
            .message
            .into_iter()
            .map(|(name, sub_breeds)| CatalogEntry {
                tokens: normalize(&name),
                name: name.to_lowercase(),
                sub_breeds: sub_breeds.iter().map(|s| s.to_lowercase()).collect(),
                provider_id: None,
            })
            .collect();

        Ok(BreedCatalog { entries })
    }

    /// key 為 `breed` 或 `breed/sub`
    async fn image_for(&self, key: &str) -> Result<Option<String>> {
        let path = key.trim_matches('/');
        self.image_at(format!("{}/breed/{}/images/random", self.base_url, path))
            .await
    }

    async fn random_image(&self) -> Result<Option<String>> {
        self.image_at(format!("{}/breeds/image/random", self.base_url))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_fetch_catalog_keeps_sub_breeds() {
        let server = MockServer::start();
        let list_mock = server.mock(|when, then| {
            when.method(GET).path("/breeds/list/all");
            then.status(200).json_body(serde_json::json!({
                "message": {"bulldog": ["boston", "english", "french"], "pug": []},
                "status": "success"
            }));
        });

        let dogs = DogCeoClient::new(Client::new(), &server.url(""));
        let catalog = dogs.fetch_catalog().await.unwrap();

        list_mock.assert();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.entries[0].name, "bulldog");
        assert_eq!(catalog.entries[0].sub_breeds, vec!["boston", "english", "french"]);
        assert!(catalog.entries[1].sub_breeds.is_empty());
    }

    #[tokio::test]
    async fn test_image_for_sub_breed_path() {
        let server = MockServer::start();
        let image_mock = server.mock(|when, then| {
            when.method(GET).path("/breed/bulldog/french/images/random");
            then.status(200).json_body(serde_json::json!({
                "message": "https://images.dog.ceo/breeds/bulldog-french/n02108915_1.jpg",
                "status": "success"
            }));
        });

        let dogs = DogCeoClient::new(Client::new(), &format!("{}/", server.url("")));
        let url = dogs.image_for("bulldog/french").await.unwrap();

        image_mock.assert();
        assert_eq!(
            url.as_deref(),
            Some("https://images.dog.ceo/breeds/bulldog-french/n02108915_1.jpg")
        );
    }

    #[tokio::test]
    async fn test_unknown_breed_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/breed/unicorn/images/random");
            then.status(404).json_body(serde_json::json!({
                "status": "error",
                "message": "Breed not found (main breed does not exist)",
                "code": 404
            }));
        });

        let dogs = DogCeoClient::new(Client::new(), &server.url(""));
        assert!(dogs.image_for("unicorn").await.is_err());
    }
}
