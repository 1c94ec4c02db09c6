use crate::adapters::http::{fetch_json, trim_base};
use crate::core::normalizer::normalize;
use crate::domain::model::{BreedCatalog, CatalogEntry, Species};
use crate::domain::ports::BreedImageProvider;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CatBreed {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct CatImage {
    url: Option<String>,
}

/// The Cat API：平面品種列表，以品種 id 搜尋圖片
#[derive(Debug, Clone)]
pub struct CatApiClient {
    client: Client,
    base_url: String,
}

impl CatApiClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
        }
    }

    async fn first_image(&self, query: &[(&str, &str)]) -> Result<Option<String>> {
        let url = format!("{}/images/search", self.base_url);
        let images: Vec<CatImage> = fetch_json(self.client.get(&url).query(query)).await?;
        Ok(images
            .into_iter()
            .next()
            .and_then(|image| image.url)
            .filter(|u| !u.is_empty()))
    }
}

#[async_trait]
impl BreedImageProvider for CatApiClient {
    fn species(&self) -> Species {
        Species::Cat
    }

    async fn fetch_catalog(&self) -> Result<BreedCatalog> {
        let url = format!("{}/breeds", self.base_url);
        let breeds: Vec<CatBreed> = fetch_json(self.client.get(&url)).await?;

        let entries = breeds
            .into_iter()
            .map(|breed| CatalogEntry {
                tokens: normalize(&breed.name),
                name: breed.name,
                sub_breeds: Vec::new(),
                provider_id: Some(breed.id),
            })
            .collect();

        Ok(BreedCatalog { entries })
    }

    /// key 為品種 id（例如 `pers`）
    async fn image_for(&self, key: &str) -> Result<Option<String>> {
        self.first_image(&[("breed_ids", key), ("limit", "1")]).await
    }

    async fn random_image(&self) -> Result<Option<String>> {
        self.first_image(&[]).await
    }
}
