use crate::adapters::http::trim_base;
use crate::core::token_cache::TokenCache;
use crate::core::translator::BreedTranslator;
use crate::domain::model::{AdoptionSearchParams, Species};
use crate::domain::ports::Clock;
use crate::utils::error::{PetError, Result};
use reqwest::{Client, RequestBuilder};
use std::sync::Arc;

pub const DEFAULT_LOCATION: &str = "90210";
pub const DEFAULT_TYPE: &str = "dog";
pub const DEFAULT_LIMIT: &str = "20";
pub const DEFAULT_PAGE: &str = "1";

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Petfinder 列表搜尋代理；回應原樣轉回，不重新整形
pub struct AdoptionSearch<C: Clock> {
    client: Client,
    base_url: String,
    tokens: Arc<TokenCache<C>>,
    translator: Arc<BreedTranslator>,
}

impl<C: Clock> AdoptionSearch<C> {
    pub fn new(
        client: Client,
        api_base: &str,
        tokens: Arc<TokenCache<C>>,
        translator: Arc<BreedTranslator>,
    ) -> Self {
        Self {
            client,
            base_url: trim_base(api_base),
            tokens,
            translator,
        }
    }

    /// 組出上游的查詢參數；品種會依 `type` 翻譯成英文
    pub fn build_query(&self, params: &AdoptionSearchParams) -> Vec<(&'static str, String)> {
        let species_type = non_empty(&params.species_type).unwrap_or(DEFAULT_TYPE);
        let mut query = vec![
            (
                "location",
                non_empty(&params.location).unwrap_or(DEFAULT_LOCATION).to_string(),
            ),
            ("type", species_type.to_string()),
            ("limit", non_empty(&params.limit).unwrap_or(DEFAULT_LIMIT).to_string()),
            ("page", non_empty(&params.page).unwrap_or(DEFAULT_PAGE).to_string()),
        ];

        if let Some(age) = non_empty(&params.age) {
            query.push(("age", age.to_string()));
        }
        if let Some(breed) = non_empty(&params.breed) {
            let breed = match species_type.parse::<Species>() {
                Ok(species) => self.translator.translate(species, breed),
                Err(_) => breed.to_string(),
            };
            query.push(("breed", breed));
        }
        if let Some(name) = non_empty(&params.name) {
            query.push(("name", name.to_string()));
        }

        query
    }

    pub async fn search(&self, params: &AdoptionSearchParams) -> Result<serde_json::Value> {
        let query = self.build_query(params);
        tracing::debug!("🔎 Petfinder search: {:?}", query);

        let url = format!("{}/animals", self.base_url);
        let request = self.client.get(&url).query(&query);
        self.send(request).await
    }

    pub async fn animal(&self, id: &str) -> Result<serde_json::Value> {
        let url = format!("{}/animals/{}", self.base_url, urlencoding::encode(id));
        self.send(self.client.get(&url)).await
    }

    async fn send(&self, request: RequestBuilder) -> Result<serde_json::Value> {
        let token = self.tokens.get_token().await?;

        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| PetError::UpstreamSearchError {
                status: None,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body: serde_json::Value = response.json().await.unwrap_or_default();
            let message = body
                .get("detail")
                .or_else(|| body.get("title"))
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| status.to_string());
            tracing::warn!("❌ Petfinder responded {}: {}", status, message);
            return Err(PetError::UpstreamSearchError {
                status: Some(status.as_u16()),
                message,
            });
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| PetError::UpstreamSearchError {
                status: Some(status.as_u16()),
                message: format!("malformed listings response: {}", e),
            })
    }
}
