use crate::adapters::http::{fetch_json, trim_base};
use crate::domain::ports::PremiumImageSearch;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(default)]
    urls: ResultUrls,
}

#[derive(Debug, Default, Deserialize)]
struct ResultUrls {
    small: Option<String>,
    thumb: Option<String>,
}

/// Unsplash 付費圖片搜尋，只有設定 access key 時才會建立
#[derive(Debug, Clone)]
pub struct UnsplashClient {
    client: Client,
    base_url: String,
    access_key: String,
}

impl UnsplashClient {
    pub fn new(client: Client, base_url: &str, access_key: &str) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
            access_key: access_key.to_string(),
        }
    }
}

#[async_trait]
impl PremiumImageSearch for UnsplashClient {
    async fn search(&self, query: &str) -> Result<Option<String>> {
        let url = format!("{}/search/photos", self.base_url);
        let request = self
            .client
            .get(&url)
            .query(&[("query", query.to_lowercase().as_str()), ("per_page", "1")])
            .header(AUTHORIZATION, format!("Client-ID {}", self.access_key));

        let body: SearchResponse = fetch_json(request).await?;
        Ok(body
            .results
            .into_iter()
            .next()
            .and_then(|r| {
                let non_empty = |u: &String| !u.is_empty();
                r.urls.small.filter(non_empty).or(r.urls.thumb.filter(non_empty))
            }))
    }
}
