use crate::utils::error::Result;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// 所有上游呼叫共用的 client；逾時在這裡統一設定
pub fn build_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(concat!("pet-journey/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// 送出請求，非 2xx 視為錯誤，再解析 JSON
pub async fn fetch_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
    let response = request.send().await?;
    tracing::debug!("📡 {} -> {}", response.url(), response.status());
    let response = response.error_for_status()?;
    Ok(response.json::<T>().await?)
}

pub fn trim_base(base: &str) -> String {
    base.trim_end_matches('/').to_string()
}
