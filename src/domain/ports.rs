use crate::domain::model::{BreedCatalog, Species};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn dog_api_base(&self) -> &str;
    fn cat_api_base(&self) -> &str;
    fn unsplash_api_base(&self) -> &str;
    fn petfinder_api_base(&self) -> &str;
    fn placeholder_base(&self) -> &str;
    fn petfinder_credentials(&self) -> Option<(&str, &str)>;
    fn unsplash_access_key(&self) -> Option<&str>;
    fn request_timeout(&self) -> Duration;
    fn data_dir(&self) -> &str;
}

/// 時間來源；測試時可替換以模擬 token 過期
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 單一物種的品種圖片供應商。
///
/// `image_for` 的 key 由供應商自行定義：狗是 `breed` 或 `breed/sub`，
/// 貓是供應商的品種 id。`Ok(None)` 表示請求成功但沒有圖片。
#[async_trait]
pub trait BreedImageProvider: Send + Sync {
    fn species(&self) -> Species;
    async fn fetch_catalog(&self) -> Result<BreedCatalog>;
    async fn image_for(&self, key: &str) -> Result<Option<String>>;
    async fn random_image(&self) -> Result<Option<String>>;
}

#[async_trait]
pub trait PremiumImageSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Option<String>>;
}
