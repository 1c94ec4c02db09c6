use crate::domain::model::{BreedCatalog, Species};
use crate::domain::ports::BreedImageProvider;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// 每個物種的品種目錄只抓一次，之後整個行程期間不變。
///
/// 抓取失敗也會快取空目錄，避免每個請求都重打一個壞掉的上游。
pub struct BreedCatalogCache {
    dog_provider: Arc<dyn BreedImageProvider>,
    cat_provider: Arc<dyn BreedImageProvider>,
    dog: OnceCell<Arc<BreedCatalog>>,
    cat: OnceCell<Arc<BreedCatalog>>,
}

impl BreedCatalogCache {
    pub fn new(
        dog_provider: Arc<dyn BreedImageProvider>,
        cat_provider: Arc<dyn BreedImageProvider>,
    ) -> Self {
        Self {
            dog_provider,
            cat_provider,
            dog: OnceCell::new(),
            cat: OnceCell::new(),
        }
    }

    pub fn provider(&self, species: Species) -> &Arc<dyn BreedImageProvider> {
        match species {
            Species::Dog => &self.dog_provider,
            Species::Cat => &self.cat_provider,
        }
    }

    fn cell(&self, species: Species) -> &OnceCell<Arc<BreedCatalog>> {
        match species {
            Species::Dog => &self.dog,
            Species::Cat => &self.cat,
        }
    }

    pub fn is_loaded(&self, species: Species) -> bool {
        self.cell(species).initialized()
    }

    pub async fn get_catalog(&self, species: Species) -> Arc<BreedCatalog> {
        self.cell(species)
            .get_or_init(|| async {
                match self.provider(species).fetch_catalog().await {
                    Ok(catalog) => {
                        tracing::info!("📚 Loaded {} {} breeds", catalog.len(), species);
                        Arc::new(catalog)
                    }
                    Err(e) => {
                        tracing::warn!(
                            "⚠️ Failed to load {} breed catalog, caching empty catalog: {}",
                            species,
                            e
                        );
                        Arc::new(BreedCatalog::empty())
                    }
                }
            })
            .await
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{CatApiClient, DogCeoClient};
    use httpmock::prelude::*;
    use reqwest::Client;

    fn cache_for(server: &MockServer) -> BreedCatalogCache {
        BreedCatalogCache::new(
            Arc::new(DogCeoClient::new(Client::new(), &server.url("/dog"))),
            Arc::new(CatApiClient::new(Client::new(), &server.url("/cat"))),
        )
    }

    #[tokio::test]
    async fn test_catalog_is_fetched_once_per_species() {
        let server = MockServer::start();
        let dog_mock = server.mock(|when, then| {
            when.method(GET).path("/dog/breeds/list/all");
            then.status(200).json_body(serde_json::json!({
                "message": {"bulldog": ["french", "english"], "pug": []}
            }));
        });
        let cat_mock = server.mock(|when, then| {
            when.method(GET).path("/cat/breeds");
            then.status(200)
                .json_body(serde_json::json!([{"id": "pers", "name": "Persian"}]));
        });

        let cache = cache_for(&server);
        assert!(!cache.is_loaded(Species::Dog));

        let first = cache.get_catalog(Species::Dog).await;
        let second = cache.get_catalog(Species::Dog).await;
        assert_eq!(first.len(), 2);
        assert!(Arc::ptr_eq(&first, &second));
        dog_mock.assert_hits(1);
        cat_mock.assert_hits(0);

        assert_eq!(cache.get_catalog(Species::Cat).await.len(), 1);
        cat_mock.assert_hits(1);
    }

    #[tokio::test]
    async fn test_failed_fetch_caches_empty_catalog() {
        let server = MockServer::start();
        let dog_mock = server.mock(|when, then| {
            when.method(GET).path("/dog/breeds/list/all");
            then.status(503);
        });

        let cache = cache_for(&server);
        assert!(cache.get_catalog(Species::Dog).await.is_empty());
        assert!(cache.get_catalog(Species::Dog).await.is_empty());
        assert!(cache.is_loaded(Species::Dog));

        dog_mock.assert_hits(1);
    }

    #[tokio::test]
    async fn test_concurrent_first_access_fetches_once() {
        let server = MockServer::start();
        let cat_mock = server.mock(|when, then| {
            when.method(GET).path("/cat/breeds");
            then.status(200)
                .json_body(serde_json::json!([{"id": "sfol", "name": "Scottish Fold"}]));
        });

        let cache = cache_for(&server);
        let (a, b) = tokio::join!(
            cache.get_catalog(Species::Cat),
            cache.get_catalog(Species::Cat)
        );

        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
        cat_mock.assert_hits(1);
    }
}
