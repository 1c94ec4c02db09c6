use crate::adapters::http::build_client;
use crate::adapters::{CatApiClient, DogCeoClient, LocalStorage, UnsplashClient};
use crate::core::adoption::AdoptionSearch;
use crate::core::catalog::BreedCatalogCache;
use crate::core::pet_store::PetStore;
use crate::core::photo::PhotoResolver;
use crate::core::resolvers::BreedResolver;
use crate::core::token_cache::{ClientCredentials, TokenCache};
use crate::core::translator::BreedTranslator;
use crate::domain::ports::{ConfigProvider, PremiumImageSearch, SystemClock};
use crate::utils::error::Result;
use std::sync::Arc;

/// 各 handler 共用的服務；快取都在這裡擁有，不用全域變數
pub struct AppState {
    pub photos: PhotoResolver,
    pub adoption: AdoptionSearch<SystemClock>,
    pub pets: PetStore<LocalStorage>,
}

pub async fn build_state<P: ConfigProvider>(config: &P) -> Result<Arc<AppState>> {
    let client = build_client(config.request_timeout())?;
    let translator = Arc::new(BreedTranslator::new());

    let catalogs = Arc::new(BreedCatalogCache::new(
        Arc::new(DogCeoClient::new(client.clone(), config.dog_api_base())),
        Arc::new(CatApiClient::new(client.clone(), config.cat_api_base())),
    ));
    let breeds = Arc::new(BreedResolver::new(catalogs, translator.clone()));

    let premium = config.unsplash_access_key().map(|key| {
        tracing::info!("🖼️ Premium photo search enabled");
        Arc::new(UnsplashClient::new(client.clone(), config.unsplash_api_base(), key))
            as Arc<dyn PremiumImageSearch>
    });
    let photos = PhotoResolver::new(breeds, premium, config.placeholder_base());

    let credentials = config
        .petfinder_credentials()
        .map(|(id, secret)| ClientCredentials::new(id, secret));
    let tokens = Arc::new(TokenCache::new(
        client.clone(),
        config.petfinder_api_base(),
        credentials,
    ));
    let adoption = AdoptionSearch::new(client, config.petfinder_api_base(), tokens, translator);

    let pets = PetStore::open(LocalStorage::new(config.data_dir().to_string())).await;

    Ok(Arc::new(AppState {
        photos,
        adoption,
        pets,
    }))
}
