// Adapters layer: concrete implementations for external systems (providers, storage, http).

pub mod cat_api;
pub mod dog_ceo;
pub mod http;
pub mod storage;
pub mod unsplash;

pub use cat_api::CatApiClient;
pub use dog_ceo::DogCeoClient;
pub use storage::LocalStorage;
pub use unsplash::UnsplashClient;
