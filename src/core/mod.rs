pub mod adoption;
pub mod catalog;
pub mod normalizer;
pub mod pet_store;
pub mod photo;
pub mod resolvers;
pub mod token_cache;
pub mod translator;

pub use crate::domain::model::{AdoptionSearchParams, PhotoQuery, ResolvedPhoto, Species};
pub use crate::domain::ports::{BreedImageProvider, Clock, ConfigProvider, PremiumImageSearch, Storage};
pub use crate::utils::error::Result;
