pub mod adapters;
pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;

pub use adapters::LocalStorage;
pub use api::{app_router, build_state, AppState};
pub use config::AppConfig;
pub use core::photo::PhotoResolver;
pub use utils::error::{PetError, Result};
