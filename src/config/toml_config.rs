use crate::domain::ports::ConfigProvider;
use crate::utils::error::{PetError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

pub const DEFAULT_DOG_API: &str = "https://dog.ceo/api";
pub const DEFAULT_CAT_API: &str = "https://api.thecatapi.com/v1";
pub const DEFAULT_UNSPLASH_API: &str = "https://api.unsplash.com";
pub const DEFAULT_PETFINDER_API: &str = "https://api.petfinder.com/v2";
pub const DEFAULT_PLACEHOLDER: &str = "https://dummyimage.com/320x320/fff7fb/4b3d57";

static ENV_VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    // ${VAR_NAME}
    Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid")
});

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub petfinder: PetfinderConfig,
    #[serde(default)]
    pub unsplash: UnsplashConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            json_logs: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    #[serde(default = "default_dog_api")]
    pub dog_api: String,
    #[serde(default = "default_cat_api")]
    pub cat_api: String,
    #[serde(default = "default_unsplash_api")]
    pub unsplash_api: String,
    #[serde(default = "default_petfinder_api")]
    pub petfinder_api: String,
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            dog_api: default_dog_api(),
            cat_api: default_cat_api(),
            unsplash_api: default_unsplash_api(),
            petfinder_api: default_petfinder_api(),
            placeholder: default_placeholder(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct PetfinderConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct UnsplashConfig {
    pub access_key: Option<String>,
}

/// 憑證不進日誌，只顯示有沒有設定
fn redacted(value: &Option<String>) -> &'static str {
    match value {
        Some(_) => "<redacted>",
        None => "<unset>",
    }
}

impl fmt::Debug for PetfinderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PetfinderConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &redacted(&self.client_secret))
            .finish()
    }
}

impl fmt::Debug for UnsplashConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnsplashConfig")
            .field("access_key", &redacted(&self.access_key))
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0:3001".to_string()
}

fn default_dog_api() -> String {
    DEFAULT_DOG_API.to_string()
}

fn default_cat_api() -> String {
    DEFAULT_CAT_API.to_string()
}

fn default_unsplash_api() -> String {
    DEFAULT_UNSPLASH_API.to_string()
}

fn default_petfinder_api() -> String {
    DEFAULT_PETFINDER_API.to_string()
}

fn default_placeholder() -> String {
    DEFAULT_PLACEHOLDER.to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_data_dir() -> String {
    "./data".to_string()
}

/// 空字串或未替換的 `${VAR}` 都視為未設定
fn usable_secret(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !ENV_VAR_PATTERN.is_match(v))
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PetError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| PetError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 只靠環境變數建立配置（沒有設定檔時）
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(addr) = env_non_empty("PET_LISTEN_ADDR") {
            config.server.listen_addr = addr;
        } else if let Some(port) = env_non_empty("PORT") {
            config.server.listen_addr = format!("0.0.0.0:{}", port.trim());
        }
        config.server.json_logs = env_non_empty("PET_JSON_LOGS")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        config.petfinder.client_id = env_non_empty("PETFINDER_KEY");
        config.petfinder.client_secret = env_non_empty("PETFINDER_SECRET");
        config.unsplash.access_key = env_non_empty("UNSPLASH_ACCESS_KEY");

        if let Some(dir) = env_non_empty("PET_DATA_DIR") {
            config.storage.data_dir = dir;
        }
        if let Some(timeout) = env_non_empty("PROVIDER_TIMEOUT_SECONDS").and_then(|v| v.parse().ok()) {
            config.providers.timeout_seconds = timeout;
        }

        config
    }

    /// 替換環境變數 (例如 ${PETFINDER_KEY})；未定義的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }
}

impl ConfigProvider for AppConfig {
    fn dog_api_base(&self) -> &str {
        &self.providers.dog_api
    }

    fn cat_api_base(&self) -> &str {
        &self.providers.cat_api
    }

    fn unsplash_api_base(&self) -> &str {
        &self.providers.unsplash_api
    }

    fn petfinder_api_base(&self) -> &str {
        &self.providers.petfinder_api
    }

    fn placeholder_base(&self) -> &str {
        &self.providers.placeholder
    }

    fn petfinder_credentials(&self) -> Option<(&str, &str)> {
        let id = usable_secret(&self.petfinder.client_id)?;
        let secret = usable_secret(&self.petfinder.client_secret)?;
        Some((id, secret))
    }

    fn unsplash_access_key(&self) -> Option<&str> {
        usable_secret(&self.unsplash.access_key)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.providers.timeout_seconds)
    }

    fn data_dir(&self) -> &str {
        &self.storage.data_dir
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("server.listen_addr", &self.server.listen_addr)?;
        validation::validate_url("providers.dog_api", &self.providers.dog_api)?;
        validation::validate_url("providers.cat_api", &self.providers.cat_api)?;
        validation::validate_url("providers.unsplash_api", &self.providers.unsplash_api)?;
        validation::validate_url("providers.petfinder_api", &self.providers.petfinder_api)?;
        validation::validate_url("providers.placeholder", &self.providers.placeholder)?;
        validation::validate_range("providers.timeout_seconds", self.providers.timeout_seconds, 1, 120)?;
        validation::validate_path("storage.data_dir", &self.storage.data_dir)?;

        if self.petfinder_credentials().is_none() {
            tracing::warn!("⚠️ Petfinder credentials not configured; adoption search will be unavailable");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[server]
listen_addr = "127.0.0.1:4000"

[providers]
dog_api = "http://localhost:9000/dog"
timeout_seconds = 5

[petfinder]
client_id = "id-123"
client_secret = "secret-456"

[storage]
data_dir = "./pets"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.server.listen_addr, "127.0.0.1:4000");
        assert_eq!(config.dog_api_base(), "http://localhost:9000/dog");
        assert_eq!(config.cat_api_base(), DEFAULT_CAT_API);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.petfinder_credentials(), Some(("id-123", "secret-456")));
        assert_eq!(config.unsplash_access_key(), None);
        assert_eq!(config.data_dir(), "./pets");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.server.listen_addr, "0.0.0.0:3001");
        assert_eq!(config.placeholder_base(), DEFAULT_PLACEHOLDER);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PET_JOURNEY_TEST_UNSPLASH_KEY", "unsplash-abc");

        let toml_content = r#"
[unsplash]
access_key = "${PET_JOURNEY_TEST_UNSPLASH_KEY}"

[petfinder]
client_id = "${PET_JOURNEY_TEST_UNDEFINED_ID}"
client_secret = "secret"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.unsplash_access_key(), Some("unsplash-abc"));
        // 未定義的變數不算有效憑證
        assert_eq!(config.petfinder_credentials(), None);

        std::env::remove_var("PET_JOURNEY_TEST_UNSPLASH_KEY");
    }

    #[test]
    fn test_config_validation_rejects_bad_urls() {
        let toml_content = r#"
[providers]
cat_api = "not-a-url"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_output_hides_secrets() {
        let toml_content = r#"
[petfinder]
client_id = "id-123"
client_secret = "pf-secret-value"

[unsplash]
access_key = "unsplash-secret-value"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        let rendered = format!("{:?}", config);

        assert!(!rendered.contains("pf-secret-value"));
        assert!(!rendered.contains("unsplash-secret-value"));
        assert!(rendered.contains("id-123"));
        assert!(rendered.contains("<redacted>"));
        assert!(format!("{:?}", UnsplashConfig::default()).contains("<unset>"));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[storage]\ndata_dir = \"/tmp/pet-journey\"\n")
            .unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.data_dir(), "/tmp/pet-journey");
    }
}
