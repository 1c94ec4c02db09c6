use thiserror::Error;

#[derive(Error, Debug)]
pub enum PetError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// 必要憑證缺失（例如 Petfinder client id/secret）
    #[error("{message}")]
    ConfigurationError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Upstream authorization failed ({status:?}): {message}")]
    UpstreamAuthError { status: Option<u16>, message: String },

    #[error("Upstream search failed ({status:?}): {message}")]
    UpstreamSearchError { status: Option<u16>, message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

impl PetError {
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            PetError::ConfigurationError { .. }
                | PetError::ConfigValidationError { .. }
                | PetError::InvalidConfigValueError { .. }
        )
    }

    /// 給終端使用者看的訊息（不含內部細節）
    pub fn user_friendly_message(&self) -> String {
        match self {
            PetError::ConfigurationError { message } => message.clone(),
            PetError::ConfigValidationError { field, .. }
            | PetError::InvalidConfigValueError { field, .. } => {
                format!("Configuration problem in '{}'", field)
            }
            PetError::UpstreamAuthError { .. } => {
                "Could not authenticate against the adoption listings provider".to_string()
            }
            PetError::UpstreamSearchError { message, .. } => {
                format!("Adoption search failed: {}", message)
            }
            PetError::HttpError(_) => "A remote service could not be reached".to_string(),
            PetError::IoError(_) => "A file could not be read or written".to_string(),
            PetError::SerializationError(_) => "Received malformed data".to_string(),
            PetError::ValidationError { message } => message.clone(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PetError::ConfigurationError { .. } => {
                "Set PETFINDER_KEY and PETFINDER_SECRET (or the [petfinder] section of the config file)"
            }
            PetError::ConfigValidationError { .. } | PetError::InvalidConfigValueError { .. } => {
                "Check the configuration file for typos and invalid URLs"
            }
            PetError::UpstreamAuthError { .. } => {
                "Verify the Petfinder credentials are still valid, then retry"
            }
            PetError::UpstreamSearchError { .. } | PetError::HttpError(_) => {
                "Retry in a moment; the upstream provider may be unavailable"
            }
            PetError::IoError(_) => "Check that the data directory exists and is writable",
            PetError::SerializationError(_) => "Inspect the stored data file for corruption",
            PetError::ValidationError { .. } => "Fix the request payload and try again",
        }
    }
}

pub type Result<T> = std::result::Result<T, PetError>;
