use crate::utils::error::PetError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("not found")]
    NotFound,
    #[error("{0}")]
    BadRequest(String),
    /// 上游或內部失敗；`code` 是回給前端的錯誤代碼
    #[error("{message}")]
    Upstream { code: &'static str, message: String },
}

impl ApiError {
    pub fn petfinder(err: PetError) -> Self {
        if err.is_configuration() {
            tracing::warn!("⚠️ Petfinder is not configured: {}", err);
        } else {
            tracing::error!("❌ Petfinder request failed: {}", err);
        }
        ApiError::Upstream {
            code: "petfinder_failed",
            message: err.to_string(),
        }
    }
}

impl From<PetError> for ApiError {
    fn from(err: PetError) -> Self {
        match err {
            PetError::ValidationError { message } => ApiError::BadRequest(message),
            other => ApiError::Upstream {
                code: "internal_error",
                message: other.to_string(),
            },
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: "not found".to_string(),
                    message: None,
                },
            ),
            ApiError::BadRequest(reason) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: reason,
                    message: None,
                },
            ),
            ApiError::Upstream { code, message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody {
                    error: code.to_string(),
                    message: Some(message),
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
