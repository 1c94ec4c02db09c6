//! Petfinder OAuth token 快取（client credentials grant）。

use crate::adapters::http::trim_base;
use crate::domain::model::CachedToken;
use crate::domain::ports::{Clock, SystemClock};
use crate::utils::error::{PetError, Result};
use chrono::Duration;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// 儲存時先扣掉的秒數，避免時鐘誤差或請求途中過期
pub const SAFETY_MARGIN_SECONDS: i64 = 60;

pub const MISSING_CREDENTIALS: &str = "Petfinder credentials missing";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl ClientCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    grant_type: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

pub struct TokenCache<C: Clock = SystemClock> {
    client: Client,
    token_url: String,
    credentials: Option<ClientCredentials>,
    clock: C,
    // 持有鎖直到換發完成，同時冷啟動的呼叫只會換發一次
    cached: Mutex<Option<CachedToken>>,
}

impl TokenCache<SystemClock> {
    pub fn new(client: Client, api_base: &str, credentials: Option<ClientCredentials>) -> Self {
        Self::with_clock(client, api_base, credentials, SystemClock)
    }
}

impl<C: Clock> TokenCache<C> {
    pub fn with_clock(
        client: Client,
        api_base: &str,
        credentials: Option<ClientCredentials>,
        clock: C,
    ) -> Self {
        Self {
            client,
            token_url: format!("{}/oauth2/token", trim_base(api_base)),
            credentials,
            clock,
            cached: Mutex::new(None),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    /// 目前快取的 token（不觸發換發）
    pub async fn cached(&self) -> Option<CachedToken> {
        self.cached.lock().await.clone()
    }

    pub async fn get_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.is_valid_at(self.clock.now()) {
                return Ok(token.value.clone());
            }
            tracing::debug!("🔑 Cached Petfinder token expired at {}", token.expires_at);
        }

        let credentials = self
            .credentials
            .as_ref()
            .ok_or_else(|| PetError::ConfigurationError {
                message: MISSING_CREDENTIALS.to_string(),
            })?;

        // 換發失敗時保留舊的快取，下次呼叫會再試
        let fresh = self.exchange(credentials).await?;
        let value = fresh.value.clone();
        tracing::info!("🔑 Obtained Petfinder token, valid until {}", fresh.expires_at);
        *cached = Some(fresh);

        Ok(value)
    }

    async fn exchange(&self, credentials: &ClientCredentials) -> Result<CachedToken> {
        let body = TokenRequest {
            grant_type: "client_credentials",
            client_id: &credentials.client_id,
            client_secret: &credentials.client_secret,
        };

        let response = self
            .client
            .post(&self.token_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| PetError::UpstreamAuthError {
                status: None,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::warn!("❌ Petfinder token exchange failed with {}: {}", status, text);
            return Err(PetError::UpstreamAuthError {
                status: Some(status.as_u16()),
                message: if text.is_empty() {
                    status.to_string()
                } else {
                    text
                },
            });
        }

        let token: TokenResponse =
            response
                .json()
                .await
                .map_err(|e| PetError::UpstreamAuthError {
                    status: Some(status.as_u16()),
                    message: format!("malformed token response: {}", e),
                })?;

        if token.access_token.is_empty() {
            return Err(PetError::UpstreamAuthError {
                status: Some(status.as_u16()),
                message: "malformed token response: empty access_token".to_string(),
            });
        }

        let expires_at = Self::effective_ttl(token.expires_in)
            .and_then(|ttl| self.clock.now().checked_add_signed(ttl))
            .ok_or_else(|| PetError::UpstreamAuthError {
                status: Some(status.as_u16()),
                message: format!(
                    "malformed token response: expires_in {} out of range",
                    token.expires_in
                ),
            })?;

        Ok(CachedToken {
            value: token.access_token,
            expires_at,
        })
    }

    /// 扣掉安全邊際後必須仍為正數，否則存進去就已經過期
    fn effective_ttl(expires_in: i64) -> Option<Duration> {
        expires_in
            .checked_sub(SAFETY_MARGIN_SECONDS)
            .filter(|seconds| *seconds > 0)
            .and_then(Duration::try_seconds)
    }
}
