use crate::api::error::ApiError;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

/// JSON 請求本文；空本文視為 `{}`，解析失敗回 400 `{error}`
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;

        parse_body(&bytes).map(JsonBody)
    }
}

fn parse_body<T: DeserializeOwned + Default>(bytes: &[u8]) -> Result<T, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(bytes)
        .map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::NewPet;

    #[test]
    fn test_empty_body_is_default() {
        let pet: NewPet = parse_body(b"").unwrap();
        assert!(pet.name.is_empty());
        let pet: NewPet = parse_body(b" \n").unwrap();
        assert!(pet.name.is_empty());
    }

    #[test]
    fn test_malformed_body_is_bad_request() {
        let err = parse_body::<NewPet>(b"{name:").unwrap_err();
        match err {
            ApiError::BadRequest(message) => assert!(message.starts_with("invalid JSON body")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
