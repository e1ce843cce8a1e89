//! Extract the bearer token from the `Authorization` header.

use crate::error::AppError;
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

const BEARER_PREFIX: &str = "Bearer ";

/// Required bearer token. Rejects with 401 when the header is missing or not a bearer credential.
#[derive(Clone, Debug)]
pub struct BearerToken(pub String);

/// Token from `Authorization: Bearer <token>`; the scheme match is case-insensitive.
pub fn bearer_from_headers(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let scheme = value.get(..BEARER_PREFIX.len())?;
    if !scheme.eq_ignore_ascii_case(BEARER_PREFIX) {
        return None;
    }
    let token = value.get(BEARER_PREFIX.len()..)?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        bearer_from_headers(&parts.headers)
            .map(BearerToken)
            .ok_or_else(|| AppError::Unauthorized("bearer token required".into()))
    }
}
