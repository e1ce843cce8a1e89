//! Generic authenticated request against the API service.

use crate::config::WebConfig;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

const JSON_CONTENT_TYPE: &str = "application/json";
const USER_AGENT: &str = concat!("course-market-web/", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug)]
pub enum ApiError {
    /// Non-2xx answer. Only the status is kept.
    #[error("API request failed: {0}")]
    Status(StatusCode),
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("decode: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("expected a {expected} payload")]
    UnexpectedPayload { expected: &'static str },
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status(s) => Some(*s),
            _ => None,
        }
    }
}

/// Outgoing body. Text goes out verbatim, JSON is serialized.
#[derive(Clone, Debug)]
pub enum RequestBody {
    Text(String),
    Json(Value),
}

impl RequestBody {
    pub fn json<T: Serialize>(value: &T) -> Result<Self, ApiError> {
        Ok(RequestBody::Json(serde_json::to_value(value)?))
    }
}

#[derive(Clone, Debug, Default)]
pub struct FetchOptions {
    pub method: Method,
    /// Applied after the default JSON content type, so they may replace it.
    pub headers: HeaderMap,
    pub body: Option<RequestBody>,
}

impl FetchOptions {
    pub fn new(method: Method) -> Self {
        FetchOptions {
            method,
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }
}

/// Decoded response, chosen by its `Content-Type`.
#[derive(Clone, Debug, PartialEq)]
pub enum ApiPayload {
    Json(Value),
    Text(String),
    Binary(Bytes),
}

impl ApiPayload {
    pub fn into_json<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        match self {
            ApiPayload::Json(v) => Ok(serde_json::from_value(v)?),
            _ => Err(ApiError::UnexpectedPayload { expected: "json" }),
        }
    }

    pub fn into_text(self) -> Result<String, ApiError> {
        match self {
            ApiPayload::Text(s) => Ok(s),
            _ => Err(ApiError::UnexpectedPayload { expected: "text" }),
        }
    }

    pub fn into_bytes(self) -> Result<Bytes, ApiError> {
        match self {
            ApiPayload::Binary(b) => Ok(b),
            _ => Err(ApiError::UnexpectedPayload { expected: "binary" }),
        }
    }
}

/// HTTP client bound to the API service base URL.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Endpoint paths are appended to `base_url` verbatim.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(ApiClient {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &WebConfig) -> Result<Self, ApiError> {
        Self::new(config.api_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Send one request. A non-empty `token` goes out as `Authorization: Bearer <token>`.
    pub async fn fetch(&self, endpoint: &str, options: FetchOptions, token: Option<&str>) -> Result<ApiPayload, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        // Replaces the default content type; keeps every value of multi-valued headers.
        headers.extend(options.headers);
        let mut request = self
            .http
            .request(options.method, self.url(endpoint))
            .headers(headers)
            .header(CACHE_CONTROL, "no-store");
        request = with_bearer(request, token);
        request = match options.body {
            Some(RequestBody::Text(text)) => request.body(text),
            Some(RequestBody::Json(value)) => request.body(serde_json::to_vec(&value)?),
            None => request,
        };
        tracing::debug!(endpoint, "api request");
        let response = request.send().await?;
        read_payload(response).await
    }

    /// `fetch` and decode a JSON response into `T`.
    pub async fn fetch_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: FetchOptions,
        token: Option<&str>,
    ) -> Result<T, ApiError> {
        self.fetch(endpoint, options, token).await?.into_json()
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }
}

pub(crate) fn with_bearer(request: reqwest::RequestBuilder, token: Option<&str>) -> reqwest::RequestBuilder {
    match token.filter(|t| !t.is_empty()) {
        Some(t) => request.header(AUTHORIZATION, format!("Bearer {}", t)),
        None => request,
    }
}

/// Fail on non-2xx, then branch on the content type.
pub(crate) async fn read_payload(response: Response) -> Result<ApiPayload, ApiError> {
    let status = response.status();
    if !status.is_success() {
        tracing::warn!(%status, url = %response.url(), "api request failed");
        return Err(ApiError::Status(status));
    }
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();
    let body = response.bytes().await?;
    if content_type.contains(JSON_CONTENT_TYPE) {
        Ok(ApiPayload::Json(serde_json::from_slice(&body)?))
    } else if content_type.contains("text/") {
        Ok(ApiPayload::Text(String::from_utf8_lossy(&body).into_owned()))
    } else {
        Ok(ApiPayload::Binary(body))
    }
}
