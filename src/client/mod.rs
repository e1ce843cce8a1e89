//! Outbound calls from the web frontend to the API service.
//!
//! [`ApiClient::fetch`] attaches the bearer token, disables caching and decodes
//! the response by content type. The typed wrappers in `endpoints` unwrap the
//! API's `{data, meta}` envelope.

mod endpoints;
pub mod fetch;
pub mod session;

pub use fetch::{ApiClient, ApiError, ApiPayload, FetchOptions, RequestBody};
pub use session::{
    resolve_token, session_cookie_name, token_from_cookie_header, SECURE_SESSION_COOKIE, SESSION_COOKIE,
};
