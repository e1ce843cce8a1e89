//! Frontend routes: server actions and API-backed data.

use axum::{
    extract::State,
    http::{header::COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use course_market::client::resolve_token;
use course_market::extractors::bearer_from_headers;
use course_market::{authorize_credentials, sign_up, ActionResult, ApiClient, ApiError, AppEnv, AppError, SignUpInput, UserStore};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub const PASSWORD_MISMATCH_MESSAGE: &str = "passwords do not match";
pub const INVALID_CREDENTIALS_MESSAGE: &str = "invalid email or password";

#[derive(Clone)]
pub struct WebState {
    pub users: Arc<dyn UserStore>,
    pub api: ApiClient,
    pub env: AppEnv,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

#[derive(Deserialize)]
pub struct CredentialsForm {
    pub email: String,
    pub password: String,
}

/// Server action. Always answers 200 with an action result.
async fn signup(State(state): State<WebState>, Json(form): Json<SignupForm>) -> Json<ActionResult> {
    if form.password != form.password_confirm {
        return Json(ActionResult::error(PASSWORD_MISMATCH_MESSAGE));
    }
    let input = SignUpInput {
        email: form.email,
        password: form.password,
    };
    Json(sign_up(state.users.as_ref(), input).await)
}

/// Credentials provider callback: the public user on success, 401 otherwise.
async fn credentials(State(state): State<WebState>, Json(form): Json<CredentialsForm>) -> Result<Response, AppError> {
    match authorize_credentials(state.users.as_ref(), &form.email, &form.password).await? {
        Some(user) => Ok(Json(user).into_response()),
        None => Ok((
            StatusCode::UNAUTHORIZED,
            Json(ActionResult::error(INVALID_CREDENTIALS_MESSAGE)),
        )
            .into_response()),
    }
}

/// Authorization header first, then the session cookie.
fn request_token(headers: &HeaderMap, env: AppEnv) -> Option<String> {
    let explicit = bearer_from_headers(headers);
    let cookies = headers.get(COOKIE).and_then(|v| v.to_str().ok());
    resolve_token(explicit.as_deref(), cookies, env)
}

fn upstream_failure(err: ApiError) -> Response {
    tracing::warn!(error = %err, "api call failed");
    let upstream_status = err.status().map(|s| s.as_u16());
    (
        StatusCode::BAD_GATEWAY,
        Json(json!({
            "error": {
                "code": "upstream_error",
                "message": err.to_string(),
                "details": { "status": upstream_status }
            }
        })),
    )
        .into_response()
}

async fn api_test(State(state): State<WebState>, headers: HeaderMap) -> Response {
    let token = request_token(&headers, state.env);
    match state.api.get_user_test(token.as_deref()).await {
        Ok(text) => text.into_response(),
        Err(e) => upstream_failure(e),
    }
}

async fn categories(State(state): State<WebState>, headers: HeaderMap) -> Response {
    let token = request_token(&headers, state.env);
    match state.api.list_categories(token.as_deref()).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => upstream_failure(e),
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub fn web_router(state: WebState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/signup", post(signup))
        .route("/auth/credentials", post(credentials))
        .route("/api-test", get(api_test))
        .route("/categories", get(categories))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
