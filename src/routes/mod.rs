//! Route tables and the assembled API router.

pub mod categories;
pub mod common;
pub mod users;

pub use categories::category_routes;
pub use common::common_routes;
pub use users::user_routes;

use crate::doc::swagger_ui;
use crate::state::AppState;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Everything the API service serves: probes, docs, users and categories.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(user_routes(state.clone()))
        .merge(category_routes(state))
        .merge(swagger_ui())
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::store::CategoryStore;
    use crate::model::NewCategory;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    const TOKEN: &str = "Bearer test-token";

    fn app_with(store: Arc<MemoryStore>) -> Router {
        api_router(AppState::new(store.clone(), store))
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, TOKEN)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn authed(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, TOKEN)
            .body(Body::empty())
            .unwrap()
    }

    async fn create(app: &Router, email: &str) -> Value {
        let (status, body) = send(
            app,
            json_request("POST", "/users", json!({"email": email, "password": "secret-pass", "name": "Kim"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        serde_json::from_slice::<Value>(&body).unwrap()["data"].clone()
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let (status, body) = send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_slice::<Value>(&body).unwrap()["status"], "ok");

        let (status, _) = send(&app, Request::get("/ready").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn user_routes_require_bearer_token() {
        let app = app_with(Arc::new(MemoryStore::new()));
        for uri in ["/user-test", "/users"] {
            let (status, body) = send(&app, Request::get(uri).body(Body::empty()).unwrap()).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
            let body: Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(body["error"]["code"], "unauthorized");
        }
    }

    #[tokio::test]
    async fn user_test_returns_text() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let res = app.clone().oneshot(authed("GET", "/user-test")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let content_type = res.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/plain"));
        let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], crate::handlers::USER_TEST_BODY.as_bytes());
    }

    #[tokio::test]
    async fn user_lifecycle() {
        let store = Arc::new(MemoryStore::new());
        let app = app_with(store.clone());

        let user = create(&app, "kim@example.com").await;
        assert_eq!(user["email"], "kim@example.com");
        assert!(user.get("hashedPassword").is_none());
        let id = user["id"].as_str().unwrap().to_string();

        let (status, body) = send(&app, authed("GET", &format!("/users/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_slice::<Value>(&body).unwrap()["data"]["name"], "Kim");

        let (status, body) = send(
            &app,
            json_request("PATCH", &format!("/users/{id}"), json!({"name": null})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let patched: Value = serde_json::from_slice(&body).unwrap();
        assert!(patched["data"].get("name").is_none());
        assert_eq!(patched["data"]["email"], "kim@example.com");

        let (status, body) = send(
            &app,
            json_request("PUT", &format!("/users/{id}"), json!({"email": "lee@example.com", "name": "Lee"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_slice::<Value>(&body).unwrap()["data"]["email"], "lee@example.com");

        let (status, _) = send(&app, authed("DELETE", &format!("/users/{id}"))).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(store.user_count(), 0);

        let (status, _) = send(&app, authed("GET", &format!("/users/{id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict() {
        let store = Arc::new(MemoryStore::new());
        let app = app_with(store.clone());
        create(&app, "kim@example.com").await;
        let (status, body) = send(
            &app,
            json_request("POST", "/users", json!({"email": "kim@example.com", "password": "secret-pass"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(serde_json::from_slice::<Value>(&body).unwrap()["error"]["code"], "conflict");
        assert_eq!(store.user_count(), 1);
    }

    #[tokio::test]
    async fn invalid_id_is_bad_request() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let (status, _) = send(&app, authed("GET", "/users/not-a-uuid")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn list_pages_and_filters() {
        let app = app_with(Arc::new(MemoryStore::new()));
        for email in ["a@example.com", "b@example.com", "c@other.org"] {
            create(&app, email).await;
        }

        let (status, body) = send(&app, authed("GET", "/users?page=1&pageSize=2")).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
        assert_eq!(body["meta"], json!({"total": 3, "page": 1, "pageSize": 2}));

        let (_, body) = send(&app, authed("GET", "/users?q=EXAMPLE")).await;
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["meta"]["total"], 2);
    }

    fn multipart(id: &str, content_type: &str, bytes: &[u8]) -> Request<Body> {
        let boundary = "X-BOUNDARY";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"a.png\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
        Request::builder()
            .method("POST")
            .uri(format!("/users/{id}/avatar"))
            .header(header::AUTHORIZATION, TOKEN)
            .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn avatar_upload_and_download() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let user = create(&app, "kim@example.com").await;
        let id = user["id"].as_str().unwrap();

        let png = [0x89, b'P', b'N', b'G', 1, 2, 3];
        let (status, body) = send(&app, multipart(id, "image/png", &png)).await;
        assert_eq!(status, StatusCode::CREATED);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["data"]["url"], format!("/users/{id}/avatar"));

        let res = app.clone().oneshot(authed("GET", &format!("/users/{id}/avatar"))).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.headers()[header::CONTENT_TYPE], "image/png");
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], &png[..]);

        let (status, _) = send(&app, multipart(id, "text/plain", b"hello")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn oversized_avatar_is_rejected_by_body_limit() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let user = create(&app, "kim@example.com").await;
        let id = user["id"].as_str().unwrap();

        let mut req = multipart(id, "image/png", &vec![0u8; crate::service::MAX_AVATAR_BYTES + 128 * 1024]);
        let body = to_bytes(std::mem::take(req.body_mut()), usize::MAX).await.unwrap();
        req.headers_mut().insert(header::CONTENT_LENGTH, body.len().into());
        *req.body_mut() = Body::from(body);
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn categories_are_public() {
        let store = Arc::new(MemoryStore::new());
        CategoryStore::replace_all(
            store.as_ref(),
            &[NewCategory {
                name: "디자인 아트".into(),
                slug: "design".into(),
                description: String::new(),
            }],
        )
        .await
        .unwrap();
        let app = app_with(store);

        let (status, body) = send(&app, Request::get("/course-categories").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["meta"]["count"], 1);
        assert_eq!(body["data"][0]["slug"], "design");

        let (status, _) = send(&app, Request::get("/course-categories/design").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, Request::get("/course-categories/missing").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let (status, body) = send(
            &app,
            Request::get(crate::doc::OPENAPI_JSON_PATH).body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let doc: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(doc["info"]["title"], "Course marketplace API");
    }
}
