//! Typed wrappers for the API service routes.

use super::fetch::{read_payload, with_bearer, ApiClient, ApiError, FetchOptions, RequestBody};
use crate::model::{
    AvatarUploaded, CourseCategory, CreateUserInput, ListParams, PagedResult, PatchUserInput, ReplaceUserInput, User,
    DEFAULT_PAGE_SIZE,
};
use crate::response::{SuccessMany, SuccessOne, SuccessPage};
use reqwest::header::CACHE_CONTROL;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use uuid::Uuid;

fn users_query(params: &ListParams) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    query.append_pair("page", &params.page.unwrap_or(1).to_string());
    query.append_pair("pageSize", &params.page_size.unwrap_or(DEFAULT_PAGE_SIZE).to_string());
    if let Some(q) = params.q.as_deref().filter(|q| !q.is_empty()) {
        query.append_pair("q", q);
    }
    query.finish()
}

impl ApiClient {
    pub async fn get_user_test(&self, token: Option<&str>) -> Result<String, ApiError> {
        self.fetch("/user-test", FetchOptions::new(Method::GET), token)
            .await?
            .into_text()
    }

    pub async fn get_user_by_id(&self, id: Uuid, token: Option<&str>) -> Result<User, ApiError> {
        let body: SuccessOne<User> = self
            .fetch_json(&format!("/users/{}", id), FetchOptions::new(Method::GET), token)
            .await?;
        Ok(body.data)
    }

    /// Page defaults to 1 and page size to 20.
    pub async fn list_users(&self, params: &ListParams, token: Option<&str>) -> Result<PagedResult<User>, ApiError> {
        let endpoint = format!("/users?{}", users_query(params));
        let body: SuccessPage<User> = self.fetch_json(&endpoint, FetchOptions::new(Method::GET), token).await?;
        Ok(PagedResult {
            items: body.data,
            total: body.meta.total,
            page: body.meta.page,
            page_size: body.meta.page_size,
        })
    }

    pub async fn create_user(&self, input: &CreateUserInput, token: Option<&str>) -> Result<User, ApiError> {
        let options = FetchOptions::new(Method::POST).with_body(RequestBody::json(input)?);
        let body: SuccessOne<User> = self.fetch_json("/users", options, token).await?;
        Ok(body.data)
    }

    /// Full replacement (`PUT`).
    pub async fn update_user(&self, id: Uuid, input: &ReplaceUserInput, token: Option<&str>) -> Result<User, ApiError> {
        let options = FetchOptions::new(Method::PUT).with_body(RequestBody::json(input)?);
        let body: SuccessOne<User> = self.fetch_json(&format!("/users/{}", id), options, token).await?;
        Ok(body.data)
    }

    pub async fn patch_user(&self, id: Uuid, input: &PatchUserInput, token: Option<&str>) -> Result<User, ApiError> {
        let options = FetchOptions::new(Method::PATCH).with_body(RequestBody::json(input)?);
        let body: SuccessOne<User> = self.fetch_json(&format!("/users/{}", id), options, token).await?;
        Ok(body.data)
    }

    pub async fn delete_user(&self, id: Uuid, token: Option<&str>) -> Result<(), ApiError> {
        self.fetch(&format!("/users/{}", id), FetchOptions::new(Method::DELETE), token)
            .await?;
        Ok(())
    }

    /// Multipart upload in field `file`. Sent without the JSON content type so the boundary is set.
    pub async fn upload_avatar(
        &self,
        id: Uuid,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
        token: Option<&str>,
    ) -> Result<AvatarUploaded, ApiError> {
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)?;
        let request = self
            .http()
            .post(self.url(&format!("/users/{}/avatar", id)))
            .header(CACHE_CONTROL, "no-store")
            .multipart(Form::new().part("file", part));
        let response = with_bearer(request, token).send().await?;
        let body: SuccessOne<AvatarUploaded> = read_payload(response).await?.into_json()?;
        Ok(body.data)
    }

    pub async fn list_categories(&self, token: Option<&str>) -> Result<Vec<CourseCategory>, ApiError> {
        let body: SuccessMany<CourseCategory> = self
            .fetch_json("/course-categories", FetchOptions::new(Method::GET), token)
            .await?;
        Ok(body.data)
    }
}
