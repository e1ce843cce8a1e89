//! OpenAPI document and the Swagger UI mounted at `/docs`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

/// Name of the bearer scheme referenced by `security(("access-token" = []))`.
pub const BEARER_SCHEME: &str = "access-token";
pub const DOCS_PATH: &str = "/docs";
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

struct BearerAddon;

impl Modify for BearerAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Enter an access token"))
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&BearerAddon),
    info(
        title = "Course marketplace API",
        description = "Course marketplace API documentation",
        version = "1.0"
    ),
    paths(
        crate::routes::common::health,
        crate::routes::common::ready,
        crate::handlers::users::user_test,
        crate::handlers::users::list_users,
        crate::handlers::users::create_user,
        crate::handlers::users::get_user,
        crate::handlers::users::replace_user,
        crate::handlers::users::patch_user,
        crate::handlers::users::delete_user,
        crate::handlers::users::upload_avatar,
        crate::handlers::users::get_avatar,
        crate::handlers::categories::list_categories,
        crate::handlers::categories::get_category,
    ),
    tags(
        (name = "users", description = "User accounts"),
        (name = "categories", description = "Course categories"),
        (name = "health", description = "Liveness and readiness")
    )
)]
pub struct ApiDoc;

/// Swagger UI at `/docs` serving the document at `/api-docs/openapi.json`.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new(DOCS_PATH).url(OPENAPI_JSON_PATH, ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_declares_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_value(&doc).unwrap();
        let scheme = &json["components"]["securitySchemes"][BEARER_SCHEME];
        assert_eq!(scheme["type"], "http");
        assert_eq!(scheme["scheme"], "bearer");
        assert_eq!(scheme["bearerFormat"], "JWT");
        assert_eq!(json["info"]["version"], "1.0");
    }

    #[test]
    fn document_lists_resource_paths() {
        let doc = ApiDoc::openapi();
        for path in ["/users", "/users/{id}", "/users/{id}/avatar", "/user-test", "/course-categories"] {
            assert!(doc.paths.paths.contains_key(path), "{path}");
        }
    }
}
