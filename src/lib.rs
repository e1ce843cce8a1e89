//! Course marketplace: the REST API service, the server actions used by the web
//! frontend, and the client the frontend uses to call the API.

pub mod actions;
pub mod client;
pub mod config;
pub mod doc;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod password;
pub mod response;
pub mod routes;
pub mod seed;
pub mod service;
pub mod state;
pub mod store;

pub use actions::{authorize_credentials, sign_up, ActionResult, ActionStatus, SignUpInput};
pub use client::{resolve_token, ApiClient, ApiError, ApiPayload, FetchOptions, RequestBody};
pub use config::{server_config_from_env, web_config_from_env, AppEnv, ServerConfig, WebConfig};
pub use error::{AppError, ConfigError};
pub use routes::api_router;
pub use seed::seed_categories;
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_tables, CategoryStore, UserStore};
