//! Shared application state for all routes.

use crate::store::{CategoryStore, PgCategoryStore, PgUserStore, UserStore};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub categories: Arc<dyn CategoryStore>,
}

impl AppState {
    pub fn new(users: Arc<dyn UserStore>, categories: Arc<dyn CategoryStore>) -> Self {
        AppState { users, categories }
    }

    /// Both stores over one connection pool.
    pub fn from_pool(pool: PgPool) -> Self {
        AppState {
            users: Arc::new(PgUserStore::new(pool.clone())),
            categories: Arc::new(PgCategoryStore::new(pool)),
        }
    }
}
