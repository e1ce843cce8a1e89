//! In-memory stores with the same contracts as the PostgreSQL ones. Test support only.

use super::{CategoryStore, UserStore};
use crate::error::AppError;
use crate::model::{Avatar, CourseCategory, NewCategory, NewUser, UserChanges, UserQuery, UserRecord};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: Vec<UserRecord>,
    avatars: HashMap<Uuid, Avatar>,
    categories: Vec<CourseCategory>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent insert/update fail with a database error.
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    pub fn user_count(&self) -> usize {
        self.lock().users.len()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check_writable(&self) -> Result<(), AppError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Db(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, AppError> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<UserRecord, AppError> {
        self.check_writable()?;
        let mut tables = self.lock();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("email already exists".into()));
        }
        let now = Utc::now();
        let record = UserRecord {
            id: Uuid::new_v4(),
            email: user.email,
            name: user.name,
            hashed_password: user.hashed_password,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(record.clone());
        Ok(record)
    }

    async fn list(&self, query: &UserQuery) -> Result<(Vec<UserRecord>, u64), AppError> {
        let tables = self.lock();
        let needle = query.email_contains.as_ref().map(|s| s.to_lowercase());
        let matching: Vec<&UserRecord> = tables
            .users
            .iter()
            .filter(|u| match &needle {
                Some(n) => u.email.to_lowercase().contains(n.as_str()),
                None => true,
            })
            .collect();
        let total = matching.len() as u64;
        let page = matching
            .into_iter()
            .skip(query.offset() as usize)
            .take(query.page_size as usize)
            .cloned()
            .collect();
        Ok((page, total))
    }

    async fn update(&self, id: Uuid, changes: &UserChanges) -> Result<Option<UserRecord>, AppError> {
        self.check_writable()?;
        let mut tables = self.lock();
        if let Some(email) = &changes.email {
            if tables.users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(AppError::Conflict("email already exists".into()));
            }
        }
        let Some(user) = tables.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(email) = &changes.email {
            user.email = email.clone();
        }
        if let Some(name) = &changes.name {
            user.name = name.clone();
        }
        if !changes.is_empty() {
            user.updated_at = Utc::now();
        }
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.lock();
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        tables.avatars.remove(&id);
        Ok(tables.users.len() != before)
    }

    async fn put_avatar(&self, id: Uuid, avatar: Avatar) -> Result<bool, AppError> {
        self.check_writable()?;
        let mut tables = self.lock();
        if !tables.users.iter().any(|u| u.id == id) {
            return Ok(false);
        }
        tables.avatars.insert(id, avatar);
        Ok(true)
    }

    async fn avatar(&self, id: Uuid) -> Result<Option<Avatar>, AppError> {
        Ok(self.lock().avatars.get(&id).cloned())
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn list(&self) -> Result<Vec<CourseCategory>, AppError> {
        let mut rows = self.lock().categories.clone();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<CourseCategory>, AppError> {
        Ok(self.lock().categories.iter().find(|c| c.slug == slug).cloned())
    }

    async fn replace_all(&self, categories: &[NewCategory]) -> Result<u64, AppError> {
        self.check_writable()?;
        let mut rows: Vec<CourseCategory> = Vec::with_capacity(categories.len());
        for c in categories {
            if rows.iter().any(|r| r.slug == c.slug) {
                return Err(AppError::Conflict("slug already exists".into()));
            }
            rows.push(CourseCategory {
                id: Uuid::new_v4(),
                name: c.name.clone(),
                slug: c.slug.clone(),
                description: c.description.clone(),
            });
        }
        let inserted = rows.len() as u64;
        self.lock().categories = rows;
        Ok(inserted)
    }
}
