//! In-memory credential store used by unit tests

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{
        user::{EditUser, NewUser, UserQuery},
        User,
    },
};

use super::users::CredentialStore;

/// Mirrors the unique constraints on `users.username` and `users.email`
#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.users.lock().map(|u| u.len()).unwrap_or_default()
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, Vec<User>>> {
        self.users
            .lock()
            .map_err(|_| AppError::Internal("credential store poisoned".into()))
    }
}

fn same(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.lock()?.iter().find(|u| same(&u.email, email)).cloned())
    }

    async fn identity_exists(&self, username: &str, email: &str) -> AppResult<bool> {
        Ok(self
            .lock()?
            .iter()
            .any(|u| same(&u.username, username) || same(&u.email, email)))
    }

    async fn insert(&self, user: &NewUser) -> AppResult<User> {
        let mut users = self.lock()?;
        if users
            .iter()
            .any(|u| same(&u.username, &user.username) || same(&u.email, &user.email))
        {
            return Err(AppError::Conflict("Username or email already exists".into()));
        }
        let now = Utc::now();
        let row = User {
            id: users.iter().map(|u| u.id).max().unwrap_or(0) + 1,
            username: user.username.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role,
            email: user.email.clone(),
            phone: user.phone.clone(),
            created_at: now,
            updated_at: now,
        };
        users.push(row.clone());
        Ok(row)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.lock()?
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    async fn list(&self, query: &UserQuery) -> AppResult<Vec<User>> {
        Ok(self
            .lock()?
            .iter()
            .filter(|u| query.role.map_or(true, |r| u.role == r))
            .cloned()
            .collect())
    }

    async fn update(&self, id: i32, data: &EditUser) -> AppResult<User> {
        let mut users = self.lock()?;
        if users.iter().any(|u| {
            u.id != id && (same(&u.username, &data.username) || same(&u.email, &data.email))
        }) {
            return Err(AppError::Conflict("Username or email already exists".into()));
        }
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;
        user.username = data.username.clone();
        user.email = data.email.clone();
        user.role = data.role;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let mut users = self.lock()?;
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }
        Ok(())
    }
}
