//! Users repository (the credential store)

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        user::{EditUser, NewUser, UserQuery},
        User,
    },
};

/// Persistence operations on user accounts.
///
/// The auth flow only depends on this trait so it can run against the
/// PostgreSQL repository in production and an in-memory store in tests.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// True when either the username or the email is already taken
    async fn identity_exists(&self, username: &str, email: &str) -> AppResult<bool>;

    /// Insert a confirmed user. Duplicate username/email yields `AppError::Conflict`.
    async fn insert(&self, user: &NewUser) -> AppResult<User>;

    async fn get_by_id(&self, id: i32) -> AppResult<User>;

    async fn list(&self, query: &UserQuery) -> AppResult<Vec<User>>;

    async fn update(&self, id: i32, data: &EditUser) -> AppResult<User>;

    async fn delete(&self, id: i32) -> AppResult<()>;
}

const DUPLICATE_IDENTITY: &str = "Username or email already exists";

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for UsersRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE LOWER(email) = LOWER($1) LIMIT 1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn identity_exists(&self, username: &str, email: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE LOWER(username) = LOWER($1) OR LOWER(email) = LOWER($2)
            )
            "#,
        )
        .bind(username)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn insert(&self, user: &NewUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, role, email, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(&user.email)
        .bind(&user.phone)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, DUPLICATE_IDENTITY, "Referenced row not found"))
    }

    async fn get_by_id(&self, id: i32) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    async fn list(&self, query: &UserQuery) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT * FROM users
            WHERE ($1::text IS NULL OR role = $1)
            ORDER BY username
            "#,
        )
        .bind(query.role)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn update(&self, id: i32, data: &EditUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = $1, email = $2, role = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(&data.username)
        .bind(&data.email)
        .bind(data.role)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from_write(e, DUPLICATE_IDENTITY, "Referenced row not found"))?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }
        Ok(())
    }
}
