//! User repository
//!
//! Database operations for users. Uniqueness of `username` and `email` is
//! enforced by the schema; this module translates constraint violations
//! into `UserStoreError` variants so callers never see raw storage errors.

use crate::db::repositories::unique_violation_column;
use crate::models::User;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Errors surfaced by user writes.
#[derive(Debug, thiserror::Error)]
pub enum UserStoreError {
    /// Another user already has this username
    #[error("Username is already taken")]
    UsernameTaken,

    /// Another user already has this email
    #[error("Email is already registered")]
    EmailTaken,

    /// Any other storage failure
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl UserStoreError {
    /// Map a sqlx error from a user INSERT/UPDATE, attributing UNIQUE
    /// violations to the offending column.
    fn from_sqlx(err: sqlx::Error, action: &str) -> Self {
        if let Some(column) = unique_violation_column(&err) {
            if column.ends_with("username") {
                return UserStoreError::UsernameTaken;
            }
            if column.ends_with("email") {
                return UserStoreError::EmailTaken;
            }
        }
        UserStoreError::Other(anyhow::Error::new(err).context(format!("Failed to {}", action)))
    }
}

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user
    async fn create(&self, user: &User) -> Result<User, UserStoreError>;

    /// Get user by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<User>>;

    /// Get user by email
    async fn get_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Get user by username
    async fn get_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Check whether any user has this email
    async fn exists_by_email(&self, email: &str) -> Result<bool>;

    /// Check whether any user has this username
    async fn exists_by_username(&self, username: &str) -> Result<bool>;

    /// Update a user's username, email and password hash in one statement
    async fn update(&self, user: &User) -> Result<User, UserStoreError>;
}

/// SQLx-based user repository implementation
pub struct SqlxUserRepository {
    pool: SqlitePool,
}

impl SqlxUserRepository {
    /// Create a new SQLx user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: SqlitePool) -> Arc<dyn UserRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create(&self, user: &User) -> Result<User, UserStoreError> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO users (username, email, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| UserStoreError::from_sqlx(e, "create user"))?;

        Ok(User {
            id: result.last_insert_rowid(),
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get user by ID")?;

        row.map(|row| row_to_user(&row)).transpose()
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get user by email")?;

        row.map(|row| row_to_user(&row)).transpose()
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, created_at, updated_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get user by username")?;

        row.map(|row| row_to_user(&row)).transpose()
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .context("Failed to check email existence")?;

        Ok(count > 0)
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .context("Failed to check username existence")?;

        Ok(count > 0)
    }

    async fn update(&self, user: &User) -> Result<User, UserStoreError> {
        let now = Utc::now();

        // Single statement: all field changes commit together or not at all
        sqlx::query(
            r#"
            UPDATE users
            SET username = ?, email = ?, password_hash = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(now)
        .bind(user.id)
        .execute(&self.pool)
        .await
        .map_err(|e| UserStoreError::from_sqlx(e, "update user"))?;

        let updated = self
            .get_by_id(user.id)
            .await?
            .context("User not found after update")?;

        Ok(updated)
    }
}

fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
    Ok(User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
