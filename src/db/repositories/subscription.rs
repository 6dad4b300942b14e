//! Subscription repository
//!
//! Stores (user, topic) membership pairs. The table carries a
//! UNIQUE(user_id, topic_id) constraint; `insert` uses `INSERT OR IGNORE`
//! so the constraint, not the caller's pre-check, is the final arbiter
//! under concurrent requests.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Subscription repository trait
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Add a (user, topic) pair. Returns `true` if a row was inserted,
    /// `false` if the pair already existed.
    async fn insert(&self, user_id: i64, topic_id: i64) -> Result<bool>;

    /// Check whether the pair exists
    async fn exists(&self, user_id: i64, topic_id: i64) -> Result<bool>;

    /// Remove the pair directly (no entity-level hooks).
    /// Returns the number of rows affected.
    async fn delete(&self, user_id: i64, topic_id: i64) -> Result<u64>;
}

/// SQLx-based subscription repository implementation
pub struct SqlxSubscriptionRepository {
    pool: SqlitePool,
}

impl SqlxSubscriptionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: SqlitePool) -> Arc<dyn SubscriptionRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl SubscriptionRepository for SqlxSubscriptionRepository {
    async fn insert(&self, user_id: i64, topic_id: i64) -> Result<bool> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO subscriptions (user_id, topic_id) VALUES (?, ?)",
        )
        .bind(user_id)
        .bind(topic_id)
        .execute(&self.pool)
        .await
        .context("Failed to insert subscription")?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, user_id: i64, topic_id: i64) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM subscriptions WHERE user_id = ? AND topic_id = ?",
        )
        .bind(user_id)
        .bind(topic_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to check subscription")?;

        Ok(count > 0)
    }

    async fn delete(&self, user_id: i64, topic_id: i64) -> Result<u64> {
        let result = sqlx::query(
            "DELETE FROM subscriptions WHERE user_id = ? AND topic_id = ?",
        )
        .bind(user_id)
        .bind(topic_id)
        .execute(&self.pool)
        .await
        .context("Failed to delete subscription")?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> (SqlitePool, SqlxSubscriptionRepository, i64) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let user_id = sqlx::query(
            "INSERT INTO users (username, email, password_hash) VALUES ('u', 'u@x.com', 'h')",
        )
        .execute(&pool)
        .await
        .expect("Failed to insert user")
        .last_insert_rowid();

        let repo = SqlxSubscriptionRepository::new(pool.clone());
        (pool, repo, user_id)
    }

    #[tokio::test]
    async fn test_insert_and_exists() {
        let (_pool, repo, user_id) = setup().await;

        assert!(!repo.exists(user_id, 1).await.unwrap());
        let inserted = repo.insert(user_id, 1).await.expect("Insert failed");
        assert!(inserted);
        assert!(repo.exists(user_id, 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_insert_is_idempotent() {
        let (pool, repo, user_id) = setup().await;

        assert!(repo.insert(user_id, 1).await.unwrap());
        // Second insert is a no-op, not an error
        assert!(!repo.insert(user_id, 1).await.unwrap());

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM subscriptions WHERE user_id = ? AND topic_id = 1",
        )
        .bind(user_id)
        .fetch_one(&pool)
        .await
        .expect("Count failed");
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_delete_reports_rows_affected() {
        let (_pool, repo, user_id) = setup().await;
        repo.insert(user_id, 1).await.expect("Insert failed");

        let affected = repo.delete(user_id, 1).await.expect("Delete failed");
        assert_eq!(affected, 1);
        assert!(!repo.exists(user_id, 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_missing_pair_affects_zero_rows() {
        let (_pool, repo, user_id) = setup().await;

        let affected = repo.delete(user_id, 1).await.expect("Delete failed");
        assert_eq!(affected, 0);
    }
}
