//! Topic repository
//!
//! Read-only access to topics, including the join against subscriptions
//! used by profile and subscription listings.

use crate::models::Topic;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Topic repository trait
#[async_trait]
pub trait TopicRepository: Send + Sync {
    /// Get topic by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Topic>>;

    /// List all topics in stable (name) order
    async fn list(&self) -> Result<Vec<Topic>>;

    /// List the topics a user is subscribed to, in stable (name) order
    async fn list_subscribed(&self, user_id: i64) -> Result<Vec<Topic>>;
}

/// SQLx-based topic repository implementation
pub struct SqlxTopicRepository {
    pool: SqlitePool,
}

impl SqlxTopicRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: SqlitePool) -> Arc<dyn TopicRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl TopicRepository for SqlxTopicRepository {
    async fn get_by_id(&self, id: i64) -> Result<Option<Topic>> {
        let row = sqlx::query(
            "SELECT id, name, description, created_at FROM topics WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get topic by ID")?;

        row.map(|row| row_to_topic(&row)).transpose()
    }

    async fn list(&self) -> Result<Vec<Topic>> {
        let rows = sqlx::query(
            "SELECT id, name, description, created_at FROM topics ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list topics")?;

        rows.iter().map(row_to_topic).collect()
    }

    async fn list_subscribed(&self, user_id: i64) -> Result<Vec<Topic>> {
        let rows = sqlx::query(
            r#"
            SELECT t.id, t.name, t.description, t.created_at
            FROM topics t
            INNER JOIN subscriptions s ON s.topic_id = t.id
            WHERE s.user_id = ?
            ORDER BY t.name, t.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list subscribed topics")?;

        rows.iter().map(row_to_topic).collect()
    }
}

fn row_to_topic(row: &sqlx::sqlite::SqliteRow) -> Result<Topic> {
    Ok(Topic {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        created_at: row.get("created_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxSubscriptionRepository, SubscriptionRepository};
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> (SqlitePool, SqlxTopicRepository) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let repo = SqlxTopicRepository::new(pool.clone());
        (pool, repo)
    }

    async fn insert_user(pool: &SqlitePool, username: &str, email: &str) -> i64 {
        sqlx::query("INSERT INTO users (username, email, password_hash) VALUES (?, ?, 'h')")
            .bind(username)
            .bind(email)
            .execute(pool)
            .await
            .expect("Failed to insert user")
            .last_insert_rowid()
    }

    #[tokio::test]
    async fn test_list_returns_seeded_topics_in_name_order() {
        let (_pool, repo) = setup().await;

        let topics = repo.list().await.expect("Failed to list topics");

        assert!(topics.len() >= 4);
        let names: Vec<&str> = topics.iter().map(|t| t.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let (_pool, repo) = setup().await;
        let topics = repo.list().await.expect("Failed to list topics");
        let first = &topics[0];

        let found = repo
            .get_by_id(first.id)
            .await
            .expect("Failed to get topic")
            .expect("Topic not found");

        assert_eq!(found.name, first.name);
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let (_pool, repo) = setup().await;

        let found = repo.get_by_id(999).await.expect("Failed to get topic");

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_list_subscribed() {
        let (pool, repo) = setup().await;
        let user_id = insert_user(&pool, "sub", "sub@example.com").await;
        let topics = repo.list().await.expect("Failed to list topics");

        let subs = SqlxSubscriptionRepository::new(pool.clone());
        subs.insert(user_id, topics[1].id).await.expect("Subscribe failed");
        subs.insert(user_id, topics[0].id).await.expect("Subscribe failed");

        let subscribed = repo
            .list_subscribed(user_id)
            .await
            .expect("Failed to list subscribed");

        assert_eq!(subscribed.len(), 2);
        assert_eq!(subscribed[0].id, topics[0].id);
        assert_eq!(subscribed[1].id, topics[1].id);
    }

    #[tokio::test]
    async fn test_list_subscribed_empty() {
        let (pool, repo) = setup().await;
        let user_id = insert_user(&pool, "lonely", "lonely@example.com").await;

        let subscribed = repo
            .list_subscribed(user_id)
            .await
            .expect("Failed to list subscribed");

        assert!(subscribed.is_empty());
    }
}
