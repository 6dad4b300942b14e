//! Article repository
//!
//! Database operations for articles. Listings are newest-first: topic pages
//! and the personal feed both order by created_at descending.

use crate::models::Article;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Article repository trait
#[async_trait]
pub trait ArticleRepository: Send + Sync {
    /// Create a new article
    async fn create(&self, article: &Article) -> Result<Article>;

    /// Get article by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Article>>;

    /// List a topic's articles, newest first
    async fn list_by_topic(&self, topic_id: i64) -> Result<Vec<Article>>;

    /// List articles from all topics a user is subscribed to, newest first
    async fn list_feed(&self, user_id: i64) -> Result<Vec<Article>>;
}

/// SQLx-based article repository implementation
pub struct SqlxArticleRepository {
    pool: SqlitePool,
}

impl SqlxArticleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: SqlitePool) -> Arc<dyn ArticleRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ArticleRepository for SqlxArticleRepository {
    async fn create(&self, article: &Article) -> Result<Article> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO articles (topic_id, author_id, title, content, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(article.topic_id)
        .bind(article.author_id)
        .bind(&article.title)
        .bind(&article.content)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create article")?;

        Ok(Article {
            id: result.last_insert_rowid(),
            topic_id: article.topic_id,
            author_id: article.author_id,
            title: article.title.clone(),
            content: article.content.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Article>> {
        let row = sqlx::query(
            r#"
            SELECT id, topic_id, author_id, title, content, created_at, updated_at
            FROM articles
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get article by ID")?;

        row.map(|row| row_to_article(&row)).transpose()
    }

    async fn list_by_topic(&self, topic_id: i64) -> Result<Vec<Article>> {
        let rows = sqlx::query(
            r#"
            SELECT id, topic_id, author_id, title, content, created_at, updated_at
            FROM articles
            WHERE topic_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(topic_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list articles by topic")?;

        rows.iter().map(row_to_article).collect()
    }

    async fn list_feed(&self, user_id: i64) -> Result<Vec<Article>> {
        let rows = sqlx::query(
            r#"
            SELECT a.id, a.topic_id, a.author_id, a.title, a.content, a.created_at, a.updated_at
            FROM articles a
            INNER JOIN subscriptions s ON s.topic_id = a.topic_id
            WHERE s.user_id = ?
            ORDER BY a.created_at DESC, a.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list feed articles")?;

        rows.iter().map(row_to_article).collect()
    }
}

fn row_to_article(row: &sqlx::sqlite::SqliteRow) -> Result<Article> {
    Ok(Article {
        id: row.get("id"),
        topic_id: row.get("topic_id"),
        author_id: row.get("author_id"),
        title: row.get("title"),
        content: row.get("content"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxSubscriptionRepository, SubscriptionRepository};
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> (SqlitePool, SqlxArticleRepository, i64) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let user_id = sqlx::query(
            "INSERT INTO users (username, email, password_hash) VALUES ('author', 'a@x.com', 'h')",
        )
        .execute(&pool)
        .await
        .expect("Failed to insert user")
        .last_insert_rowid();

        let repo = SqlxArticleRepository::new(pool.clone());
        (pool, repo, user_id)
    }

    #[tokio::test]
    async fn test_create_article() {
        let (_pool, repo, user_id) = setup().await;

        let created = repo
            .create(&Article::new(1, user_id, "Title".into(), "Body".into()))
            .await
            .expect("Failed to create article");

        assert!(created.id > 0);
        assert_eq!(created.topic_id, 1);
        assert_eq!(created.author_id, user_id);
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let (_pool, repo, _user_id) = setup().await;

        let found = repo.get_by_id(999).await.expect("Failed to get article");

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_list_by_topic_newest_first() {
        let (_pool, repo, user_id) = setup().await;

        for i in 0..3 {
            repo.create(&Article::new(1, user_id, format!("Article {}", i), "Body".into()))
                .await
                .expect("Failed to create article");
        }
        repo.create(&Article::new(2, user_id, "Other topic".into(), "Body".into()))
            .await
            .expect("Failed to create article");

        let articles = repo.list_by_topic(1).await.expect("Failed to list");

        assert_eq!(articles.len(), 3);
        // Same-timestamp inserts fall back to id ordering, still newest first
        assert!(articles[0].id > articles[1].id);
        assert!(articles[1].id > articles[2].id);
    }

    #[tokio::test]
    async fn test_feed_only_contains_subscribed_topics() {
        let (pool, repo, user_id) = setup().await;
        let subs = SqlxSubscriptionRepository::new(pool.clone());
        subs.insert(user_id, 1).await.expect("Subscribe failed");

        repo.create(&Article::new(1, user_id, "In feed".into(), "Body".into()))
            .await
            .expect("Failed to create article");
        repo.create(&Article::new(2, user_id, "Not in feed".into(), "Body".into()))
            .await
            .expect("Failed to create article");

        let feed = repo.list_feed(user_id).await.expect("Failed to list feed");

        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].title, "In feed");
    }

    #[tokio::test]
    async fn test_feed_empty_without_subscriptions() {
        let (_pool, repo, user_id) = setup().await;

        repo.create(&Article::new(1, user_id, "Unseen".into(), "Body".into()))
            .await
            .expect("Failed to create article");

        let feed = repo.list_feed(user_id).await.expect("Failed to list feed");

        assert!(feed.is_empty());
    }
}
