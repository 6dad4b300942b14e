//! Comment repository

use crate::models::Comment;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

/// Comment repository trait
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Create a new comment
    async fn create(&self, comment: &Comment) -> Result<Comment>;

    /// List an article's comments, oldest first
    async fn list_by_article(&self, article_id: i64) -> Result<Vec<Comment>>;
}

/// SQLx-based comment repository implementation
pub struct SqlxCommentRepository {
    pool: SqlitePool,
}

impl SqlxCommentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: SqlitePool) -> Arc<dyn CommentRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl CommentRepository for SqlxCommentRepository {
    async fn create(&self, comment: &Comment) -> Result<Comment> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO comments (article_id, author_id, content, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(comment.article_id)
        .bind(comment.author_id)
        .bind(&comment.content)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create comment")?;

        Ok(Comment {
            id: result.last_insert_rowid(),
            article_id: comment.article_id,
            author_id: comment.author_id,
            content: comment.content.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn list_by_article(&self, article_id: i64) -> Result<Vec<Comment>> {
        let rows = sqlx::query(
            r#"
            SELECT id, article_id, author_id, content, created_at, updated_at
            FROM comments
            WHERE article_id = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(article_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list comments")?;

        rows.iter().map(row_to_comment).collect()
    }
}

fn row_to_comment(row: &sqlx::sqlite::SqliteRow) -> Result<Comment> {
    Ok(Comment {
        id: row.get("id"),
        article_id: row.get("article_id"),
        author_id: row.get("author_id"),
        content: row.get("content"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> (SqlitePool, SqlxCommentRepository, i64) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let user_id = sqlx::query(
            "INSERT INTO users (username, email, password_hash) VALUES ('c', 'c@x.com', 'h')",
        )
        .execute(&pool)
        .await
        .expect("Failed to insert user")
        .last_insert_rowid();

        let article_id = sqlx::query(
            "INSERT INTO articles (topic_id, author_id, title, content) VALUES (1, ?, 't', 'b')",
        )
        .bind(user_id)
        .execute(&pool)
        .await
        .expect("Failed to insert article")
        .last_insert_rowid();

        let repo = SqlxCommentRepository::new(pool.clone());
        (pool, repo, article_id)
    }

    #[tokio::test]
    async fn test_create_comment() {
        let (_pool, repo, article_id) = setup().await;

        let created = repo
            .create(&Comment::new(article_id, 1, "First!".into()))
            .await
            .expect("Failed to create comment");

        assert!(created.id > 0);
        assert_eq!(created.article_id, article_id);
        assert_eq!(created.content, "First!");
    }

    #[tokio::test]
    async fn test_list_by_article_oldest_first() {
        let (_pool, repo, article_id) = setup().await;

        for i in 0..3 {
            repo.create(&Comment::new(article_id, 1, format!("Comment {}", i)))
                .await
                .expect("Failed to create comment");
        }

        let comments = repo
            .list_by_article(article_id)
            .await
            .expect("Failed to list comments");

        assert_eq!(comments.len(), 3);
        assert!(comments[0].id < comments[1].id);
        assert!(comments[1].id < comments[2].id);
    }

    #[tokio::test]
    async fn test_list_empty_article() {
        let (_pool, repo, article_id) = setup().await;

        let comments = repo
            .list_by_article(article_id)
            .await
            .expect("Failed to list comments");

        assert!(comments.is_empty());
    }
}
