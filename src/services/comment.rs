//! Comment service

use crate::db::repositories::{ArticleRepository, CommentRepository};
use crate::models::comment::MAX_COMMENT_LENGTH;
use crate::models::{Comment, User};
use anyhow::Context;
use std::sync::Arc;

/// Error types for comment operations
#[derive(Debug, thiserror::Error)]
pub enum CommentServiceError {
    /// The article does not exist
    #[error("Article not found")]
    ArticleNotFound,

    /// Validation error (invalid input)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Comment service
pub struct CommentService {
    comment_repo: Arc<dyn CommentRepository>,
    article_repo: Arc<dyn ArticleRepository>,
}

impl CommentService {
    pub fn new(
        comment_repo: Arc<dyn CommentRepository>,
        article_repo: Arc<dyn ArticleRepository>,
    ) -> Self {
        Self {
            comment_repo,
            article_repo,
        }
    }

    /// Create a comment on an article, authored by the given user.
    pub async fn create(
        &self,
        author: &User,
        article_id: i64,
        content: String,
    ) -> Result<Comment, CommentServiceError> {
        let content = content.trim().to_string();
        if content.is_empty() {
            return Err(CommentServiceError::ValidationError(
                "Comment content cannot be empty".to_string(),
            ));
        }
        if content.chars().count() > MAX_COMMENT_LENGTH {
            return Err(CommentServiceError::ValidationError(format!(
                "Comment exceeds {} characters",
                MAX_COMMENT_LENGTH
            )));
        }

        self.article_repo
            .get_by_id(article_id)
            .await
            .context("Failed to look up article")?
            .ok_or(CommentServiceError::ArticleNotFound)?;

        let comment = Comment::new(article_id, author.id, content);
        let created = self
            .comment_repo
            .create(&comment)
            .await
            .context("Failed to create comment")?;

        Ok(created)
    }

    /// List an article's comments, oldest first.
    pub async fn list_by_article(&self, article_id: i64) -> Result<Vec<Comment>, CommentServiceError> {
        self.article_repo
            .get_by_id(article_id)
            .await
            .context("Failed to look up article")?
            .ok_or(CommentServiceError::ArticleNotFound)?;

        let comments = self
            .comment_repo
            .list_by_article(article_id)
            .await
            .context("Failed to list comments")?;
        Ok(comments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxArticleRepository, SqlxCommentRepository};
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> (CommentService, User, i64) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let user_id = sqlx::query(
            "INSERT INTO users (username, email, password_hash) VALUES ('alice', 'a@x.com', 'h')",
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

        let mut user = User::new("alice".into(), "a@x.com".into(), "h".into());
        user.id = user_id;

        let service = CommentService::new(
            SqlxCommentRepository::boxed(pool.clone()),
            SqlxArticleRepository::boxed(pool.clone()),
        );
        (service, user, article_id)
    }

    #[tokio::test]
    async fn test_create_comment() {
        let (service, user, article_id) = setup().await;

        let comment = service
            .create(&user, article_id, "Nice article".to_string())
            .await
            .expect("Create failed");

        assert_eq!(comment.content, "Nice article");
        assert_eq!(comment.author_id, user.id);
    }

    #[tokio::test]
    async fn test_create_empty_comment_rejected() {
        let (service, user, article_id) = setup().await;

        let result = service.create(&user, article_id, "   ".to_string()).await;

        assert!(matches!(result, Err(CommentServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_create_oversized_comment_rejected() {
        let (service, user, article_id) = setup().await;
        let content = "x".repeat(MAX_COMMENT_LENGTH + 1);

        let result = service.create(&user, article_id, content).await;

        assert!(matches!(result, Err(CommentServiceError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_create_on_missing_article() {
        let (service, user, _article_id) = setup().await;

        let result = service.create(&user, 999, "Hello".to_string()).await;

        assert!(matches!(result, Err(CommentServiceError::ArticleNotFound)));
    }

    #[tokio::test]
    async fn test_list_by_article() {
        let (service, user, article_id) = setup().await;
        service
            .create(&user, article_id, "One".to_string())
            .await
            .expect("Create failed");
        service
            .create(&user, article_id, "Two".to_string())
            .await
            .expect("Create failed");

        let comments = service
            .list_by_article(article_id)
            .await
            .expect("List failed");

        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].content, "One");
    }
}
