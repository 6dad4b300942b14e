//! Article service
//!
//! Creating and reading articles. The personal feed aggregates articles
//! from every topic the user is subscribed to, newest first.

use crate::db::repositories::{ArticleRepository, TopicRepository};
use crate::models::article::CreateArticleInput;
use crate::models::{Article, User};
use anyhow::Context;
use std::sync::Arc;

/// Error types for article operations
#[derive(Debug, thiserror::Error)]
pub enum ArticleServiceError {
    /// The topic does not exist
    #[error("Topic not found")]
    TopicNotFound,

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

/// Article service
pub struct ArticleService {
    article_repo: Arc<dyn ArticleRepository>,
    topic_repo: Arc<dyn TopicRepository>,
}

impl ArticleService {
    pub fn new(
        article_repo: Arc<dyn ArticleRepository>,
        topic_repo: Arc<dyn TopicRepository>,
    ) -> Self {
        Self {
            article_repo,
            topic_repo,
        }
    }

    /// Create an article authored by the given user.
    pub async fn create(
        &self,
        author: &User,
        input: CreateArticleInput,
    ) -> Result<Article, ArticleServiceError> {
        if input.title.trim().is_empty() {
            return Err(ArticleServiceError::ValidationError(
                "Title cannot be empty".to_string(),
            ));
        }
        if input.content.trim().is_empty() {
            return Err(ArticleServiceError::ValidationError(
                "Content cannot be empty".to_string(),
            ));
        }

        self.topic_repo
            .get_by_id(input.topic_id)
            .await
            .context("Failed to look up topic")?
            .ok_or(ArticleServiceError::TopicNotFound)?;

        let article = Article::new(input.topic_id, author.id, input.title, input.content);
        let created = self
            .article_repo
            .create(&article)
            .await
            .context("Failed to create article")?;

        tracing::info!(article_id = created.id, author_id = author.id, "Article created");
        Ok(created)
    }

    /// Get an article by id.
    pub async fn get(&self, id: i64) -> Result<Article, ArticleServiceError> {
        self.article_repo
            .get_by_id(id)
            .await
            .context("Failed to get article")?
            .ok_or(ArticleServiceError::ArticleNotFound)
    }

    /// List a topic's articles, newest first.
    pub async fn list_by_topic(&self, topic_id: i64) -> Result<Vec<Article>, ArticleServiceError> {
        self.topic_repo
            .get_by_id(topic_id)
            .await
            .context("Failed to look up topic")?
            .ok_or(ArticleServiceError::TopicNotFound)?;

        let articles = self
            .article_repo
            .list_by_topic(topic_id)
            .await
            .context("Failed to list articles")?;
        Ok(articles)
    }

    /// The user's feed: articles from all subscribed topics, newest first.
    pub async fn feed(&self, user: &User) -> Result<Vec<Article>, ArticleServiceError> {
        let articles = self
            .article_repo
            .list_feed(user.id)
            .await
            .context("Failed to list feed")?;
        Ok(articles)
    }
}
