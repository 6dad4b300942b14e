//! Article endpoints
//!
//! The bare collection route is the caller's personal feed: articles from
//! every topic they are subscribed to, newest first.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::article::CreateArticleInput;
use crate::models::Article;

#[derive(Debug, Deserialize)]
pub struct CreateArticleRequest {
    pub topic_id: i64,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ArticleResponse {
    pub id: i64,
    pub topic_id: i64,
    pub author_id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Article> for ArticleResponse {
    fn from(article: Article) -> Self {
        Self {
            id: article.id,
            topic_id: article.topic_id,
            author_id: article.author_id,
            title: article.title,
            content: article.content,
            created_at: article.created_at,
            updated_at: article.updated_at,
        }
    }
}

/// GET /api/articles
pub async fn feed(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<ArticleResponse>>, ApiError> {
    let articles = state
        .article_service
        .feed(&user)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(articles))
}

/// POST /api/articles
pub async fn create_article(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateArticleRequest>,
) -> Result<(StatusCode, Json<ArticleResponse>), ApiError> {
    let article = state
        .article_service
        .create(
            &user,
            CreateArticleInput {
                topic_id: payload.topic_id,
                title: payload.title,
                content: payload.content,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(article.into())))
}

/// GET /api/articles/{id}
pub async fn get_article(
    State(state): State<AppState>,
    Path(article_id): Path<i64>,
) -> Result<Json<ArticleResponse>, ApiError> {
    let article = state.article_service.get(article_id).await?;
    Ok(Json(article.into()))
}

/// GET /api/topics/{id}/articles
pub async fn list_topic_articles(
    State(state): State<AppState>,
    Path(topic_id): Path<i64>,
) -> Result<Json<Vec<ArticleResponse>>, ApiError> {
    let articles = state
        .article_service
        .list_by_topic(topic_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(articles))
}
