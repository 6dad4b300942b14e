//! Comment endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::Comment;

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: i64,
    pub article_id: i64,
    pub author_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            article_id: comment.article_id,
            author_id: comment.author_id,
            content: comment.content,
            created_at: comment.created_at,
        }
    }
}

/// GET /api/articles/{id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    Path(article_id): Path<i64>,
) -> Result<Json<Vec<CommentResponse>>, ApiError> {
    let comments = state
        .comment_service
        .list_by_article(article_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(comments))
}

/// POST /api/articles/{id}/comments
pub async fn create_comment(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(article_id): Path<i64>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiError> {
    let comment = state
        .comment_service
        .create(&user, article_id, payload.content)
        .await?;

    Ok((StatusCode::CREATED, Json(comment.into())))
}
