//! Topic and subscription endpoints
//!
//! Topics are read-only; the mutable part is the caller's subscription set.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::middleware::{ApiError, AppState, AuthenticatedUser};
use crate::models::Topic;

#[derive(Debug, Serialize)]
pub struct TopicResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<Topic> for TopicResponse {
    fn from(topic: Topic) -> Self {
        Self {
            id: topic.id,
            name: topic.name,
            description: topic.description,
            created_at: topic.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SubscribedResponse {
    pub subscribed: bool,
}

/// GET /api/topics
pub async fn list_topics(
    State(state): State<AppState>,
) -> Result<Json<Vec<TopicResponse>>, ApiError> {
    let topics = state
        .subscription_service
        .list_topics()
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(topics))
}

/// POST /api/topics/{id}/subscribe
pub async fn subscribe(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(topic_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.subscription_service.subscribe(&user, topic_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/topics/{id}/subscribe
pub async fn unsubscribe(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(topic_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state
        .subscription_service
        .unsubscribe(&user, topic_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/topics/{id}/subscribed
pub async fn subscribed(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(topic_id): Path<i64>,
) -> Result<Json<SubscribedResponse>, ApiError> {
    let subscribed = state
        .subscription_service
        .is_subscribed(&user, topic_id)
        .await?;
    Ok(Json(SubscribedResponse { subscribed }))
}

/// GET /api/subscriptions
pub async fn list_subscriptions(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<TopicResponse>>, ApiError> {
    let topics = state
        .subscription_service
        .list_subscriptions(&user)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(Json(topics))
}

/// GET /api/subscriptions/{id}
pub async fn subscription_detail(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(topic_id): Path<i64>,
) -> Result<Json<TopicResponse>, ApiError> {
    let topic = state
        .subscription_service
        .subscription_detail(&user, topic_id)
        .await?;
    Ok(Json(topic.into()))
}
