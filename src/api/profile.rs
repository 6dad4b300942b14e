//! Profile endpoints
//!
//! The profile is the caller's own record plus their subscribed topics.
//! A profile update that changes the email re-issues the session token,
//! since the email is the token subject.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::middleware::{ApiError, AppState, AuthenticatedUser};
use super::topics::TopicResponse;
use crate::models::user::UpdateProfileInput;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub username: String,
    pub email: String,
    pub subscriptions: Vec<TopicResponse>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: String,
    pub email: String,
    /// Empty or absent means "keep the current password"
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateProfileResponse {
    pub username: String,
    pub email: String,
    pub email_changed: bool,
    /// Fresh token, present only when the email changed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// GET /api/user/profile
pub async fn get_profile(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = state.user_service.get_profile(&user).await?;

    Ok(Json(ProfileResponse {
        username: profile.username,
        email: profile.email,
        subscriptions: profile.subscriptions.into_iter().map(Into::into).collect(),
    }))
}

/// PUT /api/user/profile
pub async fn update_profile(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UpdateProfileResponse>, ApiError> {
    let update = state
        .user_service
        .update_profile(
            &user,
            UpdateProfileInput {
                username: payload.username,
                email: payload.email,
                password: payload.password,
            },
        )
        .await?;

    let token = if update.email_changed {
        let token = state
            .token_issuer
            .issue(&update.user.email)
            .map_err(|e| {
                tracing::error!("Failed to re-issue token: {:#}", e);
                ApiError::internal_error("Internal server error")
            })?;
        Some(token)
    } else {
        None
    };

    Ok(Json(UpdateProfileResponse {
        username: update.user.username,
        email: update.user.email,
        email_changed: update.email_changed,
        token,
    }))
}
