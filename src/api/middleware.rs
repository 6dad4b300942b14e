//! API middleware
//!
//! Contains:
//! - `AppState` with the shared services
//! - `ApiError`, the JSON error envelope returned by every endpoint
//! - Bearer-token authentication middleware and the `AuthenticatedUser`
//!   extractor
//!
//! The middleware resolves the token's subject to a full `User` once per
//! request; handlers receive it explicitly and services never consult
//! ambient state.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::models::User;
use crate::services::article::ArticleServiceError;
use crate::services::comment::CommentServiceError;
use crate::services::subscription::SubscriptionServiceError;
use crate::services::user::UserServiceError;
use crate::services::{ArticleService, CommentService, SubscriptionService, TokenIssuer, UserService};

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub subscription_service: Arc<SubscriptionService>,
    pub article_service: Arc<ArticleService>,
    pub comment_service: Arc<CommentService>,
    pub token_issuer: Arc<TokenIssuer>,
}

/// Authenticated user extracted from the request
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

/// Error response for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("UNAUTHORIZED", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new("CONFLICT", message)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.error.code.as_str() {
            "UNAUTHORIZED" => StatusCode::UNAUTHORIZED,
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            "CONFLICT" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}

impl From<UserServiceError> for ApiError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::InvalidCredentials => ApiError::unauthorized(err.to_string()),
            UserServiceError::UserNotFound => ApiError::unauthorized(err.to_string()),
            UserServiceError::UsernameTaken | UserServiceError::EmailTaken => {
                ApiError::conflict(err.to_string())
            }
            UserServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            UserServiceError::InternalError(e) => {
                tracing::error!("User service error: {:#}", e);
                ApiError::internal_error("Internal server error")
            }
        }
    }
}

impl From<SubscriptionServiceError> for ApiError {
    fn from(err: SubscriptionServiceError) -> Self {
        match err {
            SubscriptionServiceError::TopicNotFound
            | SubscriptionServiceError::NotSubscribed
            | SubscriptionServiceError::SubscriptionNotFound => ApiError::not_found(err.to_string()),
            SubscriptionServiceError::InternalError(e) => {
                tracing::error!("Subscription service error: {:#}", e);
                ApiError::internal_error("Internal server error")
            }
        }
    }
}

impl From<ArticleServiceError> for ApiError {
    fn from(err: ArticleServiceError) -> Self {
        match err {
            ArticleServiceError::TopicNotFound | ArticleServiceError::ArticleNotFound => {
                ApiError::not_found(err.to_string())
            }
            ArticleServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            ArticleServiceError::InternalError(e) => {
                tracing::error!("Article service error: {:#}", e);
                ApiError::internal_error("Internal server error")
            }
        }
    }
}

impl From<CommentServiceError> for ApiError {
    fn from(err: CommentServiceError) -> Self {
        match err {
            CommentServiceError::ArticleNotFound => ApiError::not_found(err.to_string()),
            CommentServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            CommentServiceError::InternalError(e) => {
                tracing::error!("Comment service error: {:#}", e);
                ApiError::internal_error("Internal server error")
            }
        }
    }
}

/// Extract the bearer token from the Authorization header
fn extract_bearer_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|token| token.to_string())
}

/// Authentication middleware
///
/// Verifies the bearer token and resolves its subject (email) to a user
/// record, which is inserted into the request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&request)
        .ok_or_else(|| ApiError::unauthorized("Missing authentication token"))?;

    let claims = state
        .token_issuer
        .verify(&token)
        .map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;

    // The token may outlive the account's email; treat a stale subject as
    // an authentication failure, not an internal error
    let user = state.user_service.resolve_principal(&claims.sub).await?;

    request.extensions_mut().insert(AuthenticatedUser(user));
    Ok(next.run(request).await)
}
