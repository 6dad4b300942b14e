//! User service
//!
//! Implements registration, login, and profile management:
//! - Registration with username/email uniqueness checks
//! - Login verifying credentials and issuing a session token
//! - Profile read (username, email, subscribed topics)
//! - Profile update with uniqueness checks and atomic persistence
//!
//! Login failures never distinguish "no such user" from "bad password":
//! both surface as `InvalidCredentials`.

use crate::db::repositories::{TopicRepository, UserRepository, UserStoreError};
use crate::models::user::UpdateProfileInput;
use crate::models::{Topic, User};
use crate::services::password::{hash_password, verify_password};
use crate::services::token::TokenIssuer;
use anyhow::Context;
use std::sync::Arc;

/// Error types for user service operations
#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    /// Login credentials are invalid (unknown email or bad password)
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The principal's email has no matching user record
    #[error("User not found")]
    UserNotFound,

    /// Another user already has this username
    #[error("Username is already taken")]
    UsernameTaken,

    /// Another user already has this email
    #[error("Email is already registered")]
    EmailTaken,

    /// Validation error (invalid input)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

impl From<UserStoreError> for UserServiceError {
    fn from(err: UserStoreError) -> Self {
        match err {
            UserStoreError::UsernameTaken => UserServiceError::UsernameTaken,
            UserStoreError::EmailTaken => UserServiceError::EmailTaken,
            UserStoreError::Other(e) => UserServiceError::InternalError(e),
        }
    }
}

/// Input for user registration
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// A user's profile: identity fields plus subscribed topics
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub username: String,
    pub email: String,
    pub subscriptions: Vec<Topic>,
}

/// Result of a profile update
#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    /// The user after the update
    pub user: User,
    /// Whether the email changed (the caller must re-issue the token,
    /// since email is the login identifier)
    pub email_changed: bool,
}

/// User service for registration, authentication and profile management
pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    topic_repo: Arc<dyn TopicRepository>,
    token_issuer: Arc<TokenIssuer>,
}

impl UserService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        topic_repo: Arc<dyn TopicRepository>,
        token_issuer: Arc<TokenIssuer>,
    ) -> Self {
        Self {
            user_repo,
            topic_repo,
            token_issuer,
        }
    }

    /// Register a new user.
    ///
    /// The existence checks are a fast path; concurrent registrations with
    /// the same username or email are resolved by the storage UNIQUE
    /// constraints, translated back into the same domain errors. No
    /// automatic login.
    pub async fn register(&self, input: RegisterInput) -> Result<User, UserServiceError> {
        validate_username(&input.username)?;
        validate_email(&input.email)?;
        validate_password(&input.password)?;

        if self
            .user_repo
            .exists_by_username(&input.username)
            .await
            .context("Failed to check username")?
        {
            return Err(UserServiceError::UsernameTaken);
        }

        if self
            .user_repo
            .exists_by_email(&input.email)
            .await
            .context("Failed to check email")?
        {
            return Err(UserServiceError::EmailTaken);
        }

        let password_hash = hash_password(&input.password).context("Failed to hash password")?;
        let user = User::new(input.username, input.email, password_hash);

        let created = self.user_repo.create(&user).await?;
        tracing::info!(user_id = created.id, "User registered");

        Ok(created)
    }

    /// Authenticate with email and password, returning the user and a
    /// signed session token.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), UserServiceError> {
        let user = self
            .user_repo
            .get_by_email(email)
            .await
            .context("Failed to look up user")?
            .ok_or(UserServiceError::InvalidCredentials)?;

        let password_valid =
            verify_password(password, &user.password_hash).context("Failed to verify password")?;

        if !password_valid {
            return Err(UserServiceError::InvalidCredentials);
        }

        let token = self
            .token_issuer
            .issue(&user.email)
            .context("Failed to issue token")?;

        tracing::info!(user_id = user.id, "User logged in");
        Ok((user, token))
    }

    /// Resolve an authenticated principal's email to a user record.
    pub async fn resolve_principal(&self, email: &str) -> Result<User, UserServiceError> {
        self.user_repo
            .get_by_email(email)
            .await
            .context("Failed to resolve principal")?
            .ok_or(UserServiceError::UserNotFound)
    }

    /// Get a user's profile: username, email and subscribed topics.
    pub async fn get_profile(&self, user: &User) -> Result<UserProfile, UserServiceError> {
        let subscriptions = self
            .topic_repo
            .list_subscribed(user.id)
            .await
            .context("Failed to list subscriptions")?;

        Ok(UserProfile {
            username: user.username.clone(),
            email: user.email.clone(),
            subscriptions,
        })
    }

    /// Update a user's own profile.
    ///
    /// Username and email changes are checked for uniqueness; a non-empty
    /// password is re-hashed. All field changes persist as one atomic
    /// update: a failed uniqueness check mutates nothing.
    pub async fn update_profile(
        &self,
        user: &User,
        input: UpdateProfileInput,
    ) -> Result<ProfileUpdate, UserServiceError> {
        validate_username(&input.username)?;
        validate_email(&input.email)?;

        let mut updated = user.clone();
        let mut email_changed = false;

        if input.username != user.username {
            if self
                .user_repo
                .exists_by_username(&input.username)
                .await
                .context("Failed to check username")?
            {
                return Err(UserServiceError::UsernameTaken);
            }
            updated.username = input.username;
        }

        if input.email != user.email {
            if self
                .user_repo
                .exists_by_email(&input.email)
                .await
                .context("Failed to check email")?
            {
                return Err(UserServiceError::EmailTaken);
            }
            updated.email = input.email;
            email_changed = true;
        }

        if let Some(password) = input.password.filter(|p| !p.is_empty()) {
            validate_password(&password)?;
            updated.password_hash =
                hash_password(&password).context("Failed to hash password")?;
        }

        let user = self.user_repo.update(&updated).await?;
        tracing::info!(user_id = user.id, email_changed, "Profile updated");

        Ok(ProfileUpdate { user, email_changed })
    }
}

fn validate_username(username: &str) -> Result<(), UserServiceError> {
    if username.trim().is_empty() {
        return Err(UserServiceError::ValidationError(
            "Username cannot be empty".to_string(),
        ));
    }
    if username.len() > 50 {
        return Err(UserServiceError::ValidationError(
            "Username is too long".to_string(),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), UserServiceError> {
    if email.trim().is_empty() || !email.contains('@') {
        return Err(UserServiceError::ValidationError(
            "Invalid email address".to_string(),
        ));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), UserServiceError> {
    if password.len() < 8 {
        return Err(UserServiceError::ValidationError(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    Ok(())
}
