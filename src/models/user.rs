//! User model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity representing a registered user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Username (unique)
    pub username: String,
    /// Email address (unique, used as the login identifier)
    pub email: String,
    /// Password hash (argon2)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new User.
    ///
    /// Note: The password should already be hashed before calling this.
    /// Use `services::password::hash_password()` to hash the password.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0, // Will be set by the database
            username,
            email,
            password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for updating a user's own profile.
///
/// An empty or absent password means "keep the current one".
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileInput {
    /// New username
    pub username: String,
    /// New email
    pub email: String,
    /// New plaintext password, if changing
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_new() {
        let user = User::new(
            "testuser".to_string(),
            "test@example.com".to_string(),
            "hashed_password".to_string(),
        );

        assert_eq!(user.id, 0);
        assert_eq!(user.username, "testuser");
        assert_eq!(user.email, "test@example.com");
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User::new(
            "testuser".to_string(),
            "test@example.com".to_string(),
            "secret_hash".to_string(),
        );

        let json = serde_json::to_string(&user).expect("Serialization failed");
        assert!(!json.contains("secret_hash"));
    }
}
