//! Repository layer
//!
//! Trait-based data access for each entity. Handlers and services depend on
//! the traits (`Arc<dyn …>`), so storage can be swapped or mocked in tests.

pub mod article;
pub mod comment;
pub mod subscription;
pub mod topic;
pub mod user;

pub use article::{ArticleRepository, SqlxArticleRepository};
pub use comment::{CommentRepository, SqlxCommentRepository};
pub use subscription::{SqlxSubscriptionRepository, SubscriptionRepository};
pub use topic::{SqlxTopicRepository, TopicRepository};
pub use user::{SqlxUserRepository, UserRepository, UserStoreError};

/// Extract the `table.column` name from a SQLite UNIQUE violation, if the
/// error is one.
///
/// SQLite reports violations as `UNIQUE constraint failed: users.email`;
/// callers use the column to decide which domain error to surface instead
/// of leaking a raw storage error.
pub(crate) fn unique_violation_column(err: &sqlx::Error) -> Option<String> {
    if let sqlx::Error::Database(db_err) = err {
        if db_err.is_unique_violation() {
            let message = db_err.message();
            return message
                .rsplit("UNIQUE constraint failed: ")
                .next()
                .map(|s| s.split(',').next().unwrap_or(s).trim().to_string());
        }
    }
    None
}
