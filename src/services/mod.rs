//! Service layer
//!
//! Business logic for the Tribune platform. Services take the acting user
//! as an explicit argument (resolved by the API layer) and return typed
//! domain errors that the API layer maps to status codes.

pub mod article;
pub mod comment;
pub mod password;
pub mod subscription;
pub mod token;
pub mod user;

pub use article::ArticleService;
pub use comment::CommentService;
pub use subscription::SubscriptionService;
pub use token::TokenIssuer;
pub use user::UserService;
