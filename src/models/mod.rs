//! Data models
//!
//! Entity structs for the Tribune platform. Relations are expressed as
//! foreign-key id fields rather than object references; repositories
//! resolve them on demand.

pub mod article;
pub mod comment;
pub mod topic;
pub mod user;

pub use article::Article;
pub use comment::Comment;
pub use topic::Topic;
pub use user::User;
