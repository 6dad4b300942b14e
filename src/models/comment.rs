//! Comment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum comment length in characters
pub const MAX_COMMENT_LENGTH: usize = 2000;

/// Comment entity, attached to exactly one article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub article_id: i64,
    pub author_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(article_id: i64, author_id: i64, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            article_id,
            author_id,
            content,
            created_at: now,
            updated_at: now,
        }
    }
}
