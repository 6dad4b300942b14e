//! Article model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Article entity, authored by a user and belonging to exactly one topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub topic_id: i64,
    pub author_id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    pub fn new(topic_id: i64, author_id: i64, title: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            topic_id,
            author_id,
            title,
            content,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Input for creating an article
#[derive(Debug, Clone, Deserialize)]
pub struct CreateArticleInput {
    pub topic_id: i64,
    pub title: String,
    pub content: String,
}
