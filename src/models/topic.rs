//! Topic model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Topic entity: a subscribable subject category that groups articles.
///
/// Topics are read-only from the service layer's perspective; they are
/// seeded by migrations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}
