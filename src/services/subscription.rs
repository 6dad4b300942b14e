//! Subscription service
//!
//! Subscribe/unsubscribe users to/from topics, list a user's subscriptions
//! and answer membership queries. Subscribing is idempotent; unsubscribing
//! a pair that does not exist fails with `NotSubscribed`.

use crate::db::repositories::{SubscriptionRepository, TopicRepository};
use crate::models::{Topic, User};
use anyhow::Context;
use std::sync::Arc;

/// Error types for subscription operations
#[derive(Debug, thiserror::Error)]
pub enum SubscriptionServiceError {
    /// The topic does not exist
    #[error("Topic not found")]
    TopicNotFound,

    /// The user is not subscribed to the topic
    #[error("Not subscribed to this topic")]
    NotSubscribed,

    /// No subscription found for the requested topic
    #[error("Subscription not found")]
    SubscriptionNotFound,

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Subscription service
pub struct SubscriptionService {
    topic_repo: Arc<dyn TopicRepository>,
    subscription_repo: Arc<dyn SubscriptionRepository>,
}

impl SubscriptionService {
    pub fn new(
        topic_repo: Arc<dyn TopicRepository>,
        subscription_repo: Arc<dyn SubscriptionRepository>,
    ) -> Self {
        Self {
            topic_repo,
            subscription_repo,
        }
    }

    /// List every topic, in stable order.
    pub async fn list_topics(&self) -> Result<Vec<Topic>, SubscriptionServiceError> {
        let topics = self
            .topic_repo
            .list()
            .await
            .context("Failed to list topics")?;
        Ok(topics)
    }

    /// Subscribe a user to a topic.
    ///
    /// Idempotent: subscribing twice is a no-op. The membership check is
    /// only a fast path; the UNIQUE constraint on (user_id, topic_id)
    /// settles concurrent inserts, and a lost race is still a success.
    pub async fn subscribe(&self, user: &User, topic_id: i64) -> Result<(), SubscriptionServiceError> {
        self.topic_repo
            .get_by_id(topic_id)
            .await
            .context("Failed to look up topic")?
            .ok_or(SubscriptionServiceError::TopicNotFound)?;

        if self
            .subscription_repo
            .exists(user.id, topic_id)
            .await
            .context("Failed to check subscription")?
        {
            return Ok(());
        }

        let inserted = self
            .subscription_repo
            .insert(user.id, topic_id)
            .await
            .context("Failed to insert subscription")?;

        if inserted {
            tracing::info!(user_id = user.id, topic_id, "Subscribed to topic");
        }
        Ok(())
    }

    /// Unsubscribe a user from a topic.
    ///
    /// A direct deletion with no entity-level hooks; fails with
    /// `NotSubscribed` when no row was removed.
    pub async fn unsubscribe(&self, user: &User, topic_id: i64) -> Result<(), SubscriptionServiceError> {
        let rows_affected = self
            .subscription_repo
            .delete(user.id, topic_id)
            .await
            .context("Failed to delete subscription")?;

        if rows_affected == 0 {
            return Err(SubscriptionServiceError::NotSubscribed);
        }

        tracing::info!(user_id = user.id, topic_id, "Unsubscribed from topic");
        Ok(())
    }

    /// List the topics a user is subscribed to, in stable order.
    pub async fn list_subscriptions(&self, user: &User) -> Result<Vec<Topic>, SubscriptionServiceError> {
        let topics = self
            .topic_repo
            .list_subscribed(user.id)
            .await
            .context("Failed to list subscriptions")?;
        Ok(topics)
    }

    /// Get one subscribed topic; fails unless the user's subscription set
    /// contains it.
    pub async fn subscription_detail(
        &self,
        user: &User,
        topic_id: i64,
    ) -> Result<Topic, SubscriptionServiceError> {
        if !self
            .subscription_repo
            .exists(user.id, topic_id)
            .await
            .context("Failed to check subscription")?
        {
            return Err(SubscriptionServiceError::SubscriptionNotFound);
        }

        self.topic_repo
            .get_by_id(topic_id)
            .await
            .context("Failed to look up topic")?
            .ok_or(SubscriptionServiceError::SubscriptionNotFound)
    }

    /// Pure membership check, no mutation.
    pub async fn is_subscribed(&self, user: &User, topic_id: i64) -> Result<bool, SubscriptionServiceError> {
        let subscribed = self
            .subscription_repo
            .exists(user.id, topic_id)
            .await
            .context("Failed to check subscription")?;
        Ok(subscribed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxSubscriptionRepository, SqlxTopicRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::models::User;

    async fn setup() -> (sqlx::SqlitePool, SubscriptionService, User) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let user_id = sqlx::query(
            "INSERT INTO users (username, email, password_hash) VALUES ('alice', 'a@x.com', 'h')",
        )
        .execute(&pool)
        .await
        .expect("Failed to insert user")
        .last_insert_rowid();

        let mut user = User::new("alice".into(), "a@x.com".into(), "h".into());
        user.id = user_id;

        let service = SubscriptionService::new(
            SqlxTopicRepository::boxed(pool.clone()),
            SqlxSubscriptionRepository::boxed(pool.clone()),
        );
        (pool, service, user)
    }

    #[tokio::test]
    async fn test_list_topics_seeded() {
        let (_pool, service, _user) = setup().await;

        let topics = service.list_topics().await.expect("List failed");

        assert!(topics.len() >= 4);
        let mut names: Vec<_> = topics.iter().map(|t| t.name.clone()).collect();
        let sorted = {
            let mut s = names.clone();
            s.sort();
            s
        };
        assert_eq!(names, sorted);
        names.dedup();
        assert_eq!(names.len(), topics.len());
    }

    #[tokio::test]
    async fn test_subscribe_then_is_subscribed() {
        let (_pool, service, user) = setup().await;

        assert!(!service.is_subscribed(&user, 1).await.unwrap());
        service.subscribe(&user, 1).await.expect("Subscribe failed");
        assert!(service.is_subscribed(&user, 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_subscribe_twice_is_idempotent() {
        let (pool, service, user) = setup().await;

        service.subscribe(&user, 1).await.expect("Subscribe failed");
        service.subscribe(&user, 1).await.expect("Second subscribe must not error");

        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM subscriptions WHERE user_id = ? AND topic_id = 1",
        )
        .bind(user.id)
        .fetch_one(&pool)
        .await
        .expect("Count failed");
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_subscribe_unknown_topic() {
        let (_pool, service, user) = setup().await;

        let result = service.subscribe(&user, 999).await;

        assert!(matches!(result, Err(SubscriptionServiceError::TopicNotFound)));
    }

    #[tokio::test]
    async fn test_unsubscribe() {
        let (_pool, service, user) = setup().await;
        service.subscribe(&user, 1).await.expect("Subscribe failed");

        service.unsubscribe(&user, 1).await.expect("Unsubscribe failed");

        assert!(!service.is_subscribed(&user, 1).await.unwrap());
    }

    #[tokio::test]
    async fn test_unsubscribe_when_not_subscribed() {
        let (pool, service, user) = setup().await;

        let result = service.unsubscribe(&user, 1).await;

        assert!(matches!(result, Err(SubscriptionServiceError::NotSubscribed)));

        // Storage unchanged
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subscriptions")
            .fetch_one(&pool)
            .await
            .expect("Count failed");
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_list_subscriptions() {
        let (_pool, service, user) = setup().await;
        service.subscribe(&user, 1).await.expect("Subscribe failed");
        service.subscribe(&user, 2).await.expect("Subscribe failed");

        let topics = service.list_subscriptions(&user).await.expect("List failed");

        assert_eq!(topics.len(), 2);
    }

    #[tokio::test]
    async fn test_subscription_detail() {
        let (_pool, service, user) = setup().await;
        service.subscribe(&user, 1).await.expect("Subscribe failed");

        let topic = service
            .subscription_detail(&user, 1)
            .await
            .expect("Detail failed");
        assert_eq!(topic.id, 1);
    }

    #[tokio::test]
    async fn test_subscription_detail_not_subscribed() {
        let (_pool, service, user) = setup().await;

        let result = service.subscription_detail(&user, 1).await;

        assert!(matches!(
            result,
            Err(SubscriptionServiceError::SubscriptionNotFound)
        ));
    }
}
