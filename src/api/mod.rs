//! HTTP API
//!
//! Route table, nested under `/api`. Everything except registration and
//! login sits behind the bearer-token middleware.

pub mod articles;
pub mod auth;
pub mod comments;
pub mod middleware;
pub mod profile;
pub mod topics;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

pub use middleware::{ApiError, AppState, AuthenticatedUser};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    let protected = Router::new()
        .route("/auth/me", get(auth::me))
        .route(
            "/user/profile",
            get(profile::get_profile).put(profile::update_profile),
        )
        .route("/topics", get(topics::list_topics))
        .route("/topics/{id}/articles", get(articles::list_topic_articles))
        .route(
            "/topics/{id}/subscribe",
            post(topics::subscribe).delete(topics::unsubscribe),
        )
        .route("/topics/{id}/subscribed", get(topics::subscribed))
        .route("/subscriptions", get(topics::list_subscriptions))
        .route("/subscriptions/{id}", get(topics::subscription_detail))
        .route("/articles", get(articles::feed).post(articles::create_article))
        .route("/articles/{id}", get(articles::get_article))
        .route(
            "/articles/{id}/comments",
            get(comments::list_comments).post(comments::create_comment),
        )
        .layer(from_fn_with_state(state.clone(), middleware::require_auth));

    Router::new()
        .nest("/api", public.merge(protected))
        .with_state(state)
}
