//! Tribune server entry point

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tribune::api::{self, AppState};
use tribune::config::Config;
use tribune::db::{create_pool, migrations};
use tribune::db::repositories::{
    SqlxArticleRepository, SqlxCommentRepository, SqlxSubscriptionRepository, SqlxTopicRepository,
    SqlxUserRepository,
};
use tribune::services::{
    ArticleService, CommentService, SubscriptionService, TokenIssuer, UserService,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tribune=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load(Path::new("config.yml")).context("Failed to load configuration")?;

    let pool = create_pool(&config.database)
        .await
        .context("Failed to create database pool")?;
    migrations::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    let token_issuer = Arc::new(TokenIssuer::new(
        &config.auth.jwt_secret,
        config.auth.token_ttl_hours,
    ));

    let user_repo = SqlxUserRepository::boxed(pool.clone());
    let topic_repo = SqlxTopicRepository::boxed(pool.clone());
    let subscription_repo = SqlxSubscriptionRepository::boxed(pool.clone());
    let article_repo = SqlxArticleRepository::boxed(pool.clone());
    let comment_repo = SqlxCommentRepository::boxed(pool.clone());

    let state = AppState {
        user_service: Arc::new(UserService::new(
            user_repo,
            topic_repo.clone(),
            token_issuer.clone(),
        )),
        subscription_service: Arc::new(SubscriptionService::new(
            topic_repo.clone(),
            subscription_repo,
        )),
        article_service: Arc::new(ArticleService::new(article_repo.clone(), topic_repo)),
        comment_service: Arc::new(CommentService::new(comment_repo, article_repo)),
        token_issuer,
    };

    let cors_origin: HeaderValue = config
        .server
        .cors_origin
        .parse()
        .context("Invalid CORS origin")?;
    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let app = api::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
