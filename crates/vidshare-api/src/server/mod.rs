//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;
use vidshare_cache::{
    Publisher, RedisHealthProbe, RedisNotifier, RedisPool, RedisSessionRevocations,
};
use vidshare_common::{AppConfig, AppError, JwtService};
use vidshare_core::SnowflakeGenerator;
use vidshare_db::{
    create_pool, run_migrations, PgCommentRepository, PgHealthProbe, PgPlaylistRepository,
    PgPresenceStore, PgProfileRepository, PgRatingStore, PgVideoRepository,
};
use vidshare_service::ServiceContextBuilder;

use crate::middleware::{apply_health_middleware, apply_middleware};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let config = state.config();
    let api = apply_middleware(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    );

    api.merge(apply_health_middleware(health_routes()))
        .with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    info!("Connecting to PostgreSQL...");
    let db_config = vidshare_db::DatabaseConfig::from(&config.database);
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    run_migrations(&pool)
        .await
        .map_err(|e| AppError::Database(format!("Migration failed: {e}")))?;
    info!("PostgreSQL connection established");

    info!("Connecting to Redis...");
    let redis_pool =
        RedisPool::from_config(&config.redis).map_err(|e| AppError::Cache(e.to_string()))?;
    info!("Redis pool created");

    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
    ));
    let snowflake_generator = Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id));

    let service_context = ServiceContextBuilder::new()
        .video_repo(Arc::new(PgVideoRepository::new(pool.clone())))
        .profile_repo(Arc::new(PgProfileRepository::new(pool.clone())))
        .comment_repo(Arc::new(PgCommentRepository::new(pool.clone())))
        .playlist_repo(Arc::new(PgPlaylistRepository::new(pool.clone())))
        .video_ratings(Arc::new(PgRatingStore::videos(pool.clone())))
        .comment_ratings(Arc::new(PgRatingStore::comments(pool.clone())))
        .subscriptions(Arc::new(PgPresenceStore::subscriptions(pool.clone())))
        .watch_later(Arc::new(PgPresenceStore::watch_later(pool.clone())))
        .notifier(Arc::new(RedisNotifier::new(Publisher::new(
            redis_pool.clone(),
        ))))
        .revocations(Arc::new(RedisSessionRevocations::new(redis_pool.clone())))
        .probe(Arc::new(PgHealthProbe::new(pool)))
        .probe(Arc::new(RedisHealthProbe::new(redis_pool)))
        .reconcile_timeout(config.engagement.reconcile_timeout())
        .jwt_service(jwt_service)
        .snowflake_generator(snowflake_generator)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address: {e}")))?;

    let state = create_app_state(config).await?;
    let app = create_app(state);

    run_server(app, addr).await
}
