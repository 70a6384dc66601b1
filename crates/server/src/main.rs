//! Chirp server entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{Json, Router, extract::DefaultBodyLimit, middleware, routing::get};
use chirp_api::{AppState, auth_middleware, router as api_router};
use chirp_common::{Config, JwtCodec, LocalStorage};
use chirp_core::{
    BookmarkService, CommentService, DecorationService, FollowService, LikeService, TweetService,
    UserService,
};
use chirp_db::repositories::{
    BookmarkRepository, CommentRepository, FollowRepository, LikeRepository, TweetRepository,
    UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// # Panics
///
/// Panics if signal handlers cannot be installed.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chirp=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting chirp server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = chirp_db::init(&config.database).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    chirp_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let tweet_repo = TweetRepository::new(Arc::clone(&db));
    let like_repo = LikeRepository::new(Arc::clone(&db));
    let bookmark_repo = BookmarkRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let follow_repo = FollowRepository::new(Arc::clone(&db));

    // Initialize services
    let storage = Arc::new(LocalStorage::from_config(&config.storage));
    let user_service = UserService::new(user_repo.clone(), JwtCodec::from_config(&config.auth));
    let decoration = DecorationService::new(
        user_repo.clone(),
        like_repo.clone(),
        bookmark_repo.clone(),
        comment_repo.clone(),
    );
    let tweet_service = TweetService::new(
        tweet_repo,
        user_service.clone(),
        decoration.clone(),
        storage,
    );
    let like_service = LikeService::new(
        like_repo,
        comment_repo.clone(),
        tweet_service.clone(),
        decoration.clone(),
    );
    let bookmark_service = BookmarkService::new(bookmark_repo, tweet_service.clone());
    let follow_service = FollowService::new(follow_repo, user_repo);
    let comment_service = CommentService::new(comment_repo, tweet_service.clone(), decoration);

    let state = AppState {
        user_service,
        tweet_service,
        like_service,
        bookmark_service,
        follow_service,
        comment_service,
        cookie_name: Arc::from(config.auth.cookie_name.as_str()),
    };

    // Build router
    let body_limit = config.server.body_limit_bytes;
    let mut app = Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api_router());

    // Uploaded images are served locally unless they live behind an external URL
    let files_path = config.storage.base_url.trim_end_matches('/');
    if files_path.starts_with('/') {
        info!(path = %files_path, dir = %config.storage.base_path.display(), "Serving uploaded files");
        app = app.nest_service(files_path, ServeDir::new(&config.storage.base_path));
    }

    let app = app
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
