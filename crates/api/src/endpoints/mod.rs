//! API endpoints.

mod bookmarks;
mod comments;
mod follows;
mod likes;
mod tweets;

use axum::Router;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/tweets", tweets::router())
        .nest("/likes", likes::router())
        .nest("/bookmarks", bookmarks::router())
        .nest("/follows", follows::router())
        .nest("/comments", comments::router())
}
