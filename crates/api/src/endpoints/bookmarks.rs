//! Bookmark endpoints.

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use chirp_common::AppResult;
use chirp_core::{Page, PageRequest, TweetView};

use crate::{
    extractors::{ApiPath, ApiQuery, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Bookmark a tweet, or remove the bookmark.
async fn toggle(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiPath(tweet_id): ApiPath<String>,
) -> AppResult<ApiResponse<TweetView>> {
    let (toggle, tweet) = state.bookmark_service.toggle(&user.id, &tweet_id).await?;

    let message = if toggle.is_active() {
        "bookmarked"
    } else {
        "unbookmarked"
    };
    Ok(ApiResponse::ok(tweet, message))
}

async fn list(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<PageRequest>,
) -> AppResult<ApiResponse<Page<TweetView>>> {
    let tweets = state.bookmark_service.list(&user.id, page).await?;
    Ok(ApiResponse::ok(tweets, "bookmarked tweets fetched successfully"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/{tweet_id}", post(toggle))
}
