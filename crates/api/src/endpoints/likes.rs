//! Like endpoints.

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use chirp_common::AppResult;
use chirp_core::{CommentView, Page, PageRequest, TweetView};

use crate::{
    extractors::{ApiPath, ApiQuery, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Like or unlike a tweet.
async fn toggle_tweet(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiPath(tweet_id): ApiPath<String>,
) -> AppResult<ApiResponse<TweetView>> {
    let (toggle, tweet) = state
        .like_service
        .toggle_tweet_like(&user.id, &tweet_id)
        .await?;

    let message = if toggle.is_active() {
        "tweet liked successfully"
    } else {
        "tweet disliked successfully"
    };
    Ok(ApiResponse::ok(tweet, message))
}

/// Like or unlike a comment.
async fn toggle_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiPath(comment_id): ApiPath<String>,
) -> AppResult<ApiResponse<CommentView>> {
    let (toggle, comment) = state
        .like_service
        .toggle_comment_like(&user.id, &comment_id)
        .await?;

    let message = if toggle.is_active() {
        "liked successfully"
    } else {
        "comment disliked successfully"
    };
    Ok(ApiResponse::ok(comment, message))
}

async fn liked_tweets(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<PageRequest>,
) -> AppResult<ApiResponse<Page<TweetView>>> {
    let tweets = state.like_service.liked_tweets(&user.id, page).await?;
    Ok(ApiResponse::ok(tweets, "liked tweets fetched successfully"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tweet/{tweet_id}", post(toggle_tweet))
        .route("/comment/{comment_id}", post(toggle_comment))
        .route("/tweets", get(liked_tweets))
}
