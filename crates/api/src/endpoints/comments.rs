//! Comment endpoints.

use axum::{Router, extract::State, routing::get};
use chirp_common::AppResult;
use chirp_core::{CommentView, Page, PageRequest};

use crate::{
    extractors::{ApiPath, ApiQuery, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// A tweet's comments, newest first.
async fn list_for_tweet(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiPath(tweet_id): ApiPath<String>,
    ApiQuery(page): ApiQuery<PageRequest>,
) -> AppResult<ApiResponse<Page<CommentView>>> {
    let comments = state
        .comment_service
        .list_for_tweet(&tweet_id, &user.id, page)
        .await?;
    Ok(ApiResponse::ok(comments, "comments fetched successfully"))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/tweet/{tweet_id}", get(list_for_tweet))
}
