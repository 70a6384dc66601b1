//! Follow endpoints.

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use chirp_common::AppResult;
use chirp_core::{FollowState, OwnerDetails, Page, PageRequest};

use crate::{
    extractors::{ApiPath, ApiQuery, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Follow a user, or stop following them.
async fn toggle(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<String>,
) -> AppResult<ApiResponse<FollowState>> {
    let follow = state.follow_service.toggle(&user.id, &user_id).await?;

    let message = if follow.is_following {
        "followed successfully"
    } else {
        "unfollowed successfully"
    };
    Ok(ApiResponse::ok(follow, message))
}

async fn followers(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<PageRequest>,
) -> AppResult<ApiResponse<Page<OwnerDetails>>> {
    let users = state.follow_service.followers(&user.id, page).await?;
    Ok(ApiResponse::ok(users, "followers fetched successfully"))
}

async fn following(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<PageRequest>,
) -> AppResult<ApiResponse<Page<OwnerDetails>>> {
    let users = state.follow_service.following(&user.id, page).await?;
    Ok(ApiResponse::ok(users, "following fetched successfully"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/followers", get(followers))
        .route("/following", get(following))
        .route("/{user_id}", post(toggle))
}
