//! API middleware.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;
use chirp_core::{
    BookmarkService, CommentService, FollowService, LikeService, TweetService, UserService,
};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub tweet_service: TweetService,
    pub like_service: LikeService,
    pub bookmark_service: BookmarkService,
    pub follow_service: FollowService,
    pub comment_service: CommentService,
    /// Cookie checked for an access token before the `Authorization` header.
    pub cookie_name: Arc<str>,
}

/// Authentication middleware.
///
/// Resolves the access token to a user and stores it in the request
/// extensions. Requests without a usable token pass through unchanged and are
/// rejected later by [`crate::extractors::AuthUser`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(token) = access_token(req.headers(), &state.cookie_name) {
        match state.user_service.authenticate_by_token(&token).await {
            Ok(Some(user)) => {
                req.extensions_mut().insert(user);
            }
            Ok(None) => tracing::debug!("Access token subject no longer exists"),
            Err(e) => tracing::debug!(error = %e, "Ignoring access token"),
        }
    }

    next.run(req).await
}

/// The access token from the cookie, else from a bearer `Authorization` header.
fn access_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(cookie_name).filter(|c| !c.value().is_empty()) {
        return Some(cookie.value().to_string());
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}
