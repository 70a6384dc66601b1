//! API integration tests.
//!
//! These tests drive the router through the auth middleware against a mock
//! database. One connection backs every repository, so mocked results are
//! consumed in the order the request issues its queries.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::redundant_clone)]

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    middleware,
};
use chirp_api::{AppState, auth_middleware, router as api_router};
use chirp_common::{IdGenerator, JwtCodec, LocalStorage};
use chirp_core::{
    BookmarkService, CommentService, DecorationService, FollowService, LikeService, TweetService,
    UserService,
};
use chirp_db::entities::{bookmark, like, tweet, user};
use chirp_db::repositories::{
    BookmarkRepository, CommentRepository, FollowRepository, LikeRepository, TweetRepository,
    UserRepository,
};
use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
use serde_json::Value as Json;
use tower::ServiceExt;

const SECRET: &str = "integration-secret";

fn id() -> String {
    IdGenerator::new().generate()
}

fn test_user(id: &str, username: &str) -> user::Model {
    user::Model {
        id: id.to_string(),
        username: username.to_string(),
        username_lower: username.to_lowercase(),
        avatar_url: None,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

fn test_tweet(id: &str, owner_id: &str) -> tweet::Model {
    tweet::Model {
        id: id.to_string(),
        content: "hello".to_string(),
        images: serde_json::json!([]),
        is_anonymous: false,
        owner_id: owner_id.to_string(),
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

fn count_row(target_id: &str, count: i64) -> BTreeMap<&'static str, Value> {
    maplit::btreemap! {
        "target_id" => Value::from(target_id),
        "count" => Value::BigInt(Some(count)),
    }
}

fn token_for(user_id: &str) -> String {
    JwtCodec::new(SECRET, 3600).issue(user_id).unwrap()
}

/// Build the app the way the server mounts it, over one mock connection.
fn app(db: MockDatabase) -> Router {
    let db = Arc::new(db.into_connection());

    let user_repo = UserRepository::new(Arc::clone(&db));
    let tweet_repo = TweetRepository::new(Arc::clone(&db));
    let like_repo = LikeRepository::new(Arc::clone(&db));
    let bookmark_repo = BookmarkRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let follow_repo = FollowRepository::new(Arc::clone(&db));

    let user_service = UserService::new(user_repo.clone(), JwtCodec::new(SECRET, 3600));
    let decoration = DecorationService::new(
        user_repo.clone(),
        like_repo.clone(),
        bookmark_repo.clone(),
        comment_repo.clone(),
    );
    let storage = Arc::new(LocalStorage::new(
        std::env::temp_dir().join("chirp-api-tests"),
        "/files".to_string(),
    ));
    let tweet_service = TweetService::new(
        tweet_repo,
        user_service.clone(),
        decoration.clone(),
        storage,
    );

    let state = AppState {
        user_service,
        like_service: LikeService::new(
            like_repo,
            comment_repo.clone(),
            tweet_service.clone(),
            decoration.clone(),
        ),
        bookmark_service: BookmarkService::new(bookmark_repo, tweet_service.clone()),
        follow_service: FollowService::new(follow_repo, user_repo),
        comment_service: CommentService::new(comment_repo, tweet_service.clone(), decoration),
        tweet_service,
        cookie_name: Arc::from("accessToken"),
    };

    api_router()
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

fn empty_db() -> MockDatabase {
    MockDatabase::new(DatabaseBackend::Postgres)
}

/// Mock whose first result authenticates `viewer`.
fn db_as(viewer: &user::Model) -> MockDatabase {
    empty_db().append_query_results([[viewer.clone()]])
}

fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Json {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let response = app(empty_db())
        .oneshot(Request::builder().uri("/tweets/feed").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["statusCode"], 401);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "unauthorized request");
    assert_eq!(body["errors"], serde_json::json!([]));
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_unauthorized() {
    let token = JwtCodec::new("other-secret", 3600).issue(&id()).unwrap();

    let response = app(empty_db())
        .oneshot(get("/bookmarks", &token))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_deleted_user_is_unauthorized() {
    let db = empty_db().append_query_results([Vec::<user::Model>::new()]);

    let response = app(db).oneshot(get("/tweets/me", &token_for(&id()))).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cookie_token_authenticates() {
    let viewer = test_user(&id(), "alice");
    let db = db_as(&viewer)
        .append_query_results([[maplit::btreemap! {
            "num_items" => Value::BigInt(Some(0)),
        }]])
        .append_query_results([Vec::<tweet::Model>::new()]);

    let request = Request::builder()
        .uri("/bookmarks")
        .header(header::COOKIE, format!("accessToken={}", token_for(&viewer.id)))
        .body(Body::empty())
        .unwrap();
    let response = app(db).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "bookmarked tweets fetched successfully");
    assert_eq!(body["data"]["totalTweets"], 0);
}

#[tokio::test]
async fn test_empty_feed_is_success() {
    let viewer = test_user(&id(), "alice");
    let db = db_as(&viewer)
        .append_query_results([[maplit::btreemap! {
            "num_items" => Value::BigInt(Some(0)),
        }]])
        .append_query_results([Vec::<tweet::Model>::new()]);

    let response = app(db)
        .oneshot(get("/tweets/feed?page=1&limit=20", &token_for(&viewer.id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["statusCode"], 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "tweets fetched successfully");
    assert_eq!(body["data"]["tweets"], serde_json::json!([]));
    assert_eq!(body["data"]["totalTweets"], 0);
    assert_eq!(body["data"]["totalPages"], 1);
    assert_eq!(body["data"]["hasNextPage"], false);
}

#[tokio::test]
async fn test_malformed_tweet_id_is_unprocessable() {
    let viewer = test_user(&id(), "alice");

    let response = app(db_as(&viewer))
        .oneshot(get("/tweets/not-an-id", &token_for(&viewer.id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["statusCode"], 422);
    assert_eq!(body["message"], "invalid tweetId");
}

#[tokio::test]
async fn test_malformed_query_is_bad_request() {
    let viewer = test_user(&id(), "alice");

    let response = app(db_as(&viewer))
        .oneshot(get("/tweets/feed?page=abc", &token_for(&viewer.id)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let viewer = test_user(&id(), "alice");

    let request = Request::builder()
        .method("PATCH")
        .uri(format!("/tweets/{}", id()))
        .header(header::AUTHORIZATION, format!("Bearer {}", token_for(&viewer.id)))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app(db_as(&viewer)).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["statusCode"], 400);
}

#[tokio::test]
async fn test_update_by_non_owner_is_forbidden() {
    let viewer = test_user(&id(), "mallory");
    let tweet = test_tweet(&id(), &id());
    let db = db_as(&viewer).append_query_results([[tweet.clone()]]);

    let request = Request::builder()
        .method("PATCH")
        .uri(format!("/tweets/{}", tweet.id))
        .header(header::AUTHORIZATION, format!("Bearer {}", token_for(&viewer.id)))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"content":"edited"}"#))
        .unwrap();
    let response = app(db).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["message"], "unauthorized access");
}

#[tokio::test]
async fn test_toggle_anonymous_reports_new_state() {
    let viewer = test_user(&id(), "alice");
    let tweet = test_tweet(&id(), &viewer.id);
    let mut hidden = tweet.clone();
    hidden.is_anonymous = true;

    let db = db_as(&viewer)
        .append_query_results([[tweet.clone()]])
        .append_query_results([[hidden]]);

    let request = Request::builder()
        .method("PATCH")
        .uri(format!("/tweets/{}/anonymous", tweet.id))
        .header(header::AUTHORIZATION, format!("Bearer {}", token_for(&viewer.id)))
        .body(Body::empty())
        .unwrap();
    let response = app(db).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "tweet set to private");
    assert_eq!(body["data"]["isAnonymous"], true);
}

#[tokio::test]
async fn test_like_tweet_returns_decorated_tweet() {
    let viewer = test_user(&id(), "alice");
    let owner = test_user(&id(), "bob");
    let tweet = test_tweet(&id(), &owner.id);

    let liked = like::Model {
        id: id(),
        liked_by: viewer.id.clone(),
        tweet_id: Some(tweet.id.clone()),
        comment_id: None,
        created_at: Utc::now().into(),
    };

    let db = db_as(&viewer)
        .append_query_results([[tweet.clone()]])
        .append_exec_results([
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
        ])
        .append_query_results([[tweet.clone()]])
        .append_query_results([[owner.clone()]])
        .append_query_results([[count_row(&tweet.id, 1)]])
        .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
        .append_query_results([[liked]])
        .append_query_results([Vec::<bookmark::Model>::new()]);

    let request = Request::builder()
        .method("POST")
        .uri(format!("/likes/tweet/{}", tweet.id))
        .header(header::AUTHORIZATION, format!("Bearer {}", token_for(&viewer.id)))
        .body(Body::empty())
        .unwrap();
    let response = app(db).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "tweet liked successfully");
    assert_eq!(body["data"]["likeCount"], 1);
    assert_eq!(body["data"]["isLiked"], true);
    assert_eq!(body["data"]["isBookmarked"], false);
    assert_eq!(body["data"]["ownerDetails"]["username"], "bob");
}

#[tokio::test]
async fn test_follow_self_is_bad_request() {
    let viewer = test_user(&id(), "alice");

    let request = Request::builder()
        .method("POST")
        .uri(format!("/follows/{}", viewer.id))
        .header(header::AUTHORIZATION, format!("Bearer {}", token_for(&viewer.id)))
        .body(Body::empty())
        .unwrap();
    let response = app(db_as(&viewer)).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "you can't follow yourself");
}

#[tokio::test]
async fn test_create_without_multipart_is_bad_request() {
    let viewer = test_user(&id(), "alice");

    let request = Request::builder()
        .method("POST")
        .uri("/tweets")
        .header(header::AUTHORIZATION, format!("Bearer {}", token_for(&viewer.id)))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"content":"hi"}"#))
        .unwrap();
    let response = app(db_as(&viewer)).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_create_empty_content_is_bad_request() {
    let viewer = test_user(&id(), "alice");
    let boundary = "chirp-boundary";
    let form = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"content\"\r\n\r\n   \r\n--{boundary}--\r\n"
    );

    let request = Request::builder()
        .method("POST")
        .uri("/tweets")
        .header(header::AUTHORIZATION, format!("Bearer {}", token_for(&viewer.id)))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(form))
        .unwrap();
    let response = app(db_as(&viewer)).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["message"], "tweet can't be empty");
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let response = app(empty_db())
        .oneshot(Request::builder().uri("/nonexistent/endpoint").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
