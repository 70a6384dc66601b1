//! Tweet endpoints.

use axum::{
    Router,
    extract::{Multipart, State, multipart::MultipartRejection},
    routing::{get, patch, post},
};
use chirp_common::{AppError, AppResult};
use chirp_core::{CreateTweetInput, ImageUpload, Page, PageRequest, TweetView, UpdateTweetInput};
use chirp_db::entities::tweet;
use serde::Serialize;

use crate::{
    extractors::{ApiJson, ApiPath, ApiQuery, AuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Undecorated tweet.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetResponse {
    pub id: String,
    pub content: String,
    pub images: Vec<String>,
    pub is_anonymous: bool,
    pub owner: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl From<tweet::Model> for TweetResponse {
    fn from(tweet: tweet::Model) -> Self {
        Self {
            images: tweet.image_urls(),
            id: tweet.id,
            content: tweet.content,
            is_anonymous: tweet.is_anonymous,
            owner: tweet.owner_id,
            created_at: tweet.created_at.to_rfc3339(),
            updated_at: tweet.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Visibility after an anonymity toggle.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnonymityResponse {
    pub is_anonymous: bool,
}

fn multipart_error(e: impl std::fmt::Display) -> AppError {
    AppError::BadRequest(e.to_string())
}

fn parse_flag(raw: &str) -> AppResult<bool> {
    match raw.trim() {
        "true" | "1" | "on" => Ok(true),
        "false" | "0" | "off" | "" => Ok(false),
        _ => Err(AppError::BadRequest("isAnonymous must be a boolean".to_string())),
    }
}

/// Read the create form: `content`, `isAnonymous` and any number of `images` files.
async fn read_create_form(mut multipart: Multipart) -> AppResult<CreateTweetInput> {
    let mut input = CreateTweetInput::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "content" => {
                input.content = field.text().await.map_err(multipart_error)?;
            }
            "isAnonymous" => {
                let text = field.text().await.map_err(multipart_error)?;
                input.is_anonymous = parse_flag(&text)?;
            }
            "images" | "images[]" => {
                let file_name = field.file_name().unwrap_or("image").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await.map_err(multipart_error)?.to_vec();
                if data.is_empty() {
                    continue;
                }
                input.images.push(ImageUpload {
                    file_name,
                    content_type,
                    data,
                });
            }
            _ => {}
        }
    }

    Ok(input)
}

/// Create a tweet.
async fn create(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<ApiResponse<TweetResponse>> {
    let multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let input = read_create_form(multipart).await?;

    let tweet = state.tweet_service.create(&user.id, input).await?;
    Ok(ApiResponse::ok(tweet.into(), "tweet created successfully"))
}

/// Feed of every tweet.
async fn feed(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<PageRequest>,
) -> AppResult<ApiResponse<Page<TweetView>>> {
    let tweets = state.tweet_service.feed(&user.id, page).await?;
    Ok(ApiResponse::ok(tweets, "tweets fetched successfully"))
}

/// The caller's own tweets.
async fn mine(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<PageRequest>,
) -> AppResult<ApiResponse<Page<TweetView>>> {
    let tweets = state.tweet_service.mine(&user.id, page).await?;
    Ok(ApiResponse::ok(tweets, "tweets fetched successfully"))
}

/// A user's public tweets.
async fn public_tweets(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiPath(username): ApiPath<String>,
    ApiQuery(page): ApiQuery<PageRequest>,
) -> AppResult<ApiResponse<Page<TweetView>>> {
    let tweets = state
        .tweet_service
        .public_tweets(&username, &user.id, page)
        .await?;
    Ok(ApiResponse::ok(tweets, "public tweets fetched successfully"))
}

async fn show(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    ApiPath(tweet_id): ApiPath<String>,
) -> AppResult<ApiResponse<TweetResponse>> {
    let tweet = state.tweet_service.get(&tweet_id).await?;
    Ok(ApiResponse::ok(tweet.into(), "tweet fetched successfully"))
}

async fn details(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiPath(tweet_id): ApiPath<String>,
) -> AppResult<ApiResponse<TweetView>> {
    let tweet = state.tweet_service.details(&tweet_id, &user.id).await?;
    Ok(ApiResponse::ok(tweet, "tweet fetched successfully"))
}

async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiPath(tweet_id): ApiPath<String>,
    ApiJson(input): ApiJson<UpdateTweetInput>,
) -> AppResult<ApiResponse<TweetResponse>> {
    let tweet = state
        .tweet_service
        .update(&tweet_id, &user.id, input)
        .await?;
    Ok(ApiResponse::ok(tweet.into(), "tweet updated successfully"))
}

async fn delete(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiPath(tweet_id): ApiPath<String>,
) -> AppResult<ApiResponse<()>> {
    state.tweet_service.delete(&tweet_id, &user.id).await?;
    Ok(ApiResponse::ok((), "tweet deleted successfully"))
}

/// Flip a tweet between anonymous and public.
async fn toggle_anonymous(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ApiPath(tweet_id): ApiPath<String>,
) -> AppResult<ApiResponse<AnonymityResponse>> {
    let is_anonymous = state
        .tweet_service
        .toggle_anonymous(&tweet_id, &user.id)
        .await?;

    let message = if is_anonymous {
        "tweet set to private"
    } else {
        "tweet set to public"
    };
    Ok(ApiResponse::ok(AnonymityResponse { is_anonymous }, message))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/feed", get(feed))
        .route("/me", get(mine))
        .route("/user/{username}", get(public_tweets))
        .route("/{tweet_id}", get(show).patch(update).delete(delete))
        .route("/{tweet_id}/details", get(details))
        .route("/{tweet_id}/anonymous", patch(toggle_anonymous))
}
