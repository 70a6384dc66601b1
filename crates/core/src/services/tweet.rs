//! Tweet service.

use std::sync::Arc;

use chirp_common::{
    AppError, AppResult, IdGenerator, StorageBackend, generate_storage_key, is_image_content_type,
};
use chirp_db::{
    entities::tweet,
    repositories::{TweetRepository, TweetScope},
};
use chrono::Utc;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{UserService, decoration::DecorationService, decoration::TweetView, require_id};
use crate::pagination::{Page, PageRequest};

/// Maximum number of images attached to one tweet.
pub const MAX_IMAGES: usize = 4;

/// An image received with a new tweet.
#[derive(Debug, Clone, Serialize)]
pub struct ImageUpload {
    /// Client-supplied file name.
    pub file_name: String,
    /// MIME type of the upload.
    pub content_type: String,
    /// Raw file bytes.
    pub data: Vec<u8>,
}

/// Input for creating a new tweet.
#[derive(Debug, Clone, Default, Validate)]
pub struct CreateTweetInput {
    /// Tweet text.
    #[validate(length(max = 3000))]
    pub content: String,

    /// Hide the author from other viewers.
    pub is_anonymous: bool,

    /// Images to upload and attach.
    #[validate(length(max = 4))]
    pub images: Vec<ImageUpload>,
}

/// Input for updating a tweet.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTweetInput {
    /// Replacement tweet text.
    #[validate(length(max = 3000))]
    pub content: String,
}

/// Tweet service for business logic.
#[derive(Clone)]
pub struct TweetService {
    tweet_repo: TweetRepository,
    user_service: UserService,
    decoration: DecorationService,
    storage: Arc<dyn StorageBackend>,
    id_gen: IdGenerator,
}

impl TweetService {
    /// Create a new tweet service.
    #[must_use]
    pub fn new(
        tweet_repo: TweetRepository,
        user_service: UserService,
        decoration: DecorationService,
        storage: Arc<dyn StorageBackend>,
    ) -> Self {
        Self {
            tweet_repo,
            user_service,
            decoration,
            storage,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new tweet, storing its images first.
    pub async fn create(&self, owner_id: &str, input: CreateTweetInput) -> AppResult<tweet::Model> {
        if input.content.trim().is_empty() {
            return Err(AppError::BadRequest("tweet can't be empty".to_string()));
        }
        input.validate()?;

        if let Some(image) = input
            .images
            .iter()
            .find(|image| !is_image_content_type(&image.content_type))
        {
            return Err(AppError::BadRequest(format!(
                "unsupported image type: {}",
                image.content_type
            )));
        }

        let mut stored_keys = Vec::with_capacity(input.images.len());
        let mut urls = Vec::with_capacity(input.images.len());
        for image in &input.images {
            let key = generate_storage_key(owner_id, &image.file_name);
            let uploaded = match self
                .storage
                .upload(&key, &image.data, &image.content_type)
                .await
            {
                Ok(uploaded) => uploaded,
                Err(e) => {
                    self.discard_uploads(&stored_keys).await;
                    return Err(e);
                }
            };
            stored_keys.push(uploaded.key);
            urls.push(uploaded.url);
        }

        let image_count = urls.len();
        let model = tweet::ActiveModel {
            id: Set(self.id_gen.generate()),
            content: Set(input.content),
            images: Set(serde_json::json!(urls)),
            is_anonymous: Set(input.is_anonymous),
            owner_id: Set(owner_id.to_string()),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        match self.tweet_repo.create(model).await {
            Ok(tweet) => {
                tracing::debug!(tweet_id = %tweet.id, owner_id = %owner_id, images = image_count, "Created tweet");
                Ok(tweet)
            }
            Err(e) => {
                self.discard_uploads(&stored_keys).await;
                Err(e)
            }
        }
    }

    /// Get a tweet.
    pub async fn get(&self, tweet_id: &str) -> AppResult<tweet::Model> {
        require_id(tweet_id, "tweetId")?;
        self.tweet_repo.get_by_id(tweet_id).await
    }

    /// Get a tweet decorated for the viewer.
    pub async fn details(&self, tweet_id: &str, viewer_id: &str) -> AppResult<TweetView> {
        let tweet = self.get(tweet_id).await?;
        self.decoration
            .tweet(tweet, viewer_id)
            .await?
            .ok_or_else(|| AppError::TweetNotFound(tweet_id.to_string()))
    }

    /// Replace a tweet's content.
    pub async fn update(
        &self,
        tweet_id: &str,
        user_id: &str,
        input: UpdateTweetInput,
    ) -> AppResult<tweet::Model> {
        if input.content.trim().is_empty() {
            return Err(AppError::BadRequest("content is required".to_string()));
        }
        input.validate()?;

        let tweet = self.owned(tweet_id, user_id).await?;

        let mut active: tweet::ActiveModel = tweet.into();
        active.content = Set(input.content);
        active.updated_at = Set(Some(Utc::now().into()));

        let updated = self.tweet_repo.update(active).await?;
        tracing::debug!(tweet_id = %tweet_id, "Updated tweet");
        Ok(updated)
    }

    /// Delete a tweet together with its likes, bookmarks and comments.
    pub async fn delete(&self, tweet_id: &str, user_id: &str) -> AppResult<()> {
        self.owned(tweet_id, user_id).await?;
        self.tweet_repo.delete(tweet_id).await?;
        tracing::debug!(tweet_id = %tweet_id, "Deleted tweet");
        Ok(())
    }

    /// Flip the tweet between anonymous and public; returns the new state.
    pub async fn toggle_anonymous(&self, tweet_id: &str, user_id: &str) -> AppResult<bool> {
        let tweet = self.owned(tweet_id, user_id).await?;
        let is_anonymous = !tweet.is_anonymous;

        let mut active: tweet::ActiveModel = tweet.into();
        active.is_anonymous = Set(is_anonymous);
        active.updated_at = Set(Some(Utc::now().into()));
        self.tweet_repo.update(active).await?;

        tracing::debug!(tweet_id = %tweet_id, is_anonymous, "Toggled tweet visibility");
        Ok(is_anonymous)
    }

    /// Every tweet, newest first.
    pub async fn feed(&self, viewer_id: &str, request: PageRequest) -> AppResult<Page<TweetView>> {
        self.scoped(&TweetScope::All, viewer_id, request).await
    }

    /// The viewer's own tweets, anonymous ones included.
    pub async fn mine(&self, viewer_id: &str, request: PageRequest) -> AppResult<Page<TweetView>> {
        self.scoped(&TweetScope::Owner(viewer_id.to_string()), viewer_id, request)
            .await
    }

    /// A user's public profile: their non-anonymous tweets.
    pub async fn public_tweets(
        &self,
        username: &str,
        viewer_id: &str,
        request: PageRequest,
    ) -> AppResult<Page<TweetView>> {
        let user = self.user_service.find_by_username(username).await?;
        self.scoped(&TweetScope::PublicOf(user.id), viewer_id, request)
            .await
    }

    /// One decorated page of tweets in a scope.
    pub async fn scoped(
        &self,
        scope: &TweetScope,
        viewer_id: &str,
        request: PageRequest,
    ) -> AppResult<Page<TweetView>> {
        let total = self.tweet_repo.count_scoped(scope).await?;
        let tweets = self
            .tweet_repo
            .find_scoped(scope, request.offset(), request.limit())
            .await?;
        let views = self.decoration.tweets(tweets, viewer_id).await?;
        Ok(Page::new(views, total, request))
    }

    async fn owned(&self, tweet_id: &str, user_id: &str) -> AppResult<tweet::Model> {
        let tweet = self.get(tweet_id).await?;
        if tweet.owner_id != user_id {
            return Err(AppError::Forbidden("unauthorized access".to_string()));
        }
        Ok(tweet)
    }

    async fn discard_uploads(&self, keys: &[String]) {
        for key in keys {
            if let Err(e) = self.storage.delete(key).await {
                tracing::warn!(error = %e, key = %key, "Failed to remove orphaned upload");
            }
        }
    }
}
