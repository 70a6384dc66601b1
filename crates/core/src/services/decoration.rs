//! Per-viewer decoration of tweets and comments.
//!
//! A page is decorated with a fixed number of batched lookups regardless of
//! its size: owners, like counts, comment counts, then the viewer's likes and
//! bookmarks among the page.

use std::collections::HashMap;

use chirp_common::AppResult;
use chirp_db::{
    entities::{comment, tweet, user},
    repositories::{BookmarkRepository, CommentRepository, LikeRepository, UserRepository},
};
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;

use crate::pagination::Paged;

/// Public profile fields embedded in decorated entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerDetails {
    /// User ID.
    pub id: String,
    /// Display username.
    pub username: String,
    /// Avatar URL, if one was uploaded.
    pub avatar: Option<String>,
}

impl From<&user::Model> for OwnerDetails {
    fn from(user: &user::Model) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            avatar: user.avatar_url.clone(),
        }
    }
}

impl Paged for OwnerDetails {
    const ITEMS: &'static str = "users";
    const TOTAL: &'static str = "totalUsers";
}

/// A tweet as seen by one viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetView {
    /// Tweet ID.
    pub id: String,
    /// Tweet text.
    pub content: String,
    /// Public URLs of attached images.
    pub images: Vec<String>,
    /// Whether the author is hidden from other viewers.
    pub is_anonymous: bool,
    /// Author user ID.
    pub owner: String,
    /// Creation time.
    pub created_at: DateTimeWithTimeZone,
    /// Last edit time.
    pub updated_at: Option<DateTimeWithTimeZone>,
    /// Author profile.
    pub owner_details: OwnerDetails,
    /// Number of likes.
    pub like_count: u64,
    /// Number of comments.
    pub comment_count: u64,
    /// Whether the viewer liked this tweet.
    pub is_liked: bool,
    /// Whether the viewer bookmarked this tweet.
    pub is_bookmarked: bool,
}

impl Paged for TweetView {
    const ITEMS: &'static str = "tweets";
    const TOTAL: &'static str = "totalTweets";
}

/// A comment as seen by one viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    /// Comment ID.
    pub id: String,
    /// Comment text.
    pub content: String,
    /// ID of the tweet commented on.
    pub tweet_id: String,
    /// Author profile.
    pub owner_details: OwnerDetails,
    /// Number of likes.
    pub like_count: u64,
    /// Whether the viewer liked this comment.
    pub is_liked: bool,
    /// Creation time.
    pub created_at: DateTimeWithTimeZone,
    /// Last edit time.
    pub updated_at: Option<DateTimeWithTimeZone>,
}

impl Paged for CommentView {
    const ITEMS: &'static str = "comments";
    const TOTAL: &'static str = "totalComments";
}

/// Builds viewer-specific views in batches.
#[derive(Clone)]
pub struct DecorationService {
    user_repo: UserRepository,
    like_repo: LikeRepository,
    bookmark_repo: BookmarkRepository,
    comment_repo: CommentRepository,
}

impl DecorationService {
    /// Create a new decoration service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        like_repo: LikeRepository,
        bookmark_repo: BookmarkRepository,
        comment_repo: CommentRepository,
    ) -> Self {
        Self {
            user_repo,
            like_repo,
            bookmark_repo,
            comment_repo,
        }
    }

    /// Decorate tweets in order. Tweets whose owner no longer exists are dropped.
    pub async fn tweets(
        &self,
        tweets: Vec<tweet::Model>,
        viewer_id: &str,
    ) -> AppResult<Vec<TweetView>> {
        if tweets.is_empty() {
            return Ok(vec![]);
        }

        let ids: Vec<String> = tweets.iter().map(|t| t.id.clone()).collect();
        let owners = self.owners(tweets.iter().map(|t| t.owner_id.clone())).await?;
        let like_counts = self.like_repo.count_by_tweets(&ids).await?;
        let comment_counts = self.comment_repo.count_by_tweets(&ids).await?;
        let liked = self.like_repo.liked_tweet_ids(viewer_id, &ids).await?;
        let bookmarked = self
            .bookmark_repo
            .bookmarked_tweet_ids(viewer_id, &ids)
            .await?;

        let views = tweets
            .into_iter()
            .filter_map(|tweet| {
                let Some(owner) = owners.get(&tweet.owner_id) else {
                    tracing::warn!(tweet_id = %tweet.id, owner_id = %tweet.owner_id, "Dropping tweet without owner");
                    return None;
                };
                Some(TweetView {
                    images: tweet.image_urls(),
                    owner_details: OwnerDetails::from(owner),
                    like_count: like_counts.get(&tweet.id).copied().unwrap_or(0),
                    comment_count: comment_counts.get(&tweet.id).copied().unwrap_or(0),
                    is_liked: liked.contains(&tweet.id),
                    is_bookmarked: bookmarked.contains(&tweet.id),
                    id: tweet.id,
                    content: tweet.content,
                    is_anonymous: tweet.is_anonymous,
                    owner: tweet.owner_id,
                    created_at: tweet.created_at,
                    updated_at: tweet.updated_at,
                })
            })
            .collect();

        Ok(views)
    }

    /// Decorate a single tweet; `None` if its owner no longer exists.
    pub async fn tweet(&self, tweet: tweet::Model, viewer_id: &str) -> AppResult<Option<TweetView>> {
        Ok(self.tweets(vec![tweet], viewer_id).await?.pop())
    }

    /// Decorate comments in order. Comments whose owner no longer exists are dropped.
    pub async fn comments(
        &self,
        comments: Vec<comment::Model>,
        viewer_id: &str,
    ) -> AppResult<Vec<CommentView>> {
        if comments.is_empty() {
            return Ok(vec![]);
        }

        let ids: Vec<String> = comments.iter().map(|c| c.id.clone()).collect();
        let owners = self
            .owners(comments.iter().map(|c| c.owner_id.clone()))
            .await?;
        let like_counts = self.like_repo.count_by_comments(&ids).await?;
        let liked = self.like_repo.liked_comment_ids(viewer_id, &ids).await?;

        let views = comments
            .into_iter()
            .filter_map(|comment| {
                let owner = owners.get(&comment.owner_id)?;
                Some(CommentView {
                    owner_details: OwnerDetails::from(owner),
                    like_count: like_counts.get(&comment.id).copied().unwrap_or(0),
                    is_liked: liked.contains(&comment.id),
                    id: comment.id,
                    content: comment.content,
                    tweet_id: comment.tweet_id,
                    created_at: comment.created_at,
                    updated_at: comment.updated_at,
                })
            })
            .collect();

        Ok(views)
    }

    /// Decorate a single comment; `None` if its owner no longer exists.
    pub async fn comment(
        &self,
        comment: comment::Model,
        viewer_id: &str,
    ) -> AppResult<Option<CommentView>> {
        Ok(self.comments(vec![comment], viewer_id).await?.pop())
    }

    async fn owners(
        &self,
        owner_ids: impl Iterator<Item = String>,
    ) -> AppResult<HashMap<String, user::Model>> {
        let mut ids: Vec<String> = owner_ids.collect();
        ids.sort_unstable();
        ids.dedup();

        let users = self.user_repo.find_by_ids(&ids).await?;
        Ok(users.into_iter().map(|u| (u.id.clone(), u)).collect())
    }
}
