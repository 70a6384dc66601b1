//! Like service.

use chirp_common::{AppError, AppResult, IdGenerator};
use chirp_db::{
    entities::like::LikeTarget,
    repositories::{CommentRepository, LikeRepository, Toggle, TweetScope},
};

use super::{CommentView, DecorationService, TweetService, TweetView, require_id};
use crate::pagination::{Page, PageRequest};

/// Likes on tweets and comments.
#[derive(Clone)]
pub struct LikeService {
    like_repo: LikeRepository,
    comment_repo: CommentRepository,
    tweets: TweetService,
    decoration: DecorationService,
    id_gen: IdGenerator,
}

impl LikeService {
    /// Create a new like service.
    #[must_use]
    pub const fn new(
        like_repo: LikeRepository,
        comment_repo: CommentRepository,
        tweets: TweetService,
        decoration: DecorationService,
    ) -> Self {
        Self {
            like_repo,
            comment_repo,
            tweets,
            decoration,
            id_gen: IdGenerator::new(),
        }
    }

    /// Like the tweet, or remove the like. Returns the tweet as it now looks.
    pub async fn toggle_tweet_like(
        &self,
        user_id: &str,
        tweet_id: &str,
    ) -> AppResult<(Toggle, TweetView)> {
        let tweet = self.tweets.get(tweet_id).await?;

        let state = self
            .like_repo
            .toggle(
                self.id_gen.generate(),
                user_id,
                &LikeTarget::Tweet(tweet.id.clone()),
            )
            .await?;
        tracing::debug!(tweet_id = %tweet.id, user_id = %user_id, ?state, "Toggled tweet like");

        let view = self.tweets.details(&tweet.id, user_id).await?;
        Ok((state, view))
    }

    /// Like the comment, or remove the like. Returns the comment as it now looks.
    pub async fn toggle_comment_like(
        &self,
        user_id: &str,
        comment_id: &str,
    ) -> AppResult<(Toggle, CommentView)> {
        require_id(comment_id, "commentId")?;
        let comment = self.comment_repo.get_by_id(comment_id).await?;

        let state = self
            .like_repo
            .toggle(
                self.id_gen.generate(),
                user_id,
                &LikeTarget::Comment(comment.id.clone()),
            )
            .await?;
        tracing::debug!(comment_id = %comment.id, user_id = %user_id, ?state, "Toggled comment like");

        let view = self
            .decoration
            .comment(comment, user_id)
            .await?
            .ok_or_else(|| AppError::CommentNotFound(comment_id.to_string()))?;
        Ok((state, view))
    }

    /// Tweets the user liked, most recent like first.
    pub async fn liked_tweets(
        &self,
        user_id: &str,
        request: PageRequest,
    ) -> AppResult<Page<TweetView>> {
        self.tweets
            .scoped(&TweetScope::LikedBy(user_id.to_string()), user_id, request)
            .await
    }
}
