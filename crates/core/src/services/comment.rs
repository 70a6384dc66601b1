//! Comment service.

use chirp_common::AppResult;
use chirp_db::repositories::CommentRepository;

use super::{CommentView, DecorationService, TweetService};
use crate::pagination::{Page, PageRequest};

/// Read access to tweet comments.
#[derive(Clone)]
pub struct CommentService {
    comment_repo: CommentRepository,
    tweets: TweetService,
    decoration: DecorationService,
}

impl CommentService {
    /// Create a new comment service.
    #[must_use]
    pub const fn new(
        comment_repo: CommentRepository,
        tweets: TweetService,
        decoration: DecorationService,
    ) -> Self {
        Self {
            comment_repo,
            tweets,
            decoration,
        }
    }

    /// A tweet's comments, newest first, decorated for the viewer.
    pub async fn list_for_tweet(
        &self,
        tweet_id: &str,
        viewer_id: &str,
        request: PageRequest,
    ) -> AppResult<Page<CommentView>> {
        let tweet = self.tweets.get(tweet_id).await?;

        let total = self.comment_repo.count_by_tweet(&tweet.id).await?;
        let comments = self
            .comment_repo
            .find_by_tweet(&tweet.id, request.offset(), request.limit())
            .await?;
        let views = self.decoration.comments(comments, viewer_id).await?;

        Ok(Page::new(views, total, request))
    }
}
