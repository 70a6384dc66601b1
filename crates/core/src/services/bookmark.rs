//! Bookmark service.

use chirp_common::{AppResult, IdGenerator};
use chirp_db::repositories::{BookmarkRepository, Toggle, TweetScope};

use super::{TweetService, TweetView};
use crate::pagination::{Page, PageRequest};

/// Bookmark service for business logic.
#[derive(Clone)]
pub struct BookmarkService {
    bookmark_repo: BookmarkRepository,
    tweets: TweetService,
    id_gen: IdGenerator,
}

impl BookmarkService {
    /// Create a new bookmark service.
    #[must_use]
    pub const fn new(bookmark_repo: BookmarkRepository, tweets: TweetService) -> Self {
        Self {
            bookmark_repo,
            tweets,
            id_gen: IdGenerator::new(),
        }
    }

    /// Bookmark the tweet, or remove the bookmark.
    pub async fn toggle(&self, user_id: &str, tweet_id: &str) -> AppResult<(Toggle, TweetView)> {
        let tweet = self.tweets.get(tweet_id).await?;

        let state = self
            .bookmark_repo
            .toggle(self.id_gen.generate(), user_id, &tweet.id)
            .await?;
        tracing::debug!(tweet_id = %tweet.id, user_id = %user_id, ?state, "Toggled bookmark");

        let view = self.tweets.details(&tweet.id, user_id).await?;
        Ok((state, view))
    }

    /// The user's bookmarked tweets.
    pub async fn list(&self, user_id: &str, request: PageRequest) -> AppResult<Page<TweetView>> {
        self.tweets
            .scoped(&TweetScope::BookmarkedBy(user_id.to_string()), user_id, request)
            .await
    }
}
