//! Bookmark repository.

use std::collections::HashSet;
use std::sync::Arc;

use super::Toggle;
use crate::entities::{Bookmark, bookmark};
use chirp_common::{AppError, AppResult};
use chrono::Utc;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, sea_query::OnConflict,
};

/// Bookmark repository for database operations.
#[derive(Clone)]
pub struct BookmarkRepository {
    db: Arc<DatabaseConnection>,
}

impl BookmarkRepository {
    /// Create a new bookmark repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Bookmark the tweet, or remove the existing bookmark.
    pub async fn toggle(&self, id: String, user_id: &str, tweet_id: &str) -> AppResult<Toggle> {
        let delete = Bookmark::delete_many()
            .filter(bookmark::Column::BookmarkedBy.eq(user_id))
            .filter(bookmark::Column::TweetId.eq(tweet_id));

        let model = bookmark::ActiveModel {
            id: Set(id),
            bookmarked_by: Set(user_id.to_string()),
            tweet_id: Set(tweet_id.to_string()),
            created_at: Set(Utc::now().into()),
        };
        let insert = Bookmark::insert(model).on_conflict(
            OnConflict::columns([bookmark::Column::BookmarkedBy, bookmark::Column::TweetId])
                .do_nothing()
                .to_owned(),
        );

        super::toggle(self.db.as_ref(), delete, insert).await
    }

    /// Subset of `tweet_ids` the user bookmarked.
    pub async fn bookmarked_tweet_ids(
        &self,
        user_id: &str,
        tweet_ids: &[String],
    ) -> AppResult<HashSet<String>> {
        if tweet_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let bookmarks = Bookmark::find()
            .filter(bookmark::Column::BookmarkedBy.eq(user_id))
            .filter(bookmark::Column::TweetId.is_in(tweet_ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(bookmarks.into_iter().map(|b| b.tweet_id).collect())
    }
}
