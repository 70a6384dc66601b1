//! Comment repository.

use std::collections::HashMap;
use std::sync::Arc;

use super::{CountRow, into_count_map};
use crate::entities::{Comment, comment};
use chirp_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, sea_query::Expr,
};

/// Comment repository for database operations.
#[derive(Clone)]
pub struct CommentRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentRepository {
    /// Create a new comment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a comment by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<comment::Model>> {
        Comment::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a comment by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<comment::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::CommentNotFound(id.to_string()))
    }

    /// Comments on a tweet (paginated, newest first).
    pub async fn find_by_tweet(
        &self,
        tweet_id: &str,
        offset: u64,
        limit: u64,
    ) -> AppResult<Vec<comment::Model>> {
        Comment::find()
            .filter(comment::Column::TweetId.eq(tweet_id))
            .order_by_desc(comment::Column::CreatedAt)
            .order_by_desc(comment::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count comments on a tweet.
    pub async fn count_by_tweet(&self, tweet_id: &str) -> AppResult<u64> {
        Comment::find()
            .filter(comment::Column::TweetId.eq(tweet_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Comment counts per tweet. Tweets without comments are absent from the map.
    pub async fn count_by_tweets(&self, tweet_ids: &[String]) -> AppResult<HashMap<String, u64>> {
        if tweet_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = Comment::find()
            .select_only()
            .column_as(comment::Column::TweetId, "target_id")
            .column_as(Expr::col(comment::Column::Id).count(), "count")
            .filter(comment::Column::TweetId.is_in(tweet_ids.to_vec()))
            .group_by(comment::Column::TweetId)
            .into_model::<CountRow>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(into_count_map(rows))
    }
}
