//! Like repository.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::{CountRow, Toggle, into_count_map};
use crate::entities::{Like, like, like::LikeTarget};
use chirp_common::{AppError, AppResult};
use chrono::Utc;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect, Set,
    sea_query::{Expr, OnConflict},
};

/// Like repository for database operations.
#[derive(Clone)]
pub struct LikeRepository {
    db: Arc<DatabaseConnection>,
}

impl LikeRepository {
    /// Create a new like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Like the target, or remove the existing like.
    pub async fn toggle(&self, id: String, user_id: &str, target: &LikeTarget) -> AppResult<Toggle> {
        let column = target.column();

        let delete = Like::delete_many()
            .filter(like::Column::LikedBy.eq(user_id))
            .filter(column.eq(target.id()));

        let (tweet_id, comment_id) = match target {
            LikeTarget::Tweet(id) => (Some(id.clone()), None),
            LikeTarget::Comment(id) => (None, Some(id.clone())),
        };
        let model = like::ActiveModel {
            id: Set(id),
            liked_by: Set(user_id.to_string()),
            tweet_id: Set(tweet_id),
            comment_id: Set(comment_id),
            created_at: Set(Utc::now().into()),
        };
        let insert = Like::insert(model).on_conflict(
            OnConflict::columns([like::Column::LikedBy, column])
                .do_nothing()
                .to_owned(),
        );

        super::toggle(self.db.as_ref(), delete, insert).await
    }

    /// Like counts per tweet. Tweets without likes are absent from the map.
    pub async fn count_by_tweets(&self, tweet_ids: &[String]) -> AppResult<HashMap<String, u64>> {
        self.count_grouped(like::Column::TweetId, tweet_ids).await
    }

    /// Like counts per comment. Comments without likes are absent from the map.
    pub async fn count_by_comments(
        &self,
        comment_ids: &[String],
    ) -> AppResult<HashMap<String, u64>> {
        self.count_grouped(like::Column::CommentId, comment_ids)
            .await
    }

    /// Subset of `tweet_ids` the user liked.
    pub async fn liked_tweet_ids(
        &self,
        user_id: &str,
        tweet_ids: &[String],
    ) -> AppResult<HashSet<String>> {
        let likes = self
            .find_by_user_among(user_id, like::Column::TweetId, tweet_ids)
            .await?;
        Ok(likes.into_iter().filter_map(|l| l.tweet_id).collect())
    }

    /// Subset of `comment_ids` the user liked.
    pub async fn liked_comment_ids(
        &self,
        user_id: &str,
        comment_ids: &[String],
    ) -> AppResult<HashSet<String>> {
        let likes = self
            .find_by_user_among(user_id, like::Column::CommentId, comment_ids)
            .await?;
        Ok(likes.into_iter().filter_map(|l| l.comment_id).collect())
    }

    async fn count_grouped(
        &self,
        column: like::Column,
        ids: &[String],
    ) -> AppResult<HashMap<String, u64>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = Like::find()
            .select_only()
            .column_as(column, "target_id")
            .column_as(Expr::col(like::Column::Id).count(), "count")
            .filter(column.is_in(ids.to_vec()))
            .group_by(column)
            .into_model::<CountRow>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(into_count_map(rows))
    }

    async fn find_by_user_among(
        &self,
        user_id: &str,
        column: like::Column,
        ids: &[String],
    ) -> AppResult<Vec<like::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Like::find()
            .filter(like::Column::LikedBy.eq(user_id))
            .filter(column.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
