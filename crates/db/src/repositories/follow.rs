//! Follow repository.

use std::sync::Arc;

use super::Toggle;
use crate::entities::{Follow, User, follow, user};
use chirp_common::{AppError, AppResult};
use chrono::Utc;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select, Set, sea_query::OnConflict,
};

/// Follow repository for database operations.
#[derive(Clone)]
pub struct FollowRepository {
    db: Arc<DatabaseConnection>,
}

impl FollowRepository {
    /// Create a new follow repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Follow the user, or stop following them.
    pub async fn toggle(
        &self,
        id: String,
        follower_id: &str,
        followee_id: &str,
    ) -> AppResult<Toggle> {
        let delete = Follow::delete_many()
            .filter(follow::Column::FollowerId.eq(follower_id))
            .filter(follow::Column::FolloweeId.eq(followee_id));

        let model = follow::ActiveModel {
            id: Set(id),
            follower_id: Set(follower_id.to_string()),
            followee_id: Set(followee_id.to_string()),
            created_at: Set(Utc::now().into()),
        };
        let insert = Follow::insert(model).on_conflict(
            OnConflict::columns([follow::Column::FollowerId, follow::Column::FolloweeId])
                .do_nothing()
                .to_owned(),
        );

        super::toggle(self.db.as_ref(), delete, insert).await
    }

    /// Users following `user_id`, most recent first.
    pub async fn find_followers(
        &self,
        user_id: &str,
        offset: u64,
        limit: u64,
    ) -> AppResult<Vec<user::Model>> {
        Self::followers_query(user_id)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Number of users following `user_id`.
    pub async fn count_followers(&self, user_id: &str) -> AppResult<u64> {
        Follow::find()
            .filter(follow::Column::FolloweeId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Users `user_id` follows, most recent first.
    pub async fn find_following(
        &self,
        user_id: &str,
        offset: u64,
        limit: u64,
    ) -> AppResult<Vec<user::Model>> {
        Self::following_query(user_id)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Number of users `user_id` follows.
    pub async fn count_following(&self, user_id: &str) -> AppResult<u64> {
        Follow::find()
            .filter(follow::Column::FollowerId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    fn followers_query(user_id: &str) -> Select<User> {
        User::find()
            .join_rev(JoinType::InnerJoin, follow::Relation::Follower.def())
            .filter(follow::Column::FolloweeId.eq(user_id))
            .order_by_desc(follow::Column::CreatedAt)
            .order_by_desc(follow::Column::Id)
    }

    fn following_query(user_id: &str) -> Select<User> {
        User::find()
            .join_rev(JoinType::InnerJoin, follow::Relation::Followee.def())
            .filter(follow::Column::FollowerId.eq(user_id))
            .order_by_desc(follow::Column::CreatedAt)
            .order_by_desc(follow::Column::Id)
    }
}
