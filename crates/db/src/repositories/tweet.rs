//! Tweet repository.

use std::sync::Arc;

use crate::entities::{Tweet, bookmark, like, tweet};
use chirp_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select,
};

/// Which tweets a listing covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TweetScope {
    /// Every tweet.
    All,
    /// Tweets owned by the user, anonymous ones included.
    Owner(String),
    /// Non-anonymous tweets owned by the user.
    PublicOf(String),
    /// Tweets the user liked, most recent like first.
    LikedBy(String),
    /// Tweets the user bookmarked.
    BookmarkedBy(String),
}

impl TweetScope {
    fn select(&self) -> Select<Tweet> {
        let newest_first = |query: Select<Tweet>| {
            query
                .order_by_desc(tweet::Column::CreatedAt)
                .order_by_desc(tweet::Column::Id)
        };

        match self {
            Self::All => newest_first(Tweet::find()),
            Self::Owner(user_id) => {
                newest_first(Tweet::find().filter(tweet::Column::OwnerId.eq(user_id.as_str())))
            }
            Self::PublicOf(user_id) => newest_first(
                Tweet::find()
                    .filter(tweet::Column::OwnerId.eq(user_id.as_str()))
                    .filter(tweet::Column::IsAnonymous.eq(false)),
            ),
            Self::LikedBy(user_id) => Tweet::find()
                .join_rev(JoinType::InnerJoin, like::Relation::Tweet.def())
                .filter(like::Column::LikedBy.eq(user_id.as_str()))
                .order_by_desc(like::Column::CreatedAt)
                .order_by_desc(like::Column::Id),
            Self::BookmarkedBy(user_id) => newest_first(
                Tweet::find()
                    .join_rev(JoinType::InnerJoin, bookmark::Relation::Tweet.def())
                    .filter(bookmark::Column::BookmarkedBy.eq(user_id.as_str())),
            ),
        }
    }
}

/// Tweet repository for database operations.
#[derive(Clone)]
pub struct TweetRepository {
    db: Arc<DatabaseConnection>,
}

impl TweetRepository {
    /// Create a new tweet repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a tweet by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<tweet::Model>> {
        Tweet::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a tweet by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<tweet::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::TweetNotFound(id.to_string()))
    }

    /// Create a new tweet.
    pub async fn create(&self, model: tweet::ActiveModel) -> AppResult<tweet::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a tweet.
    pub async fn update(&self, model: tweet::ActiveModel) -> AppResult<tweet::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a tweet.
    ///
    /// Likes, bookmarks and comments referencing it go with it through the
    /// cascading foreign keys.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        Tweet::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get one page of tweets in a scope.
    pub async fn find_scoped(
        &self,
        scope: &TweetScope,
        offset: u64,
        limit: u64,
    ) -> AppResult<Vec<tweet::Model>> {
        scope
            .select()
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count all tweets in a scope.
    pub async fn count_scoped(&self, scope: &TweetScope) -> AppResult<u64> {
        scope
            .select()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, DbBackend, MockDatabase, MockExecResult, QueryTrait};

    fn create_test_tweet(id: &str, owner_id: &str) -> tweet::Model {
        tweet::Model {
            id: id.to_string(),
            content: "hello".to_string(),
            images: serde_json::json!([]),
            is_anonymous: false,
            owner_id: owner_id.to_string(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<tweet::Model>::new()])
                .into_connection(),
        );

        let repo = TweetRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::TweetNotFound(_))));
    }

    #[tokio::test]
    async fn test_find_scoped() {
        let t1 = create_test_tweet("t1", "user1");
        let t2 = create_test_tweet("t2", "user1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[t1, t2]])
                .into_connection(),
        );

        let repo = TweetRepository::new(db);
        let result = repo
            .find_scoped(&TweetScope::Owner("user1".to_string()), 0, 20)
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_count_scoped() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(25)),
                }]])
                .into_connection(),
        );

        let repo = TweetRepository::new(db);
        let count = repo.count_scoped(&TweetScope::All).await.unwrap();

        assert_eq!(count, 25);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = TweetRepository::new(db);
        assert!(repo.delete("t1").await.is_ok());
    }

    #[test]
    fn test_public_scope_excludes_anonymous() {
        let sql = TweetScope::PublicOf("user1".to_string())
            .select()
            .build(DbBackend::Postgres)
            .to_string()
            .to_uppercase();

        assert!(sql.contains(r#""TWEET"."IS_ANONYMOUS" = FALSE"#));
        assert!(sql.contains(r#""TWEET"."OWNER_ID" = 'USER1'"#));
    }

    #[test]
    fn test_feed_scope_orders_newest_first() {
        let sql = TweetScope::All
            .select()
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.ends_with(r#"ORDER BY "tweet"."created_at" DESC, "tweet"."id" DESC"#));
    }

    #[test]
    fn test_liked_scope_orders_by_like() {
        let sql = TweetScope::LikedBy("user1".to_string())
            .select()
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#"INNER JOIN "like""#));
        assert!(sql.contains(r#""like"."liked_by" = 'user1'"#));
        assert!(sql.contains(r#"ORDER BY "like"."created_at" DESC"#));
    }
}
