//! Repositories wrapping database access per entity.

pub mod bookmark;
pub mod comment;
pub mod follow;
pub mod like;
pub mod tweet;
pub mod user;

pub use bookmark::BookmarkRepository;
pub use comment::CommentRepository;
pub use follow::FollowRepository;
pub use like::LikeRepository;
pub use tweet::{TweetRepository, TweetScope};
pub use user::UserRepository;

use std::collections::HashMap;

use chirp_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DeleteMany, EntityTrait, FromQueryResult, Insert,
    IntoActiveModel,
};

/// Outcome of toggling an (actor, target) relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// The relation now exists.
    Activated,
    /// The relation was removed.
    Deactivated,
}

impl Toggle {
    /// Whether the relation exists after the toggle.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Activated)
    }
}

/// Remove the relation if present, otherwise insert it.
///
/// `insert` must carry an `ON CONFLICT ... DO NOTHING` clause on the pair's
/// unique index. When both statements touch zero rows a concurrent toggle
/// inserted first, so the relation still exists.
pub(crate) async fn toggle<A>(
    db: &DatabaseConnection,
    delete: DeleteMany<A::Entity>,
    insert: Insert<A>,
) -> AppResult<Toggle>
where
    A: ActiveModelTrait,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    let removed = delete
        .exec(db)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    if removed.rows_affected > 0 {
        return Ok(Toggle::Deactivated);
    }

    let inserted = insert
        .exec_without_returning(db)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    if inserted == 0 {
        tracing::debug!("Relation inserted concurrently");
    }

    Ok(Toggle::Activated)
}

/// Row of a grouped `COUNT(*)` keyed by the referenced entity.
#[derive(Debug, FromQueryResult)]
pub(crate) struct CountRow {
    pub target_id: String,
    pub count: i64,
}

pub(crate) fn into_count_map(rows: Vec<CountRow>) -> HashMap<String, u64> {
    rows.into_iter()
        .map(|row| (row.target_id, row.count.unsigned_abs()))
        .collect()
}
