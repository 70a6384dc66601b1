//! Like entity.
//!
//! A like points at exactly one tweet or exactly one comment.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "like")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// User who liked
    #[sea_orm(indexed)]
    pub liked_by: String,

    #[sea_orm(nullable, indexed)]
    pub tweet_id: Option<String>,

    #[sea_orm(nullable, indexed)]
    pub comment_id: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

/// The entity a like is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LikeTarget {
    Tweet(String),
    Comment(String),
}

impl LikeTarget {
    /// Referenced entity ID.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Tweet(id) | Self::Comment(id) => id,
        }
    }

    /// Column holding the target reference.
    #[must_use]
    pub const fn column(&self) -> Column {
        match self {
            Self::Tweet(_) => Column::TweetId,
            Self::Comment(_) => Column::CommentId,
        }
    }
}

impl Model {
    /// Target of this like.
    ///
    /// Rows always carry exactly one reference; a row violating that is
    /// reported as `None`.
    #[must_use]
    pub fn target(&self) -> Option<LikeTarget> {
        match (&self.tweet_id, &self.comment_id) {
            (Some(tweet_id), None) => Some(LikeTarget::Tweet(tweet_id.clone())),
            (None, Some(comment_id)) => Some(LikeTarget::Comment(comment_id.clone())),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::LikedBy",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::tweet::Entity",
        from = "Column::TweetId",
        to = "super::tweet::Column::Id",
        on_delete = "Cascade"
    )]
    Tweet,

    #[sea_orm(
        belongs_to = "super::comment::Entity",
        from = "Column::CommentId",
        to = "super::comment::Column::Id",
        on_delete = "Cascade"
    )]
    Comment,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::tweet::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tweet.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
