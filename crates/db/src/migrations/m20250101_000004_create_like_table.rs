//! Create like table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Like::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Like::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Like::LikedBy).string_len(32).not_null())
                    .col(ColumnDef::new(Like::TweetId).string_len(32))
                    .col(ColumnDef::new(Like::CommentId).string_len(32))
                    .col(
                        ColumnDef::new(Like::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    // Exactly one target
                    .check(Expr::cust(
                        r#"("tweet_id" IS NULL) <> ("comment_id" IS NULL)"#,
                    ))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_like_user")
                            .from(Like::Table, Like::LikedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_like_tweet")
                            .from(Like::Table, Like::TweetId)
                            .to(Tweet::Table, Tweet::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_like_comment")
                            .from(Like::Table, Like::CommentId)
                            .to(Comment::Table, Comment::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (liked_by, tweet_id) - one like per user per tweet
        manager
            .create_index(
                Index::create()
                    .name("idx_like_user_tweet")
                    .table(Like::Table)
                    .col(Like::LikedBy)
                    .col(Like::TweetId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Unique index: (liked_by, comment_id) - one like per user per comment
        manager
            .create_index(
                Index::create()
                    .name("idx_like_user_comment")
                    .table(Like::Table)
                    .col(Like::LikedBy)
                    .col(Like::CommentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: tweet_id (like counts)
        manager
            .create_index(
                Index::create()
                    .name("idx_like_tweet_id")
                    .table(Like::Table)
                    .col(Like::TweetId)
                    .to_owned(),
            )
            .await?;

        // Index: comment_id (like counts)
        manager
            .create_index(
                Index::create()
                    .name("idx_like_comment_id")
                    .table(Like::Table)
                    .col(Like::CommentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Like::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Like {
    Table,
    Id,
    LikedBy,
    TweetId,
    CommentId,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Tweet {
    Table,
    Id,
}

#[derive(Iden)]
enum Comment {
    Table,
    Id,
}
