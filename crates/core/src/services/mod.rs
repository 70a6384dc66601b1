//! Business logic services.

pub mod bookmark;
pub mod comment;
pub mod decoration;
pub mod follow;
pub mod like;
pub mod tweet;
pub mod user;

pub use bookmark::BookmarkService;
pub use comment::CommentService;
pub use decoration::{CommentView, DecorationService, OwnerDetails, TweetView};
pub use follow::{FollowService, FollowState};
pub use like::LikeService;
pub use tweet::{CreateTweetInput, ImageUpload, TweetService, UpdateTweetInput};
pub use user::UserService;

use chirp_common::{AppError, AppResult, IdGenerator};

/// Check a path or body identifier before it reaches the database.
///
/// An empty value is a missing field; anything that is not a ULID is malformed.
pub fn require_id(value: &str, field: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    if !IdGenerator::is_valid(value) {
        return Err(AppError::InvalidId(field.to_string()));
    }
    Ok(())
}
