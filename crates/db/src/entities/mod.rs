//! Database entities.

pub mod bookmark;
pub mod comment;
pub mod follow;
pub mod like;
pub mod tweet;
pub mod user;

pub use bookmark::Entity as Bookmark;
pub use comment::Entity as Comment;
pub use follow::Entity as Follow;
pub use like::Entity as Like;
pub use tweet::Entity as Tweet;
pub use user::Entity as User;
