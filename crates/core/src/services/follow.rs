//! Follow service.

use chirp_common::{AppError, AppResult, IdGenerator};
use chirp_db::repositories::{FollowRepository, Toggle, UserRepository};
use serde::Serialize;

use super::{OwnerDetails, require_id};
use crate::pagination::{Page, PageRequest};

/// Relationship with a user after a follow toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowState {
    /// The followed or unfollowed user.
    pub user: OwnerDetails,
    /// Whether the caller follows the user after the toggle.
    pub is_following: bool,
    /// Follower count of the user after the toggle.
    pub followers_count: u64,
}

/// Follow service for business logic.
#[derive(Clone)]
pub struct FollowService {
    follow_repo: FollowRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl FollowService {
    /// Create a new follow service.
    #[must_use]
    pub const fn new(follow_repo: FollowRepository, user_repo: UserRepository) -> Self {
        Self {
            follow_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Follow the user, or stop following them.
    pub async fn toggle(&self, follower_id: &str, followee_id: &str) -> AppResult<FollowState> {
        require_id(followee_id, "userId")?;
        if follower_id == followee_id {
            return Err(AppError::BadRequest("you can't follow yourself".to_string()));
        }

        let followee = self.user_repo.get_by_id(followee_id).await?;

        let state = self
            .follow_repo
            .toggle(self.id_gen.generate(), follower_id, &followee.id)
            .await?;
        tracing::debug!(follower_id = %follower_id, followee_id = %followee.id, ?state, "Toggled follow");

        let followers_count = self.follow_repo.count_followers(&followee.id).await?;

        Ok(FollowState {
            user: OwnerDetails::from(&followee),
            is_following: state == Toggle::Activated,
            followers_count,
        })
    }

    /// Users following `user_id`.
    pub async fn followers(
        &self,
        user_id: &str,
        request: PageRequest,
    ) -> AppResult<Page<OwnerDetails>> {
        let total = self.follow_repo.count_followers(user_id).await?;
        let users = self
            .follow_repo
            .find_followers(user_id, request.offset(), request.limit())
            .await?;
        Ok(Page::new(users, total, request).map(|u| OwnerDetails::from(&u)))
    }

    /// Users `user_id` follows.
    pub async fn following(
        &self,
        user_id: &str,
        request: PageRequest,
    ) -> AppResult<Page<OwnerDetails>> {
        let total = self.follow_repo.count_following(user_id).await?;
        let users = self
            .follow_repo
            .find_following(user_id, request.offset(), request.limit())
            .await?;
        Ok(Page::new(users, total, request).map(|u| OwnerDetails::from(&u)))
    }
}
