//! User service.

use chirp_common::{AppError, AppResult, JwtCodec};
use chirp_db::{entities::user, repositories::UserRepository};

/// Read-only user lookups and access token resolution.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    jwt: JwtCodec,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository, jwt: JwtCodec) -> Self {
        Self { user_repo, jwt }
    }

    /// Find a user by username (case-insensitive).
    pub async fn find_by_username(&self, username: &str) -> AppResult<user::Model> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AppError::BadRequest("username is required".to_string()));
        }

        self.user_repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::UserNotFound(username.to_string()))
    }

    /// Resolve an access token to its user.
    ///
    /// Returns `Ok(None)` when the token is valid but its subject no longer exists.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<Option<user::Model>> {
        let claims = self.jwt.verify(token)?;
        self.user_repo.find_by_id(&claims.sub).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::decoration::tests::test_user;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn service(db: MockDatabase) -> (UserService, JwtCodec) {
        let jwt = JwtCodec::new("test-secret", 3600);
        let repo = UserRepository::new(Arc::new(db.into_connection()));
        (UserService::new(repo, jwt.clone()), jwt)
    }

    #[tokio::test]
    async fn test_authenticate_by_token() {
        let (service, jwt) = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_user("user1", "alice")]]),
        );

        let token = jwt.issue("user1").unwrap();
        let user = service.authenticate_by_token(&token).await.unwrap();

        assert_eq!(user.unwrap().username, "alice");
    }

    #[tokio::test]
    async fn test_authenticate_rejects_bad_token() {
        let (service, _) = service(MockDatabase::new(DatabaseBackend::Postgres));

        let result = service.authenticate_by_token("garbage").await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_find_by_username_unknown() {
        let (service, _) = service(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()]),
        );

        let result = service.find_by_username("nobody").await;

        assert!(matches!(result, Err(AppError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_find_by_username_blank() {
        let (service, _) = service(MockDatabase::new(DatabaseBackend::Postgres));

        let result = service.find_by_username("  ").await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
