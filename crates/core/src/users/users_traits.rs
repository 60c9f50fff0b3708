//! User repository and service traits.

use async_trait::async_trait;

use super::users_model::{NewUser, User, UserCredentials, UserUpdate};
use crate::errors::Result;

/// Persistence contract for staff users.
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    fn list(&self) -> Result<Vec<User>>;
    fn get_by_id(&self, user_id: &str) -> Result<User>;
    /// Looks a user up by (lowercased) email, including the password hash.
    fn find_credentials_by_email(&self, email: &str) -> Result<Option<UserCredentials>>;
    fn count_users(&self) -> Result<i64>;
    async fn create(&self, new_user: NewUser) -> Result<User>;
    /// Fails with `ConstraintViolation` when the update would demote or
    /// deactivate the last active admin. The check runs in the same write.
    async fn update(&self, user_id: &str, update: UserUpdate) -> Result<User>;
    /// Same last-admin rule as [`UserRepositoryTrait::update`].
    async fn delete(&self, user_id: &str) -> Result<usize>;
}

/// Business operations on staff users.
#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    fn get_users(&self) -> Result<Vec<User>>;
    fn get_user(&self, user_id: &str) -> Result<User>;
    fn find_credentials_by_email(&self, email: &str) -> Result<Option<UserCredentials>>;
    async fn create_user(&self, new_user: NewUser) -> Result<User>;
    /// Updates a user on behalf of `acting_user_id`.
    async fn update_user(
        &self,
        acting_user_id: &str,
        user_id: &str,
        update: UserUpdate,
    ) -> Result<User>;
    async fn delete_user(&self, acting_user_id: &str, user_id: &str) -> Result<()>;
    /// Creates `admin` when no user exists yet. Returns the created user, if any.
    async fn ensure_bootstrap_admin(&self, admin: NewUser) -> Result<Option<User>>;
}
