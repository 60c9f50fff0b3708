use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;

use super::users_model::{NewUser, Role, User, UserCredentials, UserUpdate};
use super::users_traits::{UserRepositoryTrait, UserServiceTrait};
use crate::errors::{Error, Result};

/// Service for managing staff users.
pub struct UserService {
    repository: Arc<dyn UserRepositoryTrait>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl UserServiceTrait for UserService {
    fn get_users(&self) -> Result<Vec<User>> {
        self.repository.list()
    }

    fn get_user(&self, user_id: &str) -> Result<User> {
        self.repository.get_by_id(user_id)
    }

    fn find_credentials_by_email(&self, email: &str) -> Result<Option<UserCredentials>> {
        self.repository
            .find_credentials_by_email(&email.trim().to_lowercase())
    }

    async fn create_user(&self, mut new_user: NewUser) -> Result<User> {
        new_user.validate()?;
        if self
            .repository
            .find_credentials_by_email(&new_user.email)?
            .is_some()
        {
            return Err(Error::ConstraintViolation(format!(
                "A user with email '{}' already exists",
                new_user.email
            )));
        }
        debug!("Creating {} user {}", new_user.role, new_user.email);
        self.repository.create(new_user).await
    }

    async fn update_user(
        &self,
        acting_user_id: &str,
        user_id: &str,
        mut update: UserUpdate,
    ) -> Result<User> {
        update.validate()?;
        let existing = self.repository.get_by_id(user_id)?;

        let deactivating = update.is_active == Some(false) && existing.is_active;

        if acting_user_id == user_id && deactivating {
            return Err(Error::PermissionDenied(
                "You cannot deactivate your own account".to_string(),
            ));
        }
        if let Some(email) = &update.email {
            if let Some(other) = self.repository.find_credentials_by_email(email)? {
                if other.user.id != user_id {
                    return Err(Error::ConstraintViolation(format!(
                        "A user with email '{}' already exists",
                        email
                    )));
                }
            }
        }

        self.repository.update(user_id, update).await
    }

    async fn delete_user(&self, acting_user_id: &str, user_id: &str) -> Result<()> {
        if acting_user_id == user_id {
            return Err(Error::PermissionDenied(
                "You cannot delete your own account".to_string(),
            ));
        }
        self.repository.get_by_id(user_id)?;
        self.repository.delete(user_id).await?;
        Ok(())
    }

    async fn ensure_bootstrap_admin(&self, mut admin: NewUser) -> Result<Option<User>> {
        if self.repository.count_users()? > 0 {
            return Ok(None);
        }
        admin.role = Role::Admin;
        admin.is_active = true;
        admin.validate()?;
        let created = self.repository.create(admin).await?;
        info!("Created bootstrap administrator {}", created.email);
        Ok(Some(created))
    }
}
