use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, Mutex};

use super::*;
use crate::errors::{Error, Result};

#[derive(Clone, Default)]
struct MockUserRepository {
    users: Arc<Mutex<Vec<(User, String)>>>,
}

fn active_admins(users: &[(User, String)]) -> i64 {
    users.iter().filter(|(u, _)| u.is_active_admin()).count() as i64
}

impl MockUserRepository {
    fn with_users(users: Vec<User>) -> Self {
        let repo = Self::default();
        for user in users {
            repo.users
                .lock()
                .unwrap()
                .push((user, "hash".to_string()));
        }
        repo
    }
}

fn user(id: &str, role: Role, is_active: bool) -> User {
    User {
        id: id.to_string(),
        name: format!("User {}", id),
        email: format!("{}@shop.test", id),
        role,
        is_active,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[async_trait]
impl UserRepositoryTrait for MockUserRepository {
    fn list(&self) -> Result<Vec<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .map(|(u, _)| u.clone())
            .collect())
    }

    fn get_by_id(&self, user_id: &str) -> Result<User> {
        self.list()?
            .into_iter()
            .find(|u| u.id == user_id)
            .ok_or_else(|| Error::not_found("User", user_id))
    }

    fn find_credentials_by_email(&self, email: &str) -> Result<Option<UserCredentials>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|(u, _)| u.email == email)
            .map(|(u, h)| UserCredentials {
                user: u.clone(),
                password_hash: h.clone(),
            }))
    }

    fn count_users(&self) -> Result<i64> {
        Ok(self.users.lock().unwrap().len() as i64)
    }

    async fn create(&self, new_user: NewUser) -> Result<User> {
        let mut created = user(&format!("u{}", self.count_users()? + 1), new_user.role, true);
        created.email = new_user.email;
        created.name = new_user.name;
        self.users
            .lock()
            .unwrap()
            .push((created.clone(), new_user.password_hash));
        Ok(created)
    }

    async fn update(&self, user_id: &str, update: UserUpdate) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        let admins = active_admins(&users);
        let (existing, _) = users
            .iter_mut()
            .find(|(u, _)| u.id == user_id)
            .ok_or_else(|| Error::not_found("User", user_id))?;
        let mut updated = existing.clone();
        if let Some(role) = update.role {
            updated.role = role;
        }
        if let Some(active) = update.is_active {
            updated.is_active = active;
        }
        if let Some(email) = update.email {
            updated.email = email;
        }
        ensure_admin_remains(existing, Some(&updated), admins)?;
        *existing = updated.clone();
        Ok(updated)
    }

    async fn delete(&self, user_id: &str) -> Result<usize> {
        let mut users = self.users.lock().unwrap();
        let admins = active_admins(&users);
        if let Some((existing, _)) = users.iter().find(|(u, _)| u.id == user_id) {
            ensure_admin_remains(existing, None, admins)?;
        }
        let before = users.len();
        users.retain(|(u, _)| u.id != user_id);
        Ok(before - users.len())
    }
}

#[tokio::test]
async fn test_last_admin_cannot_be_demoted() {
    let repo = MockUserRepository::with_users(vec![
        user("admin", Role::Admin, true),
        user("boss", Role::Manager, true),
    ]);
    let service = UserService::new(Arc::new(repo));

    let result = service
        .update_user(
            "boss",
            "admin",
            UserUpdate {
                role: Some(Role::Cashier),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(Error::ConstraintViolation(_))));
}

#[tokio::test]
async fn test_last_admin_cannot_be_deleted() {
    let repo = MockUserRepository::with_users(vec![
        user("admin", Role::Admin, true),
        user("boss", Role::Manager, true),
    ]);
    let service = UserService::new(Arc::new(repo.clone()));

    let result = service.delete_user("boss", "admin").await;
    assert!(matches!(result, Err(Error::ConstraintViolation(_))));
    assert_eq!(repo.count_users().unwrap(), 2);
}

#[tokio::test]
async fn test_admin_can_be_demoted_when_another_exists() {
    let repo = MockUserRepository::with_users(vec![
        user("a1", Role::Admin, true),
        user("a2", Role::Admin, true),
    ]);
    let service = UserService::new(Arc::new(repo));

    let updated = service
        .update_user(
            "a1",
            "a2",
            UserUpdate {
                role: Some(Role::Manager),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.role, Role::Manager);
}

#[tokio::test]
async fn test_user_cannot_delete_or_deactivate_self() {
    let repo = MockUserRepository::with_users(vec![
        user("a1", Role::Admin, true),
        user("a2", Role::Admin, true),
    ]);
    let service = UserService::new(Arc::new(repo));

    assert!(matches!(
        service.delete_user("a1", "a1").await,
        Err(Error::PermissionDenied(_))
    ));
    let deactivate = UserUpdate {
        is_active: Some(false),
        ..Default::default()
    };
    assert!(matches!(
        service.update_user("a1", "a1", deactivate).await,
        Err(Error::PermissionDenied(_))
    ));
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let repo = MockUserRepository::with_users(vec![user("a1", Role::Admin, true)]);
    let service = UserService::new(Arc::new(repo));

    let result = service
        .create_user(NewUser {
            name: "Copy".to_string(),
            email: "A1@shop.test".to_string(),
            role: Role::Cashier,
            password_hash: "hash".to_string(),
            is_active: true,
        })
        .await;
    assert!(matches!(result, Err(Error::ConstraintViolation(_))));
}

#[tokio::test]
async fn test_bootstrap_admin_only_when_empty() {
    let repo = MockUserRepository::default();
    let service = UserService::new(Arc::new(repo.clone()));
    let admin = NewUser {
        name: "Owner".to_string(),
        email: "owner@shop.test".to_string(),
        role: Role::Cashier,
        password_hash: "hash".to_string(),
        is_active: false,
    };

    let created = service
        .ensure_bootstrap_admin(admin.clone())
        .await
        .unwrap()
        .expect("admin should be created");
    assert_eq!(created.role, Role::Admin);
    assert!(created.is_active);

    assert!(service.ensure_bootstrap_admin(admin).await.unwrap().is_none());
    assert_eq!(repo.count_users().unwrap(), 1);
}
