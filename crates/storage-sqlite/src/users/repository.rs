use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use super::model::UserDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, OrNotFound};
use crate::schema::users;
use crate::utils::now_naive;
use retailpos_core::users::{
    ensure_admin_remains, NewUser, Role, User, UserCredentials, UserRepositoryTrait, UserUpdate,
};
use retailpos_core::Result;

pub struct UserRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl UserRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn load_user(conn: &mut SqliteConnection, user_id: &str) -> Result<UserDB> {
    users::table
        .find(user_id)
        .select(UserDB::as_select())
        .first(conn)
        .or_not_found("User", user_id)
}

fn count_active_admins(conn: &mut SqliteConnection) -> Result<i64> {
    users::table
        .filter(users::role.eq(Role::Admin.as_str()))
        .filter(users::is_active.eq(true))
        .count()
        .get_result(conn)
        .into_core()
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    fn list(&self) -> Result<Vec<User>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = users::table
            .select(UserDB::as_select())
            .order(users::name.asc())
            .load(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    fn get_by_id(&self, user_id: &str) -> Result<User> {
        let mut conn = get_connection(&self.pool)?;
        load_user(&mut conn, user_id).map(User::from)
    }

    fn find_credentials_by_email(&self, email: &str) -> Result<Option<UserCredentials>> {
        let mut conn = get_connection(&self.pool)?;
        let row = users::table
            .filter(users::email.eq(email))
            .select(UserDB::as_select())
            .first(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(UserCredentials::from))
    }

    fn count_users(&self) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        users::table.count().get_result(&mut conn).into_core()
    }

    async fn create(&self, new_user: NewUser) -> Result<User> {
        self.writer
            .exec(move |conn| -> Result<User> {
                let now = now_naive();
                let row = UserDB {
                    id: Uuid::new_v4().to_string(),
                    name: new_user.name,
                    email: new_user.email,
                    role: new_user.role.as_str().to_string(),
                    password_hash: new_user.password_hash,
                    is_active: new_user.is_active,
                    created_at: now,
                    updated_at: now,
                };
                diesel::insert_into(users::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(User::from(row))
            })
            .await
    }

    async fn update(&self, user_id: &str, update: UserUpdate) -> Result<User> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn| -> Result<User> {
                let mut row = load_user(conn, &user_id)?;
                let before = User::from(row.clone());
                if let Some(name) = update.name {
                    row.name = name;
                }
                if let Some(email) = update.email {
                    row.email = email;
                }
                if let Some(role) = update.role {
                    row.role = role.as_str().to_string();
                }
                if let Some(is_active) = update.is_active {
                    row.is_active = is_active;
                }
                if let Some(hash) = update.password_hash {
                    row.password_hash = hash;
                }
                row.updated_at = now_naive();
                let after = User::from(row.clone());
                ensure_admin_remains(&before, Some(&after), count_active_admins(conn)?)?;

                diesel::update(users::table.find(&row.id))
                    .set((
                        users::name.eq(&row.name),
                        users::email.eq(&row.email),
                        users::role.eq(&row.role),
                        users::is_active.eq(row.is_active),
                        users::password_hash.eq(&row.password_hash),
                        users::updated_at.eq(row.updated_at),
                    ))
                    .execute(conn)
                    .into_core()?;
                Ok(User::from(row))
            })
            .await
    }

    async fn delete(&self, user_id: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn| -> Result<usize> {
                let before = User::from(load_user(conn, &user_id)?);
                ensure_admin_remains(&before, None, count_active_admins(conn)?)?;
                diesel::delete(users::table.find(user_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations, spawn_writer};
    use retailpos_core::errors::Error;
    use tempfile::tempdir;

    async fn setup() -> (UserRepository, tempfile::TempDir) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let pool = create_pool(&db_path.to_string_lossy()).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        let writer = spawn_writer((*pool).clone());
        (UserRepository::new(pool, writer), temp_dir)
    }

    async fn admin(repo: &UserRepository, email: &str) -> User {
        repo.create(NewUser {
            name: email.to_string(),
            email: email.to_string(),
            role: Role::Admin,
            password_hash: "hash".to_string(),
            is_active: true,
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_concurrent_demotions_keep_one_admin() {
        let (repo, _dir) = setup().await;
        let first = admin(&repo, "first@shop.test").await;
        let second = admin(&repo, "second@shop.test").await;
        let demote = || UserUpdate {
            role: Some(Role::Cashier),
            ..Default::default()
        };

        let (a, b) = tokio::join!(
            repo.update(&first.id, demote()),
            repo.update(&second.id, demote())
        );
        let failures = [&a, &b]
            .iter()
            .filter(|r| matches!(r, Err(Error::ConstraintViolation(_))))
            .count();
        assert_eq!(failures, 1, "{:?} / {:?}", a, b);

        let admins = repo
            .list()
            .unwrap()
            .into_iter()
            .filter(User::is_active_admin)
            .count();
        assert_eq!(admins, 1);
    }

    #[tokio::test]
    async fn test_last_admin_cannot_be_deactivated_or_deleted() {
        let (repo, _dir) = setup().await;
        let only = admin(&repo, "only@shop.test").await;

        let err = repo
            .update(
                &only.id,
                UserUpdate {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ConstraintViolation(_)));

        let err = repo.delete(&only.id).await.unwrap_err();
        assert!(matches!(err, Error::ConstraintViolation(_)));
        assert!(repo.get_by_id(&only.id).unwrap().is_active);

        let spare = admin(&repo, "spare@shop.test").await;
        assert_eq!(repo.delete(&spare.id).await.unwrap(), 1);
    }
}
