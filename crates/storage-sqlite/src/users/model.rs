//! Database models for users.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use log::warn;

use crate::utils::to_utc;
use retailpos_core::users::{Role, User, UserCredentials};

#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserDB {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Unknown roles fall back to the least privileged one.
fn parse_role(value: &str) -> Role {
    value.parse().unwrap_or_else(|_| {
        warn!("Unknown role '{}' in users table, treating as cashier", value);
        Role::Cashier
    })
}

impl From<UserDB> for User {
    fn from(db: UserDB) -> Self {
        Self {
            id: db.id,
            name: db.name,
            email: db.email,
            role: parse_role(&db.role),
            is_active: db.is_active,
            created_at: to_utc(db.created_at),
            updated_at: to_utc(db.updated_at),
        }
    }
}

impl From<UserDB> for UserCredentials {
    fn from(db: UserDB) -> Self {
        let password_hash = db.password_hash.clone();
        Self {
            user: User::from(db),
            password_hash,
        }
    }
}
