use chrono::{DateTime, NaiveDate, Utc};
use retailpos_core::users::{NewUser, Role, User, UserUpdate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::hash_password;
use crate::error::{ApiError, ApiResult};

pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub email: String,
    #[schema(value_type = String, example = "cashier")]
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role,
            is_active: u.is_active,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[derive(Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    /// Seconds until the token expires.
    pub expires_in: u64,
    pub user: UserDto,
}

#[derive(Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    #[schema(value_type = String, example = "cashier")]
    pub role: Role,
    pub password: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

fn check_password(password: &str) -> ApiResult<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

impl CreateUserRequest {
    pub fn into_new_user(self) -> ApiResult<NewUser> {
        check_password(&self.password)?;
        Ok(NewUser {
            name: self.name,
            email: self.email,
            role: self.role,
            password_hash: hash_password(&self.password)?,
            is_active: self.is_active,
        })
    }
}

#[derive(Deserialize, ToSchema, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    #[schema(value_type = Option<String>)]
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    /// Replaces the password when present.
    pub password: Option<String>,
}

impl UpdateUserRequest {
    pub fn into_update(self) -> ApiResult<UserUpdate> {
        let password_hash = match self.password {
            Some(password) => {
                check_password(&password)?;
                Some(hash_password(&password)?)
            }
            None => None,
        };
        Ok(UserUpdate {
            name: self.name,
            email: self.email,
            role: self.role,
            is_active: self.is_active,
            password_hash,
        })
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct TopProductsQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<i64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct FarewellListQuery {
    #[serde(default)]
    pub active_only: bool,
}

#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CountResponse {
    pub count: i64,
}
