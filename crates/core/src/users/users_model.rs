//! User domain models.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::errors::{Error, Result, ValidationError};

/// Staff role. Each role maps to a fixed set of permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Cashier,
}

/// Actions guarded by role checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    ManageUsers,
    ManageSettings,
    ManageProducts,
    ManageCategories,
    AdjustStock,
    ManageFarewellMessages,
    ViewReports,
    ViewProducts,
    CreateSale,
    CancelSale,
    ViewFeedback,
    DeleteFeedback,
    ViewNotifications,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Cashier => "cashier",
        }
    }

    pub fn allows(&self, permission: Permission) -> bool {
        use Permission::*;
        match self {
            Role::Admin => true,
            Role::Manager => !matches!(permission, ManageUsers | ManageSettings),
            Role::Cashier => matches!(permission, ViewProducts | CreateSale),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" | "administrator" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "cashier" => Ok(Role::Cashier),
            other => Err(Error::Validation(ValidationError::field(
                "role",
                format!("unknown role '{}'", other),
            ))),
        }
    }
}

/// Domain model representing a staff user. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_active_admin(&self) -> bool {
        self.role == Role::Admin && self.is_active
    }
}

/// Rejects a change that would leave the store without an active admin.
///
/// `after` is the user as it will be stored, `None` when it is deleted.
/// `active_admins` must be counted in the same write transaction as the change.
pub fn ensure_admin_remains(before: &User, after: Option<&User>, active_admins: i64) -> Result<()> {
    let loses_admin = before.is_active_admin() && !after.is_some_and(User::is_active_admin);
    if loses_admin && active_admins <= 1 {
        return Err(Error::ConstraintViolation(
            "At least one active administrator is required".to_string(),
        ));
    }
    Ok(())
}

/// A user together with the stored password hash, used only for login.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Input model for creating a new user. The password is hashed by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Partial update for a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    })
}

/// Lowercases and checks an email address.
pub(crate) fn normalize_email(field: &str, email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    if !email_regex().is_match(&email) {
        return Err(Error::Validation(ValidationError::field(
            field,
            format!("'{}' is not a valid email address", email),
        )));
    }
    Ok(email)
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation(ValidationError::MissingField(
            "name".to_string(),
        )));
    }
    Ok(())
}

impl NewUser {
    pub fn validate(&mut self) -> Result<()> {
        validate_name(&self.name)?;
        self.name = self.name.trim().to_string();
        self.email = normalize_email("email", &self.email)?;
        if self.password_hash.is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "password".to_string(),
            )));
        }
        Ok(())
    }
}

impl UserUpdate {
    pub fn validate(&mut self) -> Result<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
            self.name = Some(name.trim().to_string());
        }
        if let Some(email) = &self.email {
            self.email = Some(normalize_email("email", email)?);
        }
        Ok(())
    }
}
