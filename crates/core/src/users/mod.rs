//! Users module - staff accounts, roles and permissions.

mod users_model;
mod users_service;
mod users_traits;

#[cfg(test)]
mod users_service_tests;

pub(crate) use users_model::normalize_email;
pub use users_model::{
    ensure_admin_remains, NewUser, Permission, Role, User, UserCredentials, UserUpdate,
};
pub use users_service::UserService;
pub use users_traits::{UserRepositoryTrait, UserServiceTrait};
