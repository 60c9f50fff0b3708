//! Staff notifications raised from domain events.

mod notifications_model;
mod notifications_service;
mod notifications_traits;

pub use notifications_model::{NewNotification, Notification, NotificationKind, NotificationQuery};
pub use notifications_service::NotificationService;
pub use notifications_traits::{NotificationRepositoryTrait, NotificationServiceTrait};
