//! Farewell messages shown to the customer at the end of checkout.

mod farewell_model;
mod farewell_service;
mod farewell_traits;

pub use farewell_model::{FarewellMessage, FarewellMessageUpdate, NewFarewellMessage};
pub use farewell_service::FarewellService;
pub use farewell_traits::{FarewellRepositoryTrait, FarewellServiceTrait};
