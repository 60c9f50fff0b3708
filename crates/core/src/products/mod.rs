//! Products module - catalogue, pricing and stock status.

mod products_model;
mod products_service;
mod products_traits;

#[cfg(test)]
mod products_service_tests;

pub use products_model::{NewProduct, Product, ProductSearch, ProductUpdate, StockStatus};
pub use products_service::ProductService;
pub use products_traits::{ProductRepositoryTrait, ProductServiceTrait};
