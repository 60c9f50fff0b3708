//! Product repository and service traits.

use async_trait::async_trait;

use super::products_model::{NewProduct, Product, ProductSearch, ProductUpdate};
use crate::errors::Result;
use crate::utils::pagination::Paginated;

/// Persistence contract for products.
#[async_trait]
pub trait ProductRepositoryTrait: Send + Sync {
    fn get_by_id(&self, product_id: &str) -> Result<Product>;
    fn get_by_ids(&self, product_ids: &[String]) -> Result<Vec<Product>>;
    /// Looks a product up by its normalized (uppercase) SKU.
    fn find_by_sku(&self, sku: &str) -> Result<Option<Product>>;
    fn search(&self, search: &ProductSearch) -> Result<Paginated<Product>>;
    /// Active products at or below their low stock threshold.
    fn list_low_stock(&self) -> Result<Vec<Product>>;
    /// Active products at or below their reorder point.
    fn list_reorder(&self) -> Result<Vec<Product>>;
    /// Whether any transaction line references the product.
    fn has_sales(&self, product_id: &str) -> Result<bool>;

    /// Inserts the product and, when it starts with stock, an `Initial`
    /// inventory movement in the same transaction.
    async fn create(&self, new_product: NewProduct, user_id: Option<String>) -> Result<Product>;
    async fn update(&self, product: Product) -> Result<Product>;
    async fn delete(&self, product_id: &str) -> Result<usize>;
}

/// Business operations on products.
#[async_trait]
pub trait ProductServiceTrait: Send + Sync {
    fn get_product(&self, product_id: &str) -> Result<Product>;
    fn get_product_by_sku(&self, sku: &str) -> Result<Product>;
    fn search_products(&self, search: ProductSearch) -> Result<Paginated<Product>>;
    fn get_low_stock_products(&self) -> Result<Vec<Product>>;
    fn get_reorder_products(&self) -> Result<Vec<Product>>;
    async fn create_product(&self, new_product: NewProduct, user_id: Option<String>)
        -> Result<Product>;
    async fn update_product(&self, product_id: &str, update: ProductUpdate) -> Result<Product>;
    /// Deletes a product, or deactivates it when it has sale history.
    /// Returns the deactivated product in the latter case.
    async fn delete_product(&self, product_id: &str) -> Result<Option<Product>>;
}
