use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use std::sync::Arc;

use super::products_model::{normalize_sku, NewProduct, Product, ProductSearch, ProductUpdate};
use super::products_traits::{ProductRepositoryTrait, ProductServiceTrait};
use crate::categories::CategoryRepositoryTrait;
use crate::errors::{Error, Result};
use crate::utils::pagination::{normalize_page, Paginated};

/// Service for managing the product catalogue.
pub struct ProductService {
    repository: Arc<dyn ProductRepositoryTrait>,
    category_repository: Arc<dyn CategoryRepositoryTrait>,
}

impl ProductService {
    pub fn new(
        repository: Arc<dyn ProductRepositoryTrait>,
        category_repository: Arc<dyn CategoryRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            category_repository,
        }
    }

    fn ensure_sku_free(&self, sku: &str, except_id: Option<&str>) -> Result<()> {
        match self.repository.find_by_sku(sku)? {
            Some(existing) if Some(existing.id.as_str()) != except_id => Err(
                Error::ConstraintViolation(format!("SKU '{}' is already in use", sku)),
            ),
            _ => Ok(()),
        }
    }

    fn ensure_category_exists(&self, category_id: Option<&str>) -> Result<()> {
        if let Some(category_id) = category_id.filter(|c| !c.trim().is_empty()) {
            self.category_repository.get_by_id(category_id)?;
        }
        Ok(())
    }
}

#[async_trait]
impl ProductServiceTrait for ProductService {
    fn get_product(&self, product_id: &str) -> Result<Product> {
        self.repository.get_by_id(product_id)
    }

    fn get_product_by_sku(&self, sku: &str) -> Result<Product> {
        let sku = normalize_sku(sku)?;
        self.repository
            .find_by_sku(&sku)?
            .ok_or_else(|| Error::not_found("Product", sku))
    }

    fn search_products(&self, mut search: ProductSearch) -> Result<Paginated<Product>> {
        let (page, page_size) = normalize_page(search.page, search.page_size);
        search.page = Some(page);
        search.page_size = Some(page_size);
        search.keyword = search
            .keyword
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        self.repository.search(&search)
    }

    fn get_low_stock_products(&self) -> Result<Vec<Product>> {
        self.repository.list_low_stock()
    }

    fn get_reorder_products(&self) -> Result<Vec<Product>> {
        self.repository.list_reorder()
    }

    async fn create_product(
        &self,
        mut new_product: NewProduct,
        user_id: Option<String>,
    ) -> Result<Product> {
        new_product.validate()?;
        self.ensure_sku_free(&new_product.sku, None)?;
        self.ensure_category_exists(new_product.category_id.as_deref())?;
        debug!(
            "Creating product {} with initial stock {}",
            new_product.sku, new_product.stock
        );
        self.repository.create(new_product, user_id).await
    }

    async fn update_product(&self, product_id: &str, mut update: ProductUpdate) -> Result<Product> {
        let mut product = self.repository.get_by_id(product_id)?;
        update.validate(&product)?;
        if let Some(sku) = &update.sku {
            self.ensure_sku_free(sku, Some(product_id))?;
        }
        self.ensure_category_exists(update.category_id.as_deref())?;

        update.apply_to(&mut product);
        product.updated_at = Utc::now();
        self.repository.update(product).await
    }

    async fn delete_product(&self, product_id: &str) -> Result<Option<Product>> {
        let mut product = self.repository.get_by_id(product_id)?;
        if self.repository.has_sales(product_id)? {
            info!(
                "Product {} has sale history, deactivating instead of deleting",
                product.sku
            );
            product.is_active = false;
            product.updated_at = Utc::now();
            return self.repository.update(product).await.map(Some);
        }
        self.repository.delete(product_id).await?;
        Ok(None)
    }
}
