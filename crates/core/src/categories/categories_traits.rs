use async_trait::async_trait;

use super::categories_model::{Category, NewCategory};
use crate::errors::Result;

#[async_trait]
pub trait CategoryRepositoryTrait: Send + Sync {
    fn list(&self) -> Result<Vec<Category>>;
    fn get_by_id(&self, category_id: &str) -> Result<Category>;
    fn find_by_name(&self, name: &str) -> Result<Option<Category>>;
    async fn create(&self, new_category: NewCategory) -> Result<Category>;
    async fn update(&self, category_id: &str, update: NewCategory) -> Result<Category>;
    /// Deletes the category and detaches its products.
    async fn delete(&self, category_id: &str) -> Result<usize>;
}

#[async_trait]
pub trait CategoryServiceTrait: Send + Sync {
    fn get_categories(&self) -> Result<Vec<Category>>;
    fn get_category(&self, category_id: &str) -> Result<Category>;
    async fn create_category(&self, new_category: NewCategory) -> Result<Category>;
    async fn update_category(&self, category_id: &str, update: NewCategory) -> Result<Category>;
    async fn delete_category(&self, category_id: &str) -> Result<()>;
}
