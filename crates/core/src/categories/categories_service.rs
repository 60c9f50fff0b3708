use async_trait::async_trait;
use std::sync::Arc;

use super::categories_model::{Category, NewCategory};
use super::categories_traits::{CategoryRepositoryTrait, CategoryServiceTrait};
use crate::errors::{Error, Result};

pub struct CategoryService {
    repository: Arc<dyn CategoryRepositoryTrait>,
}

impl CategoryService {
    pub fn new(repository: Arc<dyn CategoryRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn ensure_unique_name(&self, name: &str, except_id: Option<&str>) -> Result<()> {
        match self.repository.find_by_name(name)? {
            Some(existing) if Some(existing.id.as_str()) != except_id => Err(
                Error::ConstraintViolation(format!("Category '{}' already exists", name)),
            ),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl CategoryServiceTrait for CategoryService {
    fn get_categories(&self) -> Result<Vec<Category>> {
        self.repository.list()
    }

    fn get_category(&self, category_id: &str) -> Result<Category> {
        self.repository.get_by_id(category_id)
    }

    async fn create_category(&self, mut new_category: NewCategory) -> Result<Category> {
        new_category.validate()?;
        self.ensure_unique_name(&new_category.name, None)?;
        self.repository.create(new_category).await
    }

    async fn update_category(&self, category_id: &str, mut update: NewCategory) -> Result<Category> {
        update.validate()?;
        self.repository.get_by_id(category_id)?;
        self.ensure_unique_name(&update.name, Some(category_id))?;
        self.repository.update(category_id, update).await
    }

    async fn delete_category(&self, category_id: &str) -> Result<()> {
        if self.repository.delete(category_id).await? == 0 {
            return Err(Error::not_found("Category", category_id));
        }
        Ok(())
    }
}
