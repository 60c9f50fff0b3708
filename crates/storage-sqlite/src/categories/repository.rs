use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;
use uuid::Uuid;

use super::model::CategoryDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, OrNotFound};
use crate::schema::{categories, products};
use crate::utils::now_naive;
use retailpos_core::categories::{Category, CategoryRepositoryTrait, NewCategory};
use retailpos_core::Result;

pub struct CategoryRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl CategoryRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl CategoryRepositoryTrait for CategoryRepository {
    fn list(&self) -> Result<Vec<Category>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = categories::table
            .select(CategoryDB::as_select())
            .order(categories::name.asc())
            .load(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    fn get_by_id(&self, category_id: &str) -> Result<Category> {
        let mut conn = get_connection(&self.pool)?;
        categories::table
            .find(category_id)
            .select(CategoryDB::as_select())
            .first(&mut conn)
            .or_not_found("Category", category_id)
            .map(Category::from)
    }

    fn find_by_name(&self, name: &str) -> Result<Option<Category>> {
        let mut conn = get_connection(&self.pool)?;
        // name is declared COLLATE NOCASE
        let row = categories::table
            .filter(categories::name.eq(name))
            .select(CategoryDB::as_select())
            .first(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(Category::from))
    }

    async fn create(&self, new_category: NewCategory) -> Result<Category> {
        self.writer
            .exec(move |conn| -> Result<Category> {
                let now = now_naive();
                let row = CategoryDB {
                    id: Uuid::new_v4().to_string(),
                    name: new_category.name,
                    description: new_category.description,
                    created_at: now,
                    updated_at: now,
                };
                diesel::insert_into(categories::table)
                    .values(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(Category::from(row))
            })
            .await
    }

    async fn update(&self, category_id: &str, update: NewCategory) -> Result<Category> {
        let category_id = category_id.to_string();
        self.writer
            .exec(move |conn| -> Result<Category> {
                let mut row = categories::table
                    .find(&category_id)
                    .select(CategoryDB::as_select())
                    .first(conn)
                    .or_not_found("Category", &category_id)?;
                row.name = update.name;
                row.description = update.description;
                row.updated_at = now_naive();
                diesel::update(categories::table.find(&category_id))
                    .set(&row)
                    .execute(conn)
                    .into_core()?;
                Ok(Category::from(row))
            })
            .await
    }

    async fn delete(&self, category_id: &str) -> Result<usize> {
        let category_id = category_id.to_string();
        self.writer
            .exec(move |conn| -> Result<usize> {
                diesel::update(products::table.filter(products::category_id.eq(&category_id)))
                    .set(products::category_id.eq(None::<String>))
                    .execute(conn)
                    .into_core()?;
                diesel::delete(categories::table.find(&category_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }
}
