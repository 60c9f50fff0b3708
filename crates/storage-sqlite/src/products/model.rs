//! Database models for products.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::utils::{parse_decimal, parse_optional_decimal, to_utc};
use retailpos_core::products::Product;

/// Money columns are TEXT so no precision is lost.
#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::products)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
pub struct ProductDB {
    pub id: String,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub price: String,
    pub cost_price: Option<String>,
    pub stock: i64,
    pub low_stock_threshold: i64,
    pub reorder_point: i64,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<ProductDB> for Product {
    fn from(db: ProductDB) -> Self {
        Self {
            price: parse_decimal(&db.price, "price"),
            cost_price: parse_optional_decimal(db.cost_price.as_deref(), "cost_price"),
            id: db.id,
            sku: db.sku,
            name: db.name,
            description: db.description,
            category_id: db.category_id,
            stock: db.stock,
            low_stock_threshold: db.low_stock_threshold,
            reorder_point: db.reorder_point,
            is_active: db.is_active,
            created_at: to_utc(db.created_at),
            updated_at: to_utc(db.updated_at),
        }
    }
}

impl From<Product> for ProductDB {
    fn from(domain: Product) -> Self {
        Self {
            id: domain.id,
            sku: domain.sku,
            name: domain.name,
            description: domain.description,
            category_id: domain.category_id,
            price: domain.price.to_string(),
            cost_price: domain.cost_price.map(|c| c.to_string()),
            stock: domain.stock,
            low_stock_threshold: domain.low_stock_threshold,
            reorder_point: domain.reorder_point,
            is_active: domain.is_active,
            created_at: domain.created_at.naive_utc(),
            updated_at: domain.updated_at.naive_utc(),
        }
    }
}
