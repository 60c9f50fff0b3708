//! Product domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_LOW_STOCK_THRESHOLD, DEFAULT_REORDER_POINT, MAX_MONEY_AMOUNT, MAX_SKU_LENGTH,
};
use crate::errors::{Error, Result, ValidationError};

/// Stock level classification derived from thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    OutOfStock,
    LowStock,
    ReorderSuggested,
    InStock,
}

impl StockStatus {
    pub fn classify(stock: i64, low_stock_threshold: i64, reorder_point: i64) -> Self {
        if stock <= 0 {
            StockStatus::OutOfStock
        } else if stock <= low_stock_threshold {
            StockStatus::LowStock
        } else if stock <= reorder_point {
            StockStatus::ReorderSuggested
        } else {
            StockStatus::InStock
        }
    }
}

/// Domain model representing a sellable product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub price: Decimal,
    pub cost_price: Option<Decimal>,
    pub stock: i64,
    pub low_stock_threshold: i64,
    pub reorder_point: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn stock_status(&self) -> StockStatus {
        StockStatus::classify(self.stock, self.low_stock_threshold, self.reorder_point)
    }

    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.low_stock_threshold
    }

    pub fn needs_reorder(&self) -> bool {
        self.stock <= self.reorder_point
    }

    pub fn has_available(&self, quantity: i64) -> bool {
        quantity > 0 && self.stock >= quantity
    }
}

/// Input model for creating a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub price: Decimal,
    pub cost_price: Option<Decimal>,
    #[serde(default)]
    pub stock: i64,
    pub low_stock_threshold: Option<i64>,
    pub reorder_point: Option<i64>,
}

/// Partial update of a product. Stock is changed only through inventory
/// adjustments and sales.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub price: Option<Decimal>,
    pub cost_price: Option<Decimal>,
    pub low_stock_threshold: Option<i64>,
    pub reorder_point: Option<i64>,
    pub is_active: Option<bool>,
}

/// Filters for product listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSearch {
    pub keyword: Option<String>,
    pub category_id: Option<String>,
    pub stock_status: Option<StockStatus>,
    #[serde(default)]
    pub include_inactive: bool,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

pub(crate) fn normalize_sku(sku: &str) -> Result<String> {
    let sku = sku.trim().to_uppercase();
    if sku.is_empty() {
        return Err(Error::Validation(ValidationError::MissingField(
            "sku".to_string(),
        )));
    }
    if sku.len() > MAX_SKU_LENGTH {
        return Err(Error::Validation(ValidationError::field(
            "sku",
            format!("must be at most {} characters", MAX_SKU_LENGTH),
        )));
    }
    if sku.chars().any(char::is_whitespace) {
        return Err(Error::Validation(ValidationError::field(
            "sku",
            "must not contain whitespace",
        )));
    }
    Ok(sku)
}

fn validate_money(field: &str, amount: Decimal) -> Result<()> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(Error::Validation(ValidationError::field(
            field,
            "must not be negative",
        )));
    }
    if amount > MAX_MONEY_AMOUNT {
        return Err(Error::Validation(ValidationError::field(
            field,
            format!("must be at most {}", MAX_MONEY_AMOUNT),
        )));
    }
    Ok(())
}

pub(crate) fn validate_thresholds(low_stock_threshold: i64, reorder_point: i64) -> Result<()> {
    if low_stock_threshold < 0 {
        return Err(Error::Validation(ValidationError::field(
            "lowStockThreshold",
            "must not be negative",
        )));
    }
    if reorder_point < low_stock_threshold {
        return Err(Error::Validation(ValidationError::field(
            "reorderPoint",
            "must be greater than or equal to the low stock threshold",
        )));
    }
    Ok(())
}

fn clean_optional(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

impl NewProduct {
    /// Validates and normalizes the input in place.
    pub fn validate(&mut self) -> Result<()> {
        self.sku = normalize_sku(&self.sku)?;
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "name".to_string(),
            )));
        }
        validate_money("price", self.price)?;
        if let Some(cost) = self.cost_price {
            validate_money("costPrice", cost)?;
        }
        if self.stock < 0 {
            return Err(Error::Validation(ValidationError::field(
                "stock",
                "must not be negative",
            )));
        }
        let low = *self
            .low_stock_threshold
            .get_or_insert(DEFAULT_LOW_STOCK_THRESHOLD);
        let reorder = *self.reorder_point.get_or_insert(DEFAULT_REORDER_POINT.max(low));
        validate_thresholds(low, reorder)?;
        self.description = clean_optional(self.description.take());
        self.category_id = clean_optional(self.category_id.take());
        Ok(())
    }
}

impl ProductUpdate {
    /// Validates the fields present and checks thresholds against `current`.
    pub fn validate(&mut self, current: &Product) -> Result<()> {
        if let Some(sku) = &self.sku {
            self.sku = Some(normalize_sku(sku)?);
        }
        if let Some(name) = &self.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(Error::Validation(ValidationError::MissingField(
                    "name".to_string(),
                )));
            }
            self.name = Some(name);
        }
        if let Some(price) = self.price {
            validate_money("price", price)?;
        }
        if let Some(cost) = self.cost_price {
            validate_money("costPrice", cost)?;
        }
        validate_thresholds(
            self.low_stock_threshold
                .unwrap_or(current.low_stock_threshold),
            self.reorder_point.unwrap_or(current.reorder_point),
        )?;
        Ok(())
    }

    /// Applies the update on top of `product`.
    pub fn apply_to(self, product: &mut Product) {
        if let Some(sku) = self.sku {
            product.sku = sku;
        }
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = clean_optional(Some(description));
        }
        if let Some(category_id) = self.category_id {
            product.category_id = clean_optional(Some(category_id));
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(cost) = self.cost_price {
            product.cost_price = Some(cost);
        }
        if let Some(low) = self.low_stock_threshold {
            product.low_stock_threshold = low;
        }
        if let Some(reorder) = self.reorder_point {
            product.reorder_point = reorder;
        }
        if let Some(active) = self.is_active {
            product.is_active = active;
        }
    }
}
