//! Pure sale pricing: line merging, stock checks, totals and change.
//!
//! Storage calls [`price_sale`] inside the write transaction with freshly read
//! products, so the stock check and the decrement see the same rows.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::transactions_model::NewTransactionItem;
use crate::constants::INVOICE_PREFIX;
use crate::errors::{Error, Result, ValidationError};
use crate::inventory::StockChange;
use crate::products::Product;
use crate::utils::money::round_money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

fn too_large(field: &str) -> Error {
    Error::Validation(ValidationError::field(field, "amount is too large"))
}

/// Sums line subtotals and applies tax, rounded half away from zero.
///
/// Fails with a validation error instead of overflowing.
pub fn calculate_totals<I>(line_subtotals: I, tax_rate: Decimal) -> Result<SaleTotals>
where
    I: IntoIterator<Item = Decimal>,
{
    let subtotal = line_subtotals
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, line| acc.checked_add(line))
        .map(round_money)
        .ok_or_else(|| too_large("subtotal"))?;
    let tax = subtotal
        .checked_mul(tax_rate)
        .map(round_money)
        .ok_or_else(|| too_large("tax"))?;
    let total = subtotal
        .checked_add(tax)
        .ok_or_else(|| too_large("total"))?;
    Ok(SaleTotals {
        subtotal,
        tax,
        total,
    })
}

/// Sums quantities of repeated products, keeping first-seen order.
pub fn merge_lines(items: Vec<NewTransactionItem>) -> Result<Vec<NewTransactionItem>> {
    let mut merged: Vec<NewTransactionItem> = Vec::with_capacity(items.len());
    let mut positions: HashMap<String, usize> = HashMap::new();
    for item in items {
        match positions.get(&item.product_id) {
            Some(&pos) => {
                merged[pos].quantity = merged[pos]
                    .quantity
                    .checked_add(item.quantity)
                    .ok_or_else(|| too_large("items.quantity"))?;
            }
            None => {
                positions.insert(item.product_id.clone(), merged.len());
                merged.push(item);
            }
        }
    }
    Ok(merged)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub product_id: String,
    pub product_name: String,
    pub sku: String,
    pub quantity: i64,
    pub price: Decimal,
    pub subtotal: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricedSale {
    pub lines: Vec<PricedLine>,
    pub totals: SaleTotals,
    pub payment_amount: Decimal,
    pub change_amount: Decimal,
    pub stock_changes: Vec<StockChange>,
}

/// Prices merged sale lines against current product rows.
///
/// The whole sale is rejected if any product is unknown, inactive or short
/// on stock, or if the payment does not cover the total.
pub fn price_sale(
    items: &[NewTransactionItem],
    products: &HashMap<String, Product>,
    payment_amount: Decimal,
    tax_rate: Decimal,
) -> Result<PricedSale> {
    let mut lines = Vec::with_capacity(items.len());
    let mut stock_changes = Vec::with_capacity(items.len());

    for item in items {
        let product = products
            .get(&item.product_id)
            .ok_or_else(|| Error::not_found("Product", item.product_id.clone()))?;
        if !product.is_active {
            return Err(Error::Validation(ValidationError::field(
                "items.productId",
                format!("product {} is not available for sale", product.sku),
            )));
        }
        if !product.has_available(item.quantity) {
            return Err(Error::InsufficientStock {
                product_id: product.id.clone(),
                sku: product.sku.clone(),
                requested: item.quantity,
                available: product.stock,
            });
        }
        let subtotal = product
            .price
            .checked_mul(Decimal::from(item.quantity))
            .ok_or_else(|| too_large("items.quantity"))?;
        let stock_after = product
            .stock
            .checked_sub(item.quantity)
            .ok_or_else(|| too_large("items.quantity"))?;
        lines.push(PricedLine {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            sku: product.sku.clone(),
            quantity: item.quantity,
            price: product.price,
            subtotal,
        });
        stock_changes.push(StockChange::new(product, stock_after));
    }

    let totals = calculate_totals(lines.iter().map(|l| l.subtotal), tax_rate)?;
    if payment_amount < totals.total {
        return Err(Error::InsufficientPayment {
            paid: payment_amount.to_string(),
            total: totals.total.to_string(),
        });
    }
    let change_amount = payment_amount
        .checked_sub(totals.total)
        .ok_or_else(|| too_large("paymentAmount"))?;

    Ok(PricedSale {
        lines,
        totals,
        payment_amount,
        change_amount,
        stock_changes,
    })
}

/// `INV-YYYYMMDD-NNNN`, where `sequence` is 1-based within the day.
pub fn invoice_number(date: NaiveDate, sequence: i64) -> String {
    format!("{}-{}-{:04}", INVOICE_PREFIX, date.format("%Y%m%d"), sequence)
}
