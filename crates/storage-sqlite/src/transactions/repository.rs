use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use diesel::SqliteConnection;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::model::{TransactionDB, TransactionItemDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, OrNotFound};
use crate::inventory::record_movement;
use crate::products::{load_product, load_products_by_ids, set_stock};
use crate::schema::{transaction_items, transactions};
use crate::utils::{chunk_for_sqlite, like_pattern, now_naive};
use retailpos_core::constants::TAX_RATE;
use retailpos_core::errors::Error;
use retailpos_core::inventory::{MovementType, NewInventoryMovement, StockChange};
use retailpos_core::products::Product;
use retailpos_core::transactions::{
    invoice_number, price_sale, NewTransaction, SaleOutcome, Transaction,
    TransactionRepositoryTrait, TransactionSearch, TransactionStatus,
};
use retailpos_core::utils::pagination::{normalize_page, page_offset, Paginated};
use retailpos_core::utils::time_utils::{end_of_day_exclusive, start_of_day};
use retailpos_core::Result;

pub struct TransactionRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl TransactionRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn load_transaction(conn: &mut SqliteConnection, transaction_id: &str) -> Result<Transaction> {
    let row = transactions::table
        .find(transaction_id)
        .select(TransactionDB::as_select())
        .first(conn)
        .or_not_found("Transaction", transaction_id)?;
    let items = TransactionItemDB::belonging_to(&row)
        .select(TransactionItemDB::as_select())
        .order(transaction_items::product_name.asc())
        .load(conn)
        .into_core()?;
    Ok(row.into_domain(items))
}

/// Attaches item rows to a page of transaction rows, keeping row order.
fn with_items(conn: &mut SqliteConnection, rows: Vec<TransactionDB>) -> Result<Vec<Transaction>> {
    let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
    let mut items = Vec::new();
    for chunk in chunk_for_sqlite(&ids) {
        items.extend(
            transaction_items::table
                .filter(transaction_items::transaction_id.eq_any(chunk))
                .select(TransactionItemDB::as_select())
                .order(transaction_items::product_name.asc())
                .load(conn)
                .into_core()?,
        );
    }
    let grouped = items.grouped_by(&rows);
    Ok(rows
        .into_iter()
        .zip(grouped)
        .map(|(row, items)| row.into_domain(items))
        .collect())
}

fn filtered(search: &TransactionSearch) -> transactions::BoxedQuery<'static, Sqlite> {
    let mut query = transactions::table.into_boxed();
    if let Some(status) = search.status {
        query = query.filter(transactions::status.eq(status.as_str()));
    }
    if let Some(user_id) = &search.user_id {
        query = query.filter(transactions::user_id.eq(user_id.clone()));
    }
    if let Some(keyword) = &search.keyword {
        let pattern = like_pattern(keyword);
        query = query.filter(
            transactions::invoice_number
                .like(pattern.clone())
                .escape('\\')
                .or(transactions::customer_name.like(pattern).escape('\\')),
        );
    }
    if let Some(from) = search.date_from {
        query = query.filter(transactions::created_at.ge(start_of_day(from).naive_utc()));
    }
    if let Some(to) = search.date_to {
        query = query.filter(transactions::created_at.lt(end_of_day_exclusive(to).naive_utc()));
    }
    query
}

/// Next invoice number for the UTC day of `created_at`, the sale's own timestamp.
fn next_invoice_number(conn: &mut SqliteConnection, created_at: NaiveDateTime) -> Result<String> {
    let today = created_at.date();
    let issued_today: i64 = transactions::table
        .filter(transactions::created_at.ge(start_of_day(today).naive_utc()))
        .filter(transactions::created_at.lt(end_of_day_exclusive(today).naive_utc()))
        .count()
        .get_result(conn)
        .into_core()?;
    Ok(invoice_number(today, issued_today + 1))
}

fn write_sale(
    conn: &mut SqliteConnection,
    sale: NewTransaction,
    user_id: String,
    farewell_message: Option<String>,
) -> Result<SaleOutcome> {
    let product_ids: Vec<String> = sale.items.iter().map(|i| i.product_id.clone()).collect();
    let catalogue: HashMap<String, Product> = load_products_by_ids(conn, &product_ids)?
        .into_iter()
        .map(|row| (row.id.clone(), Product::from(row)))
        .collect();

    let priced = price_sale(&sale.items, &catalogue, sale.payment_amount, TAX_RATE)?;

    let now = now_naive();
    let transaction_id = Uuid::new_v4().to_string();
    let row = TransactionDB {
        id: transaction_id.clone(),
        invoice_number: next_invoice_number(conn, now)?,
        user_id: user_id.clone(),
        customer_name: sale.customer_name,
        customer_email: sale.customer_email,
        customer_phone: sale.customer_phone,
        status: TransactionStatus::Pending.as_str().to_string(),
        payment_method: sale.payment_method.as_str().to_string(),
        subtotal: priced.totals.subtotal.to_string(),
        tax: priced.totals.tax.to_string(),
        total: priced.totals.total.to_string(),
        payment_amount: priced.payment_amount.to_string(),
        change_amount: priced.change_amount.to_string(),
        notes: sale.notes,
        farewell_message,
        created_at: now,
        updated_at: now,
        cancelled_at: None,
        cancelled_by: None,
        cancel_reason: None,
    };
    diesel::insert_into(transactions::table)
        .values(&row)
        .execute(conn)
        .into_core()?;

    let item_rows: Vec<TransactionItemDB> = priced
        .lines
        .iter()
        .map(|line| TransactionItemDB {
            id: Uuid::new_v4().to_string(),
            transaction_id: transaction_id.clone(),
            product_id: line.product_id.clone(),
            product_name: line.product_name.clone(),
            sku: line.sku.clone(),
            quantity: line.quantity,
            price: line.price.to_string(),
            subtotal: line.subtotal.to_string(),
        })
        .collect();
    diesel::insert_into(transaction_items::table)
        .values(&item_rows)
        .execute(conn)
        .into_core()?;

    for change in &priced.stock_changes {
        set_stock(conn, &change.product_id, change.stock_after)?;
        record_movement(
            conn,
            NewInventoryMovement {
                product_id: change.product_id.clone(),
                movement_type: MovementType::Sale,
                quantity_change: change.delta(),
                stock_before: change.stock_before,
                stock_after: change.stock_after,
                reference_id: Some(transaction_id.clone()),
                note: None,
                user_id: Some(user_id.clone()),
            },
        )?;
    }

    TransactionStatus::Pending.ensure_transition(TransactionStatus::Completed)?;
    diesel::update(transactions::table.find(&transaction_id))
        .set(transactions::status.eq(TransactionStatus::Completed.as_str()))
        .execute(conn)
        .into_core()?;

    Ok(SaleOutcome {
        transaction: load_transaction(conn, &transaction_id)?,
        stock_changes: priced.stock_changes,
    })
}

fn write_cancellation(
    conn: &mut SqliteConnection,
    transaction_id: &str,
    cancelled_by: String,
    reason: Option<String>,
) -> Result<SaleOutcome> {
    let transaction = load_transaction(conn, transaction_id)?;
    transaction.ensure_cancellable()?;

    let mut stock_changes = Vec::with_capacity(transaction.items.len());
    for item in &transaction.items {
        let product = Product::from(load_product(conn, &item.product_id)?);
        let restored = product.stock.checked_add(item.quantity).ok_or_else(|| {
            Error::ConstraintViolation(format!(
                "restoring {} units of {} would exceed the supported stock range",
                item.quantity, product.sku
            ))
        })?;
        let change = StockChange::new(&product, restored);
        set_stock(conn, &product.id, change.stock_after)?;
        record_movement(
            conn,
            NewInventoryMovement {
                product_id: product.id.clone(),
                movement_type: MovementType::SaleCancellation,
                quantity_change: item.quantity,
                stock_before: change.stock_before,
                stock_after: change.stock_after,
                reference_id: Some(transaction.id.clone()),
                note: reason.clone(),
                user_id: Some(cancelled_by.clone()),
            },
        )?;
        stock_changes.push(change);
    }

    let now = now_naive();
    diesel::update(transactions::table.find(transaction_id))
        .set((
            transactions::status.eq(TransactionStatus::Cancelled.as_str()),
            transactions::cancelled_at.eq(Some(now)),
            transactions::cancelled_by.eq(Some(cancelled_by)),
            transactions::cancel_reason.eq(reason),
            transactions::updated_at.eq(now),
        ))
        .execute(conn)
        .into_core()?;

    Ok(SaleOutcome {
        transaction: load_transaction(conn, transaction_id)?,
        stock_changes,
    })
}

#[async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    fn get_by_id(&self, transaction_id: &str) -> Result<Transaction> {
        let mut conn = get_connection(&self.pool)?;
        load_transaction(&mut conn, transaction_id)
    }

    fn search(&self, search: &TransactionSearch) -> Result<Paginated<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        let (page, page_size) = normalize_page(search.page, search.page_size);

        let total: i64 = filtered(search).count().get_result(&mut conn).into_core()?;
        let rows = filtered(search)
            .select(TransactionDB::as_select())
            .order((transactions::created_at.desc(), transactions::id.desc()))
            .limit(page_size)
            .offset(page_offset(page, page_size))
            .load(&mut conn)
            .into_core()?;

        Ok(Paginated::new(
            with_items(&mut conn, rows)?,
            page,
            page_size,
            total,
        ))
    }

    fn exists(&self, transaction_id: &str) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        diesel::select(diesel::dsl::exists(transactions::table.find(transaction_id)))
            .get_result(&mut conn)
            .into_core()
    }

    async fn create_sale(
        &self,
        sale: NewTransaction,
        user_id: String,
        farewell_message: Option<String>,
    ) -> Result<SaleOutcome> {
        self.writer
            .exec(move |conn| write_sale(conn, sale, user_id, farewell_message))
            .await
    }

    async fn cancel_sale(
        &self,
        transaction_id: &str,
        cancelled_by: String,
        reason: Option<String>,
    ) -> Result<SaleOutcome> {
        let transaction_id = transaction_id.to_string();
        self.writer
            .exec(move |conn| write_cancellation(conn, &transaction_id, cancelled_by, reason))
            .await
    }
}
