use chrono::NaiveDateTime;
use diesel::prelude::*;
use log::warn;

use crate::utils::{parse_decimal, to_utc};
use retailpos_core::transactions::{
    PaymentMethod, Transaction, TransactionItem, TransactionStatus,
};

#[derive(Queryable, Insertable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub id: String,
    pub invoice_number: String,
    pub user_id: String,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub status: String,
    pub payment_method: String,
    pub subtotal: String,
    pub tax: String,
    pub total: String,
    pub payment_amount: String,
    pub change_amount: String,
    pub notes: Option<String>,
    pub farewell_message: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub cancelled_at: Option<NaiveDateTime>,
    pub cancelled_by: Option<String>,
    pub cancel_reason: Option<String>,
}

#[derive(Queryable, Insertable, Selectable, Identifiable, Associations, Debug, Clone)]
#[diesel(belongs_to(TransactionDB, foreign_key = transaction_id))]
#[diesel(table_name = crate::schema::transaction_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionItemDB {
    pub id: String,
    pub transaction_id: String,
    pub product_id: String,
    pub product_name: String,
    pub sku: String,
    pub quantity: i64,
    pub price: String,
    pub subtotal: String,
}

impl From<TransactionItemDB> for TransactionItem {
    fn from(db: TransactionItemDB) -> Self {
        Self {
            price: parse_decimal(&db.price, "transaction_items.price"),
            subtotal: parse_decimal(&db.subtotal, "transaction_items.subtotal"),
            id: db.id,
            transaction_id: db.transaction_id,
            product_id: db.product_id,
            product_name: db.product_name,
            sku: db.sku,
            quantity: db.quantity,
        }
    }
}

impl TransactionDB {
    /// Builds the domain transaction from its row and item rows.
    pub fn into_domain(self, items: Vec<TransactionItemDB>) -> Transaction {
        let status = self.status.parse().unwrap_or_else(|_| {
            warn!(
                "Unknown status '{}' on transaction {}, reading as PENDING",
                self.status, self.id
            );
            TransactionStatus::Pending
        });
        let payment_method = self.payment_method.parse().unwrap_or_else(|_| {
            warn!(
                "Unknown payment method '{}' on transaction {}",
                self.payment_method, self.id
            );
            PaymentMethod::Cash
        });
        Transaction {
            subtotal: parse_decimal(&self.subtotal, "transactions.subtotal"),
            tax: parse_decimal(&self.tax, "transactions.tax"),
            total: parse_decimal(&self.total, "transactions.total"),
            payment_amount: parse_decimal(&self.payment_amount, "transactions.payment_amount"),
            change_amount: parse_decimal(&self.change_amount, "transactions.change_amount"),
            id: self.id,
            invoice_number: self.invoice_number,
            user_id: self.user_id,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            customer_phone: self.customer_phone,
            status,
            payment_method,
            notes: self.notes,
            farewell_message: self.farewell_message,
            items: items.into_iter().map(TransactionItem::from).collect(),
            created_at: to_utc(self.created_at),
            updated_at: to_utc(self.updated_at),
            cancelled_at: self.cancelled_at.map(to_utc),
            cancelled_by: self.cancelled_by,
            cancel_reason: self.cancel_reason,
        }
    }
}
