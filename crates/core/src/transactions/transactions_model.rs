//! Sales transaction domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::pricing::merge_lines;
use crate::constants::{
    MAX_CUSTOMER_NAME_LENGTH, MAX_LINE_QUANTITY, MAX_MONEY_AMOUNT, MAX_TRANSACTION_LINES,
};
use crate::errors::{Error, Result, ValidationError};
use crate::inventory::StockChange;
use crate::settings::Settings;
use crate::users::normalize_email;

/// Lifecycle of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Cancelled,
}

impl TransactionStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Completed => "COMPLETED",
            TransactionStatus::Cancelled => "CANCELLED",
        }
    }

    /// Pending may complete or be cancelled, Completed may be cancelled.
    /// Cancelled is terminal.
    pub fn can_transition_to(&self, next: TransactionStatus) -> bool {
        matches!(
            (self, next),
            (TransactionStatus::Pending, TransactionStatus::Completed)
                | (TransactionStatus::Pending, TransactionStatus::Cancelled)
                | (TransactionStatus::Completed, TransactionStatus::Cancelled)
        )
    }

    pub fn ensure_transition(&self, next: TransactionStatus) -> Result<()> {
        if self.can_transition_to(next) {
            Ok(())
        } else {
            Err(Error::InvalidStatusTransition {
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_uppercase().as_str() {
            "PENDING" => Ok(TransactionStatus::Pending),
            "COMPLETED" => Ok(TransactionStatus::Completed),
            "CANCELLED" => Ok(TransactionStatus::Cancelled),
            other => Err(Error::Validation(ValidationError::field(
                "status",
                format!("unknown transaction status '{}'", other),
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
    EWallet,
}

impl PaymentMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Card => "CARD",
            PaymentMethod::Transfer => "TRANSFER",
            PaymentMethod::EWallet => "E_WALLET",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_uppercase().as_str() {
            "CASH" => Ok(PaymentMethod::Cash),
            "CARD" => Ok(PaymentMethod::Card),
            "TRANSFER" => Ok(PaymentMethod::Transfer),
            "E_WALLET" | "EWALLET" => Ok(PaymentMethod::EWallet),
            other => Err(Error::Validation(ValidationError::field(
                "paymentMethod",
                format!("unknown payment method '{}'", other),
            ))),
        }
    }
}

/// A line of a sale. Name, SKU and price are snapshots taken at sale time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionItem {
    pub id: String,
    pub transaction_id: String,
    pub product_id: String,
    pub product_name: String,
    pub sku: String,
    pub quantity: i64,
    pub price: Decimal,
    pub subtotal: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub invoice_number: String,
    /// Cashier who rang up the sale.
    pub user_id: String,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub status: TransactionStatus,
    pub payment_method: PaymentMethod,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub payment_amount: Decimal,
    pub change_amount: Decimal,
    pub notes: Option<String>,
    pub farewell_message: Option<String>,
    pub items: Vec<TransactionItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancelled_by: Option<String>,
    pub cancel_reason: Option<String>,
}

impl Transaction {
    /// Checks that the sale can still be cancelled.
    pub fn ensure_cancellable(&self) -> Result<()> {
        if self.status == TransactionStatus::Cancelled {
            return Err(Error::AlreadyCancelled(self.invoice_number.clone()));
        }
        self.status.ensure_transition(TransactionStatus::Cancelled)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransactionItem {
    pub product_id: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub payment_method: PaymentMethod,
    pub payment_amount: Decimal,
    pub notes: Option<String>,
    pub items: Vec<NewTransactionItem>,
    /// Email the receipt when a customer email is present.
    #[serde(default)]
    pub send_receipt: bool,
}

fn clean_optional(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

impl NewTransaction {
    /// Validates customer data and items, and merges duplicate product lines.
    pub fn validate(&mut self) -> Result<()> {
        let name = self.customer_name.trim();
        if name.is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "customerName".to_string(),
            )));
        }
        if name.chars().count() > MAX_CUSTOMER_NAME_LENGTH {
            return Err(Error::Validation(ValidationError::field(
                "customerName",
                format!("must be at most {} characters", MAX_CUSTOMER_NAME_LENGTH),
            )));
        }
        self.customer_name = name.to_string();
        self.customer_email = match clean_optional(self.customer_email.take()) {
            Some(email) => Some(normalize_email("customerEmail", &email)?),
            None => None,
        };
        self.customer_phone = clean_optional(self.customer_phone.take());
        self.notes = clean_optional(self.notes.take());

        if self.payment_amount.is_sign_negative() && !self.payment_amount.is_zero() {
            return Err(Error::Validation(ValidationError::field(
                "paymentAmount",
                "must not be negative",
            )));
        }
        if self.payment_amount > MAX_MONEY_AMOUNT {
            return Err(Error::Validation(ValidationError::field(
                "paymentAmount",
                format!("must be at most {}", MAX_MONEY_AMOUNT),
            )));
        }
        if self.items.is_empty() {
            return Err(Error::Validation(ValidationError::field(
                "items",
                "a sale needs at least one item",
            )));
        }
        if self.items.len() > MAX_TRANSACTION_LINES {
            return Err(Error::Validation(ValidationError::field(
                "items",
                format!("at most {} lines per sale", MAX_TRANSACTION_LINES),
            )));
        }
        for item in &self.items {
            if item.product_id.trim().is_empty() {
                return Err(Error::Validation(ValidationError::MissingField(
                    "items.productId".to_string(),
                )));
            }
            if item.quantity <= 0 {
                return Err(Error::Validation(ValidationError::field(
                    "items.quantity",
                    format!("quantity for product {} must be positive", item.product_id),
                )));
            }
            if item.quantity > MAX_LINE_QUANTITY {
                return Err(Error::Validation(ValidationError::field(
                    "items.quantity",
                    format!(
                        "quantity for product {} must be at most {}",
                        item.product_id, MAX_LINE_QUANTITY
                    ),
                )));
            }
        }
        self.items = merge_lines(std::mem::take(&mut self.items))?;
        Ok(())
    }

    /// Recipient for the emailed receipt, if one was requested.
    pub fn receipt_recipient(&self) -> Option<String> {
        if self.send_receipt {
            self.customer_email.clone()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelTransaction {
    pub reason: Option<String>,
}

/// Filters for the transaction history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSearch {
    pub status: Option<TransactionStatus>,
    pub user_id: Option<String>,
    /// Matches invoice number or customer name.
    pub keyword: Option<String>,
    pub date_from: Option<NaiveDate>,
    /// Inclusive.
    pub date_to: Option<NaiveDate>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Result of a committed sale or cancellation.
#[derive(Debug, Clone)]
pub struct SaleOutcome {
    pub transaction: Transaction,
    pub stock_changes: Vec<StockChange>,
}

/// Everything needed to print a receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub transaction: Transaction,
    pub store: Settings,
    pub farewell_message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn new_sale(items: Vec<(&str, i64)>) -> NewTransaction {
        NewTransaction {
            customer_name: "  Ana  ".to_string(),
            customer_email: Some(" Ana@Example.COM ".to_string()),
            customer_phone: Some(String::new()),
            payment_method: PaymentMethod::Cash,
            payment_amount: dec!(50),
            notes: None,
            items: items
                .into_iter()
                .map(|(id, qty)| NewTransactionItem {
                    product_id: id.to_string(),
                    quantity: qty,
                })
                .collect(),
            send_receipt: true,
        }
    }

    #[test]
    fn test_status_transitions() {
        use TransactionStatus::*;
        assert!(Pending.can_transition_to(Completed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Completed.can_transition_to(Cancelled));
        assert!(!Completed.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Completed));
        assert!(!Cancelled.can_transition_to(Cancelled));
        assert!(Cancelled.ensure_transition(Pending).is_err());
    }

    #[test]
    fn test_validate_normalizes_customer_and_merges_lines() {
        let mut sale = new_sale(vec![("a", 1), ("b", 2), ("a", 3)]);
        sale.validate().unwrap();
        assert_eq!(sale.customer_name, "Ana");
        assert_eq!(sale.customer_email.as_deref(), Some("ana@example.com"));
        assert_eq!(sale.customer_phone, None);
        assert_eq!(
            sale.items,
            vec![
                NewTransactionItem {
                    product_id: "a".to_string(),
                    quantity: 4
                },
                NewTransactionItem {
                    product_id: "b".to_string(),
                    quantity: 2
                },
            ]
        );
        assert_eq!(
            sale.receipt_recipient().as_deref(),
            Some("ana@example.com")
        );
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        let mut empty = new_sale(vec![]);
        assert!(empty.validate().is_err());

        let mut zero = new_sale(vec![("a", 0)]);
        assert!(zero.validate().is_err());

        let mut bad_email = new_sale(vec![("a", 1)]);
        bad_email.customer_email = Some("not-an-email".to_string());
        assert!(bad_email.validate().is_err());

        let mut long_name = new_sale(vec![("a", 1)]);
        long_name.customer_name = "x".repeat(MAX_CUSTOMER_NAME_LENGTH + 1);
        assert!(long_name.validate().is_err());
    }

    #[test]
    fn test_validate_caps_quantities_and_payment() {
        let mut huge_line = new_sale(vec![("a", i64::MAX)]);
        assert!(matches!(huge_line.validate(), Err(Error::Validation(_))));

        let mut capped = new_sale(vec![("a", MAX_LINE_QUANTITY), ("a", MAX_LINE_QUANTITY)]);
        capped.validate().unwrap();
        assert_eq!(capped.items[0].quantity, 2 * MAX_LINE_QUANTITY);

        let mut rich = new_sale(vec![("a", 1)]);
        rich.payment_amount = MAX_MONEY_AMOUNT + dec!(0.01);
        assert!(matches!(rich.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!("e_wallet".parse::<PaymentMethod>().unwrap(), PaymentMethod::EWallet);
        assert_eq!(
            serde_json::to_value(PaymentMethod::EWallet).unwrap(),
            "E_WALLET"
        );
        assert!("cheque".parse::<PaymentMethod>().is_err());
    }
}
