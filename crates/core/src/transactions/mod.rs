//! Transactions module - sales, cancellation and receipts.

mod pricing;
mod transactions_model;
mod transactions_service;
mod transactions_traits;


pub use pricing::{
    calculate_totals, invoice_number, merge_lines, price_sale, PricedLine, PricedSale, SaleTotals,
};
pub use transactions_model::{
    CancelTransaction, NewTransaction, NewTransactionItem, PaymentMethod, Receipt, SaleOutcome,
    Transaction, TransactionItem, TransactionSearch, TransactionStatus,
};
pub use transactions_service::TransactionService;
pub use transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
