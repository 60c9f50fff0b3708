use async_trait::async_trait;

use super::transactions_model::{
    CancelTransaction, NewTransaction, Receipt, SaleOutcome, Transaction, TransactionSearch,
};
use crate::errors::Result;
use crate::utils::pagination::Paginated;

/// Persistence contract for sales.
///
/// `create_sale` and `cancel_sale` run as one database transaction each:
/// either every row (transaction, items, stock, movements) is written, or
/// none is.
#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    /// Loads a transaction with its items.
    fn get_by_id(&self, transaction_id: &str) -> Result<Transaction>;
    fn search(&self, search: &TransactionSearch) -> Result<Paginated<Transaction>>;
    fn exists(&self, transaction_id: &str) -> Result<bool>;

    /// Re-reads products, prices the (validated) sale, writes it and
    /// decrements stock.
    async fn create_sale(
        &self,
        sale: NewTransaction,
        user_id: String,
        farewell_message: Option<String>,
    ) -> Result<SaleOutcome>;

    /// Restores stock and marks the sale cancelled. Fails with
    /// `AlreadyCancelled` on a second attempt.
    async fn cancel_sale(
        &self,
        transaction_id: &str,
        cancelled_by: String,
        reason: Option<String>,
    ) -> Result<SaleOutcome>;
}

#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction>;
    fn search_transactions(&self, search: TransactionSearch) -> Result<Paginated<Transaction>>;
    fn get_receipt(&self, transaction_id: &str) -> Result<Receipt>;
    async fn create_transaction(&self, sale: NewTransaction, user_id: &str)
        -> Result<Transaction>;
    async fn cancel_transaction(
        &self,
        transaction_id: &str,
        request: CancelTransaction,
        user_id: &str,
    ) -> Result<Transaction>;
}
