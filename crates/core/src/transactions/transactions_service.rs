use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;

use super::transactions_model::{
    CancelTransaction, NewTransaction, Receipt, Transaction, TransactionSearch,
};
use super::transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
use crate::errors::{Error, Result};
use crate::events::{DomainEvent, DomainEventSink};
use crate::farewell::FarewellServiceTrait;
use crate::inventory::detect_stock_alerts;
use crate::settings::SettingsServiceTrait;
use crate::utils::pagination::{normalize_page, Paginated};

/// Sale processing: checkout, cancellation and receipts.
///
/// Events are emitted only after the repository has committed.
pub struct TransactionService {
    repository: Arc<dyn TransactionRepositoryTrait>,
    farewell_service: Arc<dyn FarewellServiceTrait>,
    settings_service: Arc<dyn SettingsServiceTrait>,
    event_sink: Arc<dyn DomainEventSink>,
}

impl TransactionService {
    pub fn new(
        repository: Arc<dyn TransactionRepositoryTrait>,
        farewell_service: Arc<dyn FarewellServiceTrait>,
        settings_service: Arc<dyn SettingsServiceTrait>,
        event_sink: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            repository,
            farewell_service,
            settings_service,
            event_sink,
        }
    }

    fn checkout_message(&self) -> Option<String> {
        match self.farewell_service.pick_checkout_message() {
            Ok(message) => message.map(|m| m.message),
            Err(e) => {
                warn!("Could not load farewell message: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl TransactionServiceTrait for TransactionService {
    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        self.repository.get_by_id(transaction_id)
    }

    fn search_transactions(&self, mut search: TransactionSearch) -> Result<Paginated<Transaction>> {
        if let (Some(from), Some(to)) = (search.date_from, search.date_to) {
            if from > to {
                return Err(Error::invalid_input("dateFrom must not be after dateTo"));
            }
        }
        let (page, page_size) = normalize_page(search.page, search.page_size);
        search.page = Some(page);
        search.page_size = Some(page_size);
        search.keyword = search
            .keyword
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        self.repository.search(&search)
    }

    fn get_receipt(&self, transaction_id: &str) -> Result<Receipt> {
        let transaction = self.repository.get_by_id(transaction_id)?;
        let store = self.settings_service.get_settings()?;
        let farewell_message = transaction.farewell_message.clone();
        Ok(Receipt {
            transaction,
            store,
            farewell_message,
        })
    }

    async fn create_transaction(
        &self,
        mut sale: NewTransaction,
        user_id: &str,
    ) -> Result<Transaction> {
        sale.validate()?;
        let receipt_email = sale.receipt_recipient();
        let farewell = self.checkout_message();

        let outcome = self
            .repository
            .create_sale(sale, user_id.to_string(), farewell)
            .await?;
        let transaction = outcome.transaction;
        info!(
            "Completed sale {} ({} lines, total {})",
            transaction.invoice_number,
            transaction.items.len(),
            transaction.total
        );

        let mut events = vec![DomainEvent::transaction_completed(
            transaction.id.clone(),
            transaction.invoice_number.clone(),
            transaction.total,
            receipt_email,
        )];
        events.extend(detect_stock_alerts(&outcome.stock_changes));
        self.event_sink.emit_batch(events);

        Ok(transaction)
    }

    async fn cancel_transaction(
        &self,
        transaction_id: &str,
        request: CancelTransaction,
        user_id: &str,
    ) -> Result<Transaction> {
        let reason = request
            .reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        let outcome = self
            .repository
            .cancel_sale(transaction_id, user_id.to_string(), reason)
            .await?;
        let transaction = outcome.transaction;
        info!("Cancelled sale {}", transaction.invoice_number);

        let mut events = vec![DomainEvent::transaction_cancelled(
            transaction.id.clone(),
            transaction.invoice_number.clone(),
        )];
        events.extend(detect_stock_alerts(&outcome.stock_changes));
        self.event_sink.emit_batch(events);

        Ok(transaction)
    }
}
