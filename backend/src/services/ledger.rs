//! Append-only record of completed conversions.

use std::sync::Arc;

use validator::Validate;

use crate::{
    context::RequestContext,
    error::AppError,
    models::{
        transaction::{ConversionDetails, Transaction},
        PageQuery,
    },
    repositories::{StoreError, TransactionRepository},
    types::{TransactionId, UserId},
    utils::Clock,
};

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("invalid page request")]
    InvalidPage(#[from] validator::ValidationErrors),
    #[error("ledger store failure: {0}")]
    Store(#[from] StoreError),
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InvalidPage(errors) => errors.into(),
            LedgerError::Store(e) => AppError::InternalServerError(e.into()),
        }
    }
}

/// One page of a user's history plus the total number of entries.
#[derive(Debug, Clone)]
pub struct LedgerPage {
    pub items: Vec<Transaction>,
    pub total: i64,
}

#[derive(Clone)]
pub struct TransactionLedger {
    transactions: Arc<dyn TransactionRepository>,
    clock: Arc<dyn Clock>,
}

impl TransactionLedger {
    pub fn new(transactions: Arc<dyn TransactionRepository>, clock: Arc<dyn Clock>) -> Self {
        Self {
            transactions,
            clock,
        }
    }

    pub async fn record(
        &self,
        ctx: &RequestContext,
        owner: UserId,
        details: ConversionDetails,
    ) -> Result<Transaction, LedgerError> {
        let transaction = Transaction {
            transaction_id: TransactionId::generate(),
            user_id: owner,
            from_currency: details.from_currency,
            amount_from: details.amount_from,
            to_currency: details.to_currency,
            amount_to: details.amount_to,
            exchange_rate: details.exchange_rate,
            timestamp: self.clock.now(),
        };
        let stored = self.transactions.insert(&transaction).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            user_id = %owner,
            transaction_id = %stored.transaction_id,
            from = %stored.from_currency,
            to = %stored.to_currency,
            "Conversion recorded"
        );
        Ok(stored)
    }

    /// Newest entries first.
    pub async fn list_for_owner(
        &self,
        owner: UserId,
        page: PageQuery,
    ) -> Result<LedgerPage, LedgerError> {
        page.validate()?;

        let (items, total) = self
            .transactions
            .page_for_user(owner, page.page_size, page.offset())
            .await?;
        Ok(LedgerPage { items, total })
    }
}
