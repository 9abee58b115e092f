//! Ledger entries for completed currency conversions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::types::{TransactionId, UserId};

#[derive(Debug, Clone, PartialEq, FromRow)]
/// Database representation of a recorded conversion. Immutable once written.
pub struct Transaction {
    pub transaction_id: TransactionId,
    pub user_id: UserId,
    pub from_currency: String,
    pub amount_from: f64,
    pub to_currency: String,
    pub amount_to: f64,
    pub exchange_rate: f64,
    pub timestamp: DateTime<Utc>,
}

/// Outcome of a conversion, ready to be appended to the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionDetails {
    pub from_currency: String,
    pub amount_from: f64,
    pub to_currency: String,
    pub amount_to: f64,
    pub exchange_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
/// API view of a ledger entry.
pub struct TransactionResponse {
    pub transaction_id: TransactionId,
    pub user_id: UserId,
    pub from_currency: String,
    pub amount_from: f64,
    pub to_currency: String,
    pub amount_to: f64,
    pub exchange_rate: f64,
    pub timestamp: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(t: Transaction) -> Self {
        Self {
            transaction_id: t.transaction_id,
            user_id: t.user_id,
            from_currency: t.from_currency,
            amount_from: t.amount_from,
            to_currency: t.to_currency,
            amount_to: t.amount_to,
            exchange_rate: t.exchange_rate,
            timestamp: t.timestamp,
        }
    }
}
