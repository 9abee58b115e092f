//! Append-only ledger of currency conversions.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{models::transaction::Transaction, repositories::common::StoreError, types::UserId};

const TABLE_NAME: &str = "currency_conversion_transactions";
const SELECT_COLUMNS: &str = "transaction_id, user_id, from_currency, amount_from, to_currency, \
                              amount_to, exchange_rate, timestamp";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    async fn insert(&self, transaction: &Transaction) -> Result<Transaction, StoreError>;

    /// One page of a user's entries, newest first, with the total from the same snapshot.
    async fn page_for_user(
        &self,
        user_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Transaction>, i64), StoreError>;
}

#[derive(Debug, Clone)]
pub struct PgTransactionRepository {
    pool: PgPool,
}

impl PgTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionRepository for PgTransactionRepository {
    async fn insert(&self, transaction: &Transaction) -> Result<Transaction, StoreError> {
        let query = format!(
            "INSERT INTO {} ({cols}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {cols}",
            TABLE_NAME,
            cols = SELECT_COLUMNS
        );
        let row = sqlx::query_as::<_, Transaction>(&query)
            .bind(&transaction.transaction_id)
            .bind(transaction.user_id)
            .bind(&transaction.from_currency)
            .bind(transaction.amount_from)
            .bind(&transaction.to_currency)
            .bind(transaction.amount_to)
            .bind(transaction.exchange_rate)
            .bind(transaction.timestamp)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn page_for_user(
        &self,
        user_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Transaction>, i64), StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "SELECT {} FROM {} WHERE user_id = $1 \
             ORDER BY timestamp DESC, transaction_id DESC \
             LIMIT $2 OFFSET $3",
            SELECT_COLUMNS, TABLE_NAME
        );
        let rows = sqlx::query_as::<_, Transaction>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut *tx)
            .await?;

        let count_query = format!("SELECT COUNT(*) FROM {} WHERE user_id = $1", TABLE_NAME);
        let total = sqlx::query_scalar::<_, i64>(&count_query)
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((rows, total))
    }
}
