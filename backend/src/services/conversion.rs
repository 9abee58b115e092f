//! Currency conversion: validate, quote, then append to the ledger.

use std::sync::Arc;

use anyhow::anyhow;

use crate::{
    context::RequestContext,
    error::AppError,
    models::transaction::{ConversionDetails, Transaction},
    services::{
        exchange_rate::{ExchangeRateProvider, UpstreamError},
        ledger::{LedgerError, TransactionLedger},
    },
    types::UserId,
    validation::rules::{validate_amount, validate_currency_code},
};

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("{0}")]
    InvalidInput(String),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl From<ConversionError> for AppError {
    fn from(err: ConversionError) -> Self {
        match err {
            ConversionError::InvalidInput(msg) => AppError::InvalidInput(msg),
            ConversionError::Upstream(e) => AppError::Upstream(anyhow!(e)),
            ConversionError::Ledger(e) => e.into(),
        }
    }
}

#[derive(Clone)]
pub struct CurrencyConverter {
    provider: Arc<dyn ExchangeRateProvider>,
    ledger: TransactionLedger,
    supported: Arc<[String]>,
}

impl CurrencyConverter {
    pub fn new(
        provider: Arc<dyn ExchangeRateProvider>,
        ledger: TransactionLedger,
        supported: Vec<String>,
    ) -> Self {
        let supported = supported
            .into_iter()
            .map(|code| code.to_ascii_uppercase())
            .collect::<Vec<_>>();
        Self {
            provider,
            ledger,
            supported: supported.into(),
        }
    }

    pub async fn convert(
        &self,
        ctx: &RequestContext,
        caller: UserId,
        from: &str,
        to: &str,
        amount: f64,
    ) -> Result<Transaction, ConversionError> {
        let from = self.normalize_currency(from)?;
        let to = self.normalize_currency(to)?;
        validate_amount(amount).map_err(|_| {
            ConversionError::InvalidInput("Amount must be a non-negative number".into())
        })?;

        let quote = self
            .provider
            .fetch_rate(&from, &to, amount)
            .await
            .inspect_err(|e| {
                tracing::error!(request_id = %ctx.request_id, error = %e, "Exchange rate lookup failed")
            })?;
        let usable = quote.rate.is_finite()
            && quote.rate > 0.0
            && quote.result.is_finite()
            && quote.result >= 0.0;
        if !usable {
            tracing::error!(
                request_id = %ctx.request_id,
                rate = quote.rate,
                result = quote.result,
                "Exchange rate provider returned an unusable quote"
            );
            return Err(UpstreamError::InvalidQuote.into());
        }

        let details = ConversionDetails {
            from_currency: from,
            amount_from: amount,
            to_currency: to,
            amount_to: quote.result,
            exchange_rate: quote.rate,
        };
        Ok(self.ledger.record(ctx, caller, details).await?)
    }

    fn normalize_currency(&self, code: &str) -> Result<String, ConversionError> {
        let code = code.trim().to_ascii_uppercase();
        if validate_currency_code(&code).is_err() {
            return Err(ConversionError::InvalidInput(format!(
                "Invalid currency code: {}",
                code
            )));
        }
        if !self.supported.contains(&code) {
            return Err(ConversionError::InvalidInput(format!(
                "Unsupported currency: {}. Supported: {}",
                code,
                self.supported.join(", ")
            )));
        }
        Ok(code)
    }
}
