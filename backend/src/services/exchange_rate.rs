//! Exchange-rate provider abstraction and its HTTP implementation.

use std::time::Duration;

use async_trait::async_trait;

use crate::{
    config::Config,
    models::exchange::{ExchangeQuote, ExchangeRateResponse},
};

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("exchange rate request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("exchange rate provider returned status {0}")]
    Status(u16),
    #[error("exchange rate provider returned a malformed body: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("exchange rate provider reported failure")]
    Rejected,
    #[error("exchange rate provider returned an unusable quote")]
    InvalidQuote,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    /// Quotes `amount` of `from` in `to`.
    async fn fetch_rate(
        &self,
        from: &str,
        to: &str,
        amount: f64,
    ) -> Result<ExchangeQuote, UpstreamError>;
}

/// Client for the apilayer `convert` endpoint.
#[derive(Debug, Clone)]
pub struct ApiLayerClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ApiLayerClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("exchange-backend/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        if config.exchange_api_key.is_empty() {
            tracing::warn!("APIKEY is not set; exchange rate requests will be rejected upstream");
        }
        Self::new(
            config.exchange_api_url.clone(),
            config.exchange_api_key.clone(),
            config.exchange_timeout(),
        )
    }
}

#[async_trait]
impl ExchangeRateProvider for ApiLayerClient {
    async fn fetch_rate(
        &self,
        from: &str,
        to: &str,
        amount: f64,
    ) -> Result<ExchangeQuote, UpstreamError> {
        let amount = amount.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("from", from), ("to", to), ("amount", amount.as_str())])
            .header("apikey", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            tracing::error!(
                status = status.as_u16(),
                body = %String::from_utf8_lossy(&body),
                "Exchange rate provider returned an error status"
            );
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let parsed: ExchangeRateResponse = serde_json::from_slice(&body)?;
        parsed.into_quote().ok_or(UpstreamError::Rejected)
    }
}
