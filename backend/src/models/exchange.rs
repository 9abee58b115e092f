//! Wire types of the exchange-rate provider.

use serde::Deserialize;

/// Rate and converted amount returned by the provider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExchangeQuote {
    pub rate: f64,
    pub result: f64,
}

#[derive(Debug, Deserialize)]
pub struct ExchangeRateInfo {
    #[serde(default)]
    pub timestamp: Option<i64>,
    pub rate: f64,
}

/// Body of a `convert` call, e.g.
/// `{"success": true, "info": {"rate": 5.0}, "result": 50.0, "date": "2024-01-01"}`.
#[derive(Debug, Deserialize)]
pub struct ExchangeRateResponse {
    pub success: bool,
    #[serde(default)]
    pub info: Option<ExchangeRateInfo>,
    #[serde(default)]
    pub result: Option<f64>,
    #[serde(default)]
    pub date: Option<String>,
}

impl ExchangeRateResponse {
    /// Returns the quote only when the provider reported success and both
    /// numbers are present.
    pub fn into_quote(self) -> Option<ExchangeQuote> {
        if !self.success {
            return None;
        }
        Some(ExchangeQuote {
            rate: self.info?.rate,
            result: self.result?,
        })
    }
}
