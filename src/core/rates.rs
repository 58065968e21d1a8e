//! Exchange rate abstractions and core types

use async_trait::async_trait;
use serde_json::Value;

use super::error::FixerError;

pub type Result<T> = std::result::Result<T, FixerError>;

/// Rates quoted against a base currency on a given day.
///
/// `rates` keeps the order the API returned them in, and each value as the
/// JSON the API sent, so `1` and `1.0` render differently.
#[derive(Debug, Clone, PartialEq)]
pub struct RateSnapshot {
    pub base: String,
    pub date: String,
    pub rates: Vec<(String, Value)>,
}

impl RateSnapshot {
    /// Looks up a numeric rate by currency code. Zero and non-numeric rates
    /// count as missing.
    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates
            .iter()
            .find(|(c, _)| c == code)
            .and_then(|(_, rate)| rate.as_f64())
            .filter(|rate| *rate != 0.0)
    }

    /// Returns up to `limit` rates sorted by currency code.
    pub fn sorted_head(&self, limit: usize) -> Vec<(String, Value)> {
        let mut sorted = self.rates.clone();
        sorted.sort_by(|(a, _), (b, _)| a.cmp(b));
        sorted.truncate(limit);
        sorted
    }
}

/// Currency codes and display names supported by the API.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolCatalog {
    pub symbols: Vec<(String, String)>,
}

impl SymbolCatalog {
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn sorted_head(&self, limit: usize) -> Vec<(String, String)> {
        let mut sorted = self.symbols.clone();
        sorted.sort_by(|(a, _), (b, _)| a.cmp(b));
        sorted.truncate(limit);
        sorted
    }
}

/// Result of converting an amount between two currencies.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    /// Amount exactly as the caller supplied it
    pub amount: String,
    pub source: String,
    pub target: String,
    pub rate: f64,
    pub result: f64,
    pub date: String,
}

impl Conversion {
    /// Derives a conversion from a snapshot holding both currencies.
    ///
    /// Rate lookup happens before the amount is parsed, so a missing rate
    /// wins over a malformed amount.
    pub fn from_snapshot(
        snapshot: &RateSnapshot,
        amount: &str,
        source: &str,
        target: &str,
    ) -> Result<Self> {
        let source_code = source.to_uppercase();
        let target_code = target.to_uppercase();

        let (Some(source_rate), Some(target_rate)) =
            (snapshot.rate(&source_code), snapshot.rate(&target_code))
        else {
            return Err(FixerError::MissingRate {
                source_currency: source.to_string(),
                target_currency: target.to_string(),
            });
        };

        let value: f64 = amount
            .trim()
            .parse()
            .map_err(|_| FixerError::InvalidAmount(amount.to_string()))?;

        let rate = target_rate / source_rate;
        Ok(Conversion {
            amount: amount.to_string(),
            source: source_code,
            target: target_code,
            rate,
            result: value * rate,
            date: snapshot.date.clone(),
        })
    }
}

/// Source of exchange rate data. Every call carries its own access key.
#[async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    /// Latest rates, optionally restricted to a comma-separated symbol list.
    async fn latest(&self, api_key: &str, symbols: Option<&str>) -> Result<RateSnapshot>;

    /// All supported currency symbols.
    async fn symbols(&self, api_key: &str) -> Result<SymbolCatalog>;
}
