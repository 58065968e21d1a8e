//! Text-returning facade over an [`ExchangeRateProvider`].
//!
//! Every fetch procedure returns a string in all cases. Failures are rendered
//! as `"Error: {message}"`; use the provider directly to inspect them as
//! [`FixerError`] values.

use serde_json::Value;
use tracing::debug;

use crate::core::config::ClientConfig;
use crate::core::error::FixerError;
use crate::core::rates::{Conversion, ExchangeRateProvider, RateSnapshot, SymbolCatalog};
use crate::providers::FixerClient;

pub const GREETING: &str =
    "Hello from Fixer currency exchange book! Use other procedures with your Fixer.io API key.";

const RATES_PREVIEW_LEN: usize = 10;
const SYMBOLS_PREVIEW_LEN: usize = 20;

pub struct FixerBook<P: ExchangeRateProvider = FixerClient> {
    provider: P,
}

impl FixerBook<FixerClient> {
    /// Builds a book backed by the Fixer.io HTTP client.
    pub fn from_config(config: &ClientConfig) -> Result<Self, FixerError> {
        Ok(Self::new(FixerClient::new(config)?))
    }

    /// Sets the request timeout in seconds, keeping the old value on failure.
    pub fn set_timeout(&mut self, secs: f64) -> Result<(), FixerError> {
        self.provider.set_timeout(secs)
    }
}

impl<P: ExchangeRateProvider> FixerBook<P> {
    pub fn new(provider: P) -> Self {
        FixerBook { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn greet(&self) -> String {
        GREETING.to_string()
    }

    pub async fn get_rates(&self, api_key: &str) -> String {
        render(self.provider.latest(api_key, None).await, |s| {
            format_rates_preview(&s)
        })
    }

    pub async fn get_specific_rates(&self, currencies: &str, api_key: &str) -> String {
        let symbols = currencies.to_uppercase();
        render(
            self.provider.latest(api_key, Some(symbols.as_str())).await,
            |s| format_all_rates(&s),
        )
    }

    pub async fn convert_currency(
        &self,
        amount: &str,
        source_currency: &str,
        target_currency: &str,
        api_key: &str,
    ) -> String {
        render(
            self.conversion(amount, source_currency, target_currency, api_key)
                .await,
            |c| format_conversion(&c),
        )
    }

    pub async fn check_supported_currencies(&self, api_key: &str) -> String {
        render(self.provider.symbols(api_key).await, |c| {
            format_symbols_preview(&c)
        })
    }

    /// Typed counterpart of [`FixerBook::convert_currency`].
    pub async fn conversion(
        &self,
        amount: &str,
        source_currency: &str,
        target_currency: &str,
        api_key: &str,
    ) -> Result<Conversion, FixerError> {
        let symbols = format!(
            "{},{}",
            source_currency.to_uppercase(),
            target_currency.to_uppercase()
        );
        let snapshot = self.provider.latest(api_key, Some(symbols.as_str())).await?;
        Conversion::from_snapshot(&snapshot, amount, source_currency, target_currency)
    }
}

fn render<T>(outcome: Result<T, FixerError>, format: impl FnOnce(T) -> String) -> String {
    match outcome {
        Ok(value) => format(value),
        Err(e) => {
            debug!(error = %e, "Procedure failed");
            format_error(&e)
        }
    }
}

pub fn format_error(error: &FixerError) -> String {
    format!("Error: {error}")
}

/// Renders a rate as the API sent it: `1` stays `1`, `0.85` stays `0.85`.
fn format_rate(rate: &Value) -> String {
    match rate {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn join_rates(rates: &[(String, Value)]) -> String {
    rates
        .iter()
        .map(|(code, rate)| format!("{code}: {}", format_rate(rate)))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn format_rates_preview(snapshot: &RateSnapshot) -> String {
    let head = snapshot.sorted_head(RATES_PREVIEW_LEN);
    let remaining = snapshot.rates.len().saturating_sub(RATES_PREVIEW_LEN);
    format!(
        "Exchange rates for {} on {}: {} (and {remaining} more currencies available)",
        snapshot.base,
        snapshot.date,
        join_rates(&head)
    )
}

pub fn format_all_rates(snapshot: &RateSnapshot) -> String {
    format!(
        "Exchange rates for {} on {}: {}",
        snapshot.base,
        snapshot.date,
        join_rates(&snapshot.rates)
    )
}

pub fn format_conversion(conversion: &Conversion) -> String {
    format!(
        "Converted {} {} to {:.4} {} (rate: {:.6}) on {}",
        conversion.amount,
        conversion.source,
        conversion.result,
        conversion.target,
        conversion.rate,
        conversion.date
    )
}

pub fn format_symbols_preview(catalog: &SymbolCatalog) -> String {
    let entries = catalog
        .sorted_head(SYMBOLS_PREVIEW_LEN)
        .iter()
        .map(|(code, name)| format!("{code}: {name}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Supported currencies (first {SYMBOLS_PREVIEW_LEN} of {} total): {entries}",
        catalog.len()
    )
}
