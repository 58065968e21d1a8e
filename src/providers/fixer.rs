use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::core::config::{ClientConfig, validate_timeout};
use crate::core::error::FixerError;
use crate::core::rates::{ExchangeRateProvider, RateSnapshot, Result, SymbolCatalog};

const DEFAULT_BASE: &str = "EUR";
const UNKNOWN_DATE: &str = "unknown";
const DEFAULT_UPSTREAM_ERROR: &str = "API request failed";

#[derive(Debug, Deserialize)]
struct FixerEnvelope {
    #[serde(default)]
    success: bool,
    base: Option<String>,
    date: Option<String>,
    rates: Option<Map<String, Value>>,
    symbols: Option<Map<String, Value>>,
    error: Option<FixerErrorBody>,
}

#[derive(Debug, Deserialize)]
struct FixerErrorBody {
    code: Option<i64>,
    #[serde(rename = "type")]
    kind: Option<String>,
    info: Option<String>,
}

/// Client for the Fixer.io `latest` and `symbols` endpoints.
///
/// The timeout may be changed between calls through [`FixerClient::set_timeout`];
/// it needs `&mut self`, so hosts sharing a client across threads must wrap it
/// in their own lock.
pub struct FixerClient {
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl FixerClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let timeout = validate_timeout(config.timeout)?;
        let client = reqwest::Client::builder()
            .user_agent("fxbook/1.0")
            .build()?;
        Ok(FixerClient {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sets the request timeout in seconds. Non-positive values are rejected
    /// and the current timeout is kept.
    pub fn set_timeout(&mut self, secs: f64) -> Result<()> {
        self.timeout = validate_timeout(secs)?;
        debug!(timeout = ?self.timeout, "Updated request timeout");
        Ok(())
    }

    fn endpoint_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Url> {
        let url = format!("{}/{}", self.base_url, endpoint);
        Url::parse_with_params(&url, params)
            .map_err(|e| FixerError::Transport(format!("Invalid URL {url}: {e}")))
    }

    async fn fetch(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<FixerEnvelope> {
        let url = self.endpoint_url(endpoint, params)?;
        debug!(endpoint, timeout = ?self.timeout, "Requesting Fixer data");

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(transport_error)?;

        debug!(status = %response.status(), "Received Fixer response");

        let text = response.text().await.map_err(transport_error)?;
        let envelope: FixerEnvelope = serde_json::from_str(&text)?;

        if !envelope.success {
            let error = envelope.error.unwrap_or(FixerErrorBody {
                code: None,
                kind: None,
                info: None,
            });
            warn!(code = ?error.code, kind = ?error.kind, "Fixer request unsuccessful");
            return Err(FixerError::Upstream(
                error
                    .info
                    .unwrap_or_else(|| DEFAULT_UPSTREAM_ERROR.to_string()),
            ));
        }

        Ok(envelope)
    }
}

/// Flattens a reqwest error and its causes into one message, without the URL.
fn transport_error(err: reqwest::Error) -> FixerError {
    let err = err.without_url();
    let mut message = err.to_string();
    let mut source = std::error::Error::source(&err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    FixerError::Transport(message)
}

fn parse_symbols(symbols: Map<String, Value>) -> Vec<(String, String)> {
    symbols
        .into_iter()
        .map(|(code, value)| {
            let name = match value {
                Value::String(name) => name,
                other => other.to_string(),
            };
            (code, name)
        })
        .collect()
}

#[async_trait]
impl ExchangeRateProvider for FixerClient {
    #[instrument(name = "FixerLatest", skip(self, api_key))]
    async fn latest(&self, api_key: &str, symbols: Option<&str>) -> Result<RateSnapshot> {
        let mut params = vec![("access_key", api_key)];
        if let Some(symbols) = symbols {
            params.push(("symbols", symbols));
        }

        let envelope = self.fetch("latest", &params).await?;
        let rates: Vec<(String, Value)> =
            envelope.rates.unwrap_or_default().into_iter().collect();
        debug!(count = rates.len(), "Parsed rates");

        Ok(RateSnapshot {
            base: envelope.base.unwrap_or_else(|| DEFAULT_BASE.to_string()),
            date: envelope.date.unwrap_or_else(|| UNKNOWN_DATE.to_string()),
            rates,
        })
    }

    #[instrument(name = "FixerSymbols", skip(self, api_key))]
    async fn symbols(&self, api_key: &str) -> Result<SymbolCatalog> {
        let envelope = self.fetch("symbols", &[("access_key", api_key)]).await?;
        let symbols = parse_symbols(envelope.symbols.unwrap_or_default());
        debug!(count = symbols.len(), "Parsed symbols");
        Ok(SymbolCatalog { symbols })
    }
}
