//! Error types for the Fixer book

use thiserror::Error;

/// Errors that can occur when talking to the Fixer.io API
#[derive(Error, Debug)]
pub enum FixerError {
    /// Client configuration rejected by validation
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The API answered with `success: false`
    #[error("{0}")]
    Upstream(String),

    /// A requested currency was absent from the returned rates
    #[error("Could not find rates for {source_currency} or {target_currency}")]
    MissingRate {
        source_currency: String,
        target_currency: String,
    },

    /// The amount to convert is not a number
    #[error("Invalid amount '{0}'. Please provide a numeric value.")]
    InvalidAmount(String),

    /// Network failure, timeout or unreadable response body
    #[error("{0}")]
    Transport(String),
}

impl From<reqwest::Error> for FixerError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the access key
        FixerError::Transport(err.without_url().to_string())
    }
}

impl From<serde_json::Error> for FixerError {
    fn from(err: serde_json::Error) -> Self {
        FixerError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_book_wording() {
        let err = FixerError::MissingRate {
            source_currency: "usd".to_string(),
            target_currency: "XYZ".to_string(),
        };
        assert_eq!(err.to_string(), "Could not find rates for usd or XYZ");

        let err = FixerError::InvalidAmount("abc".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid amount 'abc'. Please provide a numeric value."
        );

        let err = FixerError::Upstream("Invalid access key".to_string());
        assert_eq!(err.to_string(), "Invalid access key");
    }

    #[test]
    fn test_json_error_is_transport() {
        let err: FixerError = serde_json::from_str::<serde_json::Value>("not json")
            .unwrap_err()
            .into();
        assert!(matches!(err, FixerError::Transport(_)));
    }
}
