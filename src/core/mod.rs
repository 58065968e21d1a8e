//! Core abstractions for the exchange rate book

pub mod config;
pub mod error;
pub mod log;
pub mod rates;

// Re-export main types for cleaner imports
pub use error::FixerError;
pub use rates::{Conversion, ExchangeRateProvider, RateSnapshot, SymbolCatalog};
