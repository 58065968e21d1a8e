pub mod book;
pub mod cli;
pub mod core;
pub mod providers;

use crate::book::FixerBook;
use crate::core::config::AppConfig;
use anyhow::{Context, Result};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Hello,
    Rates,
    SpecificRates {
        currencies: String,
    },
    Convert {
        amount: String,
        source: String,
        target: String,
    },
    Currencies,
}

/// Overrides supplied by the host on top of the loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config_path: Option<String>,
    pub api_key: Option<String>,
    pub timeout: Option<f64>,
}

/// Runs a single book procedure and returns its text output.
pub async fn run_command(command: AppCommand, options: &RunOptions) -> Result<String> {
    info!("fxbook starting...");

    let config = match options.config_path.as_deref() {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!(base_url = %config.fixer.base_url, timeout = config.fixer.timeout, "Loaded config");

    let mut book =
        FixerBook::from_config(&config.fixer).context("Failed to create Fixer client")?;
    if let Some(timeout) = options.timeout {
        book.set_timeout(timeout)
            .with_context(|| format!("Invalid timeout: {timeout}"))?;
    }

    let output = match command {
        AppCommand::Hello => book.greet(),
        command => {
            let api_key = require_api_key(options.api_key.as_deref(), config.api_key.as_deref())?;
            let spinner = cli::ui::new_spinner("Contacting Fixer.io...");
            let output = dispatch(&book, command, &api_key).await;
            spinner.finish_and_clear();
            output
        }
    };

    Ok(output)
}

fn require_api_key(cli_key: Option<&str>, configured_key: Option<&str>) -> Result<String> {
    cli_key
        .or(configured_key)
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .context("No Fixer.io API key configured. Pass --api-key or set api_key in the config file")
}

async fn dispatch(book: &FixerBook, command: AppCommand, api_key: &str) -> String {
    match command {
        AppCommand::Hello => book.greet(),
        AppCommand::Rates => book.get_rates(api_key).await,
        AppCommand::SpecificRates { currencies } => {
            book.get_specific_rates(&currencies, api_key).await
        }
        AppCommand::Convert {
            amount,
            source,
            target,
        } => book.convert_currency(&amount, &source, &target, api_key).await,
        AppCommand::Currencies => book.check_supported_currencies(api_key).await,
    }
}
