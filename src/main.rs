use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxbook::cli::{setup::setup, ui};
use fxbook::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Fixer.io API key, overrides the config file
    #[arg(short = 'k', long, global = true)]
    api_key: Option<String>,

    /// Request timeout in seconds
    #[arg(short, long, global = true)]
    timeout: Option<f64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Check that the book is loaded and responding
    Hello,
    /// Show latest rates for all supported currencies
    Rates,
    /// Show latest rates for specific currencies
    Specific {
        /// Comma-separated currency codes, e.g. "USD,GBP,JPY"
        currencies: String,
    },
    /// Convert an amount between two currencies
    Convert {
        amount: String,
        source: String,
        target: String,
    },
    /// List supported currencies
    Currencies,
}

impl From<Commands> for fxbook::AppCommand {
    fn from(cmd: Commands) -> fxbook::AppCommand {
        match cmd {
            Commands::Hello => fxbook::AppCommand::Hello,
            Commands::Rates => fxbook::AppCommand::Rates,
            Commands::Specific { currencies } => fxbook::AppCommand::SpecificRates { currencies },
            Commands::Convert {
                amount,
                source,
                target,
            } => fxbook::AppCommand::Convert {
                amount,
                source,
                target,
            },
            Commands::Currencies => fxbook::AppCommand::Currencies,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let options = fxbook::RunOptions {
        config_path: cli.config_path,
        api_key: cli.api_key,
        timeout: cli.timeout,
    };

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => fxbook::run_command(cmd.into(), &options)
            .await
            .map(|output| println!("{}", ui::style_output(&output))),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
