use anyhow::Result;
use clap::{Parser, Subcommand};
use metalotrack::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Currency code to show prices in, overriding the config
    #[arg(long, global = true)]
    currency: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for metalotrack::AppCommand {
    fn from(cmd: Commands) -> metalotrack::AppCommand {
        match cmd {
            Commands::Prices => metalotrack::AppCommand::Prices,
            Commands::Detail { metal } => metalotrack::AppCommand::Detail { metal },
            Commands::Currencies { search } => metalotrack::AppCommand::Currencies { search },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display spot prices of all tracked metals
    Prices,
    /// Display per-weight prices and previous session of one metal
    Detail {
        /// Metal name or symbol, e.g. gold or XAU
        metal: String,
    },
    /// List supported currencies
    Currencies {
        /// Filter by code or name
        search: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config_path = cli.config_path.as_deref();
    let currency = cli.currency.as_deref();
    let result = match cli.command {
        Some(Commands::Setup) => metalotrack::cli::setup::setup(),
        Some(cmd) => metalotrack::run_command(cmd.into(), config_path, currency).await,
        None => {
            metalotrack::run_command(metalotrack::AppCommand::Prices, config_path, currency).await
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
