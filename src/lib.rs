pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::{MetalBoard, TRACKED_METALS, currency};
use anyhow::{Result, anyhow};
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Prices,
    Detail { metal: String },
    Currencies { search: Option<String> },
}

/// Loads the config and applies a currency override from the command line.
pub fn load_config(config_path: Option<&str>, currency: Option<&str>) -> Result<AppConfig> {
    let mut config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    if let Some(code) = currency {
        config.currency = resolve_currency(code)?;
    }
    debug!(currency = %config.currency, base_url = %config.providers.goldapi.base_url, "Loaded config");
    Ok(config)
}

/// Canonical catalog code for `code`.
pub fn resolve_currency(code: &str) -> Result<String> {
    currency::find(code)
        .map(|c| c.code.to_string())
        .ok_or_else(|| anyhow!("Unsupported currency: {}", code))
}

/// Builds a board over every tracked metal, priced through GoldAPI.
pub fn build_board(config: &AppConfig) -> Result<MetalBoard> {
    let token = config.access_token()?;
    let client = providers::GoldApiClient::new(&config.providers.goldapi.base_url, &token)?;
    Ok(MetalBoard::new(
        Arc::new(client),
        TRACKED_METALS.to_vec(),
        resolve_currency(&config.currency)?,
        config.board.options(),
    ))
}

pub async fn run_command(
    command: AppCommand,
    config_path: Option<&str>,
    currency: Option<&str>,
) -> Result<()> {
    info!("MetaloTrack starting...");

    match command {
        AppCommand::Currencies { search } => {
            let selected = match currency {
                Some(code) => resolve_currency(code)?,
                None => load_config(config_path, None)
                    .map(|c| c.currency)
                    .unwrap_or_else(|e| {
                        debug!(error = %e, "No usable config, using default currency");
                        currency::DEFAULT_CURRENCY.to_string()
                    }),
            };
            cli::currencies::run(search.as_deref(), &selected);
            Ok(())
        }
        AppCommand::Prices => {
            let config = load_config(config_path, currency)?;
            let board = build_board(&config)?;
            cli::prices::run(&board).await
        }
        AppCommand::Detail { metal } => {
            let config = load_config(config_path, currency)?;
            let board = build_board(&config)?;
            cli::detail::run(&board, &metal).await
        }
    }
}
