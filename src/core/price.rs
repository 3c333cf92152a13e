//! Pricing abstractions and core types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One spot quote for a metal in a currency, as returned by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpotQuote {
    pub price: f64,
    pub previous_close: Option<f64>,
    pub previous_open: Option<f64>,
}

/// Why a single price fetch failed. The `Display` text is shown to the user
/// in place of the price.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("rate limit exceeded")]
    RateLimited,

    #[error("invalid request / unsupported currency")]
    InvalidRequest,

    #[error("credential invalid or expired")]
    CredentialInvalid,

    #[error("HTTP error: status {0}")]
    Http(u16),

    #[error("{0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,
}

impl FetchError {
    pub const NETWORK_FALLBACK: &'static str = "failed to fetch data";

    /// Builds a `Network` error from a transport message, falling back to a
    /// generic reason when the message is empty.
    pub fn network(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            FetchError::Network(Self::NETWORK_FALLBACK.to_string())
        } else {
            FetchError::Network(message)
        }
    }

    /// Maps a non-success HTTP status to its error.
    pub fn from_status(status: u16) -> Self {
        match status {
            429 => FetchError::RateLimited,
            400 => FetchError::InvalidRequest,
            401 => FetchError::CredentialInvalid,
            code => FetchError::Http(code),
        }
    }
}

#[async_trait]
pub trait PriceFetchClient: Send + Sync {
    /// Performs exactly one request for `symbol` priced in `currency`.
    async fn fetch(&self, symbol: &str, currency: &str) -> Result<SpotQuote, FetchError>;
}
