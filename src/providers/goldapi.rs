use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::core::price::{FetchError, PriceFetchClient, SpotQuote};

const ACCESS_TOKEN_HEADER: &str = "x-access-token";

/// Fetches spot prices from GoldAPI (`{base_url}/{symbol}/{currency}`).
pub struct GoldApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl GoldApiClient {
    pub fn new(base_url: &str, access_token: &str) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCESS_TOKEN_HEADER, HeaderValue::from_str(access_token)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .user_agent("metalotrack/0.1")
            .default_headers(headers)
            .build()?;

        Ok(GoldApiClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[derive(Deserialize, Debug)]
struct GoldApiResponse {
    price: f64,
    #[serde(default)]
    prev_close_price: Option<f64>,
    #[serde(default)]
    prev_open_price: Option<f64>,
}

#[async_trait]
impl PriceFetchClient for GoldApiClient {
    #[instrument(name = "GoldApiFetch", skip(self), fields(symbol = %symbol, currency = %currency))]
    async fn fetch(&self, symbol: &str, currency: &str) -> Result<SpotQuote, FetchError> {
        let url = format!("{}/{}/{}", self.base_url, symbol, currency);
        debug!("Requesting price data from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::network(e.to_string()))?;

        let status = response.status();
        debug!(status = status.as_u16(), "Received GoldAPI response");
        if !status.is_success() {
            return Err(FetchError::from_status(status.as_u16()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| FetchError::network(e.to_string()))?;
        let data: GoldApiResponse = serde_json::from_str(&text).map_err(|e| {
            FetchError::network(format!(
                "Failed to parse price response for {symbol}/{currency}: {e}"
            ))
        })?;

        Ok(SpotQuote {
            price: data.price,
            previous_close: data.prev_close_price,
            previous_open: data.prev_open_price,
        })
    }
}
