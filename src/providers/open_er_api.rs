use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::rate_provider::{FetchError, RateProvider};
use crate::rates::RateTable;

// OpenErApiProvider implementation for RateProvider
pub struct OpenErApiProvider {
    base_url: String,
    base_currency: String,
    timeout: Duration,
}

impl OpenErApiProvider {
    pub fn new(base_url: &str, base_currency: &str, timeout: Duration) -> Self {
        OpenErApiProvider {
            base_url: base_url.to_string(),
            base_currency: base_currency.to_string(),
            timeout,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    result: Option<String>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    #[serde(default)]
    rates: HashMap<String, f64>,
    #[serde(default)]
    time_last_update_unix: i64,
}

fn classify_transport_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_connect() {
        FetchError::Connect
    } else {
        FetchError::Request(e.to_string())
    }
}

#[async_trait]
impl RateProvider for OpenErApiProvider {
    async fn fetch_rates(&self) -> Result<RateTable, FetchError> {
        let url = format!("{}/v6/latest/{}", self.base_url, self.base_currency);
        debug!("Requesting exchange rates from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("fxc/0.1")
            .timeout(self.timeout)
            .build()
            .map_err(|e| FetchError::Unexpected(e.to_string()))?;

        let response = client
            .get(&url)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Request(format!("HTTP error: {status}")));
        }

        let text = response.text().await.map_err(classify_transport_error)?;

        let data: LatestRatesResponse =
            serde_json::from_str(&text).map_err(|e| FetchError::Malformed(e.to_string()))?;

        // An explicit upstream error wins over any partial data in the body.
        if data.result.as_deref() == Some("error") {
            return Err(FetchError::Upstream(
                data.error_type
                    .unwrap_or_else(|| "unknown error".to_string()),
            ));
        }

        debug!(
            codes = data.rates.len(),
            last_update = data.time_last_update_unix,
            "Received rate table"
        );

        RateTable::new(&self.base_currency, data.rates, data.time_last_update_unix)
    }
}
