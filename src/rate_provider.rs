//! Provider seam for fetching the exchange rate table.

use async_trait::async_trait;
use thiserror::Error;

use crate::rates::RateTable;

/// Classified failures a rate fetch can surface. Each variant carries a
/// distinct user-facing message; none of them is fatal to the caller.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Connection timed out. Please check your internet connection.")]
    Timeout,

    #[error("Network connection error. Please check your internet connection.")]
    Connect,

    #[error("Failed to load exchange rates: {0}")]
    Request(String),

    #[error("Invalid response from the server: {0}")]
    Malformed(String),

    #[error("API error: {0}")]
    Upstream(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rates(&self) -> Result<RateTable, FetchError>;
}
