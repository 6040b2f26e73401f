//! Exchange rate table fetched from the upstream API.

use std::collections::HashMap;

use chrono::{TimeZone, Utc};

use crate::rate_provider::FetchError;

/// Rates for a set of currency codes, all relative to one base currency.
///
/// A table is only ever built through [`RateTable::new`], which rejects
/// empty or non-positive data, and is replaced wholesale on each
/// successful fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    base: String,
    rates: HashMap<String, f64>,
    last_update_unix: i64,
}

impl RateTable {
    /// Builds a table from a fetched rate mapping. Every rate must be a
    /// positive finite number since rates are used as divisors during
    /// conversion.
    pub fn new(
        base: &str,
        rates: HashMap<String, f64>,
        last_update_unix: i64,
    ) -> Result<Self, FetchError> {
        if rates.is_empty() {
            return Err(FetchError::Malformed("rate table is empty".to_string()));
        }
        if let Some((code, rate)) = rates.iter().find(|(_, r)| !r.is_finite() || **r <= 0.0) {
            return Err(FetchError::Malformed(format!(
                "invalid rate {rate} for {code}"
            )));
        }

        Ok(RateTable {
            base: base.to_string(),
            rates,
            last_update_unix,
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.rates.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Available currency codes in sorted order.
    pub fn codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.rates.keys().cloned().collect();
        codes.sort();
        codes
    }

    pub fn last_update_unix(&self) -> i64 {
        self.last_update_unix
    }

    /// Human readable form of the upstream last-update timestamp.
    pub fn last_update(&self) -> String {
        format_timestamp(self.last_update_unix)
    }
}

/// Renders a unix timestamp as e.g. "2024-03-13 00:00 UTC". Zero means
/// the upstream never reported an update time.
pub fn format_timestamp(unix: i64) -> String {
    if unix == 0 {
        return "unknown time".to_string();
    }
    match Utc.timestamp_opt(unix, 0).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => "unknown time".to_string(),
    }
}
