//! Single-owner state for the interactive converter.
//!
//! The session owns the current rate table and the currency selection.
//! The background fetch never touches it; the interactive loop applies
//! completed fetches itself via [`Session::replace_table`].

use tracing::debug;

use crate::convert::{self, Conversion, ConvertError};
use crate::rates::RateTable;

pub struct Session {
    table: Option<RateTable>,
    preferred_target: String,
    from: Option<String>,
    to: Option<String>,
    result: Option<Conversion>,
    status: Option<String>,
}

impl Session {
    pub fn new(preferred_target: &str) -> Self {
        Session {
            table: None,
            preferred_target: preferred_target.to_string(),
            from: None,
            to: None,
            result: None,
            status: None,
        }
    }

    pub fn table(&self) -> Option<&RateTable> {
        self.table.as_ref()
    }

    pub fn from(&self) -> Option<&str> {
        self.from.as_deref()
    }

    pub fn to(&self) -> Option<&str> {
        self.to.as_deref()
    }

    pub fn result(&self) -> Option<&Conversion> {
        self.result.as_ref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    /// Replaces the rate table wholesale. A selection that is still
    /// available in the new table is kept; anything else falls back to
    /// the defaults: source is the base currency if present, else the
    /// first code in sorted order; destination is the preferred target
    /// if present, else the second code, else the source itself.
    pub fn replace_table(&mut self, table: RateTable) {
        let codes = table.codes();

        let mut from = self
            .from
            .take()
            .filter(|code| table.contains(code));
        let mut to = self.to.take().filter(|code| table.contains(code));

        if from.is_none() {
            from = if table.contains(table.base()) {
                Some(table.base().to_string())
            } else {
                codes.first().cloned()
            };
        }
        if to.is_none() {
            to = if table.contains(&self.preferred_target) {
                Some(self.preferred_target.clone())
            } else if codes.len() > 1 {
                Some(codes[1].clone())
            } else {
                from.clone()
            };
        }

        debug!(?from, ?to, codes = codes.len(), "Replaced rate table");
        self.from = from;
        self.to = to;
        self.table = Some(table);
    }

    /// Sets the source currency. The code must exist in the table.
    pub fn select_from(&mut self, code: &str) -> bool {
        if self.table.as_ref().is_some_and(|t| t.contains(code)) {
            self.from = Some(code.to_string());
            true
        } else {
            false
        }
    }

    /// Sets the destination currency. The code must exist in the table.
    pub fn select_to(&mut self, code: &str) -> bool {
        if self.table.as_ref().is_some_and(|t| t.contains(code)) {
            self.to = Some(code.to_string());
            true
        } else {
            false
        }
    }

    /// Exchanges source and destination, clearing any previously shown
    /// result and status.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.from, &mut self.to);
        self.result = None;
        self.status = None;
    }

    /// Validates the raw amount and runs the conversion against the
    /// current table and selection. A failed conversion never leaves a
    /// stale value behind as the latest result.
    pub fn convert_input(&mut self, input: &str) -> Result<Conversion, ConvertError> {
        let amount = convert::parse_amount(input)?;

        let table = self.table.as_ref().ok_or(ConvertError::MissingSelection)?;
        let (from, to) = match (self.from.as_deref(), self.to.as_deref()) {
            (Some(from), Some(to)) => (from, to),
            _ => return Err(ConvertError::MissingSelection),
        };

        match convert::convert(amount, from, to, table) {
            Ok(conversion) => {
                self.status = None;
                self.result = Some(conversion.clone());
                Ok(conversion)
            }
            Err(err) => {
                if matches!(err, ConvertError::Arithmetic(_)) {
                    self.result = None;
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn table_of(codes: &[(&str, f64)]) -> RateTable {
        let rates: HashMap<String, f64> = codes
            .iter()
            .map(|(code, rate)| (code.to_string(), *rate))
            .collect();
        RateTable::new("USD", rates, 1710288000).unwrap()
    }

    fn full_table() -> RateTable {
        table_of(&[("USD", 1.0), ("EUR", 0.9), ("JPY", 150.0)])
    }

    #[test]
    fn test_default_selection() {
        let mut session = Session::new("EUR");
        session.replace_table(full_table());

        assert_eq!(session.from(), Some("USD"));
        assert_eq!(session.to(), Some("EUR"));
    }

    #[test]
    fn test_default_selection_without_base() {
        let mut session = Session::new("EUR");
        session.replace_table(table_of(&[("GBP", 0.8), ("JPY", 150.0)]));

        // Base is absent: first sorted code becomes the source, and the
        // preferred target is absent too, so the second code is used.
        assert_eq!(session.from(), Some("GBP"));
        assert_eq!(session.to(), Some("JPY"));
    }

    #[test]
    fn test_default_selection_single_code() {
        let mut session = Session::new("EUR");
        session.replace_table(table_of(&[("CHF", 0.95)]));

        assert_eq!(session.from(), Some("CHF"));
        assert_eq!(session.to(), Some("CHF"));
    }

    #[test]
    fn test_replace_preserves_valid_selection() {
        let mut session = Session::new("EUR");
        session.replace_table(full_table());
        assert!(session.select_from("JPY"));
        assert!(session.select_to("USD"));

        session.replace_table(full_table());
        assert_eq!(session.from(), Some("JPY"));
        assert_eq!(session.to(), Some("USD"));
    }

    #[test]
    fn test_replace_redefaults_dropped_selection() {
        let mut session = Session::new("EUR");
        session.replace_table(full_table());
        assert!(session.select_from("JPY"));

        session.replace_table(table_of(&[("USD", 1.0), ("EUR", 0.9)]));
        assert_eq!(session.from(), Some("USD"));
        assert_eq!(session.to(), Some("EUR"));
    }

    #[test]
    fn test_select_rejects_unknown_code() {
        let mut session = Session::new("EUR");
        session.replace_table(full_table());

        assert!(!session.select_from("XXX"));
        assert_eq!(session.from(), Some("USD"));
    }

    #[test]
    fn test_select_rejects_before_first_fetch() {
        let mut session = Session::new("EUR");
        assert!(!session.select_from("USD"));
        assert!(!session.select_to("EUR"));
    }

    #[test]
    fn test_swap_clears_result_and_status() {
        let mut session = Session::new("EUR");
        session.replace_table(full_table());
        session.convert_input("100").unwrap();
        session.set_status("done");

        session.swap();

        assert_eq!(session.from(), Some("EUR"));
        assert_eq!(session.to(), Some("USD"));
        assert!(session.result().is_none());
        assert!(session.status().is_none());
    }

    #[test]
    fn test_convert_input_stores_result() {
        let mut session = Session::new("EUR");
        session.replace_table(full_table());

        let conversion = session.convert_input("100").unwrap();
        assert_eq!(conversion.to_string(), "100.00 USD = 90.00 EUR");
        assert_eq!(session.result(), Some(&conversion));
    }

    #[test]
    fn test_convert_input_before_first_fetch() {
        let mut session = Session::new("EUR");
        assert_eq!(
            session.convert_input("100"),
            Err(ConvertError::MissingSelection)
        );
    }

    #[test]
    fn test_failed_input_leaves_previous_result() {
        let mut session = Session::new("EUR");
        session.replace_table(full_table());
        let first = session.convert_input("100").unwrap();

        assert_eq!(
            session.convert_input("abc"),
            Err(ConvertError::InvalidAmount)
        );
        assert_eq!(
            session.convert_input("-5"),
            Err(ConvertError::NegativeAmount)
        );
        assert_eq!(session.result(), Some(&first));
    }
}
