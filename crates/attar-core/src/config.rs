//! Export configuration
//!
//! Presentation and policy knobs shared by every export. Built with the
//! builder methods below or loaded from a TOML file by the CLI.

use serde::{Deserialize, Serialize};

/// Workbook-wide settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Business name printed in every Executive Summary
    pub company_name: String,
    /// Currency symbol used in money formats
    pub currency: String,
    /// Look-ahead window in days for near-expiry classification
    pub near_expiry_days: i64,
    /// Batches expiring within this many days are HIGH priority
    pub high_priority_days: i64,
    /// Days of demand a reorder suggestion should cover
    pub reorder_cover_days: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            company_name: "Attar House".into(),
            currency: "₹".into(),
            near_expiry_days: 30,
            high_priority_days: 7,
            reorder_cover_days: 30,
        }
    }
}

impl ExportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set currency symbol
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Set the business name shown in summaries
    pub fn company_name(mut self, name: impl Into<String>) -> Self {
        self.company_name = name.into();
        self
    }

    /// Set the near-expiry look-ahead window
    pub fn near_expiry_days(mut self, days: i64) -> Self {
        self.near_expiry_days = days;
        self
    }

    /// Set the HIGH priority expiry threshold
    pub fn high_priority_days(mut self, days: i64) -> Self {
        self.high_priority_days = days;
        self
    }

    /// Set the number of days a reorder should cover
    pub fn reorder_cover_days(mut self, days: u32) -> Self {
        self.reorder_cover_days = days;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ExportConfig::new();
        assert_eq!(config.currency, "₹");
        assert_eq!(config.near_expiry_days, 30);
        assert_eq!(config.high_priority_days, 7);
    }

    #[test]
    fn builder_overrides() {
        let config = ExportConfig::new()
            .currency("AED")
            .company_name("Dar Al Oud")
            .near_expiry_days(45)
            .high_priority_days(10)
            .reorder_cover_days(60);

        assert_eq!(config.currency, "AED");
        assert_eq!(config.company_name, "Dar Al Oud");
        assert_eq!(config.near_expiry_days, 45);
        assert_eq!(config.high_priority_days, 10);
        assert_eq!(config.reorder_cover_days, 60);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: ExportConfig = serde_json::from_str(r#"{"currency": "$"}"#).unwrap();
        assert_eq!(config.currency, "$");
        assert_eq!(config.near_expiry_days, 30);
    }
}
