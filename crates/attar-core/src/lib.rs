//! # attar-core
//!
//! Core domain model and metric derivation library for attar-reports.
//!
//! This crate provides:
//! - Report payloads: `ReportPayload` and one schema per report type
//! - Export context: `FilterContext`, `ExportConfig`
//! - The metric derivation library (`metrics`): ratios, classifications,
//!   health scores, recommendations and daily rollups
//! - Error types and result aliases
//!
//! ## Example
//!
//! ```rust
//! use attar_core::metrics::{gross_margin, inventory_turnover};
//! use attar_core::{ReportKind, ReportPayload};
//!
//! let payload = ReportPayload::from_json(
//!     ReportKind::Category,
//!     r#"{"categories": [{"name": "Oud", "totalProducts": 4, "totalSales": 1200, "totalPurchases": 900, "stockValue": 600}]}"#,
//! )
//! .unwrap();
//! assert_eq!(payload.kind(), ReportKind::Category);
//!
//! assert_eq!(gross_margin(1200.0, 900.0), 25.0);
//! assert_eq!(inventory_turnover(1200.0, 600.0), Some(2.0));
//! assert_eq!(inventory_turnover(1200.0, 0.0), None);
//! ```

pub mod config;
pub mod filter;
pub mod metrics;
pub mod report;
pub mod serde_helpers;

pub use config::ExportConfig;
pub use filter::FilterContext;
pub use report::{
    category::{CategoryReport, CategoryStat, CategorySummary},
    daily::{DailySalesReport, DailySummary, Invoice, LineItem},
    inventory::{Batch, InventoryProduct, InventoryReport, InventorySummary},
    purchase::{PurchaseCategory, PurchaseRecord, PurchaseReport, PurchaseSummary, PurchaseTrendPoint},
    sales::{PaymentMethodStat, SalesReport, SalesSummary, SalesTrendPoint, TopProduct},
    trending::{TrendingProduct, TrendingReport, TrendingSummary},
    CategoryBreakdown, DateRange, ReportKind, ReportPayload,
};

use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Errors raised while parsing payloads or producing a workbook
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T, E = ExportError> = std::result::Result<T, E>;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_error_messages() {
        let err = ExportError::Format("sheet name too long".into());
        assert_eq!(err.to_string(), "Format error: sheet name too long");

        let err = ExportError::InvalidData("no rows".into());
        assert_eq!(err.to_string(), "Invalid data: no rows");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: ExportError = io.into();
        assert!(matches!(err, ExportError::Io(_)));
    }
}
