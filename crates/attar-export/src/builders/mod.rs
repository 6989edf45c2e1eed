//! Sheet builders
//!
//! One module per report type. Each turns its own payload variant plus the
//! [`BuildContext`] into the canonical, ordered list of [`SheetSpec`]s:
//!
//! | Report | Sheets |
//! |--------|--------|
//! | Inventory | Executive Summary, Product Inventory, Batch Details, Disposal History, Risk Management |
//! | Sales | Executive Summary, Sales Trend Analysis, Top Products, Payment Analysis, Performance Metrics |
//! | Purchase | Executive Summary, Purchase Trend Analysis, Category Analysis, Recent Purchases, Inventory Insights |
//! | Category | Executive Summary, Category Performance, Sales Analysis, Purchase Analysis, Stock Management, Strategic Recommendations |
//! | Trending | Executive Summary, Product Performance, Sales Trends, Category Analysis, Inventory Management, Customer Insights |
//! | Daily sales | Executive Summary, Invoice Details, Product Performance, Category Analysis, Hourly Analysis, Customer Analysis |
//!
//! Builders are infallible. Category, search and payment filters from the
//! [`FilterContext`] are applied to the primary collection before any sheet
//! is built.

pub mod category;
pub mod daily;
pub mod inventory;
pub mod purchase;
pub mod sales;
pub mod trending;

use attar_core::metrics::ExpiryPolicy;
use attar_core::{DateRange, ExportConfig, FilterContext, ReportKind, ReportPayload};
use chrono::{DateTime, Utc};

use crate::sheet::{Cell, SummarySheet};
use crate::SheetSpec;

pub const EXECUTIVE_SUMMARY: &str = "Executive Summary";

/// Everything a builder may read besides its payload
#[derive(Clone, Copy, Debug)]
pub struct BuildContext<'a> {
    pub filters: &'a FilterContext,
    pub config: &'a ExportConfig,
    pub generated_at: DateTime<Utc>,
}

impl<'a> BuildContext<'a> {
    pub fn new(filters: &'a FilterContext, config: &'a ExportConfig, generated_at: DateTime<Utc>) -> Self {
        Self {
            filters,
            config,
            generated_at,
        }
    }

    pub fn policy(&self) -> ExpiryPolicy {
        ExpiryPolicy::from_config(self.filters.as_of, self.config)
    }

    /// Executive Summary opening with the REPORT INFORMATION section
    pub fn summary(&self, kind: ReportKind, date_range: Option<&DateRange>) -> SummarySheet {
        let mut summary = SummarySheet::new(EXECUTIVE_SUMMARY);
        summary
            .section("REPORT INFORMATION")
            .row("Report", kind.title())
            .row("Company", self.config.company_name.as_str())
            .row(
                "Generated",
                self.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            )
            .row("Period", self.filters.describe_period(date_range))
            .row("As Of", Cell::Date(self.filters.as_of));
        for (label, value) in self.filters.applied_filters() {
            summary.row(format!("Filter: {label}"), value);
        }
        summary
    }
}

/// Canonical sheet names of a report, in order
pub fn sheet_names(kind: ReportKind) -> &'static [&'static str] {
    match kind {
        ReportKind::Inventory => inventory::SHEETS,
        ReportKind::Sales => sales::SHEETS,
        ReportKind::Purchase => purchase::SHEETS,
        ReportKind::Category => category::SHEETS,
        ReportKind::Trending => trending::SHEETS,
        ReportKind::DailySales => daily::SHEETS,
    }
}

/// Number of primary records that pass the filters
pub fn admitted_len(payload: &ReportPayload, filters: &FilterContext) -> usize {
    match payload {
        ReportPayload::Inventory(report) => inventory::admitted(report, filters).len(),
        ReportPayload::Sales(report) => sales::admitted(report, filters).len(),
        ReportPayload::Purchase(report) => purchase::admitted(report, filters).len(),
        ReportPayload::Category(report) => category::admitted(report, filters).len(),
        ReportPayload::Trending(report) => trending::admitted(report, filters).len(),
        ReportPayload::DailySales(report) => daily::admitted(report, filters).len(),
    }
}

/// Build every sheet of a report
pub fn build_sheets(payload: &ReportPayload, ctx: &BuildContext<'_>) -> Vec<SheetSpec> {
    match payload {
        ReportPayload::Inventory(report) => inventory::build(report, ctx),
        ReportPayload::Sales(report) => sales::build(report, ctx),
        ReportPayload::Purchase(report) => purchase::build(report, ctx),
        ReportPayload::Category(report) => category::build(report, ctx),
        ReportPayload::Trending(report) => trending::build(report, ctx),
        ReportPayload::DailySales(report) => daily::build(report, ctx),
    }
}
