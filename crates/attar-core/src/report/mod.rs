//! Report payloads
//!
//! One schema per report type, joined in the [`ReportPayload`] tagged union.
//! Every schema deserializes from the reporting backend's camelCase JSON and
//! tolerates missing or `null` fields (see [`crate::serde_helpers`]).

pub mod category;
pub mod daily;
pub mod inventory;
pub mod purchase;
pub mod sales;
pub mod trending;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::serde_helpers::{number, opt_date, text};
use crate::ExportError;

use category::CategoryReport;
use daily::DailySalesReport;
use inventory::InventoryReport;
use purchase::PurchaseReport;
use sales::SalesReport;
use trending::TrendingReport;

// ============================================================================
// Report Kind
// ============================================================================

/// The six exportable report types
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    Inventory,
    Sales,
    Purchase,
    Category,
    Trending,
    DailySales,
}

impl ReportKind {
    pub const ALL: [ReportKind; 6] = [
        ReportKind::Inventory,
        ReportKind::Sales,
        ReportKind::Purchase,
        ReportKind::Category,
        ReportKind::Trending,
        ReportKind::DailySales,
    ];

    /// Machine name used on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Inventory => "inventory",
            ReportKind::Sales => "sales",
            ReportKind::Purchase => "purchase",
            ReportKind::Category => "category",
            ReportKind::Trending => "trending",
            ReportKind::DailySales => "daily-sales",
        }
    }

    /// Human-readable report title
    pub fn title(&self) -> &'static str {
        match self {
            ReportKind::Inventory => "Inventory & Expiry Report",
            ReportKind::Sales => "Sales Report",
            ReportKind::Purchase => "Purchase Report",
            ReportKind::Category => "Category Report",
            ReportKind::Trending => "Trending Products Report",
            ReportKind::DailySales => "Daily Sales Report",
        }
    }

    /// Filename prefix; always part of the exported filename
    pub fn file_label(&self) -> &'static str {
        match self {
            ReportKind::Inventory => "Inventory_Expiry_Report",
            ReportKind::Sales => "Sales_Report",
            ReportKind::Purchase => "Purchase_Report",
            ReportKind::Category => "Category_Report",
            ReportKind::Trending => "Trending_Products_Report",
            ReportKind::DailySales => "Daily_Sales_Report",
        }
    }

    /// Noun used in user-facing notifications ("No sales data available")
    pub fn noun(&self) -> &'static str {
        match self {
            ReportKind::Inventory => "inventory",
            ReportKind::Sales => "sales",
            ReportKind::Purchase => "purchase",
            ReportKind::Category => "category",
            ReportKind::Trending => "trending products",
            ReportKind::DailySales => "daily sales",
        }
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ReportKind {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "inventory" | "expiry" => Ok(ReportKind::Inventory),
            "sales" => Ok(ReportKind::Sales),
            "purchase" | "purchases" => Ok(ReportKind::Purchase),
            "category" | "categories" => Ok(ReportKind::Category),
            "trending" | "trending-products" => Ok(ReportKind::Trending),
            "daily-sales" | "daily" => Ok(ReportKind::DailySales),
            other => Err(ExportError::InvalidData(format!("unknown report kind '{other}'"))),
        }
    }
}

// ============================================================================
// Report Payload
// ============================================================================

/// One aggregate report as delivered by the reporting backend
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reportType", content = "data", rename_all = "kebab-case")]
pub enum ReportPayload {
    Inventory(InventoryReport),
    Sales(SalesReport),
    Purchase(PurchaseReport),
    Category(CategoryReport),
    Trending(TrendingReport),
    DailySales(DailySalesReport),
}

impl ReportPayload {
    /// Parse the body of a report of a known kind
    pub fn from_json(kind: ReportKind, json: &str) -> Result<Self, ExportError> {
        Ok(match kind {
            ReportKind::Inventory => ReportPayload::Inventory(serde_json::from_str(json)?),
            ReportKind::Sales => ReportPayload::Sales(serde_json::from_str(json)?),
            ReportKind::Purchase => ReportPayload::Purchase(serde_json::from_str(json)?),
            ReportKind::Category => ReportPayload::Category(serde_json::from_str(json)?),
            ReportKind::Trending => ReportPayload::Trending(serde_json::from_str(json)?),
            ReportKind::DailySales => ReportPayload::DailySales(serde_json::from_str(json)?),
        })
    }

    pub fn kind(&self) -> ReportKind {
        match self {
            ReportPayload::Inventory(_) => ReportKind::Inventory,
            ReportPayload::Sales(_) => ReportKind::Sales,
            ReportPayload::Purchase(_) => ReportKind::Purchase,
            ReportPayload::Category(_) => ReportKind::Category,
            ReportPayload::Trending(_) => ReportKind::Trending,
            ReportPayload::DailySales(_) => ReportKind::DailySales,
        }
    }

    /// Number of records in the primary collection
    pub fn primary_len(&self) -> usize {
        match self {
            ReportPayload::Inventory(r) => r.inventory.len(),
            ReportPayload::Sales(r) => r.top_products.len(),
            ReportPayload::Purchase(r) => r.recent_purchases.len(),
            ReportPayload::Category(r) => r.categories.len(),
            ReportPayload::Trending(r) => r.trending_products.len(),
            ReportPayload::DailySales(r) => r.sales.len(),
        }
    }

    /// Date range echoed by the backend, if any
    pub fn date_range(&self) -> Option<&DateRange> {
        match self {
            ReportPayload::Inventory(r) => r.date_range.as_ref(),
            ReportPayload::Sales(r) => r.date_range.as_ref(),
            ReportPayload::Purchase(r) => r.date_range.as_ref(),
            ReportPayload::Category(r) => r.date_range.as_ref(),
            ReportPayload::Trending(r) => r.date_range.as_ref(),
            ReportPayload::DailySales(r) => r.date_range.as_ref(),
        }
    }
}

// ============================================================================
// Shared Slices
// ============================================================================

/// Reporting window echoed by the backend
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DateRange {
    #[serde(deserialize_with = "opt_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(deserialize_with = "opt_date")]
    pub end_date: Option<NaiveDate>,
}

impl DateRange {
    /// `start to end`, or whichever bound is known
    pub fn describe(&self) -> Option<String> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some(format!("{start} to {end}")),
            (Some(start), None) => Some(format!("from {start}")),
            (None, Some(end)) => Some(format!("until {end}")),
            (None, None) => None,
        }
    }
}

/// Per-category revenue rollup shared by the sales and trending reports
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CategoryBreakdown {
    #[serde(deserialize_with = "text")]
    pub category: String,
    #[serde(deserialize_with = "number")]
    pub revenue: f64,
    #[serde(deserialize_with = "number")]
    pub quantity: f64,
    #[serde(deserialize_with = "number")]
    pub count: f64,
}
