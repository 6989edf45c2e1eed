//! Trending products report payload

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{CategoryBreakdown, DateRange};
use crate::serde_helpers::{number, opt_date, opt_number, or_default, text};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrendingReport {
    #[serde(deserialize_with = "or_default")]
    pub summary: TrendingSummary,
    #[serde(deserialize_with = "or_default")]
    pub trending_products: Vec<TrendingProduct>,
    #[serde(deserialize_with = "or_default")]
    pub category_breakdown: Vec<CategoryBreakdown>,
    pub filters: Option<serde_json::Value>,
    pub date_range: Option<DateRange>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrendingSummary {
    #[serde(deserialize_with = "number")]
    pub total_products: f64,
    #[serde(deserialize_with = "number")]
    pub total_revenue: f64,
    #[serde(deserialize_with = "number")]
    pub total_quantity: f64,
    /// Length of the ranking window in days
    #[serde(deserialize_with = "number")]
    pub period_days: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrendingProduct {
    #[serde(deserialize_with = "opt_number")]
    pub rank: Option<f64>,
    #[serde(deserialize_with = "text")]
    pub product_id: String,
    #[serde(deserialize_with = "text")]
    pub name: String,
    #[serde(deserialize_with = "text")]
    pub sku: String,
    #[serde(deserialize_with = "text")]
    pub category: String,
    #[serde(deserialize_with = "number")]
    pub total_quantity: f64,
    #[serde(deserialize_with = "number")]
    pub total_revenue: f64,
    /// Number of sales the product appeared in
    #[serde(deserialize_with = "number")]
    pub sales_count: f64,
    #[serde(deserialize_with = "number")]
    pub unique_customers: f64,
    #[serde(deserialize_with = "opt_number")]
    pub average_order_value: Option<f64>,
    #[serde(deserialize_with = "number")]
    pub current_stock: f64,
    #[serde(deserialize_with = "number")]
    pub average_price: f64,
    /// Period-over-period growth in percent
    #[serde(deserialize_with = "opt_number")]
    pub growth_rate: Option<f64>,
    #[serde(deserialize_with = "opt_date")]
    pub last_sale_date: Option<NaiveDate>,
}
