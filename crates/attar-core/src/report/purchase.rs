//! Purchase report payload

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::DateRange;
use crate::serde_helpers::{number, opt_date, or_default, text};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PurchaseReport {
    #[serde(deserialize_with = "or_default")]
    pub summary: PurchaseSummary,
    #[serde(deserialize_with = "or_default")]
    pub trend_data: Vec<PurchaseTrendPoint>,
    #[serde(deserialize_with = "or_default")]
    pub category_breakdown: Vec<PurchaseCategory>,
    #[serde(deserialize_with = "or_default")]
    pub recent_purchases: Vec<PurchaseRecord>,
    pub filters: Option<serde_json::Value>,
    pub date_range: Option<DateRange>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PurchaseSummary {
    #[serde(deserialize_with = "number")]
    pub total_purchases: f64,
    #[serde(deserialize_with = "number")]
    pub total_orders: f64,
    #[serde(deserialize_with = "number")]
    pub average_purchase_value: f64,
    #[serde(deserialize_with = "number")]
    pub total_suppliers: f64,
    #[serde(deserialize_with = "number")]
    pub total_quantity: f64,
    /// Sales over the same window, for margin and turnover insights
    #[serde(deserialize_with = "number")]
    pub total_sales: f64,
    #[serde(deserialize_with = "number")]
    pub current_stock_value: f64,
    #[serde(deserialize_with = "number")]
    pub previous_period_purchases: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PurchaseTrendPoint {
    #[serde(deserialize_with = "text")]
    pub period: String,
    #[serde(deserialize_with = "number")]
    pub amount: f64,
    #[serde(deserialize_with = "number")]
    pub orders: f64,
    #[serde(deserialize_with = "number")]
    pub quantity: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PurchaseCategory {
    #[serde(deserialize_with = "text")]
    pub category: String,
    #[serde(deserialize_with = "number")]
    pub amount: f64,
    #[serde(deserialize_with = "number")]
    pub quantity: f64,
    #[serde(deserialize_with = "number")]
    pub orders: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PurchaseRecord {
    #[serde(deserialize_with = "text")]
    pub purchase_number: String,
    #[serde(deserialize_with = "text")]
    pub supplier: String,
    #[serde(deserialize_with = "opt_date")]
    pub date: Option<NaiveDate>,
    #[serde(deserialize_with = "text")]
    pub product_name: String,
    #[serde(deserialize_with = "text")]
    pub category: String,
    #[serde(deserialize_with = "number")]
    pub quantity: f64,
    #[serde(deserialize_with = "number")]
    pub unit_cost: f64,
    #[serde(deserialize_with = "number")]
    pub total_amount: f64,
    #[serde(deserialize_with = "text")]
    pub payment_status: String,
}
