//! Category report payload

use serde::{Deserialize, Serialize};

use super::DateRange;
use crate::serde_helpers::{number, or_default, text};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CategoryReport {
    #[serde(deserialize_with = "or_default")]
    pub summary: CategorySummary,
    #[serde(deserialize_with = "or_default")]
    pub categories: Vec<CategoryStat>,
    pub filters: Option<serde_json::Value>,
    pub date_range: Option<DateRange>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CategorySummary {
    #[serde(deserialize_with = "number")]
    pub total_categories: f64,
    #[serde(deserialize_with = "number")]
    pub total_products: f64,
    #[serde(deserialize_with = "number")]
    pub total_sales: f64,
    #[serde(deserialize_with = "number")]
    pub total_purchases: f64,
    #[serde(deserialize_with = "number")]
    pub total_stock_value: f64,
}

/// Per-category rollup of catalog, stock, sales and purchases
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CategoryStat {
    #[serde(deserialize_with = "text")]
    pub name: String,
    #[serde(deserialize_with = "number")]
    pub total_products: f64,
    #[serde(deserialize_with = "number")]
    pub low_stock_products: f64,
    #[serde(deserialize_with = "number")]
    pub out_of_stock_products: f64,
    #[serde(deserialize_with = "number")]
    pub total_stock: f64,
    #[serde(deserialize_with = "number")]
    pub stock_value: f64,
    #[serde(deserialize_with = "number")]
    pub total_sales: f64,
    #[serde(deserialize_with = "number")]
    pub quantity_sold: f64,
    #[serde(deserialize_with = "number")]
    pub total_purchases: f64,
    #[serde(deserialize_with = "number")]
    pub purchase_quantity: f64,
}
