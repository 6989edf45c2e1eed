//! Sales report payload

use serde::{Deserialize, Serialize};

use super::{CategoryBreakdown, DateRange};
use crate::serde_helpers::{number, or_default, text};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SalesReport {
    #[serde(deserialize_with = "or_default")]
    pub summary: SalesSummary,
    #[serde(deserialize_with = "or_default")]
    pub trend_data: Vec<SalesTrendPoint>,
    #[serde(deserialize_with = "or_default")]
    pub top_products: Vec<TopProduct>,
    #[serde(deserialize_with = "or_default")]
    pub payment_methods: Vec<PaymentMethodStat>,
    #[serde(deserialize_with = "or_default")]
    pub category_breakdown: Vec<CategoryBreakdown>,
    pub filters: Option<serde_json::Value>,
    pub date_range: Option<DateRange>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SalesSummary {
    #[serde(deserialize_with = "number")]
    pub total_sales: f64,
    #[serde(deserialize_with = "number")]
    pub total_invoices: f64,
    #[serde(deserialize_with = "number")]
    pub average_order_value: f64,
    #[serde(deserialize_with = "number")]
    pub total_customers: f64,
    #[serde(deserialize_with = "number")]
    pub total_items_sold: f64,
    #[serde(deserialize_with = "number")]
    pub total_discount: f64,
    #[serde(deserialize_with = "number")]
    pub total_tax: f64,
    #[serde(deserialize_with = "number")]
    pub previous_period_sales: f64,
}

/// One bucket of the sales trend (day, week or month depending on the period)
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SalesTrendPoint {
    #[serde(deserialize_with = "text")]
    pub period: String,
    #[serde(deserialize_with = "number")]
    pub sales: f64,
    #[serde(deserialize_with = "number")]
    pub invoices: f64,
    #[serde(deserialize_with = "number")]
    pub customers: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TopProduct {
    #[serde(deserialize_with = "text")]
    pub product_id: String,
    #[serde(deserialize_with = "text")]
    pub name: String,
    #[serde(deserialize_with = "text")]
    pub sku: String,
    #[serde(deserialize_with = "text")]
    pub category: String,
    #[serde(deserialize_with = "number")]
    pub quantity_sold: f64,
    #[serde(deserialize_with = "number")]
    pub revenue: f64,
    /// Number of invoices the product appeared on (sale frequency)
    #[serde(deserialize_with = "number")]
    pub invoice_count: f64,
    #[serde(deserialize_with = "number")]
    pub customer_count: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaymentMethodStat {
    #[serde(deserialize_with = "text")]
    pub method: String,
    #[serde(deserialize_with = "number")]
    pub count: f64,
    #[serde(deserialize_with = "number")]
    pub amount: f64,
}
