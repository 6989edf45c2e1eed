//! Daily sales report payload

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::DateRange;
use crate::serde_helpers::{number, opt_datetime, or_default, text};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DailySalesReport {
    #[serde(deserialize_with = "or_default")]
    pub summary: DailySummary,
    #[serde(deserialize_with = "or_default")]
    pub sales: Vec<Invoice>,
    pub filters: Option<serde_json::Value>,
    pub date_range: Option<DateRange>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DailySummary {
    #[serde(deserialize_with = "number")]
    pub total_sales: f64,
    #[serde(deserialize_with = "number")]
    pub total_invoices: f64,
    #[serde(deserialize_with = "number")]
    pub total_items: f64,
    #[serde(deserialize_with = "number")]
    pub average_invoice: f64,
    #[serde(deserialize_with = "number")]
    pub total_discount: f64,
    #[serde(deserialize_with = "number")]
    pub total_tax: f64,
    #[serde(deserialize_with = "number")]
    pub unique_customers: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Invoice {
    #[serde(deserialize_with = "text")]
    pub invoice_number: String,
    #[serde(deserialize_with = "text")]
    pub customer_name: String,
    #[serde(deserialize_with = "text")]
    pub customer_phone: String,
    #[serde(deserialize_with = "opt_datetime")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(deserialize_with = "text")]
    pub payment_method: String,
    #[serde(deserialize_with = "or_default")]
    pub items: Vec<LineItem>,
    #[serde(deserialize_with = "number")]
    pub subtotal: f64,
    #[serde(deserialize_with = "number")]
    pub discount_amount: f64,
    #[serde(deserialize_with = "number")]
    pub tax_amount: f64,
    #[serde(deserialize_with = "number")]
    pub grand_total: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LineItem {
    #[serde(deserialize_with = "text")]
    pub product_name: String,
    #[serde(deserialize_with = "text")]
    pub sku: String,
    #[serde(deserialize_with = "text")]
    pub category: String,
    #[serde(deserialize_with = "number")]
    pub quantity: f64,
    #[serde(deserialize_with = "number")]
    pub price: f64,
    #[serde(deserialize_with = "number")]
    pub discount: f64,
    #[serde(deserialize_with = "number")]
    pub total: f64,
}
