//! Inventory & expiry report payload

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::DateRange;
use crate::serde_helpers::{number, opt_bool, opt_date, opt_datetime, opt_days, or_default, text};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InventoryReport {
    #[serde(deserialize_with = "or_default")]
    pub summary: InventorySummary,
    #[serde(deserialize_with = "or_default")]
    pub inventory: Vec<InventoryProduct>,
    pub filters: Option<serde_json::Value>,
    pub date_range: Option<DateRange>,
}

/// Backend-side KPIs. Exports recompute what they display from the product
/// list so that filtered exports stay consistent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InventorySummary {
    #[serde(deserialize_with = "number")]
    pub total_products: f64,
    #[serde(deserialize_with = "number")]
    pub total_batches: f64,
    #[serde(deserialize_with = "number")]
    pub total_quantity: f64,
    #[serde(deserialize_with = "number")]
    pub total_value: f64,
    #[serde(deserialize_with = "number")]
    pub expired_batches: f64,
    #[serde(deserialize_with = "number")]
    pub near_expiry_batches: f64,
    #[serde(deserialize_with = "number")]
    pub low_stock_products: f64,
    #[serde(deserialize_with = "number")]
    pub out_of_stock_products: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InventoryProduct {
    #[serde(deserialize_with = "text")]
    pub product_id: String,
    #[serde(deserialize_with = "text")]
    pub name: String,
    #[serde(deserialize_with = "text")]
    pub sku: String,
    #[serde(deserialize_with = "text")]
    pub category: String,
    /// Unit selling price
    #[serde(deserialize_with = "number")]
    pub price: f64,
    #[serde(deserialize_with = "number")]
    pub cost_price: f64,
    #[serde(deserialize_with = "number")]
    pub total_quantity: f64,
    /// "In Stock", "Low Stock" or "Out of Stock"
    #[serde(deserialize_with = "text")]
    pub status: String,
    #[serde(deserialize_with = "number")]
    pub reorder_level: f64,
    #[serde(deserialize_with = "or_default")]
    pub batches: Vec<Batch>,
    #[serde(deserialize_with = "or_default")]
    pub disposed_batches: Vec<Batch>,
    #[serde(deserialize_with = "opt_datetime")]
    pub created_at: Option<NaiveDateTime>,
}

/// A dated lot of stock for one product
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Batch {
    #[serde(deserialize_with = "text")]
    pub batch_number: String,
    #[serde(deserialize_with = "number")]
    pub quantity: f64,
    #[serde(deserialize_with = "opt_date")]
    pub manufacture_date: Option<NaiveDate>,
    #[serde(deserialize_with = "opt_date")]
    pub expiry_date: Option<NaiveDate>,
    /// Computed upstream; may be negative for lots already past expiry
    #[serde(deserialize_with = "opt_days")]
    pub days_to_expiry: Option<i64>,
    #[serde(deserialize_with = "opt_bool")]
    pub is_expired: Option<bool>,
    #[serde(deserialize_with = "opt_bool")]
    pub is_near_expiry: Option<bool>,
    #[serde(deserialize_with = "opt_date")]
    pub disposal_date: Option<NaiveDate>,
    #[serde(deserialize_with = "text")]
    pub disposal_reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_shape() {
        let report: InventoryReport = serde_json::from_str(
            r#"{
                "summary": {"totalProducts": 1, "totalValue": null},
                "inventory": [{
                    "productId": "p1",
                    "name": "Oud Al Layl",
                    "sku": "OUD-001",
                    "category": "Oud",
                    "price": "100",
                    "totalQuantity": 15,
                    "status": "In Stock",
                    "batches": [
                        {"batchNumber": "B1", "quantity": 10, "expiryDate": "2026-01-01", "isExpired": true, "daysToExpiry": -30},
                        {"batchNumber": "B2", "quantity": 5, "expiryDate": "2027-06-01T00:00:00.000Z"}
                    ],
                    "disposedBatches": null
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(report.summary.total_products, 1.0);
        assert_eq!(report.summary.total_value, 0.0);
        let product = &report.inventory[0];
        assert_eq!(product.product_id, "p1");
        assert_eq!(product.price, 100.0);
        assert_eq!(product.batches.len(), 2);
        assert_eq!(product.batches[0].days_to_expiry, Some(-30));
        assert_eq!(product.batches[0].is_expired, Some(true));
        assert_eq!(product.batches[1].expiry_date, NaiveDate::from_ymd_opt(2027, 6, 1));
        assert!(product.disposed_batches.is_empty());
        assert!(product.created_at.is_none());
    }
}
