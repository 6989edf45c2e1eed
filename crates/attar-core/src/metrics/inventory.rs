//! Inventory and expiry metrics
//!
//! Batch expiry classification, per-product health and risk, and the
//! report-wide totals shown on the inventory Executive Summary.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{first_match, money_sum, round_to, safe_ratio, Bound, Ladder};
use crate::report::inventory::{Batch, InventoryProduct};
use crate::ExportConfig;

// ============================================================================
// Types
// ============================================================================

/// Reference date and windows used for every expiry decision
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExpiryPolicy {
    pub as_of: NaiveDate,
    /// Look-ahead window for near-expiry batches
    pub near_expiry_days: i64,
    /// Batches expiring within this many days are HIGH priority
    pub high_priority_days: i64,
}

impl ExpiryPolicy {
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            near_expiry_days: 30,
            high_priority_days: 7,
        }
    }

    pub fn from_config(as_of: NaiveDate, config: &ExportConfig) -> Self {
        Self {
            as_of,
            near_expiry_days: config.near_expiry_days,
            high_priority_days: config.high_priority_days,
        }
    }
}

/// Derived expiry state of one batch
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpiryStatus {
    Expired,
    NearExpiry,
    Good,
}

impl ExpiryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpiryStatus::Expired => "Expired",
            ExpiryStatus::NearExpiry => "Near Expiry",
            ExpiryStatus::Good => "Good",
        }
    }
}

impl std::fmt::Display for ExpiryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Urgency label; variants are ordered most urgent first
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "CRITICAL",
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stock level as reported by the catalog
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    /// Parse "Low Stock", "low_stock", "LOW-STOCK" and friends
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "instock" | "available" => Some(StockStatus::InStock),
            "lowstock" | "low" => Some(StockStatus::LowStock),
            "outofstock" | "out" | "soldout" => Some(StockStatus::OutOfStock),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "In Stock",
            StockStatus::LowStock => "Low Stock",
            StockStatus::OutOfStock => "Out of Stock",
        }
    }
}

/// Overall health of one product
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealthStatus {
    Critical,
    HighRisk,
    Monitor,
    NoStock,
    Healthy,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Critical => "Critical",
            HealthStatus::HighRisk => "High Risk",
            HealthStatus::Monitor => "Monitor",
            HealthStatus::NoStock => "No Stock",
            HealthStatus::Healthy => "Healthy",
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Batch Metrics
// ============================================================================

/// Days until expiry: the upstream figure when present, else computed from
/// the expiry date. Negative for lots already past expiry.
pub fn days_to_expiry(batch: &Batch, policy: &ExpiryPolicy) -> Option<i64> {
    batch
        .days_to_expiry
        .or_else(|| batch.expiry_date.map(|expiry| (expiry - policy.as_of).num_days()))
}

/// Expired, near-expiry or good. Upstream flags win over day counts.
pub fn batch_expiry(batch: &Batch, policy: &ExpiryPolicy) -> ExpiryStatus {
    if batch.is_expired == Some(true) {
        return ExpiryStatus::Expired;
    }
    if batch.is_near_expiry == Some(true) {
        return ExpiryStatus::NearExpiry;
    }
    match days_to_expiry(batch, policy) {
        Some(days) if days < 0 => ExpiryStatus::Expired,
        Some(days) if days <= policy.near_expiry_days => ExpiryStatus::NearExpiry,
        _ => ExpiryStatus::Good,
    }
}

/// CRITICAL once expired regardless of the day count, then HIGH / MEDIUM /
/// LOW by days remaining. Near-expiry batches rate at least MEDIUM.
pub fn expiry_priority(batch: &Batch, policy: &ExpiryPolicy) -> Priority {
    let status = batch_expiry(batch, policy);
    if status == ExpiryStatus::Expired {
        return Priority::Critical;
    }
    let rungs = [
        (Bound::AtMost(policy.high_priority_days as f64), Priority::High),
        (Bound::AtMost(policy.near_expiry_days as f64), Priority::Medium),
    ];
    let by_days = match days_to_expiry(batch, policy) {
        Some(days) => Ladder::new(&rungs, Priority::Low).classify(days as f64),
        None => Priority::Low,
    };
    // A near-expiry batch is never less urgent than MEDIUM
    if status == ExpiryStatus::NearExpiry {
        by_days.min(Priority::Medium)
    } else {
        by_days
    }
}

/// Value of a batch at the product's selling price
pub fn batch_value(batch: &Batch, price: f64) -> f64 {
    round_to(batch.quantity.max(0.0) * price, 2)
}

// ============================================================================
// Product Metrics
// ============================================================================

/// On-hand quantity; falls back to the active batches when the product total
/// is missing
pub fn product_quantity(product: &InventoryProduct) -> f64 {
    if product.total_quantity > 0.0 {
        product.total_quantity
    } else {
        product.batches.iter().map(|b| b.quantity.max(0.0)).sum()
    }
}

/// On-hand quantity × selling price
pub fn inventory_value(product: &InventoryProduct) -> f64 {
    round_to(product_quantity(product) * product.price, 2)
}

/// Quantity held in active batches with the given expiry status
pub fn quantity_with_status(product: &InventoryProduct, policy: &ExpiryPolicy, status: ExpiryStatus) -> f64 {
    product
        .batches
        .iter()
        .filter(|b| batch_expiry(b, policy) == status)
        .map(|b| b.quantity.max(0.0))
        .sum()
}

fn has_batch_with(product: &InventoryProduct, policy: &ExpiryPolicy, status: ExpiryStatus) -> bool {
    product.batches.iter().any(|b| batch_expiry(b, policy) == status)
}

/// Catalog stock status; derived from quantity and reorder level when the
/// status text is missing or unrecognised
pub fn stock_status(product: &InventoryProduct) -> StockStatus {
    StockStatus::parse(&product.status).unwrap_or_else(|| {
        let quantity = product_quantity(product);
        if quantity <= 0.0 {
            StockStatus::OutOfStock
        } else if quantity <= product.reorder_level {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    })
}

/// Expired batch ⇒ Critical, near-expiry ⇒ High Risk, Low Stock ⇒ Monitor,
/// Out of Stock ⇒ No Stock, else Healthy. The conditions overlap; the order
/// is the contract.
pub fn product_health_status(product: &InventoryProduct, policy: &ExpiryPolicy) -> HealthStatus {
    let stock = stock_status(product);
    first_match(
        &[
            (has_batch_with(product, policy, ExpiryStatus::Expired), HealthStatus::Critical),
            (has_batch_with(product, policy, ExpiryStatus::NearExpiry), HealthStatus::HighRisk),
            (stock == StockStatus::LowStock, HealthStatus::Monitor),
            (stock == StockStatus::OutOfStock, HealthStatus::NoStock),
        ],
        HealthStatus::Healthy,
    )
}

/// 0–100 health score: expired stock weighs 60, near-expiry stock 30 and a
/// low stock level 10. Products without stock score 0.
pub fn product_health_score(product: &InventoryProduct, policy: &ExpiryPolicy) -> f64 {
    let quantity = product_quantity(product);
    if quantity <= 0.0 {
        return 0.0;
    }
    let share = |status| {
        safe_ratio(quantity_with_status(product, policy, status), quantity)
            .unwrap_or(0.0)
            .clamp(0.0, 1.0)
    };
    let low_stock_penalty = if stock_status(product) == StockStatus::LowStock {
        10.0
    } else {
        0.0
    };
    let score = 100.0
        - 60.0 * share(ExpiryStatus::Expired)
        - 30.0 * share(ExpiryStatus::NearExpiry)
        - low_stock_penalty;
    round_to(score.clamp(0.0, 100.0), 0)
}

/// Most urgent batch priority among the product's active batches
pub fn most_urgent_priority(product: &InventoryProduct, policy: &ExpiryPolicy) -> Option<Priority> {
    product.batches.iter().map(|b| expiry_priority(b, policy)).min()
}

/// Product-level risk shown on the Risk Management sheet
pub fn product_risk_level(product: &InventoryProduct, policy: &ExpiryPolicy) -> Priority {
    match product_health_status(product, policy) {
        HealthStatus::Critical => Priority::Critical,
        HealthStatus::HighRisk => most_urgent_priority(product, policy).unwrap_or(Priority::Medium),
        HealthStatus::NoStock => Priority::High,
        HealthStatus::Monitor => Priority::Medium,
        HealthStatus::Healthy => Priority::Low,
    }
}

/// Recommended action for a health status
pub fn risk_recommendation(status: HealthStatus) -> &'static str {
    match status {
        HealthStatus::Critical => "Remove expired batches from sale and record disposal",
        HealthStatus::HighRisk => "Prioritise sale of near-expiry batches (discount or bundle)",
        HealthStatus::Monitor => "Reorder soon; stock is below the reorder level",
        HealthStatus::NoStock => "Restock immediately to avoid lost sales",
        HealthStatus::Healthy => "No action required",
    }
}

/// Earliest expiry date among active batches
pub fn earliest_expiry(product: &InventoryProduct) -> Option<NaiveDate> {
    product.batches.iter().filter_map(|b| b.expiry_date).min()
}

/// Date by which the recommended action should be taken
pub fn action_deadline(product: &InventoryProduct, policy: &ExpiryPolicy) -> Option<NaiveDate> {
    match product_health_status(product, policy) {
        HealthStatus::Critical | HealthStatus::NoStock => Some(policy.as_of),
        HealthStatus::HighRisk => product
            .batches
            .iter()
            .filter(|b| batch_expiry(b, policy) == ExpiryStatus::NearExpiry)
            .filter_map(|b| b.expiry_date)
            .min()
            .or_else(|| days_after(policy.as_of, policy.high_priority_days)),
        HealthStatus::Monitor => days_after(policy.as_of, policy.high_priority_days),
        HealthStatus::Healthy => None,
    }
}

/// `date + days`, or `None` when the result leaves the calendar
fn days_after(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    Duration::try_days(days).and_then(|delta| date.checked_add_signed(delta))
}

// ============================================================================
// Report Totals
// ============================================================================

/// Report-wide figures for the inventory Executive Summary
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct InventoryTotals {
    pub products: usize,
    pub batches: usize,
    pub total_quantity: f64,
    pub total_value: f64,
    pub expired_batches: usize,
    pub expired_quantity: f64,
    pub expired_value: f64,
    pub near_expiry_batches: usize,
    pub near_expiry_quantity: f64,
    pub near_expiry_value: f64,
    pub low_stock_products: usize,
    pub out_of_stock_products: usize,
    pub disposed_batches: usize,
    pub disposed_quantity: f64,
    pub critical_products: usize,
    pub high_risk_products: usize,
    pub monitor_products: usize,
    pub no_stock_products: usize,
    pub healthy_products: usize,
    pub average_health_score: f64,
}

impl InventoryTotals {
    pub fn from_products(products: &[&InventoryProduct], policy: &ExpiryPolicy) -> Self {
        let mut totals = InventoryTotals {
            products: products.len(),
            ..InventoryTotals::default()
        };
        let mut values = Vec::with_capacity(products.len());
        let mut expired_values = Vec::new();
        let mut near_values = Vec::new();
        let mut score_sum = 0.0;

        for product in products {
            totals.total_quantity += product_quantity(product);
            values.push(inventory_value(product));
            totals.batches += product.batches.len();

            for batch in &product.batches {
                match batch_expiry(batch, policy) {
                    ExpiryStatus::Expired => {
                        totals.expired_batches += 1;
                        totals.expired_quantity += batch.quantity.max(0.0);
                        expired_values.push(batch_value(batch, product.price));
                    }
                    ExpiryStatus::NearExpiry => {
                        totals.near_expiry_batches += 1;
                        totals.near_expiry_quantity += batch.quantity.max(0.0);
                        near_values.push(batch_value(batch, product.price));
                    }
                    ExpiryStatus::Good => {}
                }
            }

            totals.disposed_batches += product.disposed_batches.len();
            totals.disposed_quantity += product
                .disposed_batches
                .iter()
                .map(|b| b.quantity.max(0.0))
                .sum::<f64>();

            match stock_status(product) {
                StockStatus::LowStock => totals.low_stock_products += 1,
                StockStatus::OutOfStock => totals.out_of_stock_products += 1,
                StockStatus::InStock => {}
            }

            match product_health_status(product, policy) {
                HealthStatus::Critical => totals.critical_products += 1,
                HealthStatus::HighRisk => totals.high_risk_products += 1,
                HealthStatus::Monitor => totals.monitor_products += 1,
                HealthStatus::NoStock => totals.no_stock_products += 1,
                HealthStatus::Healthy => totals.healthy_products += 1,
            }
            score_sum += product_health_score(product, policy);
        }

        totals.total_value = money_sum(values);
        totals.expired_value = money_sum(expired_values);
        totals.near_expiry_value = money_sum(near_values);
        totals.average_health_score = safe_ratio(score_sum, products.len() as f64)
            .map_or(0.0, |avg| round_to(avg, 1));
        totals
    }

    /// Share of products that need no action, in percent
    pub fn healthy_percent(&self) -> f64 {
        super::safe_percent(self.healthy_products as f64, self.products as f64)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn policy() -> ExpiryPolicy {
        ExpiryPolicy::new(as_of())
    }

    fn batch(number: &str, quantity: f64, days: i64) -> Batch {
        Batch {
            batch_number: number.into(),
            quantity,
            expiry_date: Some(as_of() + Duration::days(days)),
            ..Batch::default()
        }
    }

    fn product(status: &str, batches: Vec<Batch>) -> InventoryProduct {
        InventoryProduct {
            name: "Oud Al Layl".into(),
            price: 100.0,
            status: status.into(),
            batches,
            ..InventoryProduct::default()
        }
    }

    #[test]
    fn expiry_from_dates() {
        assert_eq!(batch_expiry(&batch("A", 1.0, -1), &policy()), ExpiryStatus::Expired);
        assert_eq!(batch_expiry(&batch("A", 1.0, 0), &policy()), ExpiryStatus::NearExpiry);
        assert_eq!(batch_expiry(&batch("A", 1.0, 30), &policy()), ExpiryStatus::NearExpiry);
        assert_eq!(batch_expiry(&batch("A", 1.0, 31), &policy()), ExpiryStatus::Good);
        assert_eq!(batch_expiry(&Batch::default(), &policy()), ExpiryStatus::Good);
    }

    #[test]
    fn upstream_days_are_trusted() {
        let mut b = batch("A", 1.0, 100);
        b.days_to_expiry = Some(3);
        assert_eq!(days_to_expiry(&b, &policy()), Some(3));
        assert_eq!(expiry_priority(&b, &policy()), Priority::High);
    }

    #[test]
    fn expired_flag_dominates_day_count() {
        let mut b = batch("A", 1.0, 200);
        b.is_expired = Some(true);
        b.days_to_expiry = Some(200);
        assert_eq!(expiry_priority(&b, &policy()), Priority::Critical);
    }

    #[test]
    fn priority_ladder() {
        assert_eq!(expiry_priority(&batch("A", 1.0, -5), &policy()), Priority::Critical);
        assert_eq!(expiry_priority(&batch("A", 1.0, 7), &policy()), Priority::High);
        assert_eq!(expiry_priority(&batch("A", 1.0, 8), &policy()), Priority::Medium);
        assert_eq!(expiry_priority(&batch("A", 1.0, 30), &policy()), Priority::Medium);
        assert_eq!(expiry_priority(&batch("A", 1.0, 31), &policy()), Priority::Low);
        assert_eq!(expiry_priority(&Batch::default(), &policy()), Priority::Low);
    }

    #[test]
    fn health_precedence_expired_beats_out_of_stock() {
        let p = product("Out of Stock", vec![batch("A", 0.0, -3)]);
        assert_eq!(product_health_status(&p, &policy()), HealthStatus::Critical);
    }

    #[test]
    fn health_precedence_order() {
        let near = product("Low Stock", vec![batch("A", 2.0, 10)]);
        assert_eq!(product_health_status(&near, &policy()), HealthStatus::HighRisk);

        let low = product("Low Stock", vec![batch("A", 2.0, 100)]);
        assert_eq!(product_health_status(&low, &policy()), HealthStatus::Monitor);

        let none = product("Out of Stock", vec![]);
        assert_eq!(product_health_status(&none, &policy()), HealthStatus::NoStock);

        let fine = product("In Stock", vec![batch("A", 20.0, 300)]);
        assert_eq!(product_health_status(&fine, &policy()), HealthStatus::Healthy);
    }

    #[test]
    fn stock_status_parsing_and_fallback() {
        assert_eq!(StockStatus::parse("low_stock"), Some(StockStatus::LowStock));
        assert_eq!(StockStatus::parse("OUT-OF-STOCK"), Some(StockStatus::OutOfStock));
        assert_eq!(StockStatus::parse("mystery"), None);

        let mut p = product("", vec![batch("A", 3.0, 100)]);
        p.reorder_level = 5.0;
        assert_eq!(stock_status(&p), StockStatus::LowStock);
        p.batches.clear();
        assert_eq!(stock_status(&p), StockStatus::OutOfStock);
    }

    #[test]
    fn health_score_weights() {
        let p = product("In Stock", vec![batch("A", 10.0, -1), batch("B", 10.0, 200)]);
        // half the stock expired: 100 - 30
        assert_eq!(product_health_score(&p, &policy()), 70.0);

        let empty = product("Out of Stock", vec![]);
        assert_eq!(product_health_score(&empty, &policy()), 0.0);
    }

    #[test]
    fn risk_levels() {
        let critical = product("In Stock", vec![batch("A", 10.0, -1)]);
        assert_eq!(product_risk_level(&critical, &policy()), Priority::Critical);

        let soon = product("In Stock", vec![batch("A", 10.0, 3)]);
        assert_eq!(product_risk_level(&soon, &policy()), Priority::High);

        let later = product("In Stock", vec![batch("A", 10.0, 20)]);
        assert_eq!(product_risk_level(&later, &policy()), Priority::Medium);

        let none = product("Out of Stock", vec![]);
        assert_eq!(product_risk_level(&none, &policy()), Priority::High);
    }

    #[test]
    fn value_falls_back_to_batches() {
        let p = product("In Stock", vec![batch("A", 10.0, -1), batch("B", 5.0, 200)]);
        assert_eq!(product_quantity(&p), 15.0);
        assert_eq!(inventory_value(&p), 1500.0);
    }

    #[test]
    fn totals_for_mixed_product() {
        let p = product("In Stock", vec![batch("A", 10.0, -1), batch("B", 5.0, 200)]);
        let totals = InventoryTotals::from_products(&[&p], &policy());
        assert_eq!(totals.expired_quantity, 10.0);
        assert_eq!(totals.expired_batches, 1);
        assert_eq!(totals.expired_value, 1000.0);
        assert_eq!(totals.total_value, 1500.0);
        assert_eq!(totals.critical_products, 1);
        assert_eq!(totals.healthy_percent(), 0.0);
    }

    #[test]
    fn totals_for_no_products_are_zero() {
        let totals = InventoryTotals::from_products(&[], &policy());
        assert_eq!(totals.average_health_score, 0.0);
        assert_eq!(totals.healthy_percent(), 0.0);
    }

    #[test]
    fn deadlines() {
        let p = product("In Stock", vec![batch("A", 10.0, 12)]);
        assert_eq!(action_deadline(&p, &policy()), Some(as_of() + Duration::days(12)));
        let fine = product("In Stock", vec![batch("A", 10.0, 300)]);
        assert_eq!(action_deadline(&fine, &policy()), None);
    }

    #[test]
    fn out_of_range_windows_give_no_deadline() {
        let low = product("Low Stock", vec![batch("A", 10.0, 300)]);
        let mut policy = policy();
        policy.high_priority_days = 1_000_000_000_000;
        assert_eq!(product_health_status(&low, &policy), HealthStatus::Monitor);
        assert_eq!(action_deadline(&low, &policy), None);

        policy.high_priority_days = i64::MIN;
        assert_eq!(action_deadline(&low, &policy), None);
    }

    #[test]
    fn upstream_near_expiry_flag_is_at_least_medium() {
        let flagged = Batch {
            is_near_expiry: Some(true),
            days_to_expiry: Some(90),
            ..batch("A", 5.0, 90)
        };
        assert_eq!(batch_expiry(&flagged, &policy()), ExpiryStatus::NearExpiry);
        assert_eq!(expiry_priority(&flagged, &policy()), Priority::Medium);

        let soon = Batch {
            is_near_expiry: Some(true),
            ..batch("B", 5.0, 3)
        };
        assert_eq!(expiry_priority(&soon, &policy()), Priority::High);

        let p = product("In Stock", vec![flagged]);
        assert_eq!(product_health_status(&p, &policy()), HealthStatus::HighRisk);
        assert_eq!(product_risk_level(&p, &policy()), Priority::Medium);
    }
}
