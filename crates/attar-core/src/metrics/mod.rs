//! Metric derivation library
//!
//! Pure, total functions that turn one report record (or a record plus the
//! corpus it is ranked against) into a ratio, score or label. Every function
//! accepts zeroed inputs and never yields `NaN` or an infinity: undefined
//! ratios come back as `None` (rendered "N/A") or as a documented sentinel.
//!
//! Classifications are built from three primitives:
//! - [`safe_ratio`] / [`safe_percent`]: guarded division
//! - [`Ladder`]: ordered threshold ladder with a fallback label
//! - [`first_match`]: precedence-ordered resolver for overlapping conditions

pub mod category;
pub mod daily;
pub mod inventory;
pub mod purchase;
pub mod sales;
pub mod trending;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

pub use category::{
    category_gross_margin, category_performance, category_strategy, category_turnover,
    stock_health_percent, stock_risk_level, ActionPriority, CategoryPerformance, CategoryStrategy,
    StockRisk,
};
pub use inventory::{
    batch_expiry, days_to_expiry, expiry_priority, inventory_value, product_health_score,
    product_health_status, product_risk_level, risk_recommendation, ExpiryPolicy, ExpiryStatus,
    HealthStatus, InventoryTotals, Priority, StockStatus,
};
pub use purchase::purchase_total;
pub use sales::{performance_score, performance_tier, PerformanceTier, ScoreBasis, ScoreInput};
pub use trending::{
    average_daily_sales, customer_appeal, days_of_stock, projected_stockout, reorder_urgency,
    repeat_purchase_ratio, suggested_reorder_qty, CustomerAppeal, ReorderUrgency,
};

// ============================================================================
// Primitives
// ============================================================================

/// Round half away from zero to `dp` decimal places.
///
/// Non-finite input yields `0.0`.
pub fn round_to(value: f64, dp: u32) -> f64 {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(0.0)
}

/// `numerator / denominator`, or `None` when the result would not be finite
pub fn safe_ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 || !numerator.is_finite() || !denominator.is_finite() {
        return None;
    }
    Some(numerator / denominator).filter(|r| r.is_finite())
}

/// `part / whole × 100` rounded to one decimal, `0.0` when undefined
pub fn safe_percent(part: f64, whole: f64) -> f64 {
    safe_ratio(part, whole).map_or(0.0, |r| round_to(r * 100.0, 1))
}

/// Sum monetary amounts without accumulating binary floating-point drift
pub fn money_sum(amounts: impl IntoIterator<Item = f64>) -> f64 {
    amounts
        .into_iter()
        .filter_map(Decimal::from_f64)
        .sum::<Decimal>()
        .round_dp(2)
        .to_f64()
        .unwrap_or(0.0)
}

/// One rung of a [`Ladder`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Bound {
    /// value > threshold
    Above(f64),
    /// value >= threshold
    AtLeast(f64),
    /// value <= threshold
    AtMost(f64),
    /// value < threshold
    Below(f64),
}

impl Bound {
    pub fn admits(self, value: f64) -> bool {
        match self {
            Bound::Above(t) => value > t,
            Bound::AtLeast(t) => value >= t,
            Bound::AtMost(t) => value <= t,
            Bound::Below(t) => value < t,
        }
    }
}

/// Ordered threshold classifier: the first admitting rung wins, otherwise the
/// fallback. Non-finite values always get the fallback.
#[derive(Clone, Copy, Debug)]
pub struct Ladder<'a, T> {
    rungs: &'a [(Bound, T)],
    fallback: T,
}

impl<'a, T: Copy> Ladder<'a, T> {
    pub const fn new(rungs: &'a [(Bound, T)], fallback: T) -> Self {
        Self { rungs, fallback }
    }

    pub fn classify(&self, value: f64) -> T {
        if !value.is_finite() {
            return self.fallback;
        }
        self.rungs
            .iter()
            .find(|(bound, _)| bound.admits(value))
            .map_or(self.fallback, |(_, label)| *label)
    }
}

/// Precedence-ordered resolver: label of the first satisfied rule
pub fn first_match<T: Copy>(rules: &[(bool, T)], fallback: T) -> T {
    rules
        .iter()
        .find(|(holds, _)| *holds)
        .map_or(fallback, |(_, label)| *label)
}

// ============================================================================
// Financial Ratios
// ============================================================================

/// Gross margin in percent, 1 dp; `0` when there were no sales
pub fn gross_margin(sales: f64, purchases: f64) -> f64 {
    safe_ratio(sales - purchases, sales).map_or(0.0, |r| round_to(r * 100.0, 1))
}

/// Inventory turnover (sales / stock value), 2 dp; `None` without stock value
pub fn inventory_turnover(sales: f64, stock_value: f64) -> Option<f64> {
    safe_ratio(sales, stock_value).map(|r| round_to(r, 2))
}

/// Period-over-period growth in percent, 1 dp; `None` without a baseline
pub fn growth_rate(current: f64, previous: f64) -> Option<f64> {
    safe_ratio(current - previous, previous).map(|r| round_to(r * 100.0, 1))
}

/// Average value per order, `0` when there were no orders
pub fn average_value(total: f64, orders: f64) -> f64 {
    safe_ratio(total, orders).map_or(0.0, |r| round_to(r, 2))
}

/// Direction of a growth figure
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Growing,
    Stable,
    Declining,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Growing => "Growing",
            TrendDirection::Stable => "Stable",
            TrendDirection::Declining => "Declining",
        }
    }
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const TREND: Ladder<'static, TrendDirection> = Ladder::new(
    &[
        (Bound::Above(5.0), TrendDirection::Growing),
        (Bound::Below(-5.0), TrendDirection::Declining),
    ],
    TrendDirection::Stable,
);

/// `> 5%` growing, `< -5%` declining, otherwise (or unknown) stable
pub fn trend_direction(growth: Option<f64>) -> TrendDirection {
    growth.map_or(TrendDirection::Stable, |g| TREND.classify(g))
}

// ============================================================================
// Tests
// ============================================================================
