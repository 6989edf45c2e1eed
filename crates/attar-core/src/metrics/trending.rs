//! Sales velocity, stock cover and customer appeal for trending products

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{round_to, safe_ratio, Bound, Ladder};

/// Units sold per day over the ranking window, 2 dp
pub fn average_daily_sales(quantity: f64, period_days: f64) -> f64 {
    safe_ratio(quantity, period_days).map_or(0.0, |r| round_to(r, 2))
}

/// Whole days the current stock lasts at `daily` units per day
pub fn days_of_stock(stock: f64, daily: f64) -> Option<i64> {
    if daily <= 0.0 {
        return None;
    }
    safe_ratio(stock.max(0.0), daily).map(|d| d.floor() as i64)
}

/// Date the stock runs out, `None` when it never does or the date overflows
pub fn projected_stockout(as_of: NaiveDate, days: Option<i64>) -> Option<NaiveDate> {
    let days = u64::try_from(days?).ok()?;
    as_of.checked_add_days(Days::new(days))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReorderUrgency {
    OutOfStock,
    Urgent,
    ReorderSoon,
    Adequate,
    Overstocked,
    NoRecentSales,
}

impl ReorderUrgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReorderUrgency::OutOfStock => "Out of Stock",
            ReorderUrgency::Urgent => "Urgent",
            ReorderUrgency::ReorderSoon => "Reorder Soon",
            ReorderUrgency::Adequate => "Adequate",
            ReorderUrgency::Overstocked => "Overstocked",
            ReorderUrgency::NoRecentSales => "No Recent Sales",
        }
    }
}

impl std::fmt::Display for ReorderUrgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const COVER: Ladder<'static, ReorderUrgency> = Ladder::new(
    &[
        (Bound::AtMost(7.0), ReorderUrgency::Urgent),
        (Bound::AtMost(30.0), ReorderUrgency::ReorderSoon),
        (Bound::Above(180.0), ReorderUrgency::Overstocked),
    ],
    ReorderUrgency::Adequate,
);

pub fn reorder_urgency(stock: f64, days_of_stock: Option<i64>) -> ReorderUrgency {
    if stock <= 0.0 {
        return ReorderUrgency::OutOfStock;
    }
    days_of_stock.map_or(ReorderUrgency::NoRecentSales, |days| COVER.classify(days as f64))
}

/// Units to order so stock covers `cover_days` of demand
pub fn suggested_reorder_qty(daily: f64, stock: f64, cover_days: u32) -> u64 {
    let needed = (daily * f64::from(cover_days) - stock).ceil();
    if needed.is_finite() && needed > 0.0 {
        needed as u64
    } else {
        0
    }
}

/// Purchases per customer, 2 dp
pub fn repeat_purchase_ratio(sales_count: f64, customers: f64) -> f64 {
    safe_ratio(sales_count, customers).map_or(0.0, |r| round_to(r, 2))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomerAppeal {
    LoyalFollowing,
    BroadAppeal,
    Niche,
}

impl CustomerAppeal {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerAppeal::LoyalFollowing => "Loyal Following",
            CustomerAppeal::BroadAppeal => "Broad Appeal",
            CustomerAppeal::Niche => "Niche",
        }
    }
}

impl std::fmt::Display for CustomerAppeal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub fn customer_appeal(customers: f64, repeat_ratio: f64) -> CustomerAppeal {
    super::first_match(
        &[
            (repeat_ratio >= 2.0, CustomerAppeal::LoyalFollowing),
            (customers >= 10.0, CustomerAppeal::BroadAppeal),
        ],
        CustomerAppeal::Niche,
    )
}
