//! Category performance, stock risk and strategy

use serde::{Deserialize, Serialize};

use super::{gross_margin, inventory_turnover, safe_percent, safe_ratio, Bound, Ladder};
use crate::report::category::CategoryStat;

/// Share of a category's products that are low or out of stock
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockRisk {
    High,
    Medium,
    Low,
}

impl StockRisk {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockRisk::High => "High",
            StockRisk::Medium => "Medium",
            StockRisk::Low => "Low",
        }
    }
}

impl std::fmt::Display for StockRisk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const STOCK_RISK: Ladder<'static, StockRisk> = Ladder::new(
    &[
        (Bound::Above(0.3), StockRisk::High),
        (Bound::Above(0.1), StockRisk::Medium),
    ],
    StockRisk::Low,
);

/// `(low + out of stock) / products`; an empty category is `Low`
pub fn stock_risk_level(category: &CategoryStat) -> StockRisk {
    safe_ratio(
        category.low_stock_products + category.out_of_stock_products,
        category.total_products,
    )
    .map_or(StockRisk::Low, |share| STOCK_RISK.classify(share))
}

/// Percentage of products neither low nor out of stock
pub fn stock_health_percent(category: &CategoryStat) -> f64 {
    let troubled = category.low_stock_products + category.out_of_stock_products;
    let healthy = (category.total_products - troubled).max(0.0);
    safe_percent(healthy, category.total_products)
}

/// Gross margin of a category; `None` for a category without products
pub fn category_gross_margin(category: &CategoryStat) -> Option<f64> {
    (category.total_products > 0.0)
        .then(|| gross_margin(category.total_sales, category.total_purchases))
}

/// Inventory turnover of a category; `None` for a category without products
/// or without stock value
pub fn category_turnover(category: &CategoryStat) -> Option<f64> {
    if category.total_products > 0.0 {
        inventory_turnover(category.total_sales, category.stock_value)
    } else {
        None
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryPerformance {
    Star,
    Strong,
    Average,
    Weak,
}

impl CategoryPerformance {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryPerformance::Star => "Star",
            CategoryPerformance::Strong => "Strong",
            CategoryPerformance::Average => "Average",
            CategoryPerformance::Weak => "Weak",
        }
    }
}

impl std::fmt::Display for CategoryPerformance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const PERFORMANCE: Ladder<'static, CategoryPerformance> = Ladder::new(
    &[
        (Bound::Above(25.0), CategoryPerformance::Star),
        (Bound::Above(10.0), CategoryPerformance::Strong),
        (Bound::Above(3.0), CategoryPerformance::Average),
    ],
    CategoryPerformance::Weak,
);

/// Classify a category by its share of total sales in percent
pub fn category_performance(sales_share: f64) -> CategoryPerformance {
    PERFORMANCE.classify(sales_share)
}

/// Urgency of a category recommendation. Ordered most urgent first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActionPriority {
    High,
    Medium,
    Low,
}

impl ActionPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionPriority::High => "High",
            ActionPriority::Medium => "Medium",
            ActionPriority::Low => "Low",
        }
    }
}

impl std::fmt::Display for ActionPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recommended action for a category
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CategoryStrategy {
    pub recommendation: &'static str,
    pub priority: ActionPriority,
}

pub fn category_strategy(performance: CategoryPerformance, risk: StockRisk) -> CategoryStrategy {
    use ActionPriority::{High, Low, Medium};
    use CategoryPerformance as P;
    use StockRisk as R;

    let (recommendation, priority) = match (performance, risk) {
        (P::Star, R::High) => ("Restock immediately to protect top revenue", High),
        (P::Star, R::Medium) => ("Increase stock levels and monitor closely", High),
        (P::Star, R::Low) => ("Maintain availability and expand range", Medium),
        (P::Strong, R::High) => ("Replenish low stock items promptly", High),
        (P::Strong, R::Medium) => ("Review reorder levels", Medium),
        (P::Strong, R::Low) => ("Promote to grow market share", Medium),
        (P::Average, R::High) => ("Restock best sellers only", Medium),
        (P::Average, R::Medium | R::Low) => ("Run targeted promotions", Low),
        (P::Weak, R::High) => ("Reassess range before restocking", Medium),
        (P::Weak, R::Medium | R::Low) => ("Consider clearance or range reduction", Low),
    };
    CategoryStrategy {
        recommendation,
        priority,
    }
}
