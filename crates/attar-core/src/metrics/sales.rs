//! Product performance scoring
//!
//! A product is scored against the best performer of the same report on
//! four signals: revenue, sale frequency, customer reach and average order
//! value.

use serde::{Deserialize, Serialize};

use super::{average_value, round_to, safe_ratio, Bound, Ladder};
use crate::report::sales::TopProduct;
use crate::report::trending::TrendingProduct;

const REVENUE_WEIGHT: f64 = 40.0;
const FREQUENCY_WEIGHT: f64 = 25.0;
const CUSTOMER_WEIGHT: f64 = 20.0;
const ORDER_VALUE_WEIGHT: f64 = 15.0;

/// The four raw signals of one product
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScoreInput {
    pub revenue: f64,
    pub frequency: f64,
    pub customers: f64,
    pub average_order_value: f64,
}

impl From<&TopProduct> for ScoreInput {
    fn from(product: &TopProduct) -> Self {
        Self {
            revenue: product.revenue,
            frequency: product.invoice_count,
            customers: product.customer_count,
            average_order_value: average_value(product.revenue, product.invoice_count),
        }
    }
}

impl From<&TrendingProduct> for ScoreInput {
    fn from(product: &TrendingProduct) -> Self {
        Self {
            revenue: product.total_revenue,
            frequency: product.sales_count,
            customers: product.unique_customers,
            average_order_value: trending_order_value(product),
        }
    }
}

/// Upstream average order value, or revenue per sale when absent
pub fn trending_order_value(product: &TrendingProduct) -> f64 {
    product
        .average_order_value
        .filter(|v| *v > 0.0)
        .unwrap_or_else(|| average_value(product.total_revenue, product.sales_count))
}

/// Corpus maxima each signal is normalised against
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScoreBasis {
    pub max_revenue: f64,
    pub max_frequency: f64,
    pub max_customers: f64,
    pub max_average_order_value: f64,
}

impl ScoreBasis {
    pub fn from_inputs(inputs: impl IntoIterator<Item = ScoreInput>) -> Self {
        inputs.into_iter().fold(ScoreBasis::default(), |basis, input| ScoreBasis {
            max_revenue: basis.max_revenue.max(input.revenue),
            max_frequency: basis.max_frequency.max(input.frequency),
            max_customers: basis.max_customers.max(input.customers),
            max_average_order_value: basis.max_average_order_value.max(input.average_order_value),
        })
    }
}

/// Weighted 0–100 performance score, 1 dp
pub fn performance_score(input: ScoreInput, basis: &ScoreBasis) -> f64 {
    let term = |value: f64, max: f64, weight: f64| {
        safe_ratio(value, max).map_or(0.0, |r| r.clamp(0.0, 1.0) * weight)
    };
    let score = term(input.revenue, basis.max_revenue, REVENUE_WEIGHT)
        + term(input.frequency, basis.max_frequency, FREQUENCY_WEIGHT)
        + term(input.customers, basis.max_customers, CUSTOMER_WEIGHT)
        + term(input.average_order_value, basis.max_average_order_value, ORDER_VALUE_WEIGHT);
    round_to(score.clamp(0.0, 100.0), 1)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerformanceTier {
    Excellent,
    Good,
    Average,
    NeedsAttention,
}

impl PerformanceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            PerformanceTier::Excellent => "Excellent",
            PerformanceTier::Good => "Good",
            PerformanceTier::Average => "Average",
            PerformanceTier::NeedsAttention => "Needs Attention",
        }
    }
}

impl std::fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const TIERS: Ladder<'static, PerformanceTier> = Ladder::new(
    &[
        (Bound::AtLeast(80.0), PerformanceTier::Excellent),
        (Bound::AtLeast(60.0), PerformanceTier::Good),
        (Bound::AtLeast(40.0), PerformanceTier::Average),
    ],
    PerformanceTier::NeedsAttention,
);

pub fn performance_tier(score: f64) -> PerformanceTier {
    TIERS.classify(score)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(revenue: f64, frequency: f64, customers: f64, aov: f64) -> ScoreInput {
        ScoreInput {
            revenue,
            frequency,
            customers,
            average_order_value: aov,
        }
    }

    #[test]
    fn best_performer_scores_100() {
        let best = input(1000.0, 10.0, 8.0, 100.0);
        let basis = ScoreBasis::from_inputs([best, input(500.0, 5.0, 4.0, 100.0)]);
        assert_eq!(performance_score(best, &basis), 100.0);
    }

    #[test]
    fn half_of_everything_scores_half() {
        let basis = ScoreBasis::from_inputs([input(1000.0, 10.0, 8.0, 100.0)]);
        assert_eq!(performance_score(input(500.0, 5.0, 4.0, 50.0), &basis), 50.0);
    }

    #[test]
    fn empty_corpus_scores_zero() {
        let basis = ScoreBasis::default();
        assert_eq!(performance_score(input(10.0, 1.0, 1.0, 10.0), &basis), 0.0);
    }

    #[test]
    fn negative_signals_are_clamped() {
        let basis = ScoreBasis::from_inputs([input(100.0, 1.0, 1.0, 100.0)]);
        assert_eq!(performance_score(input(-50.0, 0.0, 0.0, 0.0), &basis), 0.0);
    }

    #[test]
    fn tiers() {
        assert_eq!(performance_tier(80.0), PerformanceTier::Excellent);
        assert_eq!(performance_tier(79.9), PerformanceTier::Good);
        assert_eq!(performance_tier(40.0), PerformanceTier::Average);
        assert_eq!(performance_tier(0.0), PerformanceTier::NeedsAttention);
    }

    #[test]
    fn trending_order_value_falls_back() {
        let product = TrendingProduct {
            total_revenue: 900.0,
            sales_count: 3.0,
            ..TrendingProduct::default()
        };
        assert_eq!(trending_order_value(&product), 300.0);

        let product = TrendingProduct {
            average_order_value: Some(250.0),
            ..product
        };
        assert_eq!(trending_order_value(&product), 250.0);
    }
}
