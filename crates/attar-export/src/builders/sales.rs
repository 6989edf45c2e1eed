//! Sales workbook

use attar_core::metrics::{
    average_value, growth_rate, money_sum, performance_score, performance_tier, safe_percent,
    trend_direction, PerformanceTier, ScoreBasis, ScoreInput,
};
use attar_core::{FilterContext, ReportKind, SalesReport, TopProduct};

use super::{BuildContext, EXECUTIVE_SUMMARY};
use crate::sheet::{Cell, SheetSpec};

pub const SALES_TREND_ANALYSIS: &str = "Sales Trend Analysis";
pub const TOP_PRODUCTS: &str = "Top Products";
pub const PAYMENT_ANALYSIS: &str = "Payment Analysis";
pub const PERFORMANCE_METRICS: &str = "Performance Metrics";

pub const SHEETS: &[&str] = &[
    EXECUTIVE_SUMMARY,
    SALES_TREND_ANALYSIS,
    TOP_PRODUCTS,
    PAYMENT_ANALYSIS,
    PERFORMANCE_METRICS,
];

/// Top products passing the category and search filters
pub fn admitted<'a>(report: &'a SalesReport, filters: &FilterContext) -> Vec<&'a TopProduct> {
    report
        .top_products
        .iter()
        .filter(|p| filters.admits(&p.category, &[p.name.as_str(), p.sku.as_str(), p.product_id.as_str()]))
        .collect()
}

pub fn build(report: &SalesReport, ctx: &BuildContext<'_>) -> Vec<SheetSpec> {
    let products = admitted(report, ctx.filters);
    vec![
        executive_summary(report, &products, ctx),
        sales_trend(report),
        top_products(&products),
        payment_analysis(report, ctx.filters),
        performance_metrics(&products),
    ]
}

fn executive_summary(report: &SalesReport, products: &[&TopProduct], ctx: &BuildContext<'_>) -> SheetSpec {
    let s = &report.summary;
    let average_order = if s.average_order_value > 0.0 {
        s.average_order_value
    } else {
        average_value(s.total_sales, s.total_invoices)
    };
    let growth = growth_rate(s.total_sales, s.previous_period_sales);

    let mut summary = ctx.summary(ReportKind::Sales, report.date_range.as_ref());
    summary
        .section("SALES OVERVIEW")
        .row("Total Sales", Cell::Currency(s.total_sales))
        .row("Total Invoices", Cell::count(s.total_invoices))
        .row("Average Order Value", Cell::Currency(average_order))
        .row("Total Customers", Cell::count(s.total_customers))
        .row("Total Items Sold", Cell::Number(s.total_items_sold))
        .row("Total Discount", Cell::Currency(s.total_discount))
        .row("Total Tax", Cell::Currency(s.total_tax))
        .section("PERIOD COMPARISON")
        .row("Previous Period Sales", Cell::Currency(s.previous_period_sales))
        .row("Growth Rate", Cell::opt_percent(growth))
        .row("Trend", trend_direction(growth).as_str());

    let best_product = products
        .iter()
        .max_by(|a, b| a.revenue.total_cmp(&b.revenue))
        .map_or_else(|| "N/A".to_string(), |p| p.name.clone());
    let categories: Vec<_> = report
        .category_breakdown
        .iter()
        .filter(|c| ctx.filters.admits_category(&c.category))
        .collect();
    let top_category = categories
        .iter()
        .max_by(|a, b| a.revenue.total_cmp(&b.revenue))
        .map_or_else(|| "N/A".to_string(), |c| c.category.clone());
    let top_method = report
        .payment_methods
        .iter()
        .max_by(|a, b| a.amount.total_cmp(&b.amount))
        .map_or_else(|| "N/A".to_string(), |m| m.method.clone());
    summary
        .section("TOP PERFORMERS")
        .row("Best Selling Product", best_product)
        .row("Top Category", top_category)
        .row("Preferred Payment Method", top_method)
        .row("Products Listed", products.len());

    if !categories.is_empty() {
        summary.section("CATEGORY BREAKDOWN");
        for category in categories {
            summary.row(category.category.as_str(), Cell::Currency(category.revenue));
        }
    }
    summary.finish()
}

fn sales_trend(report: &SalesReport) -> SheetSpec {
    let mut spec = SheetSpec::new(
        SALES_TREND_ANALYSIS,
        &[
            "Period",
            "Sales",
            "Invoices",
            "Customers",
            "Average Order Value",
            "Change vs Previous",
            "Trend",
        ],
    )
    .widths(&[16.0, 16.0, 12.0, 12.0, 20.0, 20.0, 12.0]);

    let mut previous: Option<f64> = None;
    for point in &report.trend_data {
        let change = previous.and_then(|prev| growth_rate(point.sales, prev));
        spec.push_row(vec![
            Cell::text(&point.period),
            Cell::Currency(point.sales),
            Cell::count(point.invoices),
            Cell::count(point.customers),
            Cell::Currency(average_value(point.sales, point.invoices)),
            Cell::opt_percent(change),
            Cell::text(trend_direction(change).as_str()),
        ]);
        previous = Some(point.sales);
    }
    spec
}

fn top_products(products: &[&TopProduct]) -> SheetSpec {
    let mut spec = SheetSpec::new(
        TOP_PRODUCTS,
        &[
            "Rank",
            "Product Name",
            "SKU",
            "Category",
            "Quantity Sold",
            "Revenue",
            "Revenue Share",
            "Invoices",
            "Customers",
            "Average Order Value",
        ],
    )
    .widths(&[8.0, 30.0, 14.0, 16.0]);

    let total_revenue = money_sum(products.iter().map(|p| p.revenue));
    for (index, product) in products.iter().enumerate() {
        spec.push_row(vec![
            Cell::from(index + 1),
            Cell::text(&product.name),
            Cell::text(&product.sku),
            Cell::text(&product.category),
            Cell::Number(product.quantity_sold),
            Cell::Currency(product.revenue),
            Cell::Percent(safe_percent(product.revenue, total_revenue)),
            Cell::count(product.invoice_count),
            Cell::count(product.customer_count),
            Cell::Currency(average_value(product.revenue, product.invoice_count)),
        ]);
    }
    spec
}

fn payment_analysis(report: &SalesReport, filters: &FilterContext) -> SheetSpec {
    let mut spec = SheetSpec::new(
        PAYMENT_ANALYSIS,
        &[
            "Payment Method",
            "Transactions",
            "Amount",
            "Share of Amount",
            "Average Transaction",
        ],
    )
    .widths(&[20.0, 14.0, 16.0, 16.0, 20.0]);

    let methods: Vec<_> = report
        .payment_methods
        .iter()
        .filter(|m| filters.admits_payment(&m.method))
        .collect();
    let total = money_sum(methods.iter().map(|m| m.amount));
    for method in methods {
        spec.push_row(vec![
            Cell::text(&method.method),
            Cell::count(method.count),
            Cell::Currency(method.amount),
            Cell::Percent(safe_percent(method.amount, total)),
            Cell::Currency(average_value(method.amount, method.count)),
        ]);
    }
    spec
}

/// Products scored against the best performer, grouped by tier
fn performance_metrics(products: &[&TopProduct]) -> SheetSpec {
    let mut spec = SheetSpec::new(
        PERFORMANCE_METRICS,
        &[
            "Product Name",
            "Category",
            "Performance Score",
            "Tier",
            "Revenue",
            "Invoices",
            "Customers",
            "Average Order Value",
        ],
    )
    .widths(&[30.0, 16.0, 18.0, 16.0]);

    let basis = ScoreBasis::from_inputs(products.iter().map(|p| ScoreInput::from(*p)));
    let mut scored: Vec<(f64, &TopProduct)> = products
        .iter()
        .map(|p| (performance_score(ScoreInput::from(*p), &basis), *p))
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    let mut current: Option<PerformanceTier> = None;
    for (score, product) in scored {
        let tier = performance_tier(score);
        if current != Some(tier) {
            spec.push_section(tier.as_str().to_uppercase());
            current = Some(tier);
        }
        spec.push_row(vec![
            Cell::text(&product.name),
            Cell::text(&product.category),
            Cell::Number(score),
            Cell::text(tier.as_str()),
            Cell::Currency(product.revenue),
            Cell::count(product.invoice_count),
            Cell::count(product.customer_count),
            Cell::Currency(average_value(product.revenue, product.invoice_count)),
        ]);
    }
    spec
}

#[cfg(test)]
mod tests {
    use super::*;
    use attar_core::{ExportConfig, PaymentMethodStat, SalesTrendPoint};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn product(name: &str, revenue: f64, invoices: f64) -> TopProduct {
        TopProduct {
            name: name.into(),
            category: "Oud".into(),
            revenue,
            invoice_count: invoices,
            customer_count: invoices,
            quantity_sold: invoices,
            ..TopProduct::default()
        }
    }

    fn report() -> SalesReport {
        SalesReport {
            top_products: vec![product("Oud Royale", 5000.0, 10.0), product("Musk Tahara", 500.0, 5.0)],
            trend_data: vec![
                SalesTrendPoint {
                    period: "2026-10-16".into(),
                    sales: 1000.0,
                    invoices: 4.0,
                    customers: 4.0,
                },
                SalesTrendPoint {
                    period: "2026-10-17".into(),
                    sales: 1200.0,
                    invoices: 5.0,
                    customers: 5.0,
                },
            ],
            payment_methods: vec![
                PaymentMethodStat {
                    method: "Cash".into(),
                    count: 3.0,
                    amount: 300.0,
                },
                PaymentMethodStat {
                    method: "UPI".into(),
                    count: 1.0,
                    amount: 100.0,
                },
            ],
            ..SalesReport::default()
        }
    }

    fn sheets(filters: &FilterContext) -> Vec<SheetSpec> {
        let config = ExportConfig::default();
        let ctx = BuildContext::new(filters, &config, Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap());
        build(&report(), &ctx)
    }

    #[test]
    fn trend_change_starts_unknown() {
        let filters = FilterContext::new(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
        let trend = &sheets(&filters)[1];
        assert_eq!(trend.sheet.rows[1][5], Cell::na());
        assert_eq!(trend.sheet.rows[2][5], Cell::Percent(20.0));
        assert_eq!(trend.sheet.rows[2][6], Cell::text("Growing"));
    }

    #[test]
    fn payment_filter_limits_rows() {
        let filters = FilterContext::new(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()).payment_method("UPI");
        let payment = &sheets(&filters)[3];
        assert_eq!(payment.sheet.data_rows().len(), 1);
        assert_eq!(payment.sheet.rows[1][3], Cell::Percent(100.0));
    }

    #[test]
    fn performance_metrics_groups_by_tier() {
        let filters = FilterContext::new(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
        let metrics = &sheets(&filters)[4];
        assert_eq!(metrics.section_rows, vec![1, 3]);
        assert_eq!(metrics.sheet.rows[2][2], Cell::Number(100.0));
        assert_eq!(metrics.sheet.rows[2][3], Cell::text("Excellent"));
    }
}
