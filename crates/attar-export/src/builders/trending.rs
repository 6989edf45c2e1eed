//! Trending products workbook

use std::collections::{BTreeMap, BTreeSet};

use attar_core::metrics::sales::trending_order_value;
use attar_core::metrics::{
    average_daily_sales, average_value, customer_appeal, days_of_stock, money_sum,
    performance_score, performance_tier, projected_stockout, reorder_urgency,
    repeat_purchase_ratio, safe_percent, suggested_reorder_qty, trend_direction, ReorderUrgency,
    ScoreBasis, ScoreInput,
};
use attar_core::{CategoryBreakdown, FilterContext, ReportKind, TrendingProduct, TrendingReport};

use super::{BuildContext, EXECUTIVE_SUMMARY};
use crate::sheet::{Cell, SheetSpec, NOT_AVAILABLE};

pub const PRODUCT_PERFORMANCE: &str = "Product Performance";
pub const SALES_TRENDS: &str = "Sales Trends";
pub const CATEGORY_ANALYSIS: &str = "Category Analysis";
pub const INVENTORY_MANAGEMENT: &str = "Inventory Management";
pub const CUSTOMER_INSIGHTS: &str = "Customer Insights";

pub const SHEETS: &[&str] = &[
    EXECUTIVE_SUMMARY,
    PRODUCT_PERFORMANCE,
    SALES_TRENDS,
    CATEGORY_ANALYSIS,
    INVENTORY_MANAGEMENT,
    CUSTOMER_INSIGHTS,
];

/// Ranking window assumed when neither the summary nor a date range gives one
pub const DEFAULT_PERIOD_DAYS: f64 = 30.0;

/// Trending products passing the category and search filters
pub fn admitted<'a>(report: &'a TrendingReport, filters: &FilterContext) -> Vec<&'a TrendingProduct> {
    report
        .trending_products
        .iter()
        .filter(|p| filters.admits(&p.category, &[p.name.as_str(), p.sku.as_str(), p.product_id.as_str()]))
        .collect()
}

pub fn build(report: &TrendingReport, ctx: &BuildContext<'_>) -> Vec<SheetSpec> {
    let products = admitted(report, ctx.filters);
    let period_days = period_days(report);
    vec![
        executive_summary(report, &products, period_days, ctx),
        product_performance(&products),
        sales_trends(&products, period_days, ctx),
        category_analysis(report, &products, ctx.filters),
        inventory_management(&products, period_days, ctx),
        customer_insights(&products),
    ]
}

/// Length of the ranking window in days
pub fn period_days(report: &TrendingReport) -> f64 {
    if report.summary.period_days > 0.0 {
        return report.summary.period_days;
    }
    report
        .date_range
        .as_ref()
        .and_then(|range| Some((range.end_date? - range.start_date?).num_days() + 1))
        .filter(|days| *days > 0)
        .map_or(DEFAULT_PERIOD_DAYS, |days| days as f64)
}

fn executive_summary(
    report: &TrendingReport,
    products: &[&TrendingProduct],
    period_days: f64,
    ctx: &BuildContext<'_>,
) -> SheetSpec {
    let revenue = money_sum(products.iter().map(|p| p.total_revenue));
    let quantity: f64 = products.iter().map(|p| p.total_quantity).sum();
    let top = products
        .iter()
        .max_by(|a, b| a.total_revenue.total_cmp(&b.total_revenue));
    let categories = category_rows(report, products, ctx.filters);
    let top_category = categories
        .iter()
        .max_by(|a, b| a.revenue.total_cmp(&b.revenue))
        .map_or_else(|| NOT_AVAILABLE.to_string(), |c| c.category.clone());

    let urgencies: Vec<ReorderUrgency> = products
        .iter()
        .map(|p| {
            let daily = average_daily_sales(p.total_quantity, period_days);
            reorder_urgency(p.current_stock, days_of_stock(p.current_stock, daily))
        })
        .collect();
    let count = |wanted: ReorderUrgency| urgencies.iter().filter(|u| **u == wanted).count();

    let mut summary = ctx.summary(ReportKind::Trending, report.date_range.as_ref());
    summary
        .section("TRENDING OVERVIEW")
        .row("Products Ranked", products.len())
        .row("Total Revenue", Cell::Currency(revenue))
        .row("Total Quantity Sold", Cell::Number(quantity))
        .row("Period (days)", Cell::count(period_days))
        .row("Average Daily Revenue", Cell::Currency(average_value(revenue, period_days)))
        .section("TOP PERFORMERS")
        .row("Top Product", top.map_or(NOT_AVAILABLE, |p| p.name.as_str()))
        .row("Top Product Revenue", Cell::Currency(top.map_or(0.0, |p| p.total_revenue)))
        .row("Top Category", top_category)
        .section("INVENTORY ALERTS")
        .row("Out of Stock", count(ReorderUrgency::OutOfStock))
        .row("Urgent Reorder", count(ReorderUrgency::Urgent))
        .row("Reorder Soon", count(ReorderUrgency::ReorderSoon))
        .row("Overstocked", count(ReorderUrgency::Overstocked));
    summary.finish()
}

fn product_performance(products: &[&TrendingProduct]) -> SheetSpec {
    let mut spec = SheetSpec::new(
        PRODUCT_PERFORMANCE,
        &[
            "Rank",
            "Product Name",
            "SKU",
            "Category",
            "Quantity Sold",
            "Revenue",
            "Sales Count",
            "Customers",
            "Average Order Value",
            "Performance Score",
            "Tier",
        ],
    )
    .widths(&[8.0, 30.0, 14.0, 16.0]);

    let basis = ScoreBasis::from_inputs(products.iter().map(|p| ScoreInput::from(*p)));
    for (index, product) in products.iter().enumerate() {
        let score = performance_score(ScoreInput::from(*product), &basis);
        let rank = product.rank.map_or_else(|| Cell::from(index + 1), Cell::count);
        spec.push_row(vec![
            rank,
            Cell::text(&product.name),
            Cell::text(&product.sku),
            Cell::text(&product.category),
            Cell::Number(product.total_quantity),
            Cell::Currency(product.total_revenue),
            Cell::count(product.sales_count),
            Cell::count(product.unique_customers),
            Cell::Currency(trending_order_value(product)),
            Cell::Number(score),
            Cell::text(performance_tier(score).as_str()),
        ]);
    }
    spec
}

fn sales_trends(products: &[&TrendingProduct], period_days: f64, ctx: &BuildContext<'_>) -> SheetSpec {
    let mut spec = SheetSpec::new(
        SALES_TRENDS,
        &[
            "Product Name",
            "Category",
            "Quantity Sold",
            "Average Daily Sales",
            "Average Price",
            "Growth Rate",
            "Trend",
            "Last Sale Date",
            "Days Since Last Sale",
        ],
    )
    .widths(&[30.0, 16.0]);

    for product in products {
        let average_price = if product.average_price > 0.0 {
            product.average_price
        } else {
            average_value(product.total_revenue, product.total_quantity)
        };
        let since_last_sale = product
            .last_sale_date
            .map(|date| (ctx.filters.as_of - date).num_days().max(0));
        spec.push_row(vec![
            Cell::text(&product.name),
            Cell::text(&product.category),
            Cell::Number(product.total_quantity),
            Cell::Number(average_daily_sales(product.total_quantity, period_days)),
            Cell::Currency(average_price),
            Cell::opt_percent(product.growth_rate),
            Cell::text(trend_direction(product.growth_rate).as_str()),
            Cell::opt_date(product.last_sale_date),
            Cell::opt_integer(since_last_sale),
        ]);
    }
    spec
}

/// Backend breakdown when present, otherwise regrouped from the products.
/// The breakdown has no per-product detail, so a search always regroups.
fn category_rows(
    report: &TrendingReport,
    products: &[&TrendingProduct],
    filters: &FilterContext,
) -> Vec<CategoryBreakdown> {
    if !filters.has_search() {
        let upstream: Vec<CategoryBreakdown> = report
            .category_breakdown
            .iter()
            .filter(|c| filters.admits_category(&c.category))
            .cloned()
            .collect();
        if !upstream.is_empty() {
            return upstream;
        }
    }

    let mut groups: BTreeMap<&str, (Vec<f64>, f64, BTreeSet<&str>)> = BTreeMap::new();
    for product in products {
        let category = if product.category.trim().is_empty() {
            "Uncategorized"
        } else {
            product.category.as_str()
        };
        let entry = groups.entry(category).or_default();
        entry.0.push(product.total_revenue);
        entry.1 += product.total_quantity;
        entry.2.insert(product.name.as_str());
    }
    let mut rows: Vec<CategoryBreakdown> = groups
        .into_iter()
        .map(|(category, (revenue, quantity, names))| CategoryBreakdown {
            category: category.to_string(),
            revenue: money_sum(revenue),
            quantity,
            count: names.len() as f64,
        })
        .collect();
    rows.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    rows
}

fn category_analysis(report: &TrendingReport, products: &[&TrendingProduct], filters: &FilterContext) -> SheetSpec {
    let mut spec = SheetSpec::new(
        CATEGORY_ANALYSIS,
        &[
            "Category",
            "Revenue",
            "Quantity Sold",
            "Products",
            "Revenue Share",
            "Average Revenue per Product",
        ],
    )
    .widths(&[20.0, 16.0, 14.0, 10.0, 14.0, 26.0]);

    let rows = category_rows(report, products, filters);
    let total = money_sum(rows.iter().map(|c| c.revenue));
    for category in &rows {
        spec.push_row(vec![
            Cell::text(&category.category),
            Cell::Currency(category.revenue),
            Cell::Number(category.quantity),
            Cell::count(category.count),
            Cell::Percent(safe_percent(category.revenue, total)),
            Cell::Currency(average_value(category.revenue, category.count)),
        ]);
    }
    spec
}

fn inventory_management(products: &[&TrendingProduct], period_days: f64, ctx: &BuildContext<'_>) -> SheetSpec {
    let mut spec = SheetSpec::new(
        INVENTORY_MANAGEMENT,
        &[
            "Product Name",
            "SKU",
            "Current Stock",
            "Average Daily Sales",
            "Days of Stock",
            "Projected Stockout",
            "Reorder Urgency",
            "Suggested Reorder Qty",
        ],
    )
    .widths(&[30.0, 14.0]);

    for product in products {
        let daily = average_daily_sales(product.total_quantity, period_days);
        let days = days_of_stock(product.current_stock, daily);
        let stockout = projected_stockout(ctx.filters.as_of, days);
        let reorder = suggested_reorder_qty(daily, product.current_stock, ctx.config.reorder_cover_days);
        spec.push_row(vec![
            Cell::text(&product.name),
            Cell::text(&product.sku),
            Cell::Number(product.current_stock),
            Cell::Number(daily),
            Cell::opt_integer(days),
            stockout.map_or_else(Cell::na, Cell::Date),
            Cell::text(reorder_urgency(product.current_stock, days).as_str()),
            Cell::Integer(i64::try_from(reorder).unwrap_or(i64::MAX)),
        ]);
    }
    spec
}

fn customer_insights(products: &[&TrendingProduct]) -> SheetSpec {
    let mut spec = SheetSpec::new(
        CUSTOMER_INSIGHTS,
        &[
            "Product Name",
            "Category",
            "Unique Customers",
            "Sales Count",
            "Repeat Purchase Ratio",
            "Revenue per Customer",
            "Customer Appeal",
        ],
    )
    .widths(&[30.0, 16.0]);

    for product in products {
        let ratio = repeat_purchase_ratio(product.sales_count, product.unique_customers);
        spec.push_row(vec![
            Cell::text(&product.name),
            Cell::text(&product.category),
            Cell::count(product.unique_customers),
            Cell::count(product.sales_count),
            Cell::Number(ratio),
            Cell::Currency(average_value(product.total_revenue, product.unique_customers)),
            Cell::text(customer_appeal(product.unique_customers, ratio).as_str()),
        ]);
    }
    spec
}

#[cfg(test)]
mod tests {
    use super::*;
    use attar_core::{DateRange, ExportConfig};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn product(name: &str, category: &str, quantity: f64, stock: f64) -> TrendingProduct {
        TrendingProduct {
            name: name.into(),
            category: category.into(),
            total_quantity: quantity,
            total_revenue: quantity * 100.0,
            sales_count: quantity,
            unique_customers: quantity / 2.0,
            current_stock: stock,
            ..TrendingProduct::default()
        }
    }

    fn sheets(report: &TrendingReport) -> Vec<SheetSpec> {
        let filters = FilterContext::new(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
        let config = ExportConfig::default();
        let ctx = BuildContext::new(&filters, &config, Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap());
        build(report, &ctx)
    }

    #[test]
    fn period_falls_back_to_date_range() {
        let mut report = TrendingReport::default();
        assert_eq!(period_days(&report), DEFAULT_PERIOD_DAYS);
        report.date_range = Some(DateRange {
            start_date: NaiveDate::from_ymd_opt(2026, 10, 1),
            end_date: NaiveDate::from_ymd_opt(2026, 10, 7),
        });
        assert_eq!(period_days(&report), 7.0);
        report.summary.period_days = 14.0;
        assert_eq!(period_days(&report), 14.0);
    }

    #[test]
    fn inventory_projection() {
        let mut report = TrendingReport {
            trending_products: vec![product("Oud Royale", "Oud", 30.0, 10.0), product("Musk", "Musk", 0.0, 4.0)],
            ..TrendingReport::default()
        };
        report.summary.period_days = 30.0;
        let inventory = &sheets(&report)[4];

        let oud = &inventory.sheet.rows[1];
        assert_eq!(oud[3], Cell::Number(1.0));
        assert_eq!(oud[4], Cell::Integer(10));
        assert_eq!(oud[5], Cell::Date(NaiveDate::from_ymd_opt(2026, 10, 28).unwrap()));
        assert_eq!(oud[6], Cell::text("Reorder Soon"));
        assert_eq!(oud[7], Cell::Integer(20));

        let musk = &inventory.sheet.rows[2];
        assert_eq!(musk[4], Cell::na());
        assert_eq!(musk[5], Cell::na());
        assert_eq!(musk[6], Cell::text("No Recent Sales"));
    }

    #[test]
    fn categories_derived_when_breakdown_missing() {
        let report = TrendingReport {
            trending_products: vec![
                product("Oud Royale", "Oud", 30.0, 10.0),
                product("Oud Noir", "Oud", 10.0, 10.0),
                product("Rose", "Floral", 10.0, 10.0),
            ],
            ..TrendingReport::default()
        };
        let categories = &sheets(&report)[3];
        assert_eq!(categories.sheet.data_rows().len(), 2);
        assert_eq!(categories.sheet.rows[1][0], Cell::text("Oud"));
        assert_eq!(categories.sheet.rows[1][3], Cell::Integer(2));
        assert_eq!(categories.sheet.rows[1][4], Cell::Percent(80.0));
    }

    #[test]
    fn search_regroups_categories_from_matching_products() {
        let report = TrendingReport {
            trending_products: vec![
                product("Oud Royale", "Oud", 30.0, 10.0),
                product("Oud Noir", "Oud", 10.0, 10.0),
                product("Rose", "Floral", 10.0, 10.0),
            ],
            category_breakdown: vec![
                CategoryBreakdown {
                    category: "Oud".into(),
                    revenue: 4000.0,
                    quantity: 40.0,
                    count: 2.0,
                },
                CategoryBreakdown {
                    category: "Floral".into(),
                    revenue: 1000.0,
                    quantity: 10.0,
                    count: 1.0,
                },
            ],
            ..TrendingReport::default()
        };
        // Without a search the backend breakdown is used as is
        assert_eq!(sheets(&report)[3].sheet.data_rows().len(), 2);

        let filters = FilterContext::new(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()).search("royale");
        let config = ExportConfig::default();
        let ctx = BuildContext::new(&filters, &config, Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap());
        let categories = &build(&report, &ctx)[3];
        assert_eq!(categories.sheet.data_rows().len(), 1);
        let oud = &categories.sheet.rows[1];
        assert_eq!(oud[0], Cell::text("Oud"));
        assert_eq!(oud[1], Cell::Currency(3000.0));
        assert_eq!(oud[3], Cell::Integer(1));
        assert_eq!(oud[4], Cell::Percent(100.0));
    }
}
