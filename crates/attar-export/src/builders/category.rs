//! Category workbook

use attar_core::metrics::{
    average_value, category_gross_margin, category_performance, category_strategy,
    category_turnover, gross_margin, inventory_turnover, money_sum, safe_percent,
    stock_health_percent, stock_risk_level, ActionPriority, CategoryPerformance, CategoryStrategy,
    StockRisk,
};
use attar_core::{CategoryReport, CategoryStat, FilterContext, ReportKind};

use super::{BuildContext, EXECUTIVE_SUMMARY};
use crate::sheet::{Cell, SheetSpec, NOT_AVAILABLE};

pub const CATEGORY_PERFORMANCE: &str = "Category Performance";
pub const SALES_ANALYSIS: &str = "Sales Analysis";
pub const PURCHASE_ANALYSIS: &str = "Purchase Analysis";
pub const STOCK_MANAGEMENT: &str = "Stock Management";
pub const STRATEGIC_RECOMMENDATIONS: &str = "Strategic Recommendations";

pub const SHEETS: &[&str] = &[
    EXECUTIVE_SUMMARY,
    CATEGORY_PERFORMANCE,
    SALES_ANALYSIS,
    PURCHASE_ANALYSIS,
    STOCK_MANAGEMENT,
    STRATEGIC_RECOMMENDATIONS,
];

/// Categories passing the category and search filters
pub fn admitted<'a>(report: &'a CategoryReport, filters: &FilterContext) -> Vec<&'a CategoryStat> {
    report
        .categories
        .iter()
        .filter(|c| filters.admits(&c.name, &[c.name.as_str()]))
        .collect()
}

pub fn build(report: &CategoryReport, ctx: &BuildContext<'_>) -> Vec<SheetSpec> {
    let categories = admitted(report, ctx.filters);
    let totals = Totals::of(&categories);
    vec![
        executive_summary(report, &categories, &totals, ctx),
        category_performance_sheet(&categories, &totals),
        sales_analysis(&categories, &totals),
        purchase_analysis(&categories, &totals),
        stock_management(&categories),
        strategic_recommendations(&categories, &totals),
    ]
}

/// Totals over the admitted categories
struct Totals {
    products: f64,
    sales: f64,
    purchases: f64,
    stock_value: f64,
}

impl Totals {
    fn of(categories: &[&CategoryStat]) -> Self {
        Self {
            products: categories.iter().map(|c| c.total_products).sum(),
            sales: money_sum(categories.iter().map(|c| c.total_sales)),
            purchases: money_sum(categories.iter().map(|c| c.total_purchases)),
            stock_value: money_sum(categories.iter().map(|c| c.stock_value)),
        }
    }

    fn sales_share(&self, category: &CategoryStat) -> f64 {
        safe_percent(category.total_sales, self.sales)
    }
}

fn executive_summary(
    report: &CategoryReport,
    categories: &[&CategoryStat],
    totals: &Totals,
    ctx: &BuildContext<'_>,
) -> SheetSpec {
    let top = categories.iter().max_by(|a, b| a.total_sales.total_cmp(&b.total_sales));
    let at_risk = categories
        .iter()
        .filter(|c| stock_risk_level(c) == StockRisk::High)
        .count();

    let mut summary = ctx.summary(ReportKind::Category, report.date_range.as_ref());
    summary
        .section("CATEGORY OVERVIEW")
        .row("Total Categories", categories.len())
        .row("Total Products", Cell::count(totals.products))
        .row("Total Sales", Cell::Currency(totals.sales))
        .row("Total Purchases", Cell::Currency(totals.purchases))
        .row("Total Stock Value", Cell::Currency(totals.stock_value))
        .section("FINANCIAL ANALYSIS")
        .row("Overall Gross Margin", Cell::Percent(gross_margin(totals.sales, totals.purchases)))
        .row(
            "Overall Inventory Turnover",
            Cell::opt_number(inventory_turnover(totals.sales, totals.stock_value)),
        )
        .section("HIGHLIGHTS")
        .row("Top Category", top.map_or(NOT_AVAILABLE, |c| c.name.as_str()))
        .row(
            "Top Category Sales Share",
            Cell::Percent(top.map_or(0.0, |c| totals.sales_share(c))),
        )
        .row("High Stock Risk Categories", at_risk);
    summary.finish()
}

fn category_performance_sheet(categories: &[&CategoryStat], totals: &Totals) -> SheetSpec {
    let mut spec = SheetSpec::new(
        CATEGORY_PERFORMANCE,
        &[
            "Category",
            "Products",
            "Total Sales",
            "Sales Share",
            "Performance",
            "Gross Margin",
            "Inventory Turnover",
            "Stock Risk",
        ],
    )
    .widths(&[22.0, 10.0, 16.0, 14.0, 14.0, 14.0, 18.0, 12.0]);

    for category in categories {
        let share = totals.sales_share(category);
        spec.push_row(vec![
            Cell::text(&category.name),
            Cell::count(category.total_products),
            Cell::Currency(category.total_sales),
            Cell::Percent(share),
            Cell::text(category_performance(share).as_str()),
            Cell::opt_percent(category_gross_margin(category)),
            Cell::opt_number(category_turnover(category)),
            Cell::text(stock_risk_level(category).as_str()),
        ]);
    }
    spec
}

fn sales_analysis(categories: &[&CategoryStat], totals: &Totals) -> SheetSpec {
    let mut spec = SheetSpec::new(
        SALES_ANALYSIS,
        &[
            "Category",
            "Total Sales",
            "Quantity Sold",
            "Sales Share",
            "Average Selling Price",
            "Sales per Product",
        ],
    )
    .widths(&[22.0, 16.0, 14.0, 14.0, 20.0, 18.0]);

    for category in categories {
        spec.push_row(vec![
            Cell::text(&category.name),
            Cell::Currency(category.total_sales),
            Cell::Number(category.quantity_sold),
            Cell::Percent(totals.sales_share(category)),
            Cell::Currency(average_value(category.total_sales, category.quantity_sold)),
            Cell::Currency(average_value(category.total_sales, category.total_products)),
        ]);
    }
    spec
}

fn purchase_analysis(categories: &[&CategoryStat], totals: &Totals) -> SheetSpec {
    let mut spec = SheetSpec::new(
        PURCHASE_ANALYSIS,
        &[
            "Category",
            "Total Purchases",
            "Purchase Quantity",
            "Purchase Share",
            "Average Unit Cost",
            "Gross Margin",
        ],
    )
    .widths(&[22.0, 16.0, 18.0, 16.0, 18.0, 14.0]);

    for category in categories {
        spec.push_row(vec![
            Cell::text(&category.name),
            Cell::Currency(category.total_purchases),
            Cell::Number(category.purchase_quantity),
            Cell::Percent(safe_percent(category.total_purchases, totals.purchases)),
            Cell::Currency(average_value(category.total_purchases, category.purchase_quantity)),
            Cell::opt_percent(category_gross_margin(category)),
        ]);
    }
    spec
}

fn stock_management(categories: &[&CategoryStat]) -> SheetSpec {
    let mut spec = SheetSpec::new(
        STOCK_MANAGEMENT,
        &[
            "Category",
            "Total Products",
            "Total Stock",
            "Stock Value",
            "Low Stock Products",
            "Out of Stock Products",
            "Stock Health",
            "Stock Risk",
        ],
    )
    .widths(&[22.0, 14.0, 12.0, 16.0, 18.0, 20.0, 14.0, 12.0]);

    for category in categories {
        spec.push_row(vec![
            Cell::text(&category.name),
            Cell::count(category.total_products),
            Cell::Number(category.total_stock),
            Cell::Currency(category.stock_value),
            Cell::count(category.low_stock_products),
            Cell::count(category.out_of_stock_products),
            Cell::Percent(stock_health_percent(category)),
            Cell::text(stock_risk_level(category).as_str()),
        ]);
    }
    spec
}

/// One row per category grouped by action priority, highest first
fn strategic_recommendations(categories: &[&CategoryStat], totals: &Totals) -> SheetSpec {
    let mut spec = SheetSpec::new(
        STRATEGIC_RECOMMENDATIONS,
        &[
            "Category",
            "Performance",
            "Stock Risk",
            "Sales Share",
            "Recommendation",
            "Priority",
        ],
    )
    .widths(&[22.0, 14.0, 12.0, 14.0, 46.0, 10.0]);

    let mut rows: Vec<(CategoryStrategy, CategoryPerformance, StockRisk, f64, &CategoryStat)> = categories
        .iter()
        .map(|c| {
            let share = totals.sales_share(c);
            let performance = category_performance(share);
            let risk = stock_risk_level(c);
            (category_strategy(performance, risk), performance, risk, share, *c)
        })
        .collect();
    // Stable: input order is kept within a priority
    rows.sort_by_key(|(strategy, ..)| strategy.priority);

    let mut current: Option<ActionPriority> = None;
    for (strategy, performance, risk, share, category) in rows {
        if current != Some(strategy.priority) {
            spec.push_section(format!("{} PRIORITY", strategy.priority.as_str().to_uppercase()));
            current = Some(strategy.priority);
        }
        spec.push_row(vec![
            Cell::text(&category.name),
            Cell::text(performance.as_str()),
            Cell::text(risk.as_str()),
            Cell::Percent(share),
            Cell::text(strategy.recommendation),
            Cell::text(strategy.priority.as_str()),
        ]);
    }
    spec
}

#[cfg(test)]
mod tests {
    use super::*;
    use attar_core::ExportConfig;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn stat(name: &str, products: f64, sales: f64, low: f64) -> CategoryStat {
        CategoryStat {
            name: name.into(),
            total_products: products,
            low_stock_products: low,
            total_sales: sales,
            total_purchases: sales * 0.6,
            stock_value: sales / 2.0,
            ..CategoryStat::default()
        }
    }

    fn sheets(report: &CategoryReport) -> Vec<SheetSpec> {
        let filters = FilterContext::new(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
        let config = ExportConfig::default();
        let ctx = BuildContext::new(&filters, &config, Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap());
        build(report, &ctx)
    }

    #[test]
    fn empty_category_is_listed_with_not_available_ratios() {
        let report = CategoryReport {
            categories: vec![stat("Oud", 4.0, 1000.0, 0.0), CategoryStat {
                name: "Bakhoor".into(),
                ..CategoryStat::default()
            }],
            ..CategoryReport::default()
        };
        let performance = &sheets(&report)[1];
        let row = &performance.sheet.rows[2];
        assert_eq!(row[0], Cell::text("Bakhoor"));
        assert_eq!(row[1], Cell::Integer(0));
        assert_eq!(row[2], Cell::Currency(0.0));
        assert_eq!(row[5], Cell::na());
        assert_eq!(row[6], Cell::na());
        assert_eq!(performance.sheet.rows[1][5], Cell::Percent(40.0));
    }

    #[test]
    fn recommendations_grouped_by_priority() {
        let report = CategoryReport {
            categories: vec![
                stat("Musk", 10.0, 20.0, 0.0),
                stat("Oud", 10.0, 800.0, 5.0),
                stat("Rose", 10.0, 180.0, 0.0),
            ],
            ..CategoryReport::default()
        };
        let strategy = &sheets(&report)[5];
        // Oud: Star/High -> High; Rose: Strong/Low -> Medium; Musk: Weak/Low -> Low
        assert_eq!(strategy.section_rows, vec![1, 3, 5]);
        assert_eq!(strategy.sheet.rows[1][0], Cell::text("HIGH PRIORITY"));
        assert_eq!(strategy.sheet.rows[2][0], Cell::text("Oud"));
        assert_eq!(strategy.sheet.rows[2][5], Cell::text("High"));
        assert_eq!(strategy.sheet.rows[3][0], Cell::text("MEDIUM PRIORITY"));
        assert_eq!(strategy.sheet.rows[4][5], Cell::text("Medium"));
        assert_eq!(strategy.sheet.rows[6][0], Cell::text("Musk"));
    }
}
