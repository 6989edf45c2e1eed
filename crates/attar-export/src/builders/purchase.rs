//! Purchase workbook

use std::collections::BTreeMap;

use attar_core::metrics::{
    average_value, gross_margin, growth_rate, inventory_turnover, money_sum, purchase_total,
    round_to, safe_percent, safe_ratio, trend_direction,
};
use attar_core::{FilterContext, PurchaseRecord, PurchaseReport, ReportKind};

use super::{BuildContext, EXECUTIVE_SUMMARY};
use crate::sheet::{Cell, SheetSpec};

pub const PURCHASE_TREND_ANALYSIS: &str = "Purchase Trend Analysis";
pub const CATEGORY_ANALYSIS: &str = "Category Analysis";
pub const RECENT_PURCHASES: &str = "Recent Purchases";
pub const INVENTORY_INSIGHTS: &str = "Inventory Insights";

pub const SHEETS: &[&str] = &[
    EXECUTIVE_SUMMARY,
    PURCHASE_TREND_ANALYSIS,
    CATEGORY_ANALYSIS,
    RECENT_PURCHASES,
    INVENTORY_INSIGHTS,
];

/// Purchases passing the category and search filters
pub fn admitted<'a>(report: &'a PurchaseReport, filters: &FilterContext) -> Vec<&'a PurchaseRecord> {
    report
        .recent_purchases
        .iter()
        .filter(|p| {
            filters.admits(
                &p.category,
                &[p.purchase_number.as_str(), p.supplier.as_str(), p.product_name.as_str()],
            )
        })
        .collect()
}

pub fn build(report: &PurchaseReport, ctx: &BuildContext<'_>) -> Vec<SheetSpec> {
    let purchases = admitted(report, ctx.filters);
    vec![
        executive_summary(report, ctx),
        purchase_trend(report),
        category_analysis(report, ctx.filters),
        recent_purchases(&purchases),
        inventory_insights(report, &purchases),
    ]
}

fn executive_summary(report: &PurchaseReport, ctx: &BuildContext<'_>) -> SheetSpec {
    let s = &report.summary;
    let average_purchase = if s.average_purchase_value > 0.0 {
        s.average_purchase_value
    } else {
        average_value(s.total_purchases, s.total_orders)
    };
    let growth = growth_rate(s.total_purchases, s.previous_period_purchases);

    let mut summary = ctx.summary(ReportKind::Purchase, report.date_range.as_ref());
    summary
        .section("PURCHASE OVERVIEW")
        .row("Total Purchases", Cell::Currency(s.total_purchases))
        .row("Total Orders", Cell::count(s.total_orders))
        .row("Average Purchase Value", Cell::Currency(average_purchase))
        .row("Total Suppliers", Cell::count(s.total_suppliers))
        .row("Total Quantity", Cell::Number(s.total_quantity))
        .section("FINANCIAL ANALYSIS")
        .row("Total Sales", Cell::Currency(s.total_sales))
        .row("Gross Margin", Cell::Percent(gross_margin(s.total_sales, s.total_purchases)))
        .row("Current Stock Value", Cell::Currency(s.current_stock_value))
        .row(
            "Inventory Turnover",
            Cell::opt_number(inventory_turnover(s.total_sales, s.current_stock_value)),
        )
        .section("PERIOD COMPARISON")
        .row("Previous Period Purchases", Cell::Currency(s.previous_period_purchases))
        .row("Growth Rate", Cell::opt_percent(growth))
        .row("Trend", trend_direction(growth).as_str());
    summary.finish()
}

fn purchase_trend(report: &PurchaseReport) -> SheetSpec {
    let mut spec = SheetSpec::new(
        PURCHASE_TREND_ANALYSIS,
        &[
            "Period",
            "Amount",
            "Orders",
            "Quantity",
            "Average Order Value",
            "Change vs Previous",
            "Trend",
        ],
    )
    .widths(&[16.0, 16.0, 10.0, 12.0, 20.0, 20.0, 12.0]);

    let mut previous: Option<f64> = None;
    for point in &report.trend_data {
        let change = previous.and_then(|prev| growth_rate(point.amount, prev));
        spec.push_row(vec![
            Cell::text(&point.period),
            Cell::Currency(point.amount),
            Cell::count(point.orders),
            Cell::Number(point.quantity),
            Cell::Currency(average_value(point.amount, point.orders)),
            Cell::opt_percent(change),
            Cell::text(trend_direction(change).as_str()),
        ]);
        previous = Some(point.amount);
    }
    spec
}

fn category_analysis(report: &PurchaseReport, filters: &FilterContext) -> SheetSpec {
    let mut spec = SheetSpec::new(
        CATEGORY_ANALYSIS,
        &[
            "Category",
            "Amount",
            "Quantity",
            "Orders",
            "Share of Purchases",
            "Average Unit Cost",
        ],
    )
    .widths(&[20.0, 16.0, 12.0, 10.0, 18.0, 18.0]);

    let categories: Vec<_> = report
        .category_breakdown
        .iter()
        .filter(|c| filters.admits_category(&c.category))
        .collect();
    let total = money_sum(categories.iter().map(|c| c.amount));
    for category in categories {
        spec.push_row(vec![
            Cell::text(&category.category),
            Cell::Currency(category.amount),
            Cell::Number(category.quantity),
            Cell::count(category.orders),
            Cell::Percent(safe_percent(category.amount, total)),
            Cell::Currency(average_value(category.amount, category.quantity)),
        ]);
    }
    spec
}

fn recent_purchases(purchases: &[&PurchaseRecord]) -> SheetSpec {
    let mut spec = SheetSpec::new(
        RECENT_PURCHASES,
        &[
            "Purchase Number",
            "Date",
            "Supplier",
            "Product Name",
            "Category",
            "Quantity",
            "Unit Cost",
            "Total Amount",
            "Payment Status",
        ],
    )
    .widths(&[18.0, 12.0, 24.0, 30.0, 16.0]);

    for purchase in purchases {
        spec.push_row(vec![
            Cell::text(&purchase.purchase_number),
            Cell::opt_date(purchase.date),
            Cell::text(&purchase.supplier),
            Cell::text(&purchase.product_name),
            Cell::text(&purchase.category),
            Cell::Number(purchase.quantity),
            Cell::Currency(purchase.unit_cost),
            Cell::Currency(purchase_total(purchase)),
            Cell::text(&purchase.payment_status),
        ]);
    }
    spec
}

/// Stock position, supplier spend and payment status in one sectioned sheet
fn inventory_insights(report: &PurchaseReport, purchases: &[&PurchaseRecord]) -> SheetSpec {
    let mut spec = SheetSpec::new(INVENTORY_INSIGHTS, &["Insight", "Value", "Share"])
        .widths(&[36.0, 20.0, 12.0]);
    let s = &report.summary;

    spec.push_section("STOCK POSITION");
    spec.push_row(vec![Cell::text("Current Stock Value"), Cell::Currency(s.current_stock_value)]);
    spec.push_row(vec![Cell::text("Total Purchases"), Cell::Currency(s.total_purchases)]);
    spec.push_row(vec![
        Cell::text("Stock to Purchase Ratio"),
        Cell::opt_number(safe_ratio(s.current_stock_value, s.total_purchases).map(|r| round_to(r, 2))),
    ]);
    spec.push_row(vec![
        Cell::text("Inventory Turnover"),
        Cell::opt_number(inventory_turnover(s.total_sales, s.current_stock_value)),
    ]);

    let mut suppliers: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    let mut statuses: BTreeMap<&str, usize> = BTreeMap::new();
    for purchase in purchases {
        suppliers
            .entry(non_empty(&purchase.supplier, "Unknown Supplier"))
            .or_default()
            .push(purchase_total(purchase));
        *statuses
            .entry(non_empty(&purchase.payment_status, "Unknown"))
            .or_default() += 1;
    }

    if !suppliers.is_empty() {
        let mut spend: Vec<(&str, f64)> = suppliers
            .into_iter()
            .map(|(name, amounts)| (name, money_sum(amounts)))
            .collect();
        spend.sort_by(|a, b| b.1.total_cmp(&a.1));
        let total = money_sum(spend.iter().map(|(_, amount)| *amount));

        spec.push_blank();
        spec.push_section("SUPPLIER SPEND");
        for (name, amount) in spend {
            spec.push_row(vec![
                Cell::text(name),
                Cell::Currency(amount),
                Cell::Percent(safe_percent(amount, total)),
            ]);
        }
    }

    if !statuses.is_empty() {
        let total = purchases.len() as f64;
        spec.push_blank();
        spec.push_section("PAYMENT STATUS");
        for (status, count) in statuses {
            spec.push_row(vec![
                Cell::text(status),
                Cell::from(count),
                Cell::Percent(safe_percent(count as f64, total)),
            ]);
        }
    }
    spec
}

fn non_empty<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attar_core::{ExportConfig, PurchaseSummary};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn purchase(number: &str, supplier: &str, amount: f64, status: &str) -> PurchaseRecord {
        PurchaseRecord {
            purchase_number: number.into(),
            supplier: supplier.into(),
            product_name: "Rose Oil".into(),
            category: "Oils".into(),
            quantity: 2.0,
            unit_cost: amount / 2.0,
            total_amount: amount,
            payment_status: status.into(),
            ..PurchaseRecord::default()
        }
    }

    #[test]
    fn insights_group_suppliers_and_statuses() {
        let report = PurchaseReport {
            summary: PurchaseSummary {
                total_purchases: 1000.0,
                current_stock_value: 0.0,
                ..PurchaseSummary::default()
            },
            recent_purchases: vec![
                purchase("PO-1", "Kannauj Distillers", 600.0, "Paid"),
                purchase("PO-2", "Kannauj Distillers", 200.0, "Pending"),
                purchase("PO-3", "Grasse Aromatics", 200.0, "Paid"),
            ],
            ..PurchaseReport::default()
        };
        let filters = FilterContext::new(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
        let config = ExportConfig::default();
        let ctx = BuildContext::new(&filters, &config, Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap());
        let sheets = build(&report, &ctx);
        let insights = &sheets[4];

        // STOCK POSITION, SUPPLIER SPEND, PAYMENT STATUS
        assert_eq!(insights.section_rows.len(), 3);
        let supplier_row = &insights.sheet.rows[insights.section_rows[1] + 1];
        assert_eq!(supplier_row[0], Cell::text("Kannauj Distillers"));
        assert_eq!(supplier_row[2], Cell::Percent(80.0));
        // Turnover without stock value
        assert_eq!(insights.sheet.rows[5][1], Cell::na());
    }

    #[test]
    fn derived_totals_agree_across_sheets() {
        let report = PurchaseReport {
            recent_purchases: vec![PurchaseRecord {
                purchase_number: "PO-9".into(),
                supplier: "Kannauj".into(),
                quantity: 5.0,
                unit_cost: 100.0,
                ..PurchaseRecord::default()
            }],
            ..PurchaseReport::default()
        };
        let filters = FilterContext::new(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
        let config = ExportConfig::default();
        let ctx = BuildContext::new(&filters, &config, Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap());
        let sheets = build(&report, &ctx);

        let recent = &sheets[3];
        let total = recent.sheet.column("Total Amount").unwrap();
        assert_eq!(recent.sheet.rows[1][total], Cell::Currency(500.0));

        let insights = &sheets[4];
        let supplier_row = &insights.sheet.rows[insights.section_rows[1] + 1];
        assert_eq!(
            supplier_row,
            &vec![Cell::text("Kannauj"), Cell::Currency(500.0), Cell::Percent(100.0)]
        );
    }
}
