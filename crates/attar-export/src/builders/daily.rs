//! Daily sales workbook

use std::collections::{BTreeMap, BTreeSet};

use attar_core::metrics::daily::{
    category_rollup, customer_label, customer_rollup, hourly_rollup, line_total, product_rollup,
    WALK_IN_CUSTOMER,
};
use attar_core::metrics::{average_value, money_sum, safe_percent};
use attar_core::{DailySalesReport, FilterContext, Invoice, ReportKind};

use super::{BuildContext, EXECUTIVE_SUMMARY};
use crate::sheet::{Cell, SheetSpec, NOT_AVAILABLE};

pub const INVOICE_DETAILS: &str = "Invoice Details";
pub const PRODUCT_PERFORMANCE: &str = "Product Performance";
pub const CATEGORY_ANALYSIS: &str = "Category Analysis";
pub const HOURLY_ANALYSIS: &str = "Hourly Analysis";
pub const CUSTOMER_ANALYSIS: &str = "Customer Analysis";

pub const SHEETS: &[&str] = &[
    EXECUTIVE_SUMMARY,
    INVOICE_DETAILS,
    PRODUCT_PERFORMANCE,
    CATEGORY_ANALYSIS,
    HOURLY_ANALYSIS,
    CUSTOMER_ANALYSIS,
];

/// Invoices passing the payment filter with at least one line item passing
/// the category and search filters
pub fn admitted<'a>(report: &'a DailySalesReport, filters: &FilterContext) -> Vec<&'a Invoice> {
    report
        .sales
        .iter()
        .filter(|invoice| filters.admits_payment(&invoice.payment_method))
        .filter(|invoice| {
            let header = [
                invoice.invoice_number.as_str(),
                invoice.customer_name.as_str(),
                invoice.customer_phone.as_str(),
            ];
            if invoice.items.is_empty() {
                return filters.admits("", &header);
            }
            invoice.items.iter().any(|item| {
                filters.admits(
                    &item.category,
                    &[header[0], header[1], header[2], item.product_name.as_str(), item.sku.as_str()],
                )
            })
        })
        .collect()
}

pub fn build(report: &DailySalesReport, ctx: &BuildContext<'_>) -> Vec<SheetSpec> {
    let invoices = admitted(report, ctx.filters);
    vec![
        executive_summary(report, &invoices, ctx),
        invoice_details(&invoices),
        product_performance(&invoices),
        category_analysis(&invoices),
        hourly_analysis(&invoices),
        customer_analysis(&invoices),
    ]
}

fn items_sold(invoices: &[&Invoice]) -> f64 {
    invoices
        .iter()
        .flat_map(|invoice| &invoice.items)
        .map(|item| item.quantity)
        .sum()
}

fn executive_summary(report: &DailySalesReport, invoices: &[&Invoice], ctx: &BuildContext<'_>) -> SheetSpec {
    let total_sales = money_sum(invoices.iter().map(|i| i.grand_total));
    let named: BTreeSet<&str> = invoices
        .iter()
        .map(|i| customer_label(i))
        .filter(|name| *name != WALK_IN_CUSTOMER)
        .collect();
    let walk_ins = invoices
        .iter()
        .filter(|i| customer_label(i) == WALK_IN_CUSTOMER)
        .count();

    let mut summary = ctx.summary(ReportKind::DailySales, report.date_range.as_ref());
    summary
        .section("SALES OVERVIEW")
        .row("Total Sales", Cell::Currency(total_sales))
        .row("Total Invoices", invoices.len())
        .row("Total Items Sold", Cell::Number(items_sold(invoices)))
        .row("Average Invoice", Cell::Currency(average_value(total_sales, invoices.len() as f64)))
        .row("Total Discount", Cell::Currency(money_sum(invoices.iter().map(|i| i.discount_amount))))
        .row("Total Tax", Cell::Currency(money_sum(invoices.iter().map(|i| i.tax_amount))))
        .row("Unique Customers", named.len())
        .row("Walk-in Invoices", walk_ins);

    let mut methods: BTreeMap<&str, (usize, Vec<f64>)> = BTreeMap::new();
    for invoice in invoices {
        let method = invoice.payment_method.trim();
        let entry = methods
            .entry(if method.is_empty() { "Unknown" } else { method })
            .or_default();
        entry.0 += 1;
        entry.1.push(invoice.grand_total);
    }
    if !methods.is_empty() {
        summary.section("PAYMENT BREAKDOWN");
        for (method, (count, amounts)) in methods {
            let amount = money_sum(amounts);
            summary.row(
                format!("{method} ({count} invoices)"),
                Cell::Currency(amount),
            );
        }
    }

    let products = product_rollup(invoices.iter().copied());
    let categories = category_rollup(invoices.iter().copied());
    let peak = hourly_rollup(invoices.iter().copied())
        .into_iter()
        .filter(|bucket| bucket.invoices > 0)
        .max_by(|a, b| a.revenue.total_cmp(&b.revenue).then_with(|| b.hour.cmp(&a.hour)));
    let customers = customer_rollup(invoices.iter().copied());
    let top_customer = customers.iter().find(|c| c.name != WALK_IN_CUSTOMER);
    summary
        .section("HIGHLIGHTS")
        .row("Top Product", products.first().map_or(NOT_AVAILABLE, |p| p.name.as_str()))
        .row("Top Category", categories.first().map_or(NOT_AVAILABLE, |c| c.category.as_str()))
        .row("Peak Hour", peak.map_or_else(|| NOT_AVAILABLE.to_string(), |b| b.label()))
        .row("Top Customer", top_customer.map_or(NOT_AVAILABLE, |c| c.name.as_str()));
    summary.finish()
}

/// One row per line item; invoice-level columns only on the first row of
/// each invoice, and a blank row after every invoice
fn invoice_details(invoices: &[&Invoice]) -> SheetSpec {
    let mut spec = SheetSpec::new(
        INVOICE_DETAILS,
        &[
            "Invoice Number",
            "Date",
            "Time",
            "Customer",
            "Phone",
            "Payment Method",
            "Product Name",
            "SKU",
            "Category",
            "Quantity",
            "Unit Price",
            "Item Discount",
            "Line Total",
            "Invoice Subtotal",
            "Invoice Discount",
            "Invoice Tax",
            "Invoice Total",
        ],
    )
    .widths(&[18.0, 12.0, 8.0, 22.0, 14.0, 16.0, 30.0, 14.0, 16.0]);

    for invoice in invoices {
        let header = vec![
            Cell::text(&invoice.invoice_number),
            Cell::opt_date(invoice.created_at.map(|at| at.date())),
            invoice
                .created_at
                .map_or(Cell::Empty, |at| Cell::text(at.format("%H:%M").to_string())),
            Cell::text(customer_label(invoice)),
            Cell::text(&invoice.customer_phone),
            Cell::text(&invoice.payment_method),
        ];
        let totals = [
            Cell::Currency(invoice.subtotal),
            Cell::Currency(invoice.discount_amount),
            Cell::Currency(invoice.tax_amount),
            Cell::Currency(invoice.grand_total),
        ];

        if invoice.items.is_empty() {
            let mut row = header;
            row.extend(std::iter::repeat(Cell::Empty).take(7));
            row.extend(totals);
            spec.push_row(row);
            spec.push_blank();
            continue;
        }
        for (index, item) in invoice.items.iter().enumerate() {
            let mut row = if index == 0 {
                header.clone()
            } else {
                vec![Cell::Empty; 6]
            };
            row.extend([
                Cell::text(&item.product_name),
                Cell::text(&item.sku),
                Cell::text(&item.category),
                Cell::Number(item.quantity),
                Cell::Currency(item.price),
                Cell::Currency(item.discount),
                Cell::Currency(line_total(item)),
            ]);
            if index == 0 {
                row.extend(totals.clone());
            }
            spec.push_row(row);
        }
        spec.push_blank();
    }
    spec
}

fn product_performance(invoices: &[&Invoice]) -> SheetSpec {
    let mut spec = SheetSpec::new(
        PRODUCT_PERFORMANCE,
        &[
            "Rank",
            "Product Name",
            "SKU",
            "Category",
            "Quantity Sold",
            "Revenue",
            "Invoices",
            "Revenue Share",
            "Average Price",
        ],
    )
    .widths(&[8.0, 30.0, 14.0, 16.0]);

    let products = product_rollup(invoices.iter().copied());
    let total = money_sum(products.iter().map(|p| p.revenue));
    for (index, product) in products.iter().enumerate() {
        spec.push_row(vec![
            Cell::from(index + 1),
            Cell::text(&product.name),
            Cell::text(&product.sku),
            Cell::text(&product.category),
            Cell::Number(product.quantity),
            Cell::Currency(product.revenue),
            Cell::from(product.invoices),
            Cell::Percent(safe_percent(product.revenue, total)),
            Cell::Currency(average_value(product.revenue, product.quantity)),
        ]);
    }
    spec
}

fn category_analysis(invoices: &[&Invoice]) -> SheetSpec {
    let mut spec = SheetSpec::new(
        CATEGORY_ANALYSIS,
        &["Category", "Products", "Quantity Sold", "Revenue", "Revenue Share"],
    )
    .widths(&[20.0, 10.0, 14.0, 16.0, 14.0]);

    let categories = category_rollup(invoices.iter().copied());
    let total = money_sum(categories.iter().map(|c| c.revenue));
    for category in &categories {
        spec.push_row(vec![
            Cell::text(&category.category),
            Cell::from(category.products),
            Cell::Number(category.quantity),
            Cell::Currency(category.revenue),
            Cell::Percent(safe_percent(category.revenue, total)),
        ]);
    }
    spec
}

fn hourly_analysis(invoices: &[&Invoice]) -> SheetSpec {
    let mut spec = SheetSpec::new(
        HOURLY_ANALYSIS,
        &[
            "Hour",
            "Invoices",
            "Items Sold",
            "Revenue",
            "Revenue Share",
            "Average Invoice",
        ],
    )
    .widths(&[16.0, 10.0, 12.0, 16.0, 14.0, 16.0]);

    let buckets = hourly_rollup(invoices.iter().copied());
    let total = money_sum(buckets.iter().map(|b| b.revenue));
    for bucket in &buckets {
        spec.push_row(vec![
            Cell::text(bucket.label()),
            Cell::from(bucket.invoices),
            Cell::Number(bucket.items),
            Cell::Currency(bucket.revenue),
            Cell::Percent(safe_percent(bucket.revenue, total)),
            Cell::Currency(average_value(bucket.revenue, bucket.invoices as f64)),
        ]);
    }
    spec
}

fn customer_analysis(invoices: &[&Invoice]) -> SheetSpec {
    let mut spec = SheetSpec::new(
        CUSTOMER_ANALYSIS,
        &[
            "Customer",
            "Phone",
            "Invoices",
            "Items Purchased",
            "Total Spent",
            "Average Invoice",
            "Share of Sales",
        ],
    )
    .widths(&[24.0, 14.0]);

    let customers = customer_rollup(invoices.iter().copied());
    let total = money_sum(customers.iter().map(|c| c.total_spent));
    for customer in &customers {
        spec.push_row(vec![
            Cell::text(&customer.name),
            Cell::text(&customer.phone),
            Cell::from(customer.invoices),
            Cell::Number(customer.items),
            Cell::Currency(customer.total_spent),
            Cell::Currency(average_value(customer.total_spent, customer.invoices as f64)),
            Cell::Percent(safe_percent(customer.total_spent, total)),
        ]);
    }
    spec
}
