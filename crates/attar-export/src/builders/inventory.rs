//! Inventory & expiry workbook

use attar_core::metrics::inventory::{
    action_deadline, batch_value, earliest_expiry, product_quantity,
    quantity_with_status, stock_status,
};
use attar_core::metrics::{
    batch_expiry, days_to_expiry, expiry_priority, inventory_value, product_health_score,
    product_health_status, product_risk_level, risk_recommendation, ExpiryStatus, HealthStatus,
    InventoryTotals, Priority,
};
use attar_core::{FilterContext, InventoryProduct, InventoryReport, ReportKind};

use super::{BuildContext, EXECUTIVE_SUMMARY};
use crate::sheet::{Cell, SheetSpec};

pub const PRODUCT_INVENTORY: &str = "Product Inventory";
pub const BATCH_DETAILS: &str = "Batch Details";
pub const DISPOSAL_HISTORY: &str = "Disposal History";
pub const RISK_MANAGEMENT: &str = "Risk Management";

pub const SHEETS: &[&str] = &[
    EXECUTIVE_SUMMARY,
    PRODUCT_INVENTORY,
    BATCH_DETAILS,
    DISPOSAL_HISTORY,
    RISK_MANAGEMENT,
];

/// Products passing the category and search filters
pub fn admitted<'a>(report: &'a InventoryReport, filters: &FilterContext) -> Vec<&'a InventoryProduct> {
    report
        .inventory
        .iter()
        .filter(|p| filters.admits(&p.category, &[p.name.as_str(), p.sku.as_str(), p.product_id.as_str()]))
        .collect()
}

pub fn build(report: &InventoryReport, ctx: &BuildContext<'_>) -> Vec<SheetSpec> {
    let products = admitted(report, ctx.filters);
    vec![
        executive_summary(report, &products, ctx),
        product_inventory(&products, ctx),
        batch_details(&products, ctx),
        disposal_history(&products),
        risk_management(&products, ctx),
    ]
}

fn executive_summary(report: &InventoryReport, products: &[&InventoryProduct], ctx: &BuildContext<'_>) -> SheetSpec {
    let policy = ctx.policy();
    let totals = InventoryTotals::from_products(products, &policy);

    let mut summary = ctx.summary(ReportKind::Inventory, report.date_range.as_ref());
    summary
        .section("INVENTORY OVERVIEW")
        .row("Total Products", totals.products)
        .row("Total Batches", totals.batches)
        .row("Total Quantity", Cell::Number(totals.total_quantity))
        .row("Total Inventory Value", Cell::Currency(totals.total_value))
        .row("Average Health Score", Cell::Number(totals.average_health_score))
        .section("EXPIRY STATUS")
        .row("Expired Batches", totals.expired_batches)
        .row("Total Expired Quantity", Cell::Number(totals.expired_quantity))
        .row("Expired Stock Value", Cell::Currency(totals.expired_value))
        .row("Near Expiry Batches", totals.near_expiry_batches)
        .row("Near Expiry Quantity", Cell::Number(totals.near_expiry_quantity))
        .row("Near Expiry Stock Value", Cell::Currency(totals.near_expiry_value))
        .row("Near Expiry Window (days)", Cell::Integer(policy.near_expiry_days))
        .section("STOCK STATUS")
        .row("Low Stock Products", totals.low_stock_products)
        .row("Out of Stock Products", totals.out_of_stock_products)
        .row("Disposed Batches", totals.disposed_batches)
        .row("Disposed Quantity", Cell::Number(totals.disposed_quantity))
        .section("HEALTH DISTRIBUTION")
        .row("Healthy", totals.healthy_products)
        .row("Monitor", totals.monitor_products)
        .row("High Risk", totals.high_risk_products)
        .row("Critical", totals.critical_products)
        .row("No Stock", totals.no_stock_products)
        .row("Healthy Products", Cell::Percent(totals.healthy_percent()));
    summary.finish()
}

fn product_inventory(products: &[&InventoryProduct], ctx: &BuildContext<'_>) -> SheetSpec {
    let policy = ctx.policy();
    let mut spec = SheetSpec::new(
        PRODUCT_INVENTORY,
        &[
            "Product ID",
            "Product Name",
            "SKU",
            "Category",
            "Unit Price",
            "Cost Price",
            "Total Quantity",
            "Inventory Value",
            "Stock Status",
            "Reorder Level",
            "Active Batches",
            "Expired Qty",
            "Near Expiry Qty",
            "Health Status",
            "Health Score",
            "Created",
        ],
    )
    .widths(&[14.0, 30.0, 14.0, 16.0]);

    for product in products {
        spec.push_row(vec![
            Cell::text(&product.product_id),
            Cell::text(&product.name),
            Cell::text(&product.sku),
            Cell::text(&product.category),
            Cell::Currency(product.price),
            Cell::Currency(product.cost_price),
            Cell::Number(product_quantity(product)),
            Cell::Currency(inventory_value(product)),
            Cell::text(stock_status(product).as_str()),
            Cell::Number(product.reorder_level),
            Cell::from(product.batches.len()),
            Cell::Number(quantity_with_status(product, &policy, ExpiryStatus::Expired)),
            Cell::Number(quantity_with_status(product, &policy, ExpiryStatus::NearExpiry)),
            Cell::text(product_health_status(product, &policy).as_str()),
            Cell::Number(product_health_score(product, &policy)),
            Cell::opt_date(product.created_at.map(|at| at.date())),
        ]);
    }
    spec
}

fn batch_details(products: &[&InventoryProduct], ctx: &BuildContext<'_>) -> SheetSpec {
    let policy = ctx.policy();
    let mut spec = SheetSpec::new(
        BATCH_DETAILS,
        &[
            "Product Name",
            "SKU",
            "Category",
            "Batch Number",
            "Quantity",
            "Manufacture Date",
            "Expiry Date",
            "Days to Expiry",
            "Status",
            "Priority",
            "Batch Value",
        ],
    )
    .widths(&[30.0, 14.0, 16.0, 16.0]);

    for product in products {
        for batch in &product.batches {
            spec.push_row(vec![
                Cell::text(&product.name),
                Cell::text(&product.sku),
                Cell::text(&product.category),
                Cell::text(&batch.batch_number),
                Cell::Number(batch.quantity),
                Cell::opt_date(batch.manufacture_date),
                Cell::opt_date(batch.expiry_date),
                Cell::opt_integer(days_to_expiry(batch, &policy)),
                Cell::text(batch_expiry(batch, &policy).as_str()),
                Cell::text(expiry_priority(batch, &policy).as_str()),
                Cell::Currency(batch_value(batch, product.price)),
            ]);
        }
    }
    spec
}

fn disposal_history(products: &[&InventoryProduct]) -> SheetSpec {
    let mut spec = SheetSpec::new(
        DISPOSAL_HISTORY,
        &[
            "Product Name",
            "SKU",
            "Category",
            "Batch Number",
            "Quantity",
            "Expiry Date",
            "Disposal Date",
            "Disposal Reason",
            "Value Lost",
        ],
    )
    .widths(&[30.0, 14.0, 16.0, 16.0]);

    for product in products {
        for batch in &product.disposed_batches {
            spec.push_row(vec![
                Cell::text(&product.name),
                Cell::text(&product.sku),
                Cell::text(&product.category),
                Cell::text(&batch.batch_number),
                Cell::Number(batch.quantity),
                Cell::opt_date(batch.expiry_date),
                Cell::opt_date(batch.disposal_date),
                Cell::text(&batch.disposal_reason),
                Cell::Currency(batch_value(batch, product.price)),
            ]);
        }
    }
    spec
}

/// Non-healthy products grouped by risk level, most urgent first
fn risk_management(products: &[&InventoryProduct], ctx: &BuildContext<'_>) -> SheetSpec {
    let policy = ctx.policy();
    let mut spec = SheetSpec::new(
        RISK_MANAGEMENT,
        &[
            "Product Name",
            "SKU",
            "Category",
            "Health Status",
            "Risk Level",
            "Health Score",
            "Total Quantity",
            "Expired Qty",
            "Near Expiry Qty",
            "Earliest Expiry",
            "Action Deadline",
            "Recommendation",
        ],
    )
    .widths(&[30.0, 14.0, 16.0, 14.0, 12.0]);

    let mut at_risk: Vec<(Priority, HealthStatus, &InventoryProduct)> = products
        .iter()
        .map(|p| (product_risk_level(p, &policy), product_health_status(p, &policy), *p))
        .filter(|(_, status, _)| *status != HealthStatus::Healthy)
        .collect();
    // Stable: input order is kept within a risk level
    at_risk.sort_by_key(|(risk, _, _)| *risk);

    let mut current: Option<Priority> = None;
    for (risk, status, product) in at_risk {
        if current != Some(risk) {
            spec.push_section(format!("{} PRIORITY", risk.as_str()));
            current = Some(risk);
        }
        spec.push_row(vec![
            Cell::text(&product.name),
            Cell::text(&product.sku),
            Cell::text(&product.category),
            Cell::text(status.as_str()),
            Cell::text(risk.as_str()),
            Cell::Number(product_health_score(product, &policy)),
            Cell::Number(product_quantity(product)),
            Cell::Number(quantity_with_status(product, &policy, ExpiryStatus::Expired)),
            Cell::Number(quantity_with_status(product, &policy, ExpiryStatus::NearExpiry)),
            Cell::opt_date(earliest_expiry(product)),
            Cell::opt_date(action_deadline(product, &policy)),
            Cell::text(risk_recommendation(status)),
        ]);
    }
    spec
}
