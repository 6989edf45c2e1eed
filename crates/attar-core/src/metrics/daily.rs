//! Daily sales rollups
//!
//! Invoices are regrouped by product, category, hour of day and customer.
//! Money is accumulated in [`Decimal`] and converted once per group.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Timelike;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::report::daily::{Invoice, LineItem};

/// Label for invoices without a named customer
pub const WALK_IN_CUSTOMER: &str = "Walk-in Customer";

/// Line amount: the upstream total, or `quantity × price − discount` when zero
pub fn line_total(item: &LineItem) -> f64 {
    if item.total != 0.0 {
        item.total
    } else {
        super::round_to(item.quantity * item.price - item.discount, 2)
    }
}

fn dec(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

fn money(value: Decimal) -> f64 {
    value.round_dp(2).to_f64().unwrap_or(0.0)
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductRollup {
    pub name: String,
    pub sku: String,
    pub category: String,
    pub quantity: f64,
    pub revenue: f64,
    /// Invoices the product appeared on
    pub invoices: usize,
}

#[derive(Default)]
struct ProductAcc {
    sku: String,
    category: String,
    quantity: f64,
    revenue: Decimal,
    invoices: BTreeSet<usize>,
}

/// Products sold, highest revenue first
pub fn product_rollup<'a>(invoices: impl IntoIterator<Item = &'a Invoice>) -> Vec<ProductRollup> {
    let mut groups: BTreeMap<String, ProductAcc> = BTreeMap::new();
    for (index, invoice) in invoices.into_iter().enumerate() {
        for item in &invoice.items {
            let acc = groups.entry(item.product_name.clone()).or_default();
            if acc.sku.is_empty() {
                acc.sku.clone_from(&item.sku);
            }
            if acc.category.is_empty() {
                acc.category.clone_from(&item.category);
            }
            acc.quantity += item.quantity;
            acc.revenue += dec(line_total(item));
            acc.invoices.insert(index);
        }
    }
    let mut rows: Vec<ProductRollup> = groups
        .into_iter()
        .map(|(name, acc)| ProductRollup {
            name,
            sku: acc.sku,
            category: acc.category,
            quantity: acc.quantity,
            revenue: money(acc.revenue),
            invoices: acc.invoices.len(),
        })
        .collect();
    rows.sort_by(|a, b| b.revenue.total_cmp(&a.revenue).then_with(|| a.name.cmp(&b.name)));
    rows
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CategoryRollup {
    pub category: String,
    pub quantity: f64,
    pub revenue: f64,
    /// Distinct products sold in the category
    pub products: usize,
}

#[derive(Default)]
struct CategoryAcc {
    quantity: f64,
    revenue: Decimal,
    products: BTreeSet<String>,
}

/// Line items grouped by category, highest revenue first
pub fn category_rollup<'a>(invoices: impl IntoIterator<Item = &'a Invoice>) -> Vec<CategoryRollup> {
    let mut groups: BTreeMap<String, CategoryAcc> = BTreeMap::new();
    for item in invoices.into_iter().flat_map(|invoice| &invoice.items) {
        let key = if item.category.is_empty() {
            "Uncategorized".to_string()
        } else {
            item.category.clone()
        };
        let acc = groups.entry(key).or_default();
        acc.quantity += item.quantity;
        acc.revenue += dec(line_total(item));
        acc.products.insert(item.product_name.clone());
    }
    let mut rows: Vec<CategoryRollup> = groups
        .into_iter()
        .map(|(category, acc)| CategoryRollup {
            category,
            quantity: acc.quantity,
            revenue: money(acc.revenue),
            products: acc.products.len(),
        })
        .collect();
    rows.sort_by(|a, b| {
        b.revenue
            .total_cmp(&a.revenue)
            .then_with(|| a.category.cmp(&b.category))
    });
    rows
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HourlyBucket {
    /// Hour of day, 0..=23
    pub hour: u32,
    pub invoices: usize,
    pub items: f64,
    pub revenue: f64,
}

impl HourlyBucket {
    /// "09:00 - 10:00"
    pub fn label(&self) -> String {
        format!("{:02}:00 - {:02}:00", self.hour, (self.hour + 1) % 24)
    }
}

/// Invoices bucketed by hour of day; always 24 buckets. Invoices without a
/// timestamp are skipped.
pub fn hourly_rollup<'a>(invoices: impl IntoIterator<Item = &'a Invoice>) -> Vec<HourlyBucket> {
    let mut revenue = [Decimal::ZERO; 24];
    let mut buckets: Vec<HourlyBucket> = (0..24)
        .map(|hour| HourlyBucket {
            hour,
            ..HourlyBucket::default()
        })
        .collect();
    for invoice in invoices {
        let Some(created_at) = invoice.created_at else {
            continue;
        };
        let hour = created_at.hour() as usize;
        let bucket = &mut buckets[hour];
        bucket.invoices += 1;
        bucket.items += invoice.items.iter().map(|item| item.quantity).sum::<f64>();
        revenue[hour] += dec(invoice.grand_total);
    }
    for (bucket, total) in buckets.iter_mut().zip(revenue) {
        bucket.revenue = money(total);
    }
    buckets
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CustomerRollup {
    pub name: String,
    pub phone: String,
    pub invoices: usize,
    pub items: f64,
    pub total_spent: f64,
}

#[derive(Default)]
struct CustomerAcc {
    phone: String,
    invoices: usize,
    items: f64,
    spent: Decimal,
}

/// Display name of the customer on an invoice
pub fn customer_label(invoice: &Invoice) -> &str {
    let name = invoice.customer_name.trim();
    if name.is_empty() || is_walk_in_marker(name) {
        WALK_IN_CUSTOMER
    } else {
        name
    }
}

/// `walk-in`, `walkin`, `walk in`, `Walk-in Customer` and similar placeholders
fn is_walk_in_marker(name: &str) -> bool {
    let compact: String = name
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    matches!(compact.as_str(), "walkin" | "walkincustomer")
}

/// Invoices grouped by customer, biggest spender first
pub fn customer_rollup<'a>(invoices: impl IntoIterator<Item = &'a Invoice>) -> Vec<CustomerRollup> {
    let mut groups: BTreeMap<String, CustomerAcc> = BTreeMap::new();
    for invoice in invoices {
        let name = customer_label(invoice);
        let acc = groups.entry(name.to_string()).or_default();
        if acc.phone.is_empty() && name != WALK_IN_CUSTOMER {
            acc.phone.clone_from(&invoice.customer_phone);
        }
        acc.invoices += 1;
        acc.items += invoice.items.iter().map(|item| item.quantity).sum::<f64>();
        acc.spent += dec(invoice.grand_total);
    }
    let mut rows: Vec<CustomerRollup> = groups
        .into_iter()
        .map(|(name, acc)| CustomerRollup {
            name,
            phone: acc.phone,
            invoices: acc.invoices,
            items: acc.items,
            total_spent: money(acc.spent),
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total_spent
            .total_cmp(&a.total_spent)
            .then_with(|| a.name.cmp(&b.name))
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn item(name: &str, category: &str, quantity: f64, price: f64) -> LineItem {
        LineItem {
            product_name: name.into(),
            category: category.into(),
            quantity,
            price,
            ..LineItem::default()
        }
    }

    fn invoice(customer: &str, hour: Option<u32>, items: Vec<LineItem>) -> Invoice {
        let grand_total = items.iter().map(line_total).sum();
        Invoice {
            customer_name: customer.into(),
            created_at: hour.and_then(|h| {
                NaiveDate::from_ymd_opt(2026, 10, 17).and_then(|d| d.and_hms_opt(h, 15, 0))
            }),
            items,
            grand_total,
            ..Invoice::default()
        }
    }

    #[test]
    fn line_total_derives_when_zero() {
        let mut line = item("Oud", "Oud", 2.0, 150.0);
        line.discount = 20.0;
        assert_eq!(line_total(&line), 280.0);
        line.total = 300.0;
        assert_eq!(line_total(&line), 300.0);
    }

    #[test]
    fn products_merge_across_invoices() {
        let invoices = vec![
            invoice("Ayesha", Some(10), vec![item("Rose Attar", "Floral", 1.0, 100.0)]),
            invoice(
                "Imran",
                Some(11),
                vec![item("Rose Attar", "Floral", 2.0, 100.0), item("Oud Al Layl", "Oud", 1.0, 500.0)],
            ),
        ];
        let rows = product_rollup(&invoices);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Oud Al Layl");
        assert_eq!(rows[1].quantity, 3.0);
        assert_eq!(rows[1].revenue, 300.0);
        assert_eq!(rows[1].invoices, 2);

        let categories = category_rollup(&invoices);
        assert_eq!(categories[0].category, "Oud");
        assert_eq!(categories[1].products, 1);
    }

    #[test]
    fn hourly_has_24_buckets_and_skips_untimed() {
        let invoices = vec![
            invoice("A", Some(9), vec![item("Musk", "Musk", 1.0, 80.0)]),
            invoice("B", Some(9), vec![item("Musk", "Musk", 2.0, 80.0)]),
            invoice("C", None, vec![item("Musk", "Musk", 1.0, 80.0)]),
        ];
        let buckets = hourly_rollup(&invoices);
        assert_eq!(buckets.len(), 24);
        assert_eq!(buckets[9].invoices, 2);
        assert_eq!(buckets[9].revenue, 240.0);
        assert_eq!(buckets[9].label(), "09:00 - 10:00");
        assert_eq!(buckets.iter().map(|b| b.invoices).sum::<usize>(), 2);
    }

    #[test]
    fn walk_in_customers_are_grouped() {
        let invoices = vec![
            invoice("", Some(9), vec![item("Musk", "Musk", 1.0, 80.0)]),
            invoice("Walk-in", Some(10), vec![item("Musk", "Musk", 1.0, 80.0)]),
            invoice("Fatima", Some(10), vec![item("Oud", "Oud", 1.0, 900.0)]),
        ];
        let rows = customer_rollup(&invoices);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Fatima");
        assert_eq!(rows[1].name, WALK_IN_CUSTOMER);
        assert_eq!(rows[1].invoices, 2);
        assert_eq!(rows[1].total_spent, 160.0);
    }

    #[test]
    fn names_starting_with_walk_are_real_customers() {
        let mut walker = invoice("Walker Khan", Some(11), vec![item("Oud", "Oud", 1.0, 500.0)]);
        walker.customer_phone = "+971500000001".into();
        let invoices = vec![
            walker,
            invoice("  WALK IN ", Some(12), vec![item("Musk", "Musk", 1.0, 80.0)]),
            invoice("walkin", Some(12), vec![item("Musk", "Musk", 1.0, 80.0)]),
        ];
        assert_eq!(customer_label(&invoices[0]), "Walker Khan");
        assert_eq!(customer_label(&invoices[1]), WALK_IN_CUSTOMER);
        assert_eq!(customer_label(&invoices[2]), WALK_IN_CUSTOMER);

        let rows = customer_rollup(&invoices);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Walker Khan");
        assert_eq!(rows[0].phone, "+971500000001");
        assert_eq!(rows[1].invoices, 2);
    }
}
