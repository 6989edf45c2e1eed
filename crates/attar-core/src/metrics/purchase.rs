//! Purchase metrics

use crate::PurchaseRecord;

use super::round_to;

/// Amount of one purchase; a missing `totalAmount` is derived from
/// `quantity × unitCost`
pub fn purchase_total(purchase: &PurchaseRecord) -> f64 {
    if purchase.total_amount != 0.0 {
        purchase.total_amount
    } else {
        round_to(purchase.quantity * purchase.unit_cost, 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reported_total_wins() {
        let purchase = PurchaseRecord {
            quantity: 5.0,
            unit_cost: 100.0,
            total_amount: 450.0,
            ..PurchaseRecord::default()
        };
        assert_eq!(purchase_total(&purchase), 450.0);
    }

    #[test]
    fn missing_total_is_derived() {
        let purchase = PurchaseRecord {
            quantity: 5.0,
            unit_cost: 100.0,
            ..PurchaseRecord::default()
        };
        assert_eq!(purchase_total(&purchase), 500.0);
        assert_eq!(purchase_total(&PurchaseRecord::default()), 0.0);
    }
}
