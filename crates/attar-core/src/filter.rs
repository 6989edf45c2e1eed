//! Filter context
//!
//! Everything the reporting screen would otherwise hold as ambient UI state
//! (selected period, date range, category, search text) travels into an
//! export as one explicit value. Exports never look anywhere else.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::report::{DateRange, ReportKind};

/// Selections that shaped the report on screen
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterContext {
    /// Reference date for expiry and stock projections
    pub as_of: NaiveDate,
    /// Named period such as "daily", "weekly", "monthly", "yearly"
    pub period: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Business day of a daily sales report
    pub date: Option<NaiveDate>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub payment_method: Option<String>,
}

impl FilterContext {
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            period: None,
            start_date: None,
            end_date: None,
            date: None,
            category: None,
            search: None,
            payment_method: None,
        }
    }

    /// Set the named period
    pub fn period(mut self, period: impl Into<String>) -> Self {
        self.period = Some(period.into());
        self
    }

    /// Set the date range
    pub fn range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Set the business day
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Restrict to one category
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Restrict to records matching a search term
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Restrict invoices to one payment method
    pub fn payment_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = Some(method.into());
        self
    }

    /// Whether a record in `category` whose searchable fields are `haystack`
    /// passes the category and search filters.
    ///
    /// Both comparisons are case-insensitive; blank filters admit everything.
    pub fn admits(&self, category: &str, haystack: &[&str]) -> bool {
        let search_ok = match non_blank(self.search.as_deref()) {
            Some(term) => {
                let term = term.to_lowercase();
                haystack.iter().any(|field| field.to_lowercase().contains(&term))
            }
            None => true,
        };
        self.admits_category(category) && search_ok
    }

    /// Whether a non-blank search term is set
    pub fn has_search(&self) -> bool {
        non_blank(self.search.as_deref()).is_some()
    }

    /// Whether `category` passes the category filter alone
    pub fn admits_category(&self, category: &str) -> bool {
        match non_blank(self.category.as_deref()) {
            Some(wanted) => wanted.eq_ignore_ascii_case(category.trim()),
            None => true,
        }
    }

    /// Whether an invoice paid with `method` passes the payment filter
    pub fn admits_payment(&self, method: &str) -> bool {
        match non_blank(self.payment_method.as_deref()) {
            Some(wanted) if !wanted.eq_ignore_ascii_case("all") => wanted.eq_ignore_ascii_case(method.trim()),
            _ => true,
        }
    }

    /// Human-readable reporting window, falling back to the backend's range
    pub fn describe_period(&self, fallback: Option<&DateRange>) -> String {
        if let Some(date) = self.date {
            return date.to_string();
        }
        let explicit = DateRange {
            start_date: self.start_date,
            end_date: self.end_date,
        };
        let range = explicit
            .describe()
            .or_else(|| fallback.and_then(DateRange::describe));
        match (non_blank(self.period.as_deref()), range) {
            (Some(period), Some(range)) => format!("{} ({range})", capitalize(period)),
            (Some(period), None) => capitalize(period),
            (None, Some(range)) => range,
            (None, None) => "All time".to_string(),
        }
    }

    /// Applied record filters as label/value pairs
    pub fn applied_filters(&self) -> Vec<(&'static str, String)> {
        let mut filters = Vec::new();
        if let Some(category) = non_blank(self.category.as_deref()) {
            filters.push(("Category", category.to_string()));
        }
        if let Some(search) = non_blank(self.search.as_deref()) {
            filters.push(("Search", search.to_string()));
        }
        if let Some(method) = non_blank(self.payment_method.as_deref()) {
            filters.push(("Payment Method", method.to_string()));
        }
        filters
    }

    /// Optional filename context for a report of `kind`
    pub fn filename_context(&self, kind: ReportKind, fallback: Option<&DateRange>) -> Option<String> {
        if kind == ReportKind::DailySales {
            return Some(self.date.unwrap_or(self.as_of).to_string());
        }
        let mut parts = Vec::new();
        if let Some(period) = non_blank(self.period.as_deref()) {
            parts.push(period.to_string());
        }
        let (start, end) = match (self.start_date, self.end_date) {
            (None, None) => fallback.map_or((None, None), |r| (r.start_date, r.end_date)),
            explicit => explicit,
        };
        if let (Some(start), Some(end)) = (start, end) {
            parts.push(format!("{start}_to_{end}"));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("_"))
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn blank_filters_admit_everything() {
        let filters = FilterContext::new(date(2026, 10, 18)).category("  ").search("");
        assert!(filters.admits("Oud", &["Oud Al Layl"]));
        assert!(filters.admits_payment("Cash"));
        assert!(!filters.has_search());
        assert!(filters.search("layl").has_search());
    }

    #[test]
    fn category_and_search_are_case_insensitive() {
        let filters = FilterContext::new(date(2026, 10, 18)).category("oud").search("layl");
        assert!(filters.admits("Oud", &["Oud Al Layl", "OUD-001"]));
        assert!(!filters.admits("Musk", &["Oud Al Layl"]));
        assert!(!filters.admits("Oud", &["Rose Attar"]));
    }

    #[test]
    fn payment_filter_treats_all_as_blank() {
        let filters = FilterContext::new(date(2026, 10, 18)).payment_method("All");
        assert!(filters.admits_payment("UPI"));
        let filters = FilterContext::new(date(2026, 10, 18)).payment_method("cash");
        assert!(filters.admits_payment("Cash"));
        assert!(!filters.admits_payment("Card"));
    }

    #[test]
    fn period_description() {
        let base = FilterContext::new(date(2026, 10, 18));
        assert_eq!(base.describe_period(None), "All time");
        assert_eq!(base.clone().period("monthly").describe_period(None), "Monthly");
        assert_eq!(
            base.clone()
                .period("monthly")
                .range(date(2026, 9, 1), date(2026, 9, 30))
                .describe_period(None),
            "Monthly (2026-09-01 to 2026-09-30)"
        );
        let backend = DateRange {
            start_date: Some(date(2026, 1, 1)),
            end_date: Some(date(2026, 1, 31)),
        };
        assert_eq!(base.describe_period(Some(&backend)), "2026-01-01 to 2026-01-31");
        assert_eq!(base.date(date(2026, 10, 17)).describe_period(None), "2026-10-17");
    }

    #[test]
    fn filename_context_per_kind() {
        let filters = FilterContext::new(date(2026, 10, 18))
            .period("monthly")
            .range(date(2026, 9, 1), date(2026, 9, 30));
        assert_eq!(
            filters.filename_context(ReportKind::Sales, None).as_deref(),
            Some("monthly_2026-09-01_to_2026-09-30")
        );
        assert_eq!(
            filters.filename_context(ReportKind::DailySales, None).as_deref(),
            Some("2026-10-18")
        );
        assert_eq!(
            FilterContext::new(date(2026, 10, 18)).filename_context(ReportKind::Inventory, None),
            None
        );
    }

    #[test]
    fn applied_filters_skip_blanks() {
        let filters = FilterContext::new(date(2026, 10, 18)).category("Musk").search(" ");
        assert_eq!(filters.applied_filters(), vec![("Category", "Musk".to_string())]);
    }
}
