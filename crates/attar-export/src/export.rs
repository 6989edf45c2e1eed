//! Export orchestration
//!
//! An [`Exporter`] runs one report through validate, build, assemble and
//! save. Exactly one notification is emitted per call and the sink is
//! invoked at most once.

use std::path::PathBuf;

use attar_core::{
    CategoryReport, DailySalesReport, DateRange, ExportConfig, FilterContext, InventoryReport,
    PurchaseReport, ReportKind, ReportPayload, Result, SalesReport, TrendingReport,
};
use serde::Serialize;

use crate::assembler::WorkbookAssembler;
use crate::builders::{self, category, daily, inventory, purchase, sales, trending, BuildContext};
use crate::clock::{Clock, SystemClock};
use crate::filename::export_filename;
use crate::notify::{Notification, Notifier};
use crate::sheet::SheetSpec;
use crate::sink::WorkbookSink;

/// Shape of one written sheet
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SheetSummary {
    pub name: String,
    pub headers: Vec<String>,
    /// Rows below the header, separators and section titles included
    pub rows: usize,
}

/// What a successful export produced
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExportReceipt {
    pub kind: ReportKind,
    pub filename: String,
    /// Where the sink put the workbook
    pub path: PathBuf,
    pub sheets: Vec<SheetSummary>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportOutcome {
    Exported(ExportReceipt),
    /// Nothing survived the filters; the sink was not called
    NothingToExport,
    /// Building, assembling or saving failed with this reason
    Failed(String),
}

impl ExportOutcome {
    pub fn is_exported(&self) -> bool {
        matches!(self, ExportOutcome::Exported(_))
    }

    pub fn receipt(&self) -> Option<&ExportReceipt> {
        match self {
            ExportOutcome::Exported(receipt) => Some(receipt),
            _ => None,
        }
    }
}

/// Report exporter over a save, notification and clock collaborator
#[derive(Debug)]
pub struct Exporter<S, N, C = SystemClock> {
    sink: S,
    notifier: N,
    clock: C,
    config: ExportConfig,
    assembler: WorkbookAssembler,
}

impl<S: WorkbookSink, N: Notifier> Exporter<S, N, SystemClock> {
    /// Exporter using the system clock and default configuration
    pub fn new(sink: S, notifier: N) -> Self {
        Self::with_clock(sink, notifier, SystemClock::new())
    }
}

impl<S: WorkbookSink, N: Notifier, C: Clock> Exporter<S, N, C> {
    pub fn with_clock(sink: S, notifier: N, clock: C) -> Self {
        let config = ExportConfig::default();
        Self {
            sink,
            notifier,
            clock,
            assembler: WorkbookAssembler::from_config(&config),
            config,
        }
    }

    /// Replace the export configuration
    pub fn config(mut self, config: ExportConfig) -> Self {
        self.assembler = WorkbookAssembler::from_config(&config);
        self.config = config;
        self
    }

    /// Leave header rows scrollable in written workbooks
    pub fn no_freeze(mut self) -> Self {
        self.assembler = self.assembler.no_freeze();
        self
    }

    pub fn export_config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Export any report
    pub fn export(&self, payload: &ReportPayload, filters: &FilterContext) -> ExportOutcome {
        match payload {
            ReportPayload::Inventory(report) => self.export_inventory(report, filters),
            ReportPayload::Sales(report) => self.export_sales(report, filters),
            ReportPayload::Purchase(report) => self.export_purchase(report, filters),
            ReportPayload::Category(report) => self.export_category(report, filters),
            ReportPayload::Trending(report) => self.export_trending(report, filters),
            ReportPayload::DailySales(report) => self.export_daily_sales(report, filters),
        }
    }

    pub fn export_inventory(&self, report: &InventoryReport, filters: &FilterContext) -> ExportOutcome {
        self.run(
            ReportKind::Inventory,
            report.date_range.as_ref(),
            inventory::admitted(report, filters).len(),
            filters,
            |ctx| inventory::build(report, ctx),
        )
    }

    pub fn export_sales(&self, report: &SalesReport, filters: &FilterContext) -> ExportOutcome {
        self.run(
            ReportKind::Sales,
            report.date_range.as_ref(),
            sales::admitted(report, filters).len(),
            filters,
            |ctx| sales::build(report, ctx),
        )
    }

    pub fn export_purchase(&self, report: &PurchaseReport, filters: &FilterContext) -> ExportOutcome {
        self.run(
            ReportKind::Purchase,
            report.date_range.as_ref(),
            purchase::admitted(report, filters).len(),
            filters,
            |ctx| purchase::build(report, ctx),
        )
    }

    pub fn export_category(&self, report: &CategoryReport, filters: &FilterContext) -> ExportOutcome {
        self.run(
            ReportKind::Category,
            report.date_range.as_ref(),
            category::admitted(report, filters).len(),
            filters,
            |ctx| category::build(report, ctx),
        )
    }

    pub fn export_trending(&self, report: &TrendingReport, filters: &FilterContext) -> ExportOutcome {
        self.run(
            ReportKind::Trending,
            report.date_range.as_ref(),
            trending::admitted(report, filters).len(),
            filters,
            |ctx| trending::build(report, ctx),
        )
    }

    pub fn export_daily_sales(&self, report: &DailySalesReport, filters: &FilterContext) -> ExportOutcome {
        self.run(
            ReportKind::DailySales,
            report.date_range.as_ref(),
            daily::admitted(report, filters).len(),
            filters,
            |ctx| daily::build(report, ctx),
        )
    }

    /// Build the sheets of a report without assembling or saving anything
    pub fn preview(&self, payload: &ReportPayload, filters: &FilterContext) -> Vec<SheetSpec> {
        let ctx = BuildContext::new(filters, &self.config, self.clock.now());
        builders::build_sheets(payload, &ctx)
    }

    fn run(
        &self,
        kind: ReportKind,
        date_range: Option<&DateRange>,
        admitted: usize,
        filters: &FilterContext,
        build: impl FnOnce(&BuildContext<'_>) -> Vec<SheetSpec>,
    ) -> ExportOutcome {
        let noun = kind.noun();
        if admitted == 0 {
            tracing::warn!(report = %kind, "nothing to export");
            self.notifier
                .notify(Notification::warning(format!("No {noun} data available to export")));
            return ExportOutcome::NothingToExport;
        }

        let generated_at = self.clock.now();
        let ctx = BuildContext::new(filters, &self.config, generated_at);
        let specs = build(&ctx);
        tracing::debug!(report = %kind, records = admitted, sheets = specs.len(), "sheets built");

        let context = filters.filename_context(kind, date_range);
        let filename = export_filename(kind, context.as_deref(), generated_at);

        match self.write(&specs, &filename) {
            Ok((path, names)) => {
                tracing::info!(report = %kind, path = %path.display(), "report exported");
                self.notifier.notify(Notification::success(format!(
                    "{} exported as {filename}",
                    kind.title()
                )));
                ExportOutcome::Exported(ExportReceipt {
                    kind,
                    filename,
                    path,
                    sheets: summarize(&specs, names),
                })
            }
            Err(err) => {
                tracing::error!(report = %kind, error = %err, "export failed");
                self.notifier
                    .notify(Notification::error(format!("Failed to export {noun} report")));
                ExportOutcome::Failed(err.to_string())
            }
        }
    }

    fn write(&self, specs: &[SheetSpec], filename: &str) -> Result<(PathBuf, Vec<String>)> {
        let mut assembled = self.assembler.assemble(specs)?;
        let path = self.sink.save(&mut assembled.workbook, filename)?;
        Ok((path, assembled.sheet_names))
    }
}

fn summarize(specs: &[SheetSpec], names: Vec<String>) -> Vec<SheetSummary> {
    specs
        .iter()
        .zip(names)
        .map(|(spec, name)| SheetSummary {
            name,
            headers: spec.sheet.headers(),
            rows: spec.sheet.data_rows().len(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::notify::{NotificationLevel, RecordingNotifier};
    use crate::sink::MemorySink;
    use attar_core::{CategoryStat, InventoryProduct, PurchaseRecord};
    use chrono::{NaiveDate, TimeZone, Utc};

    fn filters() -> FilterContext {
        FilterContext::new(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap())
    }

    fn exporter() -> Exporter<MemorySink, RecordingNotifier, FixedClock> {
        Exporter::with_clock(
            MemorySink::new(),
            RecordingNotifier::new(),
            FixedClock(Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap()),
        )
    }

    #[test]
    fn empty_report_skips_the_sink() {
        let exporter = exporter();
        let outcome = exporter.export_purchase(&PurchaseReport::default(), &filters());

        assert_eq!(outcome, ExportOutcome::NothingToExport);
        assert_eq!(exporter.sink().calls(), 0);
        let warnings = exporter.notifier().of_level(NotificationLevel::Warning);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].message, "No purchase data available to export");
        assert_eq!(exporter.notifier().notifications().len(), 1);
    }

    #[test]
    fn filtered_out_records_count_as_empty() {
        let exporter = exporter();
        let report = CategoryReport {
            categories: vec![CategoryStat {
                name: "Oud".into(),
                ..CategoryStat::default()
            }],
            ..CategoryReport::default()
        };
        let outcome = exporter.export_category(&report, &filters().category("Musk"));
        assert_eq!(outcome, ExportOutcome::NothingToExport);
    }

    #[test]
    fn successful_export_saves_once() {
        let exporter = exporter();
        let report = PurchaseReport {
            recent_purchases: vec![PurchaseRecord {
                purchase_number: "PO-1".into(),
                total_amount: 250.0,
                ..PurchaseRecord::default()
            }],
            ..PurchaseReport::default()
        };
        let outcome = exporter.export_purchase(&report, &filters().period("monthly"));

        let receipt = outcome.receipt().unwrap();
        assert_eq!(receipt.filename, "Purchase_Report_monthly_2026-10-18T09-30-00-000Z.xlsx");
        assert_eq!(
            receipt.sheets.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
            purchase::SHEETS
        );
        assert_eq!(exporter.sink().calls(), 1);
        assert_eq!(exporter.notifier().of_level(NotificationLevel::Success).len(), 1);
    }

    #[test]
    fn sink_failure_is_reported() {
        let exporter = Exporter::with_clock(
            MemorySink::failing("disk full"),
            RecordingNotifier::new(),
            FixedClock(Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap()),
        );
        let report = PurchaseReport {
            recent_purchases: vec![PurchaseRecord::default()],
            ..PurchaseReport::default()
        };
        let outcome = exporter.export_purchase(&report, &filters());

        assert!(matches!(&outcome, ExportOutcome::Failed(reason) if reason.contains("disk full")));
        let errors = exporter.notifier().of_level(NotificationLevel::Error);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Failed to export purchase report");
        assert_eq!(exporter.notifier().notifications().len(), 1);
    }

    #[test]
    fn oversized_priority_window_still_exports() {
        let exporter = exporter().config(ExportConfig::default().high_priority_days(1_000_000_000_000));
        let report = InventoryReport {
            inventory: vec![InventoryProduct {
                name: "Musk Tahara".into(),
                status: "Low Stock".into(),
                total_quantity: 3.0,
                price: 80.0,
                ..InventoryProduct::default()
            }],
            ..InventoryReport::default()
        };
        let outcome = exporter.export_inventory(&report, &filters());
        assert!(outcome.is_exported());

        let specs = exporter.preview(&ReportPayload::Inventory(report), &filters());
        let risk = &specs[4];
        let deadline = risk.sheet.column("Action Deadline").unwrap();
        let row = risk.sheet.rows.last().unwrap();
        assert_eq!(row[0], crate::sheet::Cell::text("Musk Tahara"));
        assert_eq!(row[deadline], crate::sheet::Cell::Empty);
    }
}
