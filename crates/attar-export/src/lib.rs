//! # attar-export
//!
//! Spreadsheet export engine for attar-reports.
//!
//! This crate provides:
//! - Sheet builders: one per report type, producing typed [`SheetSpec`]s
//! - The workbook assembler (XLSX via `rust_xlsxwriter`)
//! - Export orchestration with pluggable save, notification and clock
//!   collaborators
//! - Timestamped export filenames
//!
//! ## Example
//!
//! ```rust
//! use attar_core::{FilterContext, ReportKind, ReportPayload};
//! use attar_export::{Exporter, MemorySink, RecordingNotifier};
//! use chrono::NaiveDate;
//!
//! let payload = ReportPayload::from_json(
//!     ReportKind::Category,
//!     r#"{"categories": [{"name": "Oud", "totalProducts": 4, "totalSales": 1200}]}"#,
//! )
//! .unwrap();
//! let filters = FilterContext::new(NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());
//!
//! let exporter = Exporter::new(MemorySink::new(), RecordingNotifier::new());
//! let outcome = exporter.export(&payload, &filters);
//!
//! let receipt = outcome.receipt().unwrap();
//! assert!(receipt.filename.starts_with("Category_Report_"));
//! assert_eq!(receipt.sheets[0].name, "Executive Summary");
//! assert_eq!(exporter.sink().calls(), 1);
//! ```

pub mod assembler;
pub mod builders;
pub mod clock;
pub mod export;
pub mod filename;
pub mod notify;
pub mod sheet;
pub mod sink;

pub use assembler::{AssembledWorkbook, RowStyle, StyleDirective, WorkbookAssembler};
pub use builders::{sheet_names, BuildContext};
pub use clock::{Clock, FixedClock, SystemClock};
pub use export::{ExportOutcome, ExportReceipt, Exporter, SheetSummary};
pub use filename::export_filename;
pub use notify::{Notification, NotificationLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use sheet::{Cell, Sheet, SheetSpec, NOT_AVAILABLE};
pub use sink::{DirectorySink, MemorySink, SavedWorkbook, WorkbookSink};
