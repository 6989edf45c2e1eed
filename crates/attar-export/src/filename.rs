//! Export filenames
//!
//! `<Report_Label>[_<context>]_<timestamp>.xlsx`, where the timestamp is the
//! ISO 8601 UTC instant with `:` and `.` replaced by `-`.

use attar_core::ReportKind;
use chrono::{DateTime, Utc};

/// `2026-10-18T09-30-00-123Z`
pub fn file_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H-%M-%S-%3fZ").to_string()
}

/// Replace every character outside `[A-Za-z0-9_-]` with `-`
pub fn sanitize_component(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '-' })
        .collect()
}

pub fn export_filename(kind: ReportKind, context: Option<&str>, at: DateTime<Utc>) -> String {
    let mut name = kind.file_label().to_string();
    if let Some(context) = context.map(sanitize_component).filter(|c| !c.is_empty()) {
        name.push('_');
        name.push_str(&context);
    }
    name.push('_');
    name.push_str(&file_timestamp(at));
    name.push_str(".xlsx");
    name
}
