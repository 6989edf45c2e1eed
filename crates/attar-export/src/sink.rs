//! Save collaborators
//!
//! A [`WorkbookSink`] receives the assembled workbook exactly once per
//! export together with the generated filename.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use attar_core::{ExportError, Result};
use rust_xlsxwriter::Workbook;

/// Persists (or hands off) a finished workbook
pub trait WorkbookSink {
    /// Save `workbook` under `filename`, returning where it went
    fn save(&self, workbook: &mut Workbook, filename: &str) -> Result<PathBuf>;
}

fn to_bytes(workbook: &mut Workbook) -> Result<Vec<u8>> {
    workbook
        .save_to_buffer()
        .map_err(|e| ExportError::Format(format!("Failed to create Excel: {e}")))
}

// ============================================================================
// Directory Sink
// ============================================================================

/// Writes workbooks into a directory.
///
/// Bytes go to a temporary file in the target directory which is renamed
/// into place, so a failed save never leaves a partial `.xlsx` behind.
#[derive(Clone, Debug)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl WorkbookSink for DirectorySink {
    fn save(&self, workbook: &mut Workbook, filename: &str) -> Result<PathBuf> {
        if filename.contains(&['/', '\\'][..]) {
            return Err(ExportError::InvalidData(format!(
                "filename '{filename}' must not contain path separators"
            )));
        }
        let bytes = to_bytes(workbook)?;
        std::fs::create_dir_all(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = tempfile::Builder::new()
            .prefix(".attar-")
            .suffix(".xlsx.part")
            .tempfile_in(&self.dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&target).map_err(|e| ExportError::Io(e.error))?;
        Ok(target)
    }
}

// ============================================================================
// Memory Sink
// ============================================================================

/// A workbook captured by [`MemorySink`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedWorkbook {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Keeps saved workbooks in memory; optionally fails every save
#[derive(Debug, Default)]
pub struct MemorySink {
    saved: Mutex<Vec<SavedWorkbook>>,
    calls: Mutex<usize>,
    failure: Option<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose every save fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Number of `save` calls, failed ones included
    pub fn calls(&self) -> usize {
        self.calls.lock().map(|calls| *calls).unwrap_or(0)
    }

    pub fn saved(&self) -> Vec<SavedWorkbook> {
        self.saved.lock().map(|saved| saved.clone()).unwrap_or_default()
    }

    pub fn filenames(&self) -> Vec<String> {
        self.saved().into_iter().map(|s| s.filename).collect()
    }
}

impl WorkbookSink for MemorySink {
    fn save(&self, workbook: &mut Workbook, filename: &str) -> Result<PathBuf> {
        if let Ok(mut calls) = self.calls.lock() {
            *calls += 1;
        }
        if let Some(message) = &self.failure {
            return Err(ExportError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                message.clone(),
            )));
        }
        let bytes = to_bytes(workbook)?;
        self.saved
            .lock()
            .map_err(|_| ExportError::InvalidData("memory sink poisoned".into()))?
            .push(SavedWorkbook {
                filename: filename.to_string(),
                bytes,
            });
        Ok(PathBuf::from(filename))
    }
}

impl<S: WorkbookSink + ?Sized> WorkbookSink for &S {
    fn save(&self, workbook: &mut Workbook, filename: &str) -> Result<PathBuf> {
        (**self).save(workbook, filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workbook() -> Workbook {
        let mut workbook = Workbook::new();
        workbook.add_worksheet().write_string(0, 0, "Metric").unwrap();
        workbook
    }

    #[test]
    fn directory_sink_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path().join("exports"));
        let path = sink.save(&mut workbook(), "Sales_Report_x.xlsx").unwrap();

        assert_eq!(path, dir.path().join("exports").join("Sales_Report_x.xlsx"));
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"));

        let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("exports"))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".part"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn directory_sink_rejects_separators() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path());
        assert!(sink.save(&mut workbook(), "../escape.xlsx").is_err());
    }

    #[test]
    fn memory_sink_counts_calls() {
        let sink = MemorySink::new();
        sink.save(&mut workbook(), "a.xlsx").unwrap();
        assert_eq!(sink.calls(), 1);
        assert_eq!(sink.filenames(), vec!["a.xlsx".to_string()]);

        let failing = MemorySink::failing("disk full");
        assert!(failing.save(&mut workbook(), "b.xlsx").is_err());
        assert_eq!(failing.calls(), 1);
        assert!(failing.saved().is_empty());
    }
}
