//! CSV report sink

use crate::output::traits::{BrokenLink, OutputError, OutputResult, ReportSink};
use std::path::{Path, PathBuf};

/// Column headers of the broken-link report
pub const REPORT_COLUMNS: [&str; 3] = ["Origin Webpage", "Status Code / Error", "URL"];

/// Writes broken links to a CSV file with a header row and no index column
#[derive(Debug, Clone)]
pub struct CsvReport {
    path: PathBuf,
}

impl CsvReport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn csv_error(&self, source: csv::Error) -> OutputError {
        OutputError::Csv {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl ReportSink for CsvReport {
    fn write_report(&self, records: &[BrokenLink]) -> OutputResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut writer = csv::Writer::from_path(&self.path).map_err(|e| self.csv_error(e))?;

        writer
            .write_record(REPORT_COLUMNS)
            .map_err(|e| self.csv_error(e))?;

        for record in records {
            let breakage = record.breakage.to_string();
            writer
                .write_record([record.origin.as_str(), breakage.as_str(), record.url.as_str()])
                .map_err(|e| self.csv_error(e))?;
        }

        writer.flush()?;

        tracing::info!(
            "Wrote {} broken links to {}",
            records.len(),
            self.path.display()
        );

        Ok(())
    }
}
