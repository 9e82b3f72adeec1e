//! Report export.
//!
//! A [`ReportSink`] accepts finished reports. The bundled [`OutboxSink`]
//! appends them to a JSON-lines file; histories are cleared only once a
//! sink has accepted the report.

use crate::session::FormSession;
use crate::summary::build_payload;
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

/// One exported report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    /// Destination table.
    pub table: String,
    pub submitted_at: DateTime<Local>,
    /// Normalized key → value pairs from the review table.
    pub data: Map<String, Value>,
}

/// Destination for finished reports.
pub trait ReportSink {
    /// Store the record. An `Err` means the report was not accepted.
    fn submit(&mut self, record: &ExportRecord) -> Result<()>;
}

/// Appends records as JSON lines.
#[derive(Debug, Clone)]
pub struct OutboxSink {
    path: PathBuf,
}

impl OutboxSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl ReportSink for OutboxSink {
    fn submit(&mut self, record: &ExportRecord) -> Result<()> {
        let line = serde_json::to_string(record).context("Failed to serialize report")?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open outbox: {}", self.path.display()))?;
        writeln!(file, "{}", line)
            .with_context(|| format!("Failed to write outbox: {}", self.path.display()))?;

        Ok(())
    }
}

/// Export the current report and clear the selection histories.
///
/// Empty reports are refused. On a sink error the histories are kept so
/// the report can be sent again.
pub fn submit_report(
    session: &mut FormSession,
    sink: &mut dyn ReportSink,
    table: &str,
) -> Result<ExportRecord> {
    let rows = session.snapshot();
    if rows.is_empty() {
        bail!("Nothing to export: the report is empty");
    }

    let record = ExportRecord {
        table: table.to_string(),
        submitted_at: Local::now(),
        data: build_payload(&rows),
    };

    match sink.submit(&record) {
        Ok(()) => {
            info!("Report exported to table {} ({} fields)", table, record.data.len());
            session.reset_histories();
            Ok(record)
        }
        Err(e) => {
            warn!("Report export failed: {}", e);
            Err(e)
        }
    }
}
