//! Batch extraction report model and builder.

use std::collections::BTreeMap;
use std::fmt;

use crate::spec::{ParseError, SpecTestRecord};

////////////////////////////////////////////////////////////////////////////////
// #region Report

/// Outcome of one batch extraction run.
///
/// Records are kept in scan order; per-source failures are collected as
/// [`ParseError`] entries instead of aborting the batch.
#[derive(Debug, Clone, Default)]
pub struct ReportExtract {
    /// Successfully extracted records, in scan order.
    pub l_records: Vec<SpecTestRecord>,
    /// Number of sources handed to the parse stage.
    pub cnt_scanned: u64,
    /// Number of sources extracted successfully.
    pub cnt_extracted: u64,
    /// Number of sources that failed to extract.
    pub cnt_failed: u64,
    /// Non-fatal warnings raised during the run.
    pub warnings: Vec<String>,
    /// Per-source failures, in scan order.
    pub errors: Vec<ParseError>,
}

impl ReportExtract {
    pub fn record_count(&self) -> usize {
        self.l_records.len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Counters view, for callers that log or serialize the outcome.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        BTreeMap::from([
            ("cnt_scanned".to_string(), self.cnt_scanned),
            ("cnt_extracted".to_string(), self.cnt_extracted),
            ("cnt_failed".to_string(), self.cnt_failed),
            ("cnt_errors".to_string(), self.errors.len() as u64),
            ("cnt_warnings".to_string(), self.warnings.len() as u64),
        ])
    }

    /// One-line summary with a caller-chosen prefix.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{} scanned={} extracted={} failed={} errors={} warnings={}",
            prefix,
            self.cnt_scanned,
            self.cnt_extracted,
            self.cnt_failed,
            self.errors.len(),
            self.warnings.len(),
        )
    }
}

impl fmt::Display for ReportExtract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[EXTRACT]"))
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Builder

/// Incremental builder used by the batch driver.
#[derive(Debug, Clone, Default)]
pub struct ReportExtractBuilder {
    report: ReportExtract,
}

impl ReportExtractBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_scanned(&mut self) {
        self.report.cnt_scanned += 1;
    }

    pub fn push_record(&mut self, record: SpecTestRecord) {
        self.report.cnt_extracted += 1;
        self.report.l_records.push(record);
    }

    pub fn add_failed(&mut self, error: ParseError) {
        self.report.cnt_failed += 1;
        self.report.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: String) {
        self.report.warnings.push(warning);
    }

    pub fn build(self) -> ReportExtract {
        self.report
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
