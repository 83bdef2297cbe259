//! `cosmedkit_extract` v1:
//! CPET XML extraction engine.
//!
//! Architecture:
//! - `conf`   : XML tag/attribute constants
//! - `spec`   : record models/options/errors
//! - `parse`  : single-document parsing
//! - `scan`   : XML source discovery
//! - `batch`  : batch driver with optional parallel parse stage
//! - `report` : run-time report model

pub mod batch;
pub mod conf;
pub mod parse;
pub mod report;
pub mod scan;
pub mod spec;

pub use batch::{
    calculate_worker_limit, derive_source_id, extract_batch, extract_directory, extract_path,
};
pub use parse::{normalize_unit, parse_record};
pub use report::{ReportExtract, ReportExtractBuilder};
pub use scan::scan_xml_files;
pub use spec::{
    EnumMeasurement, EnumScanPatternMode, ParseError, ScanError, SpecBatchOptions,
    SpecExtractOptions, SpecScanOptions, SpecTestRecord,
};
