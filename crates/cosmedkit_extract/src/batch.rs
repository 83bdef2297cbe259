//! Batch extraction driver: per-file parse, optional parallel stage.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::parse::parse_record;
use crate::report::{ReportExtract, ReportExtractBuilder};
use crate::scan::scan_xml_files;
use crate::spec::{ParseError, ScanError, SpecBatchOptions, SpecExtractOptions, SpecTestRecord};

////////////////////////////////////////////////////////////////////////////////
// #region Workers

/// Resolve the worker count for the parse stage.
///
/// `None` defaults to the machine parallelism capped at 8; an explicit
/// request is clamped to `1..=n_cpu`.
pub fn calculate_worker_limit(num_workers_max: Option<usize>) -> usize {
    let n_cpu = std::thread::available_parallelism()
        .map(usize::from)
        .unwrap_or(1);
    match num_workers_max {
        Some(n) => n.clamp(1, n_cpu),
        None => n_cpu.clamp(1, 8),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Extraction

/// Identifier a record carries for its originating path (file basename).
pub fn derive_source_id(path_file: &Path) -> String {
    path_file
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path_file.to_string_lossy().to_string())
}

/// Read and parse one XML file into a record.
pub fn extract_path(path_file: &Path) -> Result<SpecTestRecord, ParseError> {
    let c_source_id = derive_source_id(path_file);
    let xml_text = fs::read_to_string(path_file).map_err(|e| ParseError::ReadFailed {
        source_id: c_source_id.clone(),
        message: e.to_string(),
    })?;
    parse_record(&c_source_id, &xml_text)
}

fn _extract_serial(l_paths: &[PathBuf]) -> Vec<Result<SpecTestRecord, ParseError>> {
    l_paths.iter().map(|path| extract_path(path)).collect()
}

/// Extract a batch of XML files, preserving input order in the report.
///
/// Files are parsed in parallel when more than one worker is resolved;
/// failures are recorded per source and never abort the batch.
pub fn extract_batch(l_paths: &[PathBuf], options: &SpecBatchOptions) -> ReportExtract {
    let n_workers = calculate_worker_limit(options.num_workers_max);
    let mut builder = ReportExtractBuilder::new();

    let l_results = if n_workers <= 1 || l_paths.len() <= 1 {
        _extract_serial(l_paths)
    } else {
        match rayon::ThreadPoolBuilder::new().num_threads(n_workers).build() {
            Ok(pool) => pool.install(|| {
                l_paths
                    .par_iter()
                    .map(|path| extract_path(path))
                    .collect::<Vec<_>>()
            }),
            Err(_) => {
                builder.add_warning(format!(
                    "Failed to initialize thread pool (workers={n_workers}); \
                     fallback to serial extraction."
                ));
                _extract_serial(l_paths)
            }
        }
    };

    for result in l_results {
        builder.add_scanned();
        match result {
            Ok(record) => builder.push_record(record),
            Err(error) => builder.add_failed(error),
        }
    }
    builder.build()
}

/// Scan a directory for XML files and extract them in one call.
pub fn extract_directory<P>(
    dir_source: P,
    options: &SpecExtractOptions,
) -> Result<ReportExtract, ScanError>
where
    P: AsRef<Path>,
{
    let l_paths = scan_xml_files(dir_source, &options.scan_options)?;
    Ok(extract_batch(&l_paths, &options.batch_options))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
