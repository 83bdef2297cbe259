//! Record models, options, and top-level error types.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

////////////////////////////////////////////////////////////////////////////////
// #region MeasurementModel

/// Normalized measurement value read from one phase attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumMeasurement {
    /// Numeric value (attribute text parsed as a finite float).
    Number(f64),
    /// Textual value kept verbatim (e.g. pace strings like `"04:10"`).
    Text(String),
}

impl EnumMeasurement {
    /// Coerce raw attribute text: finite-float text becomes [`Self::Number`],
    /// everything else stays [`Self::Text`].
    pub fn from_raw_text(raw: &str) -> Self {
        let c_trimmed = raw.trim();
        match c_trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Self::Number(v),
            _ => Self::Text(c_trimmed.to_string()),
        }
    }

    /// Numeric view, when this measurement is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Text(_) => None,
        }
    }

    /// Textual view, when this measurement is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Text(s) => Some(s),
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region TestRecordModel

/// One normalized test record extracted from a single XML source.
///
/// `dict_values` is a sparse grid keyed by `(parameter_name, phase_name)`;
/// an absent key means "not measured", which is distinct from a measured `0`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecTestRecord {
    /// Opaque identifier of the originating source (file name).
    pub source_id: String,
    /// Subject identifier; empty when the document carries none.
    pub subject_id: String,
    /// Sparse `(parameter, phase) -> value` grid.
    pub dict_values: BTreeMap<(String, String), EnumMeasurement>,
    /// One unit string per parameter (empty when unit-less); first-seen wins.
    pub dict_units: BTreeMap<String, String>,
    /// Parameter names in document order.
    pub l_parameter_order: Vec<String>,
    /// Per-parameter phase names in document order.
    pub dict_phase_order: BTreeMap<String, Vec<String>>,
}

impl SpecTestRecord {
    /// Create an empty record bound to `source_id`/`subject_id`.
    pub fn new(source_id: &str, subject_id: &str) -> Self {
        Self {
            source_id: source_id.to_string(),
            subject_id: subject_id.to_string(),
            ..Self::default()
        }
    }

    /// Register a parameter in document order; first-seen unit wins.
    pub fn push_parameter(&mut self, name: &str, unit: &str) {
        if !self.dict_units.contains_key(name) {
            self.dict_units.insert(name.to_string(), unit.to_string());
            self.l_parameter_order.push(name.to_string());
        }
    }

    /// Record one `(parameter, phase)` value; first-seen value wins.
    pub fn push_measurement(&mut self, name: &str, phase: &str, value: EnumMeasurement) {
        let key = (name.to_string(), phase.to_string());
        if self.dict_values.contains_key(&key) {
            return;
        }
        self.dict_values.insert(key, value);
        self.dict_phase_order
            .entry(name.to_string())
            .or_default()
            .push(phase.to_string());
    }

    /// Look up the measurement for `(parameter, phase)`.
    pub fn value(&self, name: &str, phase: &str) -> Option<&EnumMeasurement> {
        self.dict_values
            .get(&(name.to_string(), phase.to_string()))
    }

    /// Unit string recorded for `parameter` (empty string when unit-less).
    pub fn unit(&self, name: &str) -> Option<&str> {
        self.dict_units.get(name).map(String::as_str)
    }

    /// Parameter names in document order.
    pub fn parameter_names(&self) -> &[String] {
        &self.l_parameter_order
    }

    /// Phase names observed for `parameter`, in document order.
    pub fn phases(&self, name: &str) -> &[String] {
        self.dict_phase_order
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of `(parameter, phase)` values present.
    pub fn value_count(&self) -> usize {
        self.dict_values.len()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Options

/// Pattern matching mode for scanner include/exclude lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumScanPatternMode {
    /// Shell-like wildcards (`*`, `?`, character classes).
    Glob,
    /// Regular expression pattern.
    Regex,
    /// Substring match.
    Literal,
}

/// Input options for [`crate::scan::scan_xml_files`].
#[derive(Debug, Clone)]
pub struct SpecScanOptions {
    /// Include patterns applied to file basename.
    pub patterns_include_files: Option<Vec<String>>,
    /// Exclude patterns applied to file basename.
    pub patterns_exclude_files: Option<Vec<String>>,
    /// Pattern interpretation mode.
    pub rule_pattern: EnumScanPatternMode,
    /// Optional maximum traversal depth (root entries are depth 1).
    pub depth_limit: Option<usize>,
}

impl Default for SpecScanOptions {
    fn default() -> Self {
        Self {
            patterns_include_files: None,
            patterns_exclude_files: None,
            rule_pattern: EnumScanPatternMode::Glob,
            depth_limit: None,
        }
    }
}

/// Input options for [`crate::batch::extract_batch`].
#[derive(Debug, Clone, Default)]
pub struct SpecBatchOptions {
    /// Maximum worker threads for the parse stage.
    pub num_workers_max: Option<usize>,
}

/// Combined options for [`crate::batch::extract_directory`].
#[derive(Debug, Clone, Default)]
pub struct SpecExtractOptions {
    /// Source discovery options.
    pub scan_options: SpecScanOptions,
    /// Batch parallelism options.
    pub batch_options: SpecBatchOptions,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// "One source document failed" errors; scoped to a single source and never
/// fatal for the surrounding batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Source bytes could not be read.
    ReadFailed {
        /// Identifier of the failed source.
        source_id: String,
        /// Underlying IO error text.
        message: String,
    },
    /// Document is not well-formed XML.
    Syntax {
        /// Identifier of the failed source.
        source_id: String,
        /// Parser error text.
        message: String,
    },
    /// Mandatory subject section is absent.
    MissingSubjectSection {
        /// Identifier of the failed source.
        source_id: String,
    },
    /// Mandatory parameter collection is absent.
    MissingParametersSection {
        /// Identifier of the failed source.
        source_id: String,
    },
}

impl ParseError {
    /// Identifier of the source this error is scoped to.
    pub fn source_id(&self) -> &str {
        match self {
            Self::ReadFailed { source_id, .. }
            | Self::Syntax { source_id, .. }
            | Self::MissingSubjectSection { source_id }
            | Self::MissingParametersSection { source_id } => source_id,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed { source_id, message } => {
                write!(f, "Failed to read source {source_id}: {message}")
            }
            Self::Syntax { source_id, message } => {
                write!(f, "Malformed XML in source {source_id}: {message}")
            }
            Self::MissingSubjectSection { source_id } => {
                write!(f, "Missing Subject section in source {source_id}")
            }
            Self::MissingParametersSection { source_id } => {
                write!(f, "Missing Parameters section in source {source_id}")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// "Top-level scan failed" errors (input validation / setup stage).
#[derive(Debug)]
pub enum ScanError {
    /// Source path is not a directory.
    SourceNotDirectory(PathBuf),
    /// Invalid include/exclude pattern.
    InvalidPattern(String),
    /// Invalid depth limit value.
    InvalidDepthLimit(String),
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceNotDirectory(path) => {
                write!(f, "Source is not a directory: {}", path.display())
            }
            Self::InvalidPattern(msg) => write!(f, "{msg}"),
            Self::InvalidDepthLimit(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ScanError {}

// #endregion
////////////////////////////////////////////////////////////////////////////////
