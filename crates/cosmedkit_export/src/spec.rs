//! Projection models, export modes, and error types.

use std::collections::BTreeMap;
use std::fmt;

use cosmedkit_extract::EnumMeasurement;

////////////////////////////////////////////////////////////////////////////////
// #region ExportMode

/// Projection applied when turning records into a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumExportMode {
    /// Curated catalog schema, stable across batches.
    Selected,
    /// Terminal-phase value of every observed parameter.
    MaxOnly,
    /// Every observed `(parameter, phase)` pair.
    Complete,
}

impl EnumExportMode {
    /// Resolve a user-facing mode label.
    pub fn from_label(label: &str) -> Result<Self, ExportError> {
        match label.trim().to_ascii_lowercase().as_str() {
            "selected" => Ok(Self::Selected),
            "max" => Ok(Self::MaxOnly),
            "complete" => Ok(Self::Complete),
            _ => Err(ExportError::InvalidMode(label.to_string())),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Selected => "selected",
            Self::MaxOnly => "max",
            Self::Complete => "complete",
        }
    }

    /// Worksheet name used for this projection.
    pub fn sheet_name(&self) -> &'static str {
        match self {
            Self::Selected => "Selected Parameters",
            Self::MaxOnly => "Max Values Only",
            Self::Complete => "Complete Dataset",
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Catalog

/// One curated parameter: display name, expected unit, phases to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecCatalogEntry {
    pub name: String,
    /// Unit used in column titles (empty when unit-less).
    pub unit: String,
    /// Phases reported for this parameter, in presentation order.
    pub phases: Vec<String>,
}

/// Ordered curated parameter catalog driving the selected projection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecParameterCatalog {
    pub l_entries: Vec<SpecCatalogEntry>,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Table

/// Rectangular projection output.
///
/// `l_rows` entries are sparse: a column title absent from a row map means an
/// empty cell, never a zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecExportTable {
    /// Column titles, identity columns first.
    pub l_columns: Vec<String>,
    /// One sparse map per record, keyed by column title.
    pub l_rows: Vec<BTreeMap<String, EnumMeasurement>>,
}

impl SpecExportTable {
    pub fn column_count(&self) -> usize {
        self.l_columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.l_rows.len()
    }

    /// Cell lookup by row index and column title.
    pub fn cell(&self, n_idx_row: usize, column: &str) -> Option<&EnumMeasurement> {
        self.l_rows.get(n_idx_row)?.get(column)
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Export-stage failures.
#[derive(Debug)]
pub enum ExportError {
    /// Unrecognized export mode label.
    InvalidMode(String),
    /// Workbook construction or save failed.
    Workbook(String),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMode(label) => {
                write!(
                    f,
                    "Invalid export mode {label:?}; expected one of: selected, max, complete"
                )
            }
            Self::Workbook(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ExportError {}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_labels_round_trip() {
        for mode in [
            EnumExportMode::Selected,
            EnumExportMode::MaxOnly,
            EnumExportMode::Complete,
        ] {
            assert_eq!(EnumExportMode::from_label(mode.label()).unwrap(), mode);
        }
        assert_eq!(
            EnumExportMode::from_label(" MAX ").unwrap(),
            EnumExportMode::MaxOnly
        );
    }

    #[test]
    fn test_mode_unknown_label_rejected() {
        let err = EnumExportMode::from_label("summary").expect_err("must fail");
        assert!(matches!(err, ExportError::InvalidMode(_)));
        assert!(err.to_string().contains("selected, max, complete"));
    }

    #[test]
    fn test_mode_sheet_names() {
        assert_eq!(EnumExportMode::Selected.sheet_name(), "Selected Parameters");
        assert_eq!(EnumExportMode::MaxOnly.sheet_name(), "Max Values Only");
        assert_eq!(EnumExportMode::Complete.sheet_name(), "Complete Dataset");
    }
}
