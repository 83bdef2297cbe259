//! `cosmedkit_export` v1:
//! Projection and XLSX export kernel for CPET test records.
//!
//! Architecture:
//! - `conf`    : constants and default presets
//! - `spec`    : modes/models/errors
//! - `project` : mode-specific table projection
//! - `util`    : pure helper functions
//! - `writer`  : workbook writer kernel

pub mod conf;
pub mod project;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    C_COL_SOURCE, C_COL_SUBJECT, C_PHASE_TERMINAL, N_LEN_EXCEL_SHEET_NAME_MAX, TUP_EXCEL_ILLEGAL,
    TUP_PHASES_CANONICAL, derive_default_parameter_catalog,
};
pub use project::project_table;
pub use spec::{
    EnumExportMode, ExportError, SpecCatalogEntry, SpecExportTable, SpecParameterCatalog,
};
pub use util::{derive_column_title, order_phases_canonical, sanitize_sheet_name};
pub use writer::{XlsxTableWriter, export_workbook};
