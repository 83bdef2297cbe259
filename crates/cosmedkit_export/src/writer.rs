//! Workbook writer kernel that renders projection tables into XLSX output.

use std::collections::BTreeSet;
use std::path::PathBuf;

use cosmedkit_extract::{EnumMeasurement, SpecTestRecord};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};

use crate::conf::{
    N_LEN_EXCEL_SHEET_NAME_MAX, N_WIDTH_CELL_MAX, N_WIDTH_CELL_MIN, N_WIDTH_CELL_PADDING,
};
use crate::project::project_table;
use crate::spec::{EnumExportMode, ExportError, SpecExportTable, SpecParameterCatalog};
use crate::util::{estimate_width_len, sanitize_sheet_name};

/// Header fill color (solid blue, white bold text).
const C_COLOR_HEADER_FILL: &str = "#366092";
/// Default summary sheet name.
const C_SHEET_SUMMARY: &str = "Summary";

/// Stateful workbook writer.
///
/// Sheets are buffered in memory until [`Self::close`] flushes the workbook
/// to disk. Sheet names are de-duplicated across calls.
pub struct XlsxTableWriter {
    path_file_out: PathBuf,
    workbook: Workbook,
    fmt_header: Format,
    fmt_body: Format,
    set_sheet_names_existing: BTreeSet<String>,
    if_closed: bool,
}

impl XlsxTableWriter {
    /// Create a writer bound to `path_file_out`.
    pub fn new(path_file_out: PathBuf) -> Self {
        Self {
            path_file_out,
            workbook: Workbook::new(),
            fmt_header: derive_format_header(),
            fmt_body: derive_format_body(),
            set_sheet_names_existing: BTreeSet::new(),
            if_closed: false,
        }
    }

    /// Return output file path as string.
    pub fn file_out(&self) -> String {
        self.path_file_out.to_string_lossy().to_string()
    }

    /// Flush workbook to disk. Idempotent.
    pub fn close(&mut self) -> Result<(), String> {
        if self.if_closed {
            return Ok(());
        }
        self.workbook
            .save(&self.path_file_out)
            .map_err(derive_xlsx_error_text)?;
        self.if_closed = true;
        Ok(())
    }

    /// Write one projection table as a worksheet.
    pub fn write_table(
        &mut self,
        table: &SpecExportTable,
        sheet_name: &str,
    ) -> Result<(), String> {
        if self.if_closed {
            return Err("Cannot write after close().".to_string());
        }

        let sheet_name_unique =
            self.derive_unique_sheet_name(&sanitize_sheet_name(sheet_name, "_"));
        let fmt_header = self.fmt_header.clone();
        let fmt_body = self.fmt_body.clone();
        let worksheet = self.workbook.add_worksheet();
        worksheet
            .set_name(&sheet_name_unique)
            .map_err(derive_xlsx_error_text)?;

        let mut l_width_by_col: Vec<usize> = table
            .l_columns
            .iter()
            .map(|title| title.chars().count())
            .collect();

        for (n_idx_col, c_title) in table.l_columns.iter().enumerate() {
            worksheet
                .write_string_with_format(0, cast_col_num(n_idx_col)?, c_title, &fmt_header)
                .map_err(derive_xlsx_error_text)?;
        }
        worksheet
            .set_freeze_panes(1, 0)
            .map_err(derive_xlsx_error_text)?;

        for (n_idx_row, row) in table.l_rows.iter().enumerate() {
            for (n_idx_col, c_title) in table.l_columns.iter().enumerate() {
                let n_row = cast_row_num(n_idx_row + 1)?;
                let n_col = cast_col_num(n_idx_col)?;
                match row.get(c_title) {
                    None => {
                        worksheet
                            .write_blank(n_row, n_col, &fmt_body)
                            .map_err(derive_xlsx_error_text)?;
                    }
                    Some(value) => {
                        write_cell_with_format(worksheet, n_row, n_col, value, &fmt_body)?;
                        l_width_by_col[n_idx_col] =
                            usize::max(l_width_by_col[n_idx_col], estimate_width_len(value));
                    }
                }
            }
        }

        for (n_idx_col, n_width_recorded) in l_width_by_col.iter().enumerate() {
            let n_width_final = usize::min(
                N_WIDTH_CELL_MAX,
                usize::max(N_WIDTH_CELL_MIN, n_width_recorded + N_WIDTH_CELL_PADDING),
            );
            worksheet
                .set_column_width(cast_col_num(n_idx_col)?, n_width_final as f64)
                .map_err(derive_xlsx_error_text)?;
        }

        Ok(())
    }

    /// Write a processing-statistics worksheet for the batch.
    pub fn write_summary(&mut self, l_records: &[SpecTestRecord]) -> Result<(), String> {
        if self.if_closed {
            return Err("Cannot write after close().".to_string());
        }

        let n_files = l_records.len();
        let n_with_subject = l_records
            .iter()
            .filter(|r| !r.subject_id.is_empty())
            .count();
        let n_parameters_total: usize = l_records
            .iter()
            .map(|r| r.parameter_names().len())
            .sum();
        let set_names_unique: BTreeSet<&str> = l_records
            .iter()
            .flat_map(|r| r.parameter_names().iter().map(String::as_str))
            .collect();

        let sheet_name_unique = self.derive_unique_sheet_name(C_SHEET_SUMMARY);
        let fmt_header = self.fmt_header.clone();
        let fmt_body = self.fmt_body.clone();
        let worksheet = self.workbook.add_worksheet();
        worksheet
            .set_name(&sheet_name_unique)
            .map_err(derive_xlsx_error_text)?;

        let l_stat_rows: Vec<(&str, Option<usize>)> = vec![
            ("Processing Summary", None),
            ("Total Files Processed", Some(n_files)),
            ("Files with Subject ID", Some(n_with_subject)),
            ("Total Parameters Extracted", Some(n_parameters_total)),
            ("Unique Parameter Types", Some(set_names_unique.len())),
            ("", None),
            ("Parameter Types Found", None),
        ];

        let mut n_idx_row = 0usize;
        for (c_key, value) in l_stat_rows {
            let fmt_key = if value.is_none() && !c_key.is_empty() {
                &fmt_header
            } else {
                &fmt_body
            };
            worksheet
                .write_string_with_format(cast_row_num(n_idx_row)?, 0, c_key, fmt_key)
                .map_err(derive_xlsx_error_text)?;
            if let Some(n_value) = value {
                worksheet
                    .write_number_with_format(cast_row_num(n_idx_row)?, 1, n_value as f64, &fmt_body)
                    .map_err(derive_xlsx_error_text)?;
            }
            n_idx_row += 1;
        }
        for c_name in set_names_unique {
            worksheet
                .write_string_with_format(cast_row_num(n_idx_row)?, 0, c_name, &fmt_body)
                .map_err(derive_xlsx_error_text)?;
            n_idx_row += 1;
        }

        worksheet
            .set_column_width(0, 30.0)
            .map_err(derive_xlsx_error_text)?;
        worksheet
            .set_column_width(1, 12.0)
            .map_err(derive_xlsx_error_text)?;

        Ok(())
    }

    fn derive_unique_sheet_name(&mut self, name: &str) -> String {
        if !self.set_sheet_names_existing.contains(name) {
            self.set_sheet_names_existing.insert(name.to_string());
            return name.to_string();
        }

        let base_name: String = name
            .chars()
            .take(usize::max(1, N_LEN_EXCEL_SHEET_NAME_MAX - 3))
            .collect();

        let mut n_idx = 2usize;
        loop {
            let candidate: String = format!("{base_name}__{n_idx}")
                .chars()
                .take(N_LEN_EXCEL_SHEET_NAME_MAX)
                .collect();
            if !self.set_sheet_names_existing.contains(&candidate) {
                self.set_sheet_names_existing.insert(candidate.clone());
                return candidate;
            }
            n_idx += 1;
        }
    }
}

/// Project a batch into `mode` and write workbook with a summary sheet.
pub fn export_workbook(
    l_records: &[SpecTestRecord],
    mode: EnumExportMode,
    catalog: &SpecParameterCatalog,
    path_file_out: PathBuf,
) -> Result<SpecExportTable, ExportError> {
    let table = project_table(l_records, mode, catalog);

    let mut writer = XlsxTableWriter::new(path_file_out);
    writer
        .write_table(&table, mode.sheet_name())
        .map_err(ExportError::Workbook)?;
    writer
        .write_summary(l_records)
        .map_err(ExportError::Workbook)?;
    writer.close().map_err(ExportError::Workbook)?;
    Ok(table)
}

fn write_cell_with_format(
    worksheet: &mut Worksheet,
    n_row: u32,
    n_col: u16,
    value: &EnumMeasurement,
    format: &Format,
) -> Result<(), String> {
    match value {
        EnumMeasurement::Number(val) => {
            worksheet
                .write_number_with_format(n_row, n_col, *val, format)
                .map_err(derive_xlsx_error_text)?;
        }
        EnumMeasurement::Text(val) => {
            worksheet
                .write_string_with_format(n_row, n_col, val, format)
                .map_err(derive_xlsx_error_text)?;
        }
    }
    Ok(())
}

fn derive_format_header() -> Format {
    Format::new()
        .set_bold()
        .set_font_color("#FFFFFF")
        .set_background_color(C_COLOR_HEADER_FILL)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_border(FormatBorder::Thin)
}

fn derive_format_body() -> Format {
    Format::new().set_border(FormatBorder::Thin)
}

fn cast_row_num(value: usize) -> Result<u32, String> {
    u32::try_from(value).map_err(|_| format!("row index overflow: {value}"))
}

fn cast_col_num(value: usize) -> Result<u16, String> {
    u16::try_from(value).map_err(|_| format!("column index overflow: {value}"))
}

fn derive_xlsx_error_text(err: XlsxError) -> String {
    format!("xlsx write error: {err}")
}
