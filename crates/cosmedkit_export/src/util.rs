//! Pure helper functions for column titling, phase ordering, and sheet names.

use cosmedkit_extract::EnumMeasurement;

use crate::conf::{N_LEN_EXCEL_SHEET_NAME_MAX, TUP_EXCEL_ILLEGAL, TUP_PHASES_CANONICAL};

/// Column title for one `(parameter, phase)` pair.
///
/// Unit-less parameters drop the parenthesized unit entirely.
pub fn derive_column_title(name: &str, unit: &str, phase: &str) -> String {
    if unit.is_empty() {
        format!("{name}_{phase}")
    } else {
        format!("{name} ({unit})_{phase}")
    }
}

/// Sort observed phases: canonical phases first in canonical order, then
/// unrecognized phases in observed order.
pub fn order_phases_canonical(l_phases_observed: &[String]) -> Vec<String> {
    let mut l_ordered: Vec<String> = TUP_PHASES_CANONICAL
        .iter()
        .filter(|phase| l_phases_observed.iter().any(|p| p == *phase))
        .map(|phase| phase.to_string())
        .collect();
    for phase in l_phases_observed {
        if !TUP_PHASES_CANONICAL.contains(&phase.as_str()) && !l_ordered.contains(phase) {
            l_ordered.push(phase.clone());
        }
    }
    l_ordered
}

/// Replace illegal characters and clamp to the Excel sheet name limit.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().to_string();
    if c_name.is_empty() {
        c_name = "Sheet".to_string();
    }

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

/// Displayed width of one cell, in character units.
pub fn estimate_width_len(value: &EnumMeasurement) -> usize {
    match value {
        EnumMeasurement::Number(n) => format_cell_number(*n).len(),
        EnumMeasurement::Text(s) => s.chars().count(),
    }
}

/// Render a numeric cell the way the worksheet displays it (no trailing
/// `.0` on integral values).
pub fn format_cell_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
