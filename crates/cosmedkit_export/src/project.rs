//! Mode-specific projection of test records into a rectangular table.

use std::collections::BTreeMap;

use cosmedkit_extract::{EnumMeasurement, SpecTestRecord};

use crate::conf::{C_COL_SOURCE, C_COL_SUBJECT, C_PHASE_TERMINAL};
use crate::spec::{EnumExportMode, SpecExportTable, SpecParameterCatalog};
use crate::util::{derive_column_title, order_phases_canonical};

/// Column-set strategy resolved per mode: ordered `(parameter, phase)` pairs
/// plus the unit used in each column title.
struct SpecColumnPlan {
    l_fields: Vec<(String, String)>,
    dict_units: BTreeMap<String, String>,
}

/// Project a batch of records into a table for `mode`.
///
/// Identity columns always come first; row order follows input record order.
/// A `(parameter, phase)` pair absent from a record leaves that cell out of
/// the row map, which the sink renders as blank.
pub fn project_table(
    l_records: &[SpecTestRecord],
    mode: EnumExportMode,
    catalog: &SpecParameterCatalog,
) -> SpecExportTable {
    let plan = match mode {
        EnumExportMode::Selected => _plan_selected(catalog),
        EnumExportMode::MaxOnly => _plan_max_only(l_records),
        EnumExportMode::Complete => _plan_complete(l_records),
    };

    let mut l_columns = vec![C_COL_SOURCE.to_string(), C_COL_SUBJECT.to_string()];
    for (c_name, c_phase) in &plan.l_fields {
        let c_unit = plan.dict_units.get(c_name).map(String::as_str).unwrap_or("");
        l_columns.push(derive_column_title(c_name, c_unit, c_phase));
    }

    let mut l_rows = Vec::with_capacity(l_records.len());
    for record in l_records {
        let mut row: BTreeMap<String, EnumMeasurement> = BTreeMap::new();
        row.insert(
            C_COL_SOURCE.to_string(),
            EnumMeasurement::Text(record.source_id.clone()),
        );
        row.insert(
            C_COL_SUBJECT.to_string(),
            EnumMeasurement::Text(record.subject_id.clone()),
        );

        for (n_idx_field, (c_name, c_phase)) in plan.l_fields.iter().enumerate() {
            if let Some(value) = record.value(c_name, c_phase) {
                row.insert(l_columns[2 + n_idx_field].clone(), value.clone());
            }
        }
        l_rows.push(row);
    }

    SpecExportTable { l_columns, l_rows }
}

/// Fixed schema from the curated catalog; batch contents never change it.
fn _plan_selected(catalog: &SpecParameterCatalog) -> SpecColumnPlan {
    let mut l_fields = Vec::new();
    let mut dict_units = BTreeMap::new();
    for entry in &catalog.l_entries {
        dict_units.insert(entry.name.clone(), entry.unit.clone());
        for c_phase in &entry.phases {
            l_fields.push((entry.name.clone(), c_phase.clone()));
        }
    }
    SpecColumnPlan {
        l_fields,
        dict_units,
    }
}

/// Terminal-phase column per observed parameter, first-seen order.
fn _plan_max_only(l_records: &[SpecTestRecord]) -> SpecColumnPlan {
    let mut l_fields = Vec::new();
    let mut dict_units = BTreeMap::new();
    for record in l_records {
        for c_name in record.parameter_names() {
            if dict_units.contains_key(c_name) {
                continue;
            }
            dict_units.insert(
                c_name.clone(),
                record.unit(c_name).unwrap_or("").to_string(),
            );
            l_fields.push((c_name.clone(), C_PHASE_TERMINAL.to_string()));
        }
    }
    SpecColumnPlan {
        l_fields,
        dict_units,
    }
}

/// Observed `(parameter, phase)` union: parameters in first-seen order,
/// phases per parameter in canonical order with unrecognized phases appended.
fn _plan_complete(l_records: &[SpecTestRecord]) -> SpecColumnPlan {
    let mut l_names = Vec::new();
    let mut dict_units: BTreeMap<String, String> = BTreeMap::new();
    let mut dict_phases_observed: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for record in l_records {
        for c_name in record.parameter_names() {
            if !dict_units.contains_key(c_name) {
                dict_units.insert(
                    c_name.clone(),
                    record.unit(c_name).unwrap_or("").to_string(),
                );
                l_names.push(c_name.clone());
            }
            let l_phases = dict_phases_observed.entry(c_name.clone()).or_default();
            for c_phase in record.phases(c_name) {
                if !l_phases.contains(c_phase) {
                    l_phases.push(c_phase.clone());
                }
            }
        }
    }

    let mut l_fields = Vec::new();
    for c_name in &l_names {
        let l_phases_observed = dict_phases_observed.get(c_name).map(Vec::as_slice).unwrap_or(&[]);
        for c_phase in order_phases_canonical(l_phases_observed) {
            l_fields.push((c_name.clone(), c_phase));
        }
    }
    SpecColumnPlan {
        l_fields,
        dict_units,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conf::derive_default_parameter_catalog;

    fn record_p01() -> SpecTestRecord {
        let mut record = SpecTestRecord::new("P01.xml", "P01");
        record.push_parameter("HR", "bpm");
        record.push_measurement("HR", "Max", EnumMeasurement::Number(192.0));
        record.push_parameter("VO2/kg", "mL/min/Kg");
        record.push_measurement("VO2/kg", "AT", EnumMeasurement::Number(37.6));
        record
    }

    fn record_p02() -> SpecTestRecord {
        let mut record = SpecTestRecord::new("P02.xml", "P02");
        record.push_parameter("HR", "bpm");
        record.push_measurement("HR", "Max", EnumMeasurement::Number(175.0));
        record
    }

    #[test]
    fn test_selected_mode_two_subject_scenario() {
        let catalog = derive_default_parameter_catalog();
        let table = project_table(
            &[record_p01(), record_p02()],
            EnumExportMode::Selected,
            &catalog,
        );

        assert_eq!(table.row_count(), 2);
        assert_eq!(table.l_columns[0], "Filename");
        assert_eq!(table.l_columns[1], "Subject ID");
        assert_eq!(
            table.cell(0, "VO2/kg (mL/min/Kg)_AT"),
            Some(&EnumMeasurement::Number(37.6))
        );
        assert_eq!(table.cell(1, "VO2/kg (mL/min/Kg)_AT"), None);
        assert_eq!(
            table.cell(0, "HR (bpm)_Max"),
            Some(&EnumMeasurement::Number(192.0))
        );
        assert_eq!(
            table.cell(1, "HR (bpm)_Max"),
            Some(&EnumMeasurement::Number(175.0))
        );
    }

    #[test]
    fn test_selected_mode_schema_is_stable_across_batches() {
        let catalog = derive_default_parameter_catalog();

        let mut record_extra = record_p02();
        record_extra.push_parameter("CustomParam", "u");
        record_extra.push_measurement("CustomParam", "Max", EnumMeasurement::Number(1.0));

        let table_a = project_table(&[record_p01()], EnumExportMode::Selected, &catalog);
        let table_b = project_table(&[record_extra], EnumExportMode::Selected, &catalog);
        assert_eq!(table_a.l_columns, table_b.l_columns);
        assert!(!table_a.l_columns.iter().any(|c| c.contains("CustomParam")));
    }

    #[test]
    fn test_selected_mode_column_count_matches_catalog() {
        let catalog = derive_default_parameter_catalog();
        let table = project_table(&[], EnumExportMode::Selected, &catalog);
        let n_fields: usize = catalog.l_entries.iter().map(|e| e.phases.len()).sum();
        assert_eq!(table.column_count(), 2 + n_fields);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_max_only_union_in_first_seen_order() {
        let mut record_b = record_p02();
        record_b.push_parameter("Rf", "1/min");
        record_b.push_measurement("Rf", "Max", EnumMeasurement::Number(52.0));

        let table = project_table(
            &[record_p01(), record_b],
            EnumExportMode::MaxOnly,
            &derive_default_parameter_catalog(),
        );
        assert_eq!(
            table.l_columns,
            [
                "Filename",
                "Subject ID",
                "HR (bpm)_Max",
                "VO2/kg (mL/min/Kg)_Max",
                "Rf (1/min)_Max",
            ]
            .map(str::to_string)
        );
        // P01 has no terminal VO2/kg value, so its cell stays empty.
        assert_eq!(table.cell(0, "VO2/kg (mL/min/Kg)_Max"), None);
        assert_eq!(
            table.cell(1, "Rf (1/min)_Max"),
            Some(&EnumMeasurement::Number(52.0))
        );
    }

    #[test]
    fn test_complete_union_covers_both_records_phases() {
        let mut record_a = SpecTestRecord::new("a.xml", "A");
        record_a.push_parameter("VO2", "mL/min");
        record_a.push_measurement("VO2", "AT", EnumMeasurement::Number(2210.0));
        let mut record_b = SpecTestRecord::new("b.xml", "B");
        record_b.push_parameter("VO2", "mL/min");
        record_b.push_measurement("VO2", "Max", EnumMeasurement::Number(3105.0));

        let table = project_table(
            &[record_a, record_b],
            EnumExportMode::Complete,
            &derive_default_parameter_catalog(),
        );
        assert!(table.l_columns.contains(&"VO2 (mL/min)_AT".to_string()));
        assert!(table.l_columns.contains(&"VO2 (mL/min)_Max".to_string()));
        assert_eq!(table.cell(0, "VO2 (mL/min)_Max"), None);
        assert_eq!(table.cell(1, "VO2 (mL/min)_AT"), None);
        assert_eq!(
            table.cell(0, "VO2 (mL/min)_AT"),
            Some(&EnumMeasurement::Number(2210.0))
        );
    }

    #[test]
    fn test_complete_phase_columns_follow_canonical_order() {
        let mut record = SpecTestRecord::new("a.xml", "A");
        record.push_parameter("HR", "bpm");
        record.push_measurement("HR", "Max", EnumMeasurement::Number(192.0));
        record.push_measurement("HR", "Rest", EnumMeasurement::Number(61.0));
        record.push_measurement("HR", "Recovery3", EnumMeasurement::Number(120.0));

        let table = project_table(
            &[record],
            EnumExportMode::Complete,
            &derive_default_parameter_catalog(),
        );
        assert_eq!(
            table.l_columns[2..],
            [
                "HR (bpm)_Rest".to_string(),
                "HR (bpm)_Max".to_string(),
                "HR (bpm)_Recovery3".to_string(),
            ]
        );
    }

    #[test]
    fn test_max_only_matches_complete_terminal_values() {
        let l_records = [record_p01(), record_p02()];
        let catalog = derive_default_parameter_catalog();
        let table_max = project_table(&l_records, EnumExportMode::MaxOnly, &catalog);
        let table_complete = project_table(&l_records, EnumExportMode::Complete, &catalog);

        for (n_idx_row, record) in l_records.iter().enumerate() {
            for c_name in record.parameter_names() {
                let c_unit = record.unit(c_name).unwrap_or("");
                let c_title = derive_column_title(c_name, c_unit, "Max");
                assert_eq!(
                    table_max.cell(n_idx_row, &c_title),
                    table_complete.cell(n_idx_row, &c_title)
                );
            }
        }
    }

    #[test]
    fn test_projection_is_deterministic() {
        let l_records = [record_p01(), record_p02()];
        let catalog = derive_default_parameter_catalog();
        for mode in [
            EnumExportMode::Selected,
            EnumExportMode::MaxOnly,
            EnumExportMode::Complete,
        ] {
            let table_a = project_table(&l_records, mode, &catalog);
            let table_b = project_table(&l_records, mode, &catalog);
            assert_eq!(table_a, table_b);
        }
    }

    #[test]
    fn test_empty_batch_yields_identity_only_table() {
        let catalog = derive_default_parameter_catalog();
        for mode in [EnumExportMode::MaxOnly, EnumExportMode::Complete] {
            let table = project_table(&[], mode, &catalog);
            assert_eq!(
                table.l_columns,
                ["Filename".to_string(), "Subject ID".to_string()]
            );
            assert_eq!(table.row_count(), 0);
        }
    }

    #[test]
    fn test_zero_value_is_kept_distinct_from_absence() {
        let mut record = SpecTestRecord::new("a.xml", "A");
        record.push_parameter("VO2", "mL/min");
        record.push_measurement("VO2", "Max", EnumMeasurement::Number(0.0));

        let table = project_table(
            &[record],
            EnumExportMode::MaxOnly,
            &derive_default_parameter_catalog(),
        );
        assert_eq!(
            table.cell(0, "VO2 (mL/min)_Max"),
            Some(&EnumMeasurement::Number(0.0))
        );
    }
}
