//! Export constants and default preset factories.

use crate::spec::{SpecCatalogEntry, SpecParameterCatalog};

/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];

/// Identity column for the originating source file.
pub const C_COL_SOURCE: &str = "Filename";
/// Identity column for the subject identifier.
pub const C_COL_SUBJECT: &str = "Subject ID";

/// Phase carrying end-of-test values; the max-only projection reads this one.
pub const C_PHASE_TERMINAL: &str = "Max";

/// Test phases in canonical presentation order.
pub const TUP_PHASES_CANONICAL: [&str; 11] = [
    "Value", "Rest", "Warmup", "MFO", "AT", "RC", "Max", "Pred", "PercPred", "Normal", "Class",
];

/// Autofit floor, in character units.
pub const N_WIDTH_CELL_MIN: usize = 8;
/// Autofit cap, in character units.
pub const N_WIDTH_CELL_MAX: usize = 50;
/// Autofit padding added to the longest cell.
pub const N_WIDTH_CELL_PADDING: usize = 2;

/// Build the default curated parameter catalog for the selected projection.
///
/// Submaximal phases are kept only for `VO2/kg`; every other entry reports the
/// terminal phase alone.
pub fn derive_default_parameter_catalog() -> SpecParameterCatalog {
    let terminal = vec![C_PHASE_TERMINAL.to_string()];
    let entry = |name: &str, unit: &str| SpecCatalogEntry {
        name: name.to_string(),
        unit: unit.to_string(),
        phases: terminal.clone(),
    };

    SpecParameterCatalog {
        l_entries: vec![
            entry("t", "s"),
            entry("Speed", "Kmh"),
            entry("Pace", "mm:ss/km"),
            entry("VO2", "mL/min"),
            SpecCatalogEntry {
                name: "VO2/kg".to_string(),
                unit: "mL/min/Kg".to_string(),
                phases: ["MFO", "AT", "RC", "Max"].map(str::to_string).to_vec(),
            },
            entry("VCO2", "mL/min"),
            entry("METS", ""),
            entry("RQ", ""),
            entry("VE", "L/min"),
            entry("Rf", "1/min"),
            entry("HR", "bpm"),
            entry("VO2/HR", "mL/beat"),
            entry("VE/VO2", ""),
            entry("VE/VCO2", ""),
            entry("VT", "L"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_shape() {
        let catalog = derive_default_parameter_catalog();
        assert_eq!(catalog.l_entries.len(), 15);
        assert_eq!(catalog.l_entries[0].name, "t");

        let entry_vo2kg = catalog
            .l_entries
            .iter()
            .find(|e| e.name == "VO2/kg")
            .expect("VO2/kg entry");
        assert_eq!(entry_vo2kg.phases, ["MFO", "AT", "RC", "Max"]);

        for entry in catalog.l_entries.iter().filter(|e| e.name != "VO2/kg") {
            assert_eq!(entry.phases, [C_PHASE_TERMINAL]);
        }
    }
}
