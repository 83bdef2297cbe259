//! XML document parsing into normalized test records.

use roxmltree::{Document, Node};

use crate::conf::{
    C_TAG_ADDITIONAL_DATA, C_TAG_PARAMETER, C_TAG_PARAMETERS, C_TAG_SUBJECT, C_TAG_SUBJECT_ID,
    C_UNIT_NONE, TUP_PARAM_ATTRS_RESERVED,
};
use crate::spec::{EnumMeasurement, ParseError, SpecTestRecord};

/// Parse one XML document into a [`SpecTestRecord`].
///
/// Whole-document failures (syntax errors, missing mandatory sections) return
/// a [`ParseError`] scoped to `source_id`. Individually unreadable parameter
/// or phase entries are skipped so that one bad entry never discards an
/// otherwise-usable record.
pub fn parse_record(source_id: &str, xml_text: &str) -> Result<SpecTestRecord, ParseError> {
    let document = Document::parse(xml_text).map_err(|e| ParseError::Syntax {
        source_id: source_id.to_string(),
        message: e.to_string(),
    })?;
    let node_root = document.root_element();

    let node_subject =
        find_descendant(node_root, C_TAG_SUBJECT).ok_or_else(|| ParseError::MissingSubjectSection {
            source_id: source_id.to_string(),
        })?;
    let c_subject_id = extract_subject_id(node_subject);

    let node_parameters = find_descendant(node_root, C_TAG_ADDITIONAL_DATA)
        .and_then(|node| {
            node.children()
                .find(|child| child.is_element() && child.has_tag_name(C_TAG_PARAMETERS))
        })
        .ok_or_else(|| ParseError::MissingParametersSection {
            source_id: source_id.to_string(),
        })?;

    let mut record = SpecTestRecord::new(source_id, &c_subject_id);
    for node_param in node_parameters
        .children()
        .filter(|node| node.is_element() && node.has_tag_name(C_TAG_PARAMETER))
    {
        read_parameter_element(node_param, &mut record);
    }

    Ok(record)
}

/// Normalize a raw unit attribute; the `"---"` placeholder means unit-less.
pub fn normalize_unit(raw_unit: Option<&str>) -> String {
    let c_unit = raw_unit.unwrap_or("").trim();
    if c_unit == C_UNIT_NONE {
        return String::new();
    }
    c_unit.to_string()
}

fn find_descendant<'a, 'input>(node_root: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node_root
        .descendants()
        .find(|node| node.is_element() && node.has_tag_name(tag))
}

fn extract_subject_id(node_subject: Node<'_, '_>) -> String {
    node_subject
        .descendants()
        .find(|node| node.is_element() && node.has_tag_name(C_TAG_SUBJECT_ID))
        .and_then(|node| node.text())
        .map(str::trim)
        .unwrap_or("")
        .to_string()
}

fn read_parameter_element(node_param: Node<'_, '_>, record: &mut SpecTestRecord) {
    let Some(c_name) = node_param
        .attribute("Name")
        .map(str::trim)
        .filter(|name| !name.is_empty())
    else {
        // Nameless parameter entry is unusable; skip it and keep the record.
        return;
    };

    let c_unit = normalize_unit(node_param.attribute("UM"));
    record.push_parameter(c_name, &c_unit);

    for attr in node_param.attributes() {
        let c_phase = attr.name();
        if TUP_PARAM_ATTRS_RESERVED.contains(&c_phase) {
            continue;
        }
        let c_raw = attr.value().trim();
        if c_raw.is_empty() {
            continue;
        }
        record.push_measurement(c_name, c_phase, EnumMeasurement::from_raw_text(c_raw));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::EnumMeasurement;

    const XML_BASIC: &str = r#"<?xml version="1.0"?>
<CPETResult>
  <Subject>
    <ID> P01 </ID>
    <LastName>Doe</LastName>
  </Subject>
  <AdditionalData>
    <Parameters>
      <Parameter Name="HR" UM="bpm" Rest="61" AT="164" Max="192" Pred=""/>
      <Parameter Name="VO2/kg" UM="mL/min/Kg" MFO="28.1" AT="37.6" RC="44.0" Max="51.2"/>
      <Parameter Name="Pace" UM="mm:ss/km" Max="04:10"/>
      <Parameter Name="METS" UM="---" Max="14.6"/>
    </Parameters>
  </AdditionalData>
</CPETResult>"#;

    #[test]
    fn test_parse_record_reads_identity_and_values() {
        let record = parse_record("P01.xml", XML_BASIC).expect("parse");

        assert_eq!(record.source_id, "P01.xml");
        assert_eq!(record.subject_id, "P01");
        assert_eq!(
            record.value("HR", "Max"),
            Some(&EnumMeasurement::Number(192.0))
        );
        assert_eq!(
            record.value("VO2/kg", "AT"),
            Some(&EnumMeasurement::Number(37.6))
        );
        assert_eq!(record.unit("HR"), Some("bpm"));
        assert_eq!(
            record.parameter_names(),
            ["HR", "VO2/kg", "Pace", "METS"]
                .map(str::to_string)
                .as_slice()
        );
    }

    #[test]
    fn test_parse_record_keeps_non_numeric_values_as_text() {
        let record = parse_record("P01.xml", XML_BASIC).expect("parse");
        assert_eq!(
            record.value("Pace", "Max"),
            Some(&EnumMeasurement::Text("04:10".to_string()))
        );
    }

    #[test]
    fn test_parse_record_normalizes_placeholder_unit() {
        let record = parse_record("P01.xml", XML_BASIC).expect("parse");
        assert_eq!(record.unit("METS"), Some(""));
    }

    #[test]
    fn test_parse_record_omits_empty_phase_attributes() {
        let record = parse_record("P01.xml", XML_BASIC).expect("parse");
        assert_eq!(record.value("HR", "Pred"), None);
        assert_eq!(
            record.phases("HR"),
            ["Rest", "AT", "Max"].map(str::to_string).as_slice()
        );
    }

    #[test]
    fn test_parse_record_skips_nameless_parameter() {
        let xml = r#"<R>
  <Subject><ID>P02</ID></Subject>
  <AdditionalData>
    <Parameters>
      <Parameter UM="bpm" Max="175"/>
      <Parameter Name="  " UM="bpm" Max="175"/>
      <Parameter Name="HR" UM="bpm" Max="175"/>
    </Parameters>
  </AdditionalData>
</R>"#;
        let record = parse_record("P02.xml", xml).expect("parse");
        assert_eq!(record.parameter_names(), ["HR".to_string()].as_slice());
        assert_eq!(
            record.value("HR", "Max"),
            Some(&EnumMeasurement::Number(175.0))
        );
    }

    #[test]
    fn test_parse_record_empty_subject_id_is_not_fatal() {
        let xml = r#"<R>
  <Subject><LastName>Doe</LastName></Subject>
  <AdditionalData><Parameters>
    <Parameter Name="HR" UM="bpm" Max="175"/>
  </Parameters></AdditionalData>
</R>"#;
        let record = parse_record("anon.xml", xml).expect("parse");
        assert_eq!(record.subject_id, "");
        assert_eq!(record.value_count(), 1);
    }

    #[test]
    fn test_parse_record_missing_subject_section_fails() {
        let xml = r#"<R><AdditionalData><Parameters/></AdditionalData></R>"#;
        let err = parse_record("bad.xml", xml).expect_err("must fail");
        assert!(matches!(err, ParseError::MissingSubjectSection { .. }));
        assert_eq!(err.source_id(), "bad.xml");
    }

    #[test]
    fn test_parse_record_missing_parameters_section_fails() {
        let xml = r#"<R><Subject><ID>P01</ID></Subject><AdditionalData/></R>"#;
        let err = parse_record("bad.xml", xml).expect_err("must fail");
        assert!(matches!(err, ParseError::MissingParametersSection { .. }));
    }

    #[test]
    fn test_parse_record_malformed_xml_fails() {
        let err = parse_record("bad.xml", "<R><Subject>").expect_err("must fail");
        assert!(matches!(err, ParseError::Syntax { .. }));
    }

    #[test]
    fn test_parse_record_fuzz_like_attribute_soup_no_panic() {
        for n_seed in 0_u64..30 {
            let mut attrs = String::new();
            for n_idx in 0..8 {
                let value = n_seed
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(n_idx as u64);
                if n_idx % 3 == 0 {
                    attrs.push_str(&format!(" Ph{n_idx}=\"{value}\""));
                } else if n_idx % 3 == 1 {
                    attrs.push_str(&format!(" Ph{n_idx}=\"\""));
                } else {
                    attrs.push_str(&format!(" Ph{n_idx}=\"x{value}y\""));
                }
            }
            let xml = format!(
                "<R><Subject><ID>S{n_seed}</ID></Subject><AdditionalData><Parameters>\
                 <Parameter Name=\"P\" UM=\"u\"{attrs}/></Parameters></AdditionalData></R>"
            );
            let record = parse_record("fuzz.xml", &xml).expect("parse");
            assert!(record.value_count() <= 8);
        }
    }
}
