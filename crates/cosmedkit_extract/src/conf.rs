//! XML tag/attribute constants for CPET test documents.

/// Element holding the subject identity section.
pub const C_TAG_SUBJECT: &str = "Subject";
/// Subject identifier element inside the subject section.
pub const C_TAG_SUBJECT_ID: &str = "ID";
/// Container element wrapping the parameter collection.
pub const C_TAG_ADDITIONAL_DATA: &str = "AdditionalData";
/// Parameter collection element.
pub const C_TAG_PARAMETERS: &str = "Parameters";
/// Single parameter element.
pub const C_TAG_PARAMETER: &str = "Parameter";
/// Parameter attributes that carry identity/unit rather than a phase value.
pub const TUP_PARAM_ATTRS_RESERVED: [&str; 2] = ["Name", "UM"];
/// Unit placeholder meaning "dimensionless / no unit".
pub const C_UNIT_NONE: &str = "---";
/// File extension matched by the XML scanner (case-insensitive).
pub const C_EXT_XML: &str = "xml";
