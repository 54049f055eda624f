//! Stable identifiers for policy types and error codes.
//!
//! Policy type names match the keys of the schema document. Codes are short
//! snake_case discriminators used in reports.

// Policy types
pub const POLICY_SIS: &str = "SIS";
pub const POLICY_EXAM: &str = "Exam";
pub const POLICY_LAB: &str = "Lab";
pub const POLICY_PRIVACY: &str = "Privacy";

// Codes: caller-input errors
pub const CODE_UNKNOWN_POLICY_TYPE: &str = "unknown_policy_type";
pub const CODE_MISSING_ATTRIBUTE: &str = "missing_attribute";
pub const CODE_TYPE_MISMATCH: &str = "type_mismatch";

// Codes: engine conditions
pub const CODE_BINDING_CONTRADICTION: &str = "binding_contradiction";
pub const CODE_INCONCLUSIVE: &str = "inconclusive";
pub const CODE_CATALOG_MISMATCH: &str = "catalog_mismatch";
pub const CODE_MALFORMED_RULE: &str = "malformed_rule";
