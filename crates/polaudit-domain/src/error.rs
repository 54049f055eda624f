use polaudit_types::{ids, Decision, Kind, Value};
use thiserror::Error;

/// Everything an evaluation can fail with.
///
/// All variants are recoverable at the caller; evaluating one record never
/// terminates the process.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("unknown policy type: {0}")]
    UnknownPolicyType(String),

    #[error("missing attribute: {0}")]
    MissingAttribute(String),

    #[error("type mismatch for attribute '{name}': expected {expected}, got {actual}")]
    TypeMismatch {
        name: String,
        expected: Kind,
        actual: Value,
    },

    /// Bindings plus rule were unsatisfiable. Built-in rules are total, so this is a defect.
    #[error("binding contradiction while evaluating policy '{record_id}' ({policy_type})")]
    BindingContradiction {
        policy_type: String,
        record_id: String,
    },

    #[error("inconclusive evaluation of policy '{record_id}': {reason}")]
    Inconclusive { record_id: String, reason: String },

    #[error("malformed rule for policy type {policy_type}: {reason}")]
    MalformedRule { policy_type: String, reason: String },

    #[error(
        "schema registry and rule catalog disagree (types without rule: {missing_rules:?}, rules without schema: {missing_schemas:?})"
    )]
    CatalogMismatch {
        missing_rules: Vec<String>,
        missing_schemas: Vec<String>,
    },
}

impl EvalError {
    /// Stable report code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            EvalError::UnknownPolicyType(_) => ids::CODE_UNKNOWN_POLICY_TYPE,
            EvalError::MissingAttribute(_) => ids::CODE_MISSING_ATTRIBUTE,
            EvalError::TypeMismatch { .. } => ids::CODE_TYPE_MISMATCH,
            EvalError::BindingContradiction { .. } => ids::CODE_BINDING_CONTRADICTION,
            EvalError::Inconclusive { .. } => ids::CODE_INCONCLUSIVE,
            EvalError::MalformedRule { .. } => ids::CODE_MALFORMED_RULE,
            EvalError::CatalogMismatch { .. } => ids::CODE_CATALOG_MISMATCH,
        }
    }

    /// The decision callers fall back to, if any.
    ///
    /// Only internal contradictions fail closed; malformed input and
    /// inconclusive searches have no decision.
    pub fn fail_closed(&self) -> Option<Decision> {
        match self {
            EvalError::BindingContradiction { .. } => Some(Decision::Denied),
            _ => None,
        }
    }
}
