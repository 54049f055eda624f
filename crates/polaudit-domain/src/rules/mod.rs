//! Rule catalog: one tagged variant per policy type.
//!
//! Each rule is a pure function from a bound environment to a boolean
//! expression tree. The catalog and the schema registry must cover exactly
//! the same policy types; [`verify_catalog`] enforces that.

use crate::binder::Environment;
use crate::error::EvalError;
use crate::formula::Expr;
use crate::schema::SchemaRegistry;
use polaudit_types::ids;
use std::collections::BTreeMap;

mod exam;
mod lab;
mod privacy;
mod sis;


#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rule {
    Sis,
    Exam,
    Lab,
    Privacy,
}

impl Rule {
    pub const ALL: [Rule; 4] = [Rule::Sis, Rule::Exam, Rule::Lab, Rule::Privacy];

    /// Policy type name this rule is registered under.
    pub fn policy_type(self) -> &'static str {
        match self {
            Rule::Sis => ids::POLICY_SIS,
            Rule::Exam => ids::POLICY_EXAM,
            Rule::Lab => ids::POLICY_LAB,
            Rule::Privacy => ids::POLICY_PRIVACY,
        }
    }

    /// Build the decision formula; true means ALLOWED.
    pub fn formula(self, env: &Environment) -> Result<Expr, EvalError> {
        match self {
            Rule::Sis => sis::formula(env),
            Rule::Exam => exam::formula(env),
            Rule::Lab => lab::formula(env),
            Rule::Privacy => privacy::formula(env),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleCatalog {
    rules: BTreeMap<String, Rule>,
}

impl RuleCatalog {
    pub fn builtin() -> Self {
        Self::from_rules(Rule::ALL)
    }

    pub fn from_rules(rules: impl IntoIterator<Item = Rule>) -> Self {
        Self {
            rules: rules
                .into_iter()
                .map(|r| (r.policy_type().to_string(), r))
                .collect(),
        }
    }

    pub fn rule_for(&self, policy_type: &str) -> Result<Rule, EvalError> {
        self.rules
            .get(policy_type)
            .copied()
            .ok_or_else(|| EvalError::UnknownPolicyType(policy_type.to_string()))
    }

    pub fn policy_types(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }
}

impl Default for RuleCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Check that every schema type has a rule and every rule has a schema.
pub fn verify_catalog(registry: &SchemaRegistry, catalog: &RuleCatalog) -> Result<(), EvalError> {
    let missing_rules: Vec<String> = registry
        .policy_types()
        .filter(|t| catalog.rule_for(t).is_err())
        .map(str::to_string)
        .collect();
    let missing_schemas: Vec<String> = catalog
        .policy_types()
        .filter(|t| registry.schema_for(t).is_err())
        .map(str::to_string)
        .collect();

    if missing_rules.is_empty() && missing_schemas.is_empty() {
        Ok(())
    } else {
        Err(EvalError::CatalogMismatch {
            missing_rules,
            missing_schemas,
        })
    }
}
