//! Fact binding: turns a record's literals into typed decision variables.

use crate::error::EvalError;
use crate::formula::{Expr, VarRef};
use crate::schema::PolicySchema;
use polaudit_types::{Kind, PolicyRecord, Value};
use std::collections::BTreeMap;

/// One fact: a fresh variable and the literal it is fixed to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub var: VarRef,
    pub value: Value,
}

impl Binding {
    /// The equality constraint `var == value`.
    pub fn constraint(&self) -> Expr {
        Expr::binding(&self.var, self.value.clone())
    }
}

/// Variables bound for a single evaluation call.
///
/// Variable names are qualified as `<type>.<record id>.<attribute>` so two
/// environments never collide, even inside one solving context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Environment {
    scope: String,
    vars: BTreeMap<String, VarRef>,
    bindings: Vec<Binding>,
}

impl Environment {
    fn new(scope: String) -> Self {
        Self {
            scope,
            vars: BTreeMap::new(),
            bindings: Vec::new(),
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Variable bound for `attribute`. Rules reaching for an attribute the
    /// schema does not declare get `MissingAttribute`.
    pub fn var(&self, attribute: &str) -> Result<&VarRef, EvalError> {
        self.vars
            .get(attribute)
            .ok_or_else(|| EvalError::MissingAttribute(attribute.to_string()))
    }

    /// Bindings in schema order.
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// The fixed value of every bound variable, keyed by qualified name.
    pub fn valuation(&self) -> BTreeMap<String, Value> {
        self.bindings
            .iter()
            .map(|b| (b.var.name().to_string(), b.value.clone()))
            .collect()
    }

    /// A variable in this environment's scope that is not bound to a fact.
    ///
    /// Named `<scope>#<local>`; attribute variables use `.`, so no schema
    /// attribute can take the same name.
    pub fn fresh(&self, local: &str, kind: Kind) -> VarRef {
        VarRef::new(format!("{}#{}", self.scope, local), kind)
    }

    fn push(&mut self, attribute: &str, kind: Kind, value: Value) {
        let var = VarRef::new(format!("{}.{}", self.scope, attribute), kind);
        self.vars.insert(attribute.to_string(), var.clone());
        self.bindings.push(Binding { var, value });
    }
}

/// Bind every schema attribute of `record`.
///
/// Fails on the first attribute (in schema order) that is absent or whose
/// literal has the wrong kind. No coercion is attempted. Record attributes
/// the schema does not declare are ignored.
pub fn bind(record: &PolicyRecord, schema: &PolicySchema) -> Result<Environment, EvalError> {
    let mut env = Environment::new(format!("{}.{}", record.policy_type, record.id));

    for (name, kind) in schema.iter() {
        let value = record
            .attribute(name)
            .ok_or_else(|| EvalError::MissingAttribute(name.to_string()))?;
        if value.kind() != kind {
            return Err(EvalError::TypeMismatch {
                name: name.to_string(),
                expected: kind,
                actual: value.clone(),
            });
        }
        env.push(name, kind, value.clone());
    }

    Ok(env)
}
