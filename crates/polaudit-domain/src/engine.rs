use crate::binder::{bind, Environment};
use crate::error::EvalError;
use crate::formula::{EvalFault, Expr};
use crate::rules::{verify_catalog, Rule, RuleCatalog};
use crate::schema::SchemaRegistry;
use crate::solver::{Context, FiniteSolver, SatResult};
use polaudit_types::{Decision, Kind, PolicyRecord};

/// How the decision formula is decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Assert bindings and `decision = formula` and check satisfiability.
    Solver { budget: u64 },
    /// Interpret the formula against the bound facts.
    Direct,
}

impl Strategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Solver { .. } => "solver",
            Strategy::Direct => "direct",
        }
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Solver {
            budget: FiniteSolver::DEFAULT_BUDGET,
        }
    }
}

/// Decision engine over a read-only registry and catalog.
///
/// Holds no mutable state: one engine can serve concurrent callers.
#[derive(Clone, Copy, Debug)]
pub struct Engine<'a> {
    registry: &'a SchemaRegistry,
    catalog: &'a RuleCatalog,
    strategy: Strategy,
}

impl<'a> Engine<'a> {
    /// Fails with `CatalogMismatch` unless registry and catalog cover the same types.
    pub fn new(
        registry: &'a SchemaRegistry,
        catalog: &'a RuleCatalog,
        strategy: Strategy,
    ) -> Result<Self, EvalError> {
        verify_catalog(registry, catalog)?;
        Ok(Self {
            registry,
            catalog,
            strategy,
        })
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn registry(&self) -> &'a SchemaRegistry {
        self.registry
    }

    pub fn evaluate(&self, record: &PolicyRecord) -> Result<Decision, EvalError> {
        let schema = self.registry.schema_for(&record.policy_type)?;
        let rule = self.catalog.rule_for(&record.policy_type)?;
        let env = bind(record, schema)?;
        let formula = rule.formula(&env)?;

        let decision = match self.strategy {
            Strategy::Direct => {
                let allowed = formula
                    .eval(&env.valuation())
                    .map_err(|fault| malformed(rule, fault))?;
                Decision::from_bool(allowed)
            }
            Strategy::Solver { budget } => {
                decide_with_solver(record, rule, &env, formula, FiniteSolver::new(budget))?
            }
        };

        tracing::debug!(
            record = %record.id,
            policy_type = %record.policy_type,
            strategy = self.strategy.as_str(),
            %decision,
            "policy evaluated"
        );
        Ok(decision)
    }
}

fn decide_with_solver(
    record: &PolicyRecord,
    rule: Rule,
    env: &Environment,
    formula: Expr,
    solver: FiniteSolver,
) -> Result<Decision, EvalError> {
    let mut ctx = Context::new();
    for binding in env.bindings() {
        ctx.assert(binding.constraint());
    }
    let decision_var = env.fresh("decision", Kind::Bool);
    ctx.assert(Expr::iff(decision_var.is_true(), formula));

    match solver.check(&ctx).map_err(|fault| malformed(rule, fault))? {
        SatResult::Sat(model) => match model.bool_value(&decision_var) {
            Some(allowed) => Ok(Decision::from_bool(allowed)),
            None => Err(EvalError::MalformedRule {
                policy_type: rule.policy_type().to_string(),
                reason: format!("model has no value for '{decision_var}'"),
            }),
        },
        SatResult::Unsat => {
            tracing::error!(
                record = %record.id,
                policy_type = %record.policy_type,
                assertions = ctx.assertions().len(),
                "bindings and rule are unsatisfiable; failing closed"
            );
            Err(EvalError::BindingContradiction {
                policy_type: record.policy_type.clone(),
                record_id: record.id.clone(),
            })
        }
        SatResult::Unknown(reason) => {
            tracing::warn!(record = %record.id, %reason, "solver gave up");
            Err(EvalError::Inconclusive {
                record_id: record.id.clone(),
                reason: reason.to_string(),
            })
        }
    }
}

fn malformed(rule: Rule, fault: EvalFault) -> EvalError {
    EvalError::MalformedRule {
        policy_type: rule.policy_type().to_string(),
        reason: fault.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::PolicySchema;
    use crate::test_support::{exam, lab, sis};
    use std::collections::BTreeMap;

    #[test]
    fn both_strategies_decide_the_same() {
        let registry = SchemaRegistry::builtin();
        let catalog = RuleCatalog::builtin();
        let solver = Engine::new(&registry, &catalog, Strategy::default()).unwrap();
        let direct = Engine::new(&registry, &catalog, Strategy::Direct).unwrap();

        let records = [
            sis("1", "admin", "view", false),
            sis("2", "student", "delete", true),
            exam("3", true, true, true),
            lab("4", "server", true, 20),
        ];
        for record in &records {
            assert_eq!(solver.evaluate(record), direct.evaluate(record), "{}", record.id);
        }
    }

    #[test]
    fn construction_rejects_out_of_step_catalog() {
        let registry = SchemaRegistry::builtin();
        let catalog = RuleCatalog::from_rules([Rule::Sis, Rule::Exam, Rule::Lab]);
        let err = Engine::new(&registry, &catalog, Strategy::Direct).unwrap_err();
        assert_eq!(
            err,
            EvalError::CatalogMismatch {
                missing_rules: vec!["Privacy".to_string()],
                missing_schemas: vec![],
            }
        );
    }

    #[test]
    fn unsatisfiable_context_fails_closed() {
        let registry = SchemaRegistry::builtin();
        let record = sis("9", "faculty", "view", true);
        let env = bind(&record, registry.schema_for("SIS").unwrap()).unwrap();

        // A formula defined as the negation of its own decision has no model.
        let decision = env.fresh("decision", Kind::Bool);
        let formula = Expr::not(decision.is_true());
        let err = decide_with_solver(&record, Rule::Sis, &env, formula, FiniteSolver::default())
            .unwrap_err();

        assert_eq!(
            err,
            EvalError::BindingContradiction {
                policy_type: "SIS".to_string(),
                record_id: "9".to_string(),
            }
        );
        assert_eq!(err.fail_closed(), Some(Decision::Denied));
    }

    #[test]
    fn tiny_budget_is_inconclusive() {
        let registry = SchemaRegistry::builtin();
        let catalog = RuleCatalog::builtin();
        let engine = Engine::new(&registry, &catalog, Strategy::Solver { budget: 1 }).unwrap();
        // One free variable (the decision) needs two assignments.
        let err = engine.evaluate(&exam("e", false, false, false)).unwrap_err();
        assert!(matches!(err, EvalError::Inconclusive { ref record_id, .. } if record_id == "e"));
    }

    #[test]
    fn attribute_named_decision_does_not_pin_the_outcome() {
        let mut schemas = BTreeMap::new();
        schemas.insert(
            "Exam".to_string(),
            PolicySchema::new()
                .with("create", Kind::Bool)
                .with("grade", Kind::Bool)
                .with("invigilate", Kind::Bool)
                .with("decision", Kind::Bool),
        );
        let registry = SchemaRegistry::new(schemas);
        let catalog = RuleCatalog::from_rules([Rule::Exam]);
        let solver = Engine::new(&registry, &catalog, Strategy::default()).unwrap();
        let direct = Engine::new(&registry, &catalog, Strategy::Direct).unwrap();

        for pinned in [false, true] {
            let allowed = exam("e", false, false, false).with("decision", pinned);
            assert_eq!(solver.evaluate(&allowed), Ok(Decision::Allowed));
            assert_eq!(solver.evaluate(&allowed), direct.evaluate(&allowed));

            let denied = exam("d", true, true, true).with("decision", pinned);
            assert_eq!(solver.evaluate(&denied), Ok(Decision::Denied));
            assert_eq!(solver.evaluate(&denied), direct.evaluate(&denied));
        }
    }

    #[test]
    fn rule_over_undeclared_attribute_is_a_missing_attribute() {
        let mut schemas = BTreeMap::new();
        schemas.insert(
            "Exam".to_string(),
            PolicySchema::new()
                .with("create", Kind::Bool)
                .with("grade", Kind::Bool),
        );
        let registry = SchemaRegistry::new(schemas);
        let catalog = RuleCatalog::from_rules([Rule::Exam]);
        let engine = Engine::new(&registry, &catalog, Strategy::default()).unwrap();

        assert_eq!(
            engine.evaluate(&exam("e", true, true, true)),
            Err(EvalError::MissingAttribute("invigilate".to_string()))
        );
    }
}
