//! Finite-domain satisfiability checking.
//!
//! A [`Context`] collects declared variables and assertions for one
//! evaluation. [`FiniteSolver`] decides it: equalities between a variable and
//! a literal fix that variable, every remaining boolean variable is searched
//! exhaustively, and the first valuation satisfying all assertions is the model.
//! Unbound Int/Text variables cannot be enumerated and make the result unknown.

use crate::formula::{Cmp, EvalFault, Expr, Term, VarRef};
use polaudit_types::{Kind, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Isolated solving context. Dropped at the end of each evaluation.
#[derive(Clone, Debug, Default)]
pub struct Context {
    declared: BTreeMap<String, Kind>,
    assertions: Vec<Expr>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, var: &VarRef) {
        self.declared.insert(var.name().to_string(), var.kind());
    }

    /// Add an assertion, declaring any variable it mentions.
    pub fn assert(&mut self, expr: Expr) {
        for var in expr.variables() {
            self.declare(&var);
        }
        self.assertions.push(expr);
    }

    pub fn assertions(&self) -> &[Expr] {
        &self.assertions
    }
}

/// A satisfying valuation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Model {
    values: BTreeMap<String, Value>,
}

impl Model {
    pub fn value(&self, var: &VarRef) -> Option<&Value> {
        self.values.get(var.name())
    }

    pub fn bool_value(&self, var: &VarRef) -> Option<bool> {
        self.value(var).and_then(Value::as_bool)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnknownReason {
    /// The boolean search space exceeds the assignment budget.
    BudgetExhausted { free_vars: usize, budget: u64 },
    /// A non-boolean variable is not fixed by any equality.
    Unenumerable { var: String, kind: Kind },
}

impl fmt::Display for UnknownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnknownReason::BudgetExhausted { free_vars, budget } => write!(
                f,
                "{free_vars} free boolean variables exceed the budget of {budget} assignments"
            ),
            UnknownReason::Unenumerable { var, kind } => {
                write!(f, "variable '{var}' of kind {kind} is unbound")
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SatResult {
    Sat(Model),
    Unsat,
    Unknown(UnknownReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FiniteSolver {
    budget: u64,
}

impl FiniteSolver {
    pub const DEFAULT_BUDGET: u64 = 1 << 16;

    pub fn new(budget: u64) -> Self {
        Self { budget }
    }

    pub fn budget(&self) -> u64 {
        self.budget
    }

    pub fn check(&self, ctx: &Context) -> Result<SatResult, EvalFault> {
        let mut fixed: BTreeMap<String, Value> = BTreeMap::new();
        for assertion in &ctx.assertions {
            let Some((var, value)) = as_binding(assertion) else {
                continue;
            };
            if var.kind() != value.kind() {
                return Ok(SatResult::Unsat);
            }
            match fixed.get(var.name()) {
                Some(existing) if existing != value => return Ok(SatResult::Unsat),
                Some(_) => {}
                None => {
                    fixed.insert(var.name().to_string(), value.clone());
                }
            }
        }

        let mut free: Vec<&str> = Vec::new();
        for (name, kind) in &ctx.declared {
            if fixed.contains_key(name) {
                continue;
            }
            if *kind != Kind::Bool {
                return Ok(SatResult::Unknown(UnknownReason::Unenumerable {
                    var: name.clone(),
                    kind: *kind,
                }));
            }
            free.push(name);
        }

        let exhausted = || {
            SatResult::Unknown(UnknownReason::BudgetExhausted {
                free_vars: free.len(),
                budget: self.budget,
            })
        };
        let Some(space) = u32::try_from(free.len())
            .ok()
            .and_then(|n| 1u64.checked_shl(n))
        else {
            return Ok(exhausted());
        };
        if space > self.budget {
            return Ok(exhausted());
        }

        let mut valuation = fixed;
        for mask in 0..space {
            for (bit, name) in free.iter().enumerate() {
                valuation.insert(name.to_string(), Value::Bool(mask & (1 << bit) != 0));
            }
            if satisfies(&ctx.assertions, &valuation)? {
                return Ok(SatResult::Sat(Model { values: valuation }));
            }
        }

        Ok(SatResult::Unsat)
    }
}

impl Default for FiniteSolver {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BUDGET)
    }
}

fn as_binding(expr: &Expr) -> Option<(&VarRef, &Value)> {
    match expr {
        Expr::Cmp(Cmp::Eq, Term::Var(v), Term::Lit(l))
        | Expr::Cmp(Cmp::Eq, Term::Lit(l), Term::Var(v)) => Some((v, l)),
        _ => None,
    }
}

fn satisfies(assertions: &[Expr], valuation: &BTreeMap<String, Value>) -> Result<bool, EvalFault> {
    for assertion in assertions {
        if !assertion.eval(valuation)? {
            return Ok(false);
        }
    }
    Ok(true)
}
