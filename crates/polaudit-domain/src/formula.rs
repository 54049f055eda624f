//! Boolean expression trees over typed decision variables.
//!
//! Rules build these trees; the engine either interprets them directly
//! against the bound facts or hands them to the solver as assertions.

use polaudit_types::{Kind, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

/// A typed decision variable. Names are qualified by the evaluation scope.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarRef {
    name: String,
    kind: Kind,
}

impl VarRef {
    pub fn new(name: impl Into<String>, kind: Kind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn is_true(&self) -> Expr {
        Expr::Var(self.clone())
    }

    pub fn is(&self, value: impl Into<Value>) -> Expr {
        self.compare(Cmp::Eq, value)
    }

    pub fn is_not(&self, value: impl Into<Value>) -> Expr {
        self.compare(Cmp::Ne, value)
    }

    pub fn below(&self, value: impl Into<Value>) -> Expr {
        self.compare(Cmp::Lt, value)
    }

    pub fn at_most(&self, value: impl Into<Value>) -> Expr {
        self.compare(Cmp::Le, value)
    }

    pub fn above(&self, value: impl Into<Value>) -> Expr {
        self.compare(Cmp::Gt, value)
    }

    pub fn at_least(&self, value: impl Into<Value>) -> Expr {
        self.compare(Cmp::Ge, value)
    }

    /// Inclusive range check.
    pub fn between(&self, lo: impl Into<Value>, hi: impl Into<Value>) -> Expr {
        Expr::and([self.at_least(lo), self.at_most(hi)])
    }

    pub fn is_in<I, V>(&self, values: I) -> Expr
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Expr::In(
            Term::Var(self.clone()),
            values.into_iter().map(Into::into).collect(),
        )
    }

    fn compare(&self, op: Cmp, value: impl Into<Value>) -> Expr {
        Expr::Cmp(op, Term::Var(self.clone()), Term::Lit(value.into()))
    }
}

impl fmt::Display for VarRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Operand of a comparison.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Term {
    Var(VarRef),
    Lit(Value),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cmp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Const(bool),
    /// A boolean variable used as a formula.
    Var(VarRef),
    Not(Box<Expr>),
    And(Vec<Expr>),
    Or(Vec<Expr>),
    /// if-then-else over formulas.
    Ite(Box<Expr>, Box<Expr>, Box<Expr>),
    Iff(Box<Expr>, Box<Expr>),
    Cmp(Cmp, Term, Term),
    In(Term, Vec<Value>),
}

impl Expr {
    pub fn and(parts: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::And(parts.into_iter().collect())
    }

    pub fn or(parts: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::Or(parts.into_iter().collect())
    }

    pub fn not(inner: Expr) -> Expr {
        Expr::Not(Box::new(inner))
    }

    pub fn ite(cond: Expr, then: Expr, otherwise: Expr) -> Expr {
        Expr::Ite(Box::new(cond), Box::new(then), Box::new(otherwise))
    }

    pub fn iff(lhs: Expr, rhs: Expr) -> Expr {
        Expr::Iff(Box::new(lhs), Box::new(rhs))
    }

    /// `var == value`, the shape of a fact binding.
    pub fn binding(var: &VarRef, value: Value) -> Expr {
        Expr::Cmp(Cmp::Eq, Term::Var(var.clone()), Term::Lit(value))
    }

    /// Every variable the expression mentions.
    pub fn variables(&self) -> BTreeSet<VarRef> {
        let mut out = BTreeSet::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables(&self, out: &mut BTreeSet<VarRef>) {
        match self {
            Expr::Const(_) => {}
            Expr::Var(v) => {
                out.insert(v.clone());
            }
            Expr::Not(e) => e.collect_variables(out),
            Expr::And(es) | Expr::Or(es) => es.iter().for_each(|e| e.collect_variables(out)),
            Expr::Ite(c, t, e) => {
                c.collect_variables(out);
                t.collect_variables(out);
                e.collect_variables(out);
            }
            Expr::Iff(a, b) => {
                a.collect_variables(out);
                b.collect_variables(out);
            }
            Expr::Cmp(_, a, b) => {
                for t in [a, b] {
                    if let Term::Var(v) = t {
                        out.insert(v.clone());
                    }
                }
            }
            Expr::In(Term::Var(v), _) => {
                out.insert(v.clone());
            }
            Expr::In(Term::Lit(_), _) => {}
        }
    }

    /// Interpret the expression under a full valuation of its variables.
    pub fn eval(&self, valuation: &BTreeMap<String, Value>) -> Result<bool, EvalFault> {
        match self {
            Expr::Const(b) => Ok(*b),
            Expr::Var(v) => match lookup(valuation, v)? {
                Value::Bool(b) => Ok(*b),
                other => Err(EvalFault::NotBoolean {
                    var: v.name.clone(),
                    actual: other.clone(),
                }),
            },
            Expr::Not(e) => Ok(!e.eval(valuation)?),
            Expr::And(es) => {
                for e in es {
                    if !e.eval(valuation)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Expr::Or(es) => {
                for e in es {
                    if e.eval(valuation)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Expr::Ite(c, t, e) => {
                if c.eval(valuation)? {
                    t.eval(valuation)
                } else {
                    e.eval(valuation)
                }
            }
            Expr::Iff(a, b) => Ok(a.eval(valuation)? == b.eval(valuation)?),
            Expr::Cmp(op, a, b) => {
                let a = resolve(valuation, a)?;
                let b = resolve(valuation, b)?;
                compare(*op, a, b)
            }
            Expr::In(t, set) => {
                let v = resolve(valuation, t)?;
                if let Some(bad) = set.iter().find(|s| s.kind() != v.kind()) {
                    return Err(EvalFault::Incomparable {
                        lhs: v.clone(),
                        rhs: bad.clone(),
                    });
                }
                Ok(set.contains(v))
            }
        }
    }
}

/// Evaluation failure of an ill-formed expression. Rules over a correctly
/// bound environment never produce one.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalFault {
    #[error("variable '{0}' has no value")]
    Unbound(String),
    #[error("variable '{var}' used as a formula holds {actual}")]
    NotBoolean { var: String, actual: Value },
    #[error("cannot compare {lhs} with {rhs}")]
    Incomparable { lhs: Value, rhs: Value },
}

fn lookup<'a>(valuation: &'a BTreeMap<String, Value>, var: &VarRef) -> Result<&'a Value, EvalFault> {
    valuation
        .get(&var.name)
        .ok_or_else(|| EvalFault::Unbound(var.name.clone()))
}

fn resolve<'a>(valuation: &'a BTreeMap<String, Value>, term: &'a Term) -> Result<&'a Value, EvalFault> {
    match term {
        Term::Var(v) => lookup(valuation, v),
        Term::Lit(l) => Ok(l),
    }
}

fn compare(op: Cmp, a: &Value, b: &Value) -> Result<bool, EvalFault> {
    let incomparable = || EvalFault::Incomparable {
        lhs: a.clone(),
        rhs: b.clone(),
    };
    if a.kind() != b.kind() {
        return Err(incomparable());
    }
    match op {
        Cmp::Eq => Ok(a == b),
        Cmp::Ne => Ok(a != b),
        Cmp::Lt | Cmp::Le | Cmp::Gt | Cmp::Ge => {
            let (Value::Int(x), Value::Int(y)) = (a, b) else {
                return Err(incomparable());
            };
            Ok(match op {
                Cmp::Lt => x < y,
                Cmp::Le => x <= y,
                Cmp::Gt => x > y,
                _ => x >= y,
            })
        }
    }
}
