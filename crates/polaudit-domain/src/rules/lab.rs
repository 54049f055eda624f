use crate::binder::Environment;
use crate::error::EvalError;
use crate::formula::Expr;

const OPENS_AT: i64 = 8;
const CLOSES_AT: i64 = 20;

/// Opening hours, and servers only from on campus.
pub(super) fn formula(env: &Environment) -> Result<Expr, EvalError> {
    let system = env.var("system")?;
    let on_campus = env.var("on_campus")?;
    let hour = env.var("hour")?;

    Ok(Expr::and([
        hour.between(OPENS_AT, CLOSES_AT),
        Expr::ite(system.is("server"), on_campus.is_true(), Expr::Const(true)),
    ]))
}
