use crate::binder::Environment;
use crate::error::EvalError;
use crate::formula::Expr;

pub(super) fn formula(env: &Environment) -> Result<Expr, EvalError> {
    let access_requested = env.var("access_requested")?;
    let status = env.var("status")?;
    let role = env.var("role")?;
    let action = env.var("action")?;

    Ok(Expr::or([
        Expr::not(access_requested.is_true()),
        status.is_not("graduated"),
        role.is_in(["admin", "registrar"]),
        Expr::and([role.is("faculty"), action.is("view")]),
    ]))
}
