use crate::binder::Environment;
use crate::error::EvalError;
use crate::formula::Expr;

/// Admins always; faculty and students may view or edit records they own.
pub(super) fn formula(env: &Environment) -> Result<Expr, EvalError> {
    let role = env.var("role")?;
    let action = env.var("action")?;
    let owner = env.var("owner")?;

    Ok(Expr::or([
        role.is("admin"),
        Expr::and([
            role.is_in(["faculty", "student"]),
            action.is_in(["view", "edit"]),
            owner.is_true(),
        ]),
    ]))
}
