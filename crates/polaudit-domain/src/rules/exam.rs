use crate::binder::Environment;
use crate::error::EvalError;
use crate::formula::Expr;

/// Separation of duties: nobody may create, grade and invigilate the same exam.
pub(super) fn formula(env: &Environment) -> Result<Expr, EvalError> {
    let create = env.var("create")?;
    let grade = env.var("grade")?;
    let invigilate = env.var("invigilate")?;

    Ok(Expr::not(Expr::and([
        create.is_true(),
        grade.is_true(),
        invigilate.is_true(),
    ])))
}
