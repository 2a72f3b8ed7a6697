use snacks_ast::{Spanned, TypedExpr, TypedKind};
use snacks_diag::{self as diag, error_for};
use snacks_solve::{Context, Error};
use snacks_types::{free_vars, Type, TypeVar};

/// Exposes every type in a declaration body and checks that no node depends
/// on a variable the declaration leaves undetermined.
///
/// A node's free variables must be free in the declaration's own type or in
/// the type of a `let` binding inside the body.
pub fn finalize(ctx: &Context, ty: &Type, body: &mut TypedExpr) -> diag::Result<()> {
    body.map_types(&mut |t| ctx.expose(t));

    let mut allowed: Vec<TypeVar> = free_vars(&ctx.vars, ty);
    body.for_each(&mut |e| {
        if let TypedKind::Let(x, _, _) = &e.kind {
            allowed.extend(free_vars(&ctx.vars, &x.ty));
        }
    });

    let mut failure = None;
    body.for_each(&mut |e| {
        if failure.is_some() {
            return;
        }
        let dangling = free_vars(&ctx.vars, &e.ty)
            .into_iter()
            .any(|v| !allowed.contains(&v));
        if dangling {
            log::debug!("unresolved node at {:?}: {}", e.span(), e.ty);
            failure = Some(error_for(e, Error::Unresolved { ty: e.ty.clone() }));
        }
    });
    match failure {
        Some(d) => Err(d),
        None => Ok(()),
    }
}
