//! Overloaded function application and declaration generalization.

use crate::env::{Locator, Reference};
use crate::error::{Error, Result};
use crate::{trace_println, unify, unify_or_error, Context};
use snacks_print::PrettyString;
use snacks_types::print::Generalized;
use snacks_types::{decompose, occurs_in, shallow, Type};

/// The alternatives an argument is matched against: the members of a union,
/// or the type itself. Algebraic values are matched whole so that their
/// options are only ever compared together.
fn arguments_of(ctx: &Context, t: &Type) -> Vec<Type> {
    match ctx.expose(t) {
        Type::Union(members) => members,
        t => vec![t],
    }
}

/// Widens an unbound argument variable into a union of fresh variables, one
/// per alternative of the function it is applied to.
fn recompose(ctx: &mut Context, argument: &Type, function: &Type) -> Type {
    let argument = shallow(&ctx.vars, argument);
    if !matches!(argument, Type::Variable(_)) {
        return argument;
    }
    let n = decompose(&ctx.vars, function).len();
    if n < 2 {
        return argument;
    }
    let fresh = (0..n).map(|_| ctx.create_variable()).collect::<Vec<_>>();
    Type::union(fresh).unwrap_or(argument)
}

/// Infers the result type of applying `function` to `argument`.
///
/// Every argument alternative is tried against every function alternative
/// not yet matched by an earlier argument alternative. The result is the union
/// of the results of all successful pairings. If the argument was an unbound
/// variable it is narrowed to the alternatives that found a match.
pub fn infer_application(ctx: &mut Context, function: &Type, argument: &Type) -> Result<Type> {
    trace_println!(
        ctx,
        "[app] solving: ({}) ({})",
        function.pretty_string(&ctx.vars),
        argument.pretty_string(&ctx.vars)
    );
    let start = ctx.vars.snapshot();
    let constrained = recompose(ctx, argument, function);

    let mut functions = decompose(&ctx.vars, function);
    let mut results = vec![];
    let mut matched = vec![];
    for arg in arguments_of(ctx, &constrained) {
        let mut remaining = vec![];
        let mut found = false;
        for alt in functions {
            let result = ctx.create_variable();
            if unify(ctx, &Type::func(arg.clone(), result.clone()), &alt) {
                results.push(ctx.expose(&result));
                found = true;
            } else {
                remaining.push(alt);
            }
        }
        functions = remaining;
        if found {
            matched.push(ctx.expose(&arg));
        }
    }

    if results.is_empty() {
        ctx.vars.rollback_to(start);
        return Err(Error::Application {
            function: ctx.expose(function),
            argument: ctx.expose(argument),
        });
    }

    if let Type::Variable(v) = shallow(&ctx.vars, argument) {
        if let Some(narrowed) = Type::union(matched) {
            if !occurs_in(&ctx.vars, &Type::Variable(v), &narrowed) {
                log::debug!("narrowed '{} to {}", v.name, narrowed);
                ctx.vars.bind(v.id, narrowed);
            }
        }
    }

    let results = results.iter().map(|r| ctx.expose(r)).collect::<Vec<_>>();
    let result = Type::union(results).ok_or_else(|| Error::Application {
        function: ctx.expose(function),
        argument: ctx.expose(argument),
    })?;
    log::debug!("application admits {result}");
    Ok(result)
}

/// Types a declaration that may refer to itself.
///
/// The declaration is bound to a fresh variable that stays non-generic while
/// `body` computes the type of its definition; afterwards the variable is
/// released so later references copy its free variables.
pub fn infer_declaration<F, E>(
    ctx: &mut Context,
    locator: Locator,
    body: F,
) -> std::result::Result<Type, E>
where
    F: FnOnce(&mut Context) -> std::result::Result<Type, E>,
    E: From<Error>,
{
    let mut body = Some(body);
    let locators = [locator.clone()];
    let mut types = infer_declaration_group(ctx, &locators, |ctx, _| match body.take() {
        Some(body) => body(ctx),
        None => Ok(ctx.create_variable()),
    })?;
    types
        .pop()
        .ok_or_else(|| E::from(Error::EmptyDeclaration { locator }))
}

/// Types a group of mutually recursive declarations together. `body` is
/// called once per locator, in order. If any body fails, none of the
/// locators stay defined.
pub fn infer_declaration_group<F, E>(
    ctx: &mut Context,
    locators: &[Locator],
    mut body: F,
) -> std::result::Result<Vec<Type>, E>
where
    F: FnMut(&mut Context, usize) -> std::result::Result<Type, E>,
    E: From<Error>,
{
    let vars = locators
        .iter()
        .map(|locator| {
            let v = ctx.create_variable();
            ctx.define(Reference::new(locator.clone(), v.clone()));
            ctx.specialize(v.clone());
            v
        })
        .collect::<Vec<_>>();

    let mut outcome = Ok(());
    for (i, v) in vars.iter().enumerate() {
        trace_println!(ctx, "[decl] solving: {}", locators[i]);
        outcome = body(ctx, i).and_then(|t| unify_or_error(ctx, v, &t).map_err(E::from));
        if outcome.is_err() {
            break;
        }
    }

    for v in &vars {
        ctx.generify(v);
    }

    if let Err(e) = outcome {
        for (locator, v) in locators.iter().zip(&vars) {
            ctx.env.undefine(locator, v);
        }
        return Err(e);
    }

    let mut types = vec![];
    for (locator, v) in locators.iter().zip(&vars) {
        if decompose(&ctx.vars, v).is_empty() {
            for (locator, v) in locators.iter().zip(&vars) {
                ctx.env.undefine(locator, v);
            }
            return Err(E::from(Error::EmptyDeclaration {
                locator: locator.clone(),
            }));
        }
        let t = ctx.expose(v);
        log::debug!("{locator} : {}", Generalized(&t));
        types.push(t);
    }
    Ok(types)
}
