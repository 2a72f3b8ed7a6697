//! Structural unification with union alternatives, algebraic membership and
//! recursive placeholders.
//!
//! A failed top-level [`unify`] leaves no bindings behind. Union members are
//! attempted one at a time against a snapshot of the variable arena; when
//! more than one member succeeds, the variables bound by every successful
//! attempt are bound to the union of their values.

use crate::error::{Error, Result};
use crate::{trace_println, Context};
use snacks_print::{PrettyString, TABWIDTH};
use snacks_types::{equivalent, shallow, var_occurs_within, Type, VarId};

/// Unifies two types. On failure every binding made along the way is
/// undone.
pub fn unify(ctx: &mut Context, left: &Type, right: &Type) -> bool {
    let snapshot = ctx.vars.snapshot();
    let ok = unify_at(ctx, left, right, 0);
    if !ok {
        ctx.vars.rollback_to(snapshot);
    }
    ok
}

/// Like [`unify`], reporting a failure as a type mismatch between the
/// exposed types.
pub fn unify_or_error(ctx: &mut Context, expected: &Type, found: &Type) -> Result<()> {
    if unify(ctx, expected, found) {
        Ok(())
    } else {
        Err(Error::Type {
            expected: ctx.expose(expected),
            found: ctx.expose(found),
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

fn unify_at(ctx: &mut Context, left: &Type, right: &Type, level: usize) -> bool {
    let left = shallow(&ctx.vars, left);
    let right = shallow(&ctx.vars, right);
    let tab = TABWIDTH.repeat(level);
    trace_println!(
        ctx,
        "{tab}unify: {} = {}",
        left.pretty_string(&ctx.vars),
        right.pretty_string(&ctx.vars)
    );

    if equivalent(&ctx.vars, &left, &right) {
        return true;
    }

    let ok = match (&left, &right) {
        (_, Type::Variable(v)) => {
            !var_occurs_within(&ctx.vars, *v, &left) && ctx.vars.bind(v.id, left.clone())
        }
        (Type::Variable(v), _) => {
            !var_occurs_within(&ctx.vars, *v, &right) && ctx.vars.bind(v.id, right.clone())
        }

        (_, Type::Union(members)) => alternatives(ctx, &left, members, Side::Right, level),
        (Type::Union(members), _) => alternatives(ctx, &right, members, Side::Left, level),

        (Type::Recursive(n1, a1), Type::Recursive(n2, a2)) => {
            n1 == n2 && unify_all(ctx, a1, a2, level)
        }
        (_, Type::Recursive(name, args)) => match ctx.defs.expand(&right) {
            Some(expanded) => unify_at(ctx, &left, &expanded, level + 1),
            None => left.name() == Some(*name) && unify_all(ctx, left.type_arguments(), args, level),
        },
        (Type::Recursive(name, args), _) => match ctx.defs.expand(&left) {
            Some(expanded) => unify_at(ctx, &expanded, &right, level + 1),
            None => {
                right.name() == Some(*name) && unify_all(ctx, args, right.type_arguments(), level)
            }
        },

        (Type::Simple(a), Type::Simple(b)) => a == b,
        (Type::Function(a1, r1), Type::Function(a2, r2)) => {
            let arguments = if shallow(&ctx.vars, a1).is_function() {
                unify_at(ctx, a2, a1, level + 1)
            } else {
                unify_at(ctx, a1, a2, level + 1)
            };
            arguments && unify_at(ctx, r1, r2, level + 1)
        }
        (Type::Record(n1, a1, p1), Type::Record(n2, a2, p2)) => {
            n1 == n2
                && p1.len() == p2.len()
                && p1.iter().zip(p2).all(|(x, y)| x.name == y.name)
                && unify_all(ctx, a1, a2, level)
                && p1
                    .iter()
                    .zip(p2)
                    .all(|(x, y)| unify_at(ctx, &x.ty, &y.ty, level + 1))
        }
        (Type::Algebraic(n1, a1, o1), Type::Algebraic(n2, a2, o2)) => {
            n1 == n2 && unify_all(ctx, a1, a2, level) && unify_all(ctx, o1, o2, level)
        }

        (Type::Algebraic(_, _, options), Type::Simple(_) | Type::Record(..)) => {
            let options = unrolled(options, &left);
            alternatives(ctx, &right, &options, Side::Left, level)
        }
        (Type::Simple(_) | Type::Record(..), Type::Algebraic(_, _, options)) => {
            let options = unrolled(options, &right);
            alternatives(ctx, &left, &options, Side::Right, level)
        }

        _ => false,
    };

    trace_println!(ctx, "{tab}done: {}", if ok { "ok" } else { "failed" });
    ok
}

fn unify_all(ctx: &mut Context, left: &[Type], right: &[Type], level: usize) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .zip(right)
            .all(|(l, r)| unify_at(ctx, l, r, level + 1))
}

fn unrolled(options: &[Type], owner: &Type) -> Vec<Type> {
    options.iter().map(|o| o.unroll(owner)).collect()
}

/// Unifies `target` with each alternative in isolation. The alternatives
/// stand on `side` of the equation.
fn alternatives(
    ctx: &mut Context,
    target: &Type,
    alternatives: &[Type],
    side: Side,
    level: usize,
) -> bool {
    let attempt = |ctx: &mut Context, alt: &Type| match side {
        Side::Right => unify_at(ctx, target, alt, level + 1),
        Side::Left => unify_at(ctx, alt, target, level + 1),
    };

    let mut successes: Vec<(usize, Vec<(VarId, Type)>)> = vec![];
    for (i, alt) in alternatives.iter().enumerate() {
        let snapshot = ctx.vars.snapshot();
        if attempt(ctx, alt) {
            if ctx.vars.unchanged_since(snapshot) {
                return true;
            }
            let bindings = ctx
                .vars
                .bound_since(snapshot)
                .to_vec()
                .into_iter()
                .filter_map(|id| Some((id, ctx.vars.binding(id)?.clone())))
                .map(|(id, t)| (id, ctx.expose(&t)))
                .collect();
            successes.push((i, bindings));
        }
        ctx.vars.rollback_to(snapshot);
    }

    match successes.as_slice() {
        [] => false,
        [(i, _)] => attempt(ctx, &alternatives[*i]),
        [(_, first), rest @ ..] => {
            let tab = TABWIDTH.repeat(level);
            for (id, value) in first {
                let mut values = vec![value.clone()];
                for (_, bindings) in rest {
                    match bindings.iter().find(|(other, _)| other == id) {
                        Some((_, v)) => values.push(v.clone()),
                        None => break,
                    }
                }
                if values.len() < successes.len() {
                    continue;
                }
                if let Some(accreted) = Type::union(values) {
                    trace_println!(
                        ctx,
                        "{tab}accrete: {} from {} alternatives",
                        accreted.pretty_string(&ctx.vars),
                        successes.len()
                    );
                    ctx.vars.bind(*id, accreted);
                }
            }
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snacks_types::{decompose, expose, TyVars};

    use pretty_assertions::assert_eq;
    use test_log::test;

    fn bound(vars: &TyVars, t: &Type) -> Type {
        expose(vars, t)
    }

    fn maybe(ctx: &mut Context) -> (Type, Type) {
        let a = ctx.create_variable();
        let just = Type::record("Just", vec![a.clone()], [("value", a.clone())]);
        let maybe = Type::algebraic("Maybe", vec![a.clone()], vec![just, Type::simple("Nothing")]);
        (maybe, a)
    }

    fn list(ctx: &mut Context) -> (Type, Type) {
        let a = ctx.create_variable();
        let cons = Type::record(
            "Cons",
            vec![a.clone()],
            [("head", a.clone()), ("tail", Type::recursive("List", vec![a.clone()]))],
        );
        let list = Type::algebraic("List", vec![a.clone()], vec![cons, Type::simple("Empty")]);
        (list, a)
    }

    #[test]
    fn identical_types_unify_without_bindings() {
        let mut ctx = Context::new_normal();
        let a = ctx.create_variable();
        let t = Type::func(a.clone(), Type::union(vec![Type::integer(), a]).unwrap());
        let snapshot = ctx.vars.snapshot();
        assert!(unify(&mut ctx, &t, &t.clone()));
        assert!(ctx.vars.unchanged_since(snapshot));
    }

    #[test]
    fn unions_unify_regardless_of_order() {
        let mut ctx = Context::new_normal();
        let a = Type::union(vec![Type::integer(), Type::string()]).unwrap();
        let b = Type::union(vec![Type::string(), Type::integer()]).unwrap();
        assert!(unify(&mut ctx, &a, &b));
    }

    #[test]
    fn variables_bind_on_either_side() {
        let mut ctx = Context::new_normal();
        let a = ctx.create_variable();
        let b = ctx.create_variable();
        assert!(unify(&mut ctx, &a, &Type::integer()));
        assert!(unify(&mut ctx, &Type::string(), &b));
        assert_eq!(bound(&ctx.vars, &a), Type::integer());
        assert_eq!(bound(&ctx.vars, &b), Type::string());
    }

    #[test]
    fn occurs_check_rejects_infinite_types() {
        let mut ctx = Context::new_normal();
        let a = ctx.create_variable();
        let f = Type::func(a.clone(), Type::integer());
        assert!(!unify(&mut ctx, &a, &f));
        assert!(!unify(&mut ctx, &f, &a));
        assert_eq!(bound(&ctx.vars, &a), a);
    }

    #[test]
    fn occurs_check_sees_through_record_properties() {
        let mut ctx = Context::new_normal();
        let a = ctx.create_variable();
        let boxed = Type::record("Box", vec![], [("value", a.clone())]);
        assert!(!unify(&mut ctx, &a, &boxed));
        assert!(!unify(&mut ctx, &boxed, &a));
        assert_eq!(bound(&ctx.vars, &a), a);

        let b = ctx.create_variable();
        assert!(unify(&mut ctx, &b, &boxed));
        assert_eq!(bound(&ctx.vars, &b), boxed);
    }

    #[test]
    fn function_arguments_unify_contravariantly() {
        let mut ctx = Context::new_normal();
        let a = ctx.create_variable();
        let b = ctx.create_variable();
        let left = Type::func(Type::func(a.clone(), Type::integer()), Type::integer());
        let right = Type::func(Type::func(b.clone(), Type::integer()), Type::integer());
        assert!(unify(&mut ctx, &left, &right));
        // argument sides swap, binding the variable from the left side
        assert_eq!(bound(&ctx.vars, &a), b);
        assert_eq!(bound(&ctx.vars, &b), b);
    }

    #[test]
    fn contravariance_follows_bound_arguments() {
        let mut ctx = Context::new_normal();
        let a = ctx.create_variable();
        let b = ctx.create_variable();
        let c = ctx.create_variable();
        assert!(unify(&mut ctx, &c, &Type::func(a.clone(), Type::integer())));

        let left = Type::func(c, Type::integer());
        let right = Type::func(Type::func(b.clone(), Type::integer()), Type::integer());
        assert!(unify(&mut ctx, &left, &right));
        assert_eq!(bound(&ctx.vars, &a), b);
        assert_eq!(bound(&ctx.vars, &b), b);
    }

    #[test]
    fn failure_rolls_back_partial_bindings() {
        let mut ctx = Context::new_normal();
        let a = ctx.create_variable();
        let left = Type::func(a.clone(), Type::integer());
        let right = Type::func(Type::string(), Type::boolean());
        assert!(!unify(&mut ctx, &left, &right));
        assert_eq!(bound(&ctx.vars, &a), a);
    }

    #[test]
    fn mismatch_reports_exposed_types() {
        let mut ctx = Context::new_normal();
        let a = ctx.create_variable();
        assert!(unify(&mut ctx, &a, &Type::integer()));
        assert_eq!(
            unify_or_error(&mut ctx, &a, &Type::string()),
            Err(Error::Type {
                expected: Type::integer(),
                found: Type::string(),
            })
        );
    }

    #[test]
    fn simple_type_matches_a_union_member() {
        let mut ctx = Context::new_normal();
        let u = Type::union(vec![Type::integer(), Type::string()]).unwrap();
        assert!(unify(&mut ctx, &Type::integer(), &u));
        assert!(unify(&mut ctx, &u, &Type::string()));
        assert!(!unify(&mut ctx, &Type::boolean(), &u));
    }

    #[test]
    fn single_successful_alternative_commits_its_bindings() {
        let mut ctx = Context::new_normal();
        let a = ctx.create_variable();
        let u = Type::union(vec![
            Type::func(Type::integer(), Type::string()),
            Type::func(Type::boolean(), Type::double()),
        ])
        .unwrap();
        assert!(unify(&mut ctx, &Type::func(Type::boolean(), a.clone()), &u));
        assert_eq!(bound(&ctx.vars, &a), Type::double());
    }

    #[test]
    fn several_successful_alternatives_accrete() {
        let mut ctx = Context::new_normal();
        let r = ctx.create_variable();
        let u = Type::union(vec![
            Type::func(Type::integer(), Type::integer()),
            Type::func(Type::integer(), Type::double()),
        ])
        .unwrap();
        assert!(unify(&mut ctx, &Type::func(Type::integer(), r.clone()), &u));
        assert_eq!(
            bound(&ctx.vars, &r),
            Type::union(vec![Type::integer(), Type::double()]).unwrap()
        );
    }

    #[test]
    fn function_results_must_agree() {
        let mut ctx = Context::new_normal();
        let left = Type::func(Type::integer(), Type::string());
        let right = Type::func(Type::integer(), Type::boolean());
        assert!(!unify(&mut ctx, &left, &right));
        assert!(unify(&mut ctx, &left, &left.clone()));
    }

    #[test]
    fn records_compare_names_and_properties() {
        let mut ctx = Context::new_normal();
        let a = ctx.create_variable();
        let p1 = Type::record("Point", vec![], [("x", Type::double()), ("y", a.clone())]);
        let p2 = Type::record("Point", vec![], [("x", Type::double()), ("y", Type::double())]);
        let q = Type::record("Pair", vec![], [("x", Type::double()), ("y", Type::double())]);
        let r = Type::record("Point", vec![], [("y", Type::double()), ("x", Type::double())]);
        assert!(!unify(&mut ctx, &p1, &q));
        assert!(!unify(&mut ctx, &p1, &r));
        assert!(unify(&mut ctx, &p1, &p2));
        assert_eq!(bound(&ctx.vars, &a), Type::double());
    }

    #[test]
    fn option_unifies_with_its_algebraic_type() {
        let mut ctx = Context::new_normal();
        let (maybe, a) = maybe(&mut ctx);
        let just = Type::record("Just", vec![Type::integer()], [("value", Type::integer())]);
        assert!(unify(&mut ctx, &just, &maybe));
        assert_eq!(bound(&ctx.vars, &a), Type::integer());
        assert!(unify(&mut ctx, &maybe, &Type::simple("Nothing")));
        assert!(!unify(&mut ctx, &Type::simple("Never"), &maybe));
    }

    #[test]
    fn algebraic_types_unify_by_arguments() {
        let mut ctx = Context::new_normal();
        let (m1, a) = maybe(&mut ctx);
        let (m2, b) = maybe(&mut ctx);
        assert!(unify(&mut ctx, &b, &Type::string()));
        assert!(unify(&mut ctx, &m1, &m2));
        assert_eq!(bound(&ctx.vars, &a), Type::string());

        let (m3, _) = maybe(&mut ctx);
        let (l, _) = list(&mut ctx);
        assert!(!unify(&mut ctx, &m3, &l));
    }

    #[test]
    fn cons_cell_is_a_member_of_its_list() {
        let mut ctx = Context::new_normal();
        let (list, a) = list(&mut ctx);
        let (inner, b) = self::list(&mut ctx);
        assert!(unify(&mut ctx, &b, &Type::integer()));
        let cons = Type::record(
            "Cons",
            vec![Type::integer()],
            [("head", Type::integer()), ("tail", inner)],
        );
        assert!(unify(&mut ctx, &cons, &list));
        assert_eq!(bound(&ctx.vars, &a), Type::integer());
        assert!(unify(&mut ctx, &Type::simple("Empty"), &list));
    }

    #[test]
    fn recursive_placeholder_expands_through_definitions() {
        let mut ctx = Context::new_normal();
        let (def, _) = list(&mut ctx);
        assert!(ctx.define_type(def));

        let (list, b) = list(&mut ctx);
        let placeholder = Type::recursive("List", vec![Type::integer()]);
        assert!(unify(&mut ctx, &placeholder, &list));
        assert_eq!(bound(&ctx.vars, &b), Type::integer());
    }

    #[test]
    fn recursive_placeholder_matches_same_named_type() {
        let mut ctx = Context::new_normal();
        let a = ctx.create_variable();
        let (list, b) = list(&mut ctx);
        let placeholder = Type::recursive("List", vec![a.clone()]);
        assert!(unify(&mut ctx, &b, &Type::boolean()));
        assert!(unify(&mut ctx, &placeholder, &list));
        assert_eq!(bound(&ctx.vars, &a), Type::boolean());
        assert!(!unify(&mut ctx, &placeholder, &Type::integer()));
    }

    #[test]
    fn decomposed_list_unrolls_two_levels() {
        let mut ctx = Context::new_normal();
        let (list, a) = list(&mut ctx);
        assert!(unify(&mut ctx, &a, &Type::integer()));

        let options = decompose(&ctx.vars, &list);
        let Type::Record(_, _, props) = &options[0] else {
            panic!("expected a record option");
        };
        let tail = &props[1].ty;
        assert_eq!(tail.name().map(|n| n.as_str()), Some("List"));
        let again = decompose(&ctx.vars, tail);
        assert_eq!(again.len(), 2);
        assert_eq!(again[1], Type::simple("Empty"));
    }
}
