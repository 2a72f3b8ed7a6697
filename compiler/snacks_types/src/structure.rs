//! Structural primitives over types whose variables live in a [`TyVars`] arena.

use crate::ty::{Type, TypeVar};
use crate::vars::{TyVars, VarId};

use std::collections::HashMap;

/// Follows bound variables at the top level only.
pub fn shallow(vars: &TyVars, t: &Type) -> Type {
    let mut t = t;
    while let Type::Variable(v) = t {
        match vars.binding(v.id) {
            Some(b) => t = b,
            None => break,
        }
    }
    t.clone()
}

/// Strips bound-variable indirection everywhere in a type. The result only
/// contains unbound variables and unions in normal form.
pub fn expose(vars: &TyVars, t: &Type) -> Type {
    match shallow(vars, t) {
        t @ Type::Variable(_) => t,
        t => t.map_children(|c| expose(vars, c)),
    }
}

/// Enumerates the concrete alternatives a type stands for: the members of a
/// union, the options of an algebraic type (unrolled one level), or the type
/// itself.
pub fn decompose(vars: &TyVars, t: &Type) -> Vec<Type> {
    let t = expose(vars, t);
    match &t {
        Type::Union(members) => members.clone(),
        Type::Algebraic(_, _, options) => options.iter().map(|o| o.unroll(&t)).collect(),
        _ => vec![t.clone()],
    }
}

/// Returns true if the exposed `t` structurally appears anywhere inside the
/// exposed `other` (including `other` itself).
pub fn occurs_in(vars: &TyVars, t: &Type, other: &Type) -> bool {
    let t = expose(vars, t);
    let other = expose(vars, other);
    occurs_exposed(&t, &other)
}

fn occurs_exposed(t: &Type, other: &Type) -> bool {
    t == other || other.children().into_iter().any(|c| occurs_exposed(t, c))
}

/// Returns true if the unbound variable occurs strictly inside `other`.
pub fn var_occurs_within(vars: &TyVars, var: TypeVar, other: &Type) -> bool {
    let t = Type::Variable(var);
    expose(vars, other)
        .children()
        .into_iter()
        .any(|c| occurs_exposed(&t, c))
}

/// Decides structural equality of the exposed forms of two types. Union
/// members compare as sets.
pub fn equivalent(vars: &TyVars, a: &Type, b: &Type) -> bool {
    equivalent_exposed(&expose(vars, a), &expose(vars, b))
}

fn equivalent_exposed(a: &Type, b: &Type) -> bool {
    fn all(xs: &[Type], ys: &[Type]) -> bool {
        xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| equivalent_exposed(x, y))
    }

    match (a, b) {
        (Type::Union(xs), Type::Union(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|x| ys.iter().any(|y| equivalent_exposed(x, y)))
        }
        (Type::Simple(x), Type::Simple(y)) => x == y,
        (Type::Variable(x), Type::Variable(y)) => x.id == y.id,
        (Type::Function(a1, b1), Type::Function(a2, b2)) => {
            equivalent_exposed(a1, a2) && equivalent_exposed(b1, b2)
        }
        (Type::Record(n1, a1, p1), Type::Record(n2, a2, p2)) => {
            n1 == n2
                && all(a1, a2)
                && p1.len() == p2.len()
                && p1
                    .iter()
                    .zip(p2)
                    .all(|(x, y)| x.name == y.name && equivalent_exposed(&x.ty, &y.ty))
        }
        (Type::Algebraic(n1, a1, o1), Type::Algebraic(n2, a2, o2)) => {
            n1 == n2 && all(a1, a2) && all(o1, o2)
        }
        (Type::Recursive(n1, a1), Type::Recursive(n2, a2)) => n1 == n2 && all(a1, a2),
        _ => false,
    }
}

/// Lists the unbound variables of a type in order of first appearance.
pub fn free_vars(vars: &TyVars, t: &Type) -> Vec<TypeVar> {
    fn collect(t: &Type, out: &mut Vec<TypeVar>) {
        match t {
            Type::Variable(v) => {
                if !out.contains(v) {
                    out.push(*v);
                }
            }
            t => t.children().into_iter().for_each(|c| collect(c, out)),
        }
    }
    let mut out = vec![];
    collect(&expose(vars, t), &mut out);
    out
}

/// Copies a type, replacing every generic unbound variable with a fresh one.
///
/// `mappings` keeps the copy consistent: two occurrences of the same generic
/// variable become the same fresh variable. Variables for which `is_generic`
/// returns false are shared with the original.
pub fn generic_copy(
    vars: &mut TyVars,
    t: &Type,
    is_generic: &dyn Fn(VarId) -> bool,
    mappings: &mut HashMap<VarId, Type>,
) -> Type {
    match shallow(vars, t) {
        Type::Variable(v) if is_generic(v.id) => mappings
            .entry(v.id)
            .or_insert_with(|| Type::Variable(vars.fresh()))
            .clone(),
        t @ (Type::Variable(_) | Type::Simple(_)) => t,
        t => t.map_children(|c| generic_copy(vars, c, is_generic, mappings)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn maybe(vars: &mut TyVars) -> (TypeVar, Type) {
        let a = vars.fresh_named("a");
        let just = Type::record("Just", vec![a.into()], [("value", Type::from(a))]);
        let maybe = Type::algebraic("Maybe", vec![a.into()], vec![just, Type::simple("Nothing")]);
        (a, maybe)
    }

    #[test]
    fn expose_follows_bindings_recursively() {
        let mut vars = TyVars::new();
        let a = vars.fresh();
        let b = vars.fresh();
        vars.bind(a.id, Type::func(b.into(), Type::integer()));
        vars.bind(b.id, Type::string());

        let exposed = expose(&vars, &a.into());
        assert_eq!(exposed, Type::func(Type::string(), Type::integer()));
        assert_eq!(expose(&vars, &exposed), exposed);
    }

    #[test]
    fn expose_normalizes_unions() {
        let mut vars = TyVars::new();
        let a = vars.fresh();
        vars.bind(a.id, Type::integer());
        let u = Type::Union(vec![a.into(), Type::integer()]);
        assert_eq!(expose(&vars, &u), Type::integer());
    }

    #[test]
    fn decompose_alternatives() {
        let mut vars = TyVars::new();
        let u = Type::union(vec![Type::integer(), Type::string()]).unwrap();
        assert_eq!(decompose(&vars, &u), vec![Type::integer(), Type::string()]);
        assert_eq!(decompose(&vars, &Type::boolean()), vec![Type::boolean()]);

        let (_, maybe) = maybe(&mut vars);
        let options = decompose(&vars, &maybe);
        assert_eq!(options.len(), 2);
        assert_eq!(options[1], Type::simple("Nothing"));
    }

    #[test]
    fn decompose_unrolls_recursive_options() {
        let mut vars = TyVars::new();
        let a = vars.fresh_named("a");
        let cons = Type::record(
            "Cons",
            vec![a.into()],
            [
                ("head", Type::from(a)),
                ("tail", Type::recursive("List", vec![a.into()])),
            ],
        );
        let list = Type::algebraic("List", vec![a.into()], vec![cons, Type::simple("Empty")]);

        let options = decompose(&vars, &list);
        let Type::Record(_, _, props) = &options[0] else {
            panic!("expected a record option");
        };
        assert_eq!(props[1].ty, list);
    }

    #[test]
    fn occurs_check() {
        let mut vars = TyVars::new();
        let a = vars.fresh();
        let f = Type::func(a.into(), Type::integer());
        assert!(occurs_in(&vars, &a.into(), &f));
        assert!(var_occurs_within(&vars, a, &f));
        assert!(!var_occurs_within(&vars, a, &a.into()));
        assert!(!occurs_in(&vars, &Type::string(), &f));
    }

    #[test]
    fn union_equivalence_ignores_order() {
        let vars = TyVars::new();
        let a = Type::union(vec![Type::integer(), Type::string()]).unwrap();
        let b = Type::union(vec![Type::string(), Type::integer()]).unwrap();
        assert_ne!(a, b);
        assert!(equivalent(&vars, &a, &b));
        assert!(equivalent(
            &vars,
            &Type::func(a.clone(), Type::boolean()),
            &Type::func(b, Type::boolean())
        ));
        assert!(!equivalent(&vars, &a, &Type::integer()));
    }

    #[test]
    fn free_vars_in_order() {
        let mut vars = TyVars::new();
        let a = vars.fresh();
        let b = vars.fresh();
        let t = Type::funcs([b.into(), a.into()], b.into());
        assert_eq!(free_vars(&vars, &t), vec![b, a]);
    }

    #[test]
    fn generic_copy_freshens_consistently() {
        let mut vars = TyVars::new();
        let a = vars.fresh();
        let pinned = vars.fresh();
        let t = Type::funcs([a.into(), pinned.into()], a.into());

        let mut mappings = HashMap::new();
        let copy = generic_copy(&mut vars, &t, &|id| id != pinned.id, &mut mappings);
        let Type::Function(x, rest) = &copy else {
            panic!("expected a function");
        };
        let Type::Function(y, z) = &**rest else {
            panic!("expected a function");
        };
        assert_ne!(**x, Type::from(a));
        assert_eq!(**y, Type::from(pinned));
        assert_eq!(x, z);

        // the copy binds independently of the original
        let fresh = x.as_var().unwrap();
        vars.bind(fresh.id, Type::integer());
        assert!(!vars.is_bound(a.id));
    }
}
