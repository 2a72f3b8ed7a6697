//! Operator signatures of the `snacks.lang` module, defined in the root scope.

use crate::env::{Locator, Reference};
use crate::Context;
use snacks_types::Type;

pub const LANG_MODULE: &str = "snacks.lang";

/// Name under which a prefix operator is defined.
pub fn unary_name(op: &str) -> String {
    format!("unary{op}")
}

fn numeric() -> [(Type, Type, Type); 4] {
    let (i, d) = (Type::integer(), Type::double());
    [
        (i.clone(), i.clone(), i.clone()),
        (i.clone(), d.clone(), d.clone()),
        (d.clone(), i.clone(), d.clone()),
        (d.clone(), d.clone(), d),
    ]
}

fn binary(ctx: &mut Context, op: &str, overloads: impl IntoIterator<Item = (Type, Type, Type)>) {
    for (l, r, result) in overloads {
        define(ctx, op, Type::funcs([l, r], result));
    }
}

fn define(ctx: &mut Context, name: &str, ty: Type) {
    ctx.define(Reference::new(Locator::declaration(LANG_MODULE, name), ty));
}

/// Defines every built-in operator. Overloads of one operator become the
/// candidates of a single locator.
pub fn seed(ctx: &mut Context) {
    let (b, i, d, s) = (Type::boolean(), Type::integer(), Type::double(), Type::string());

    binary(ctx, "+", numeric());
    binary(
        ctx,
        "+",
        [
            (s.clone(), s.clone(), s.clone()),
            (s.clone(), i.clone(), s.clone()),
            (s.clone(), d.clone(), s.clone()),
        ],
    );
    for op in ["-", "*", "/", "%"] {
        binary(ctx, op, numeric());
    }

    for op in ["<", "<=", ">", ">="] {
        let compare = numeric().map(|(l, r, _)| (l, r, b.clone()));
        binary(ctx, op, compare);
        binary(ctx, op, [(s.clone(), s.clone(), b.clone())]);
    }

    for op in ["==", "!="] {
        let a = ctx.create_variable();
        binary(ctx, op, [(a.clone(), a, b.clone())]);
    }

    for op in ["and", "or"] {
        binary(ctx, op, [(b.clone(), b.clone(), b.clone())]);
    }
    define(ctx, "not", Type::func(b.clone(), b));

    for op in ["+", "-"] {
        define(ctx, &unary_name(op), Type::func(i.clone(), i.clone()));
        define(ctx, &unary_name(op), Type::func(d.clone(), d.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{infer_application, Error};

    use pretty_assertions::assert_eq;
    use test_log::test;

    fn apply2(ctx: &mut Context, op: &str, l: Type, r: Type) -> crate::Result<Type> {
        let f = ctx.type_of(&Locator::declaration(LANG_MODULE, op))?;
        let partial = infer_application(ctx, &f, &l)?;
        infer_application(ctx, &partial, &r)
    }

    #[test]
    fn arithmetic_widens_to_double() {
        let mut ctx = Context::new_normal();
        let (i, d) = (Type::integer(), Type::double());
        assert_eq!(apply2(&mut ctx, "+", i.clone(), i.clone()), Ok(i.clone()));
        assert_eq!(apply2(&mut ctx, "*", i.clone(), d.clone()), Ok(d.clone()));
        assert_eq!(apply2(&mut ctx, "-", d.clone(), i.clone()), Ok(d.clone()));
        assert_eq!(apply2(&mut ctx, "%", d.clone(), d.clone()), Ok(d));
    }

    #[test]
    fn string_concatenation() {
        let mut ctx = Context::new_normal();
        let s = Type::string();
        assert_eq!(apply2(&mut ctx, "+", s.clone(), Type::integer()), Ok(s.clone()));
        assert_eq!(apply2(&mut ctx, "+", s.clone(), s.clone()), Ok(s));
    }

    #[test]
    fn boolean_arithmetic_is_rejected() {
        let mut ctx = Context::new_normal();
        let result = apply2(&mut ctx, "+", Type::boolean(), Type::integer());
        assert!(matches!(result, Err(Error::Application { .. })));
    }

    #[test]
    fn equality_is_generic() {
        let mut ctx = Context::new_normal();
        let b = Type::boolean();
        assert_eq!(apply2(&mut ctx, "==", Type::string(), Type::string()), Ok(b.clone()));
        assert_eq!(apply2(&mut ctx, "!=", Type::integer(), Type::integer()), Ok(b));
        let mixed = apply2(&mut ctx, "==", Type::integer(), Type::string());
        assert!(mixed.is_err());
    }

    #[test]
    fn negation_keeps_numeric_type() {
        let mut ctx = Context::new_normal();
        let f = ctx
            .type_of(&Locator::declaration(LANG_MODULE, &unary_name("-")))
            .unwrap();
        assert_eq!(infer_application(&mut ctx, &f, &Type::double()), Ok(Type::double()));
    }
}
