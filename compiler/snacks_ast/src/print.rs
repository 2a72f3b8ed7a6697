use crate::typed::*;
use snacks_print::ansi::{chars::COLON, BOLD, KEYWORD, LITERAL, RESET};
use snacks_print::{PrettyPrint, TABWIDTH};
use snacks_types::print::Generalized;
use snacks_types::TyVars;

use std::io;

/// A declaration shown as `name : type`.
pub struct Signature<'a>(pub &'a TypedDecl);

impl<'a> PrettyPrint<TyVars> for Signature<'a> {
    fn pretty_print<Output: io::Write>(
        &self,
        out: &mut Output,
        vars: &TyVars,
        _: usize,
    ) -> io::Result<()> {
        write!(out, "{BOLD}{}{RESET} {COLON} ", self.0.locator.name())?;
        Generalized(&self.0.ty).pretty_print(out, vars, 0)
    }
}

impl PrettyPrint<TyVars> for TypedModule {
    fn pretty_print<Output: io::Write>(
        &self,
        out: &mut Output,
        vars: &TyVars,
        level: usize,
    ) -> io::Result<()> {
        let tab = TABWIDTH.repeat(level);
        writeln!(out, "{tab}{KEYWORD}module{RESET} {}", self.name)?;
        for decl in &self.decls {
            decl.pretty_print(out, vars, level + 1)?;
        }
        Ok(())
    }
}

impl PrettyPrint<TyVars> for TypedDecl {
    fn pretty_print<Output: io::Write>(
        &self,
        out: &mut Output,
        vars: &TyVars,
        level: usize,
    ) -> io::Result<()> {
        let tab = TABWIDTH.repeat(level);
        write!(out, "{tab}")?;
        Signature(self).pretty_print(out, vars, 0)?;
        writeln!(out)?;
        self.body.pretty_print(out, vars, level + 1)
    }
}

impl PrettyPrint<TyVars> for TypedExpr {
    fn pretty_print<Output: io::Write>(
        &self,
        out: &mut Output,
        vars: &TyVars,
        level: usize,
    ) -> io::Result<()> {
        let tab = TABWIDTH.repeat(level);
        match &self.kind {
            TypedKind::Lit(lit) => write!(out, "{tab}{LITERAL}{lit}{RESET}")?,
            TypedKind::Reference(r) => write!(out, "{tab}{}", r.locator)?,
            TypedKind::Apply(..) => write!(out, "{tab}{KEYWORD}apply{RESET}")?,
            TypedKind::Lambda(param, _) => {
                write!(out, "{tab}{KEYWORD}lambda{RESET} {}", param.locator)?
            }
            TypedKind::If(..) => write!(out, "{tab}{KEYWORD}if{RESET}")?,
            TypedKind::Let(x, _, _) => write!(out, "{tab}{KEYWORD}let{RESET} {}", x.locator)?,
        }
        write!(out, " {COLON} ")?;
        self.ty.pretty_print(out, vars, 0)?;
        writeln!(out)?;
        for child in self.children() {
            child.pretty_print(out, vars, level + 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snacks_common::span::Span;
    use snacks_print::PrettyString;
    use snacks_solve::{Locator, Reference};
    use snacks_types::Type;

    #[test]
    fn prints_signature_and_tree() {
        let mut vars = TyVars::new();
        let a = Type::Variable(vars.fresh());
        let x = Reference::new(Locator::variable("x"), a.clone());
        let body = TypedExpr::new(
            TypedKind::Lambda(
                x.clone(),
                Box::new(TypedExpr::new(TypedKind::Reference(x), a.clone(), Span::default())),
            ),
            Type::func(a.clone(), a.clone()),
            Span::default(),
        );
        let decl = TypedDecl {
            locator: Locator::declaration("main", "identity"),
            ty: Type::func(a.clone(), a),
            body,
            span: Span::default(),
        };

        assert_eq!(Signature(&decl).plain_string(&vars), "identity : 'a -> 'a");
        assert_eq!(
            decl.plain_string(&vars),
            [
                "identity : 'a -> 'a",
                "  lambda x : 't0 -> 't0",
                "    x : 't0",
                "",
            ]
            .join("\n")
        );
    }
}
