//! The typed tree handed to code generation. Operators are lowered to
//! applications of the references they resolved to.

use crate::ast::{Lit, P};
use snacks_common::span::{Span, Spanned};
use snacks_solve::{Locator, Reference};
use snacks_types::Type;

use ustr::Ustr;

#[derive(Clone, Debug, PartialEq)]
pub struct TypedModule {
    pub name: Ustr,
    pub decls: Vec<TypedDecl>,
}

impl TypedModule {
    pub fn get(&self, name: &str) -> Option<&TypedDecl> {
        self.decls.iter().find(|d| d.locator.name().as_str() == name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TypedDecl {
    pub locator: Locator,
    pub ty: Type,
    pub body: TypedExpr,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TypedExpr {
    pub kind: TypedKind,
    pub ty: Type,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TypedKind {
    Lit(Lit),
    Reference(Reference),
    Apply(P<TypedExpr>, P<TypedExpr>),
    /// A lambda and the reference its parameter is bound to.
    Lambda(Reference, P<TypedExpr>),
    If(P<TypedExpr>, P<TypedExpr>, P<TypedExpr>),
    Let(Reference, P<TypedExpr>, P<TypedExpr>),
}

impl TypedExpr {
    pub fn new(kind: TypedKind, ty: Type, span: Span) -> Self {
        Self { kind, ty, span }
    }

    /// Immediate subexpressions.
    pub fn children(&self) -> Vec<&TypedExpr> {
        match &self.kind {
            TypedKind::Lit(_) | TypedKind::Reference(_) => vec![],
            TypedKind::Apply(a, b) => vec![&**a, &**b],
            TypedKind::Lambda(_, body) => vec![&**body],
            TypedKind::If(c, a, b) => vec![&**c, &**a, &**b],
            TypedKind::Let(_, value, body) => vec![&**value, &**body],
        }
    }

    /// Rewrites every type in the tree, including the types of references.
    pub fn map_types(&mut self, f: &mut impl FnMut(&Type) -> Type) {
        self.ty = f(&self.ty);
        match &mut self.kind {
            TypedKind::Lit(_) => {}
            TypedKind::Reference(r) => r.ty = f(&r.ty),
            TypedKind::Apply(a, b) => {
                a.map_types(f);
                b.map_types(f);
            }
            TypedKind::Lambda(param, body) => {
                param.ty = f(&param.ty);
                body.map_types(f);
            }
            TypedKind::If(c, a, b) => {
                c.map_types(f);
                a.map_types(f);
                b.map_types(f);
            }
            TypedKind::Let(x, value, body) => {
                x.ty = f(&x.ty);
                value.map_types(f);
                body.map_types(f);
            }
        }
    }

    /// Visits every node, parents before children.
    pub fn for_each(&self, f: &mut impl FnMut(&TypedExpr)) {
        f(self);
        for child in self.children() {
            child.for_each(f);
        }
    }
}

impl Spanned for TypedExpr {
    fn span(&self) -> Span {
        self.span
    }
}

impl Spanned for TypedDecl {
    fn span(&self) -> Span {
        self.span
    }
}
