//! The syntax tree handed over by the parser.

pub use crate::node::Node;
pub use snacks_common::{
    span::{Span, Spanned},
    P,
};

use std::fmt;
use ustr::Ustr;

/// A module: an ordered list of top-level declarations.
#[derive(Clone, Debug, PartialEq)]
pub struct Module {
    pub name: Ustr,
    pub decls: Vec<Decl>,
}

/// A named top-level declaration `name = body`.
#[derive(Clone, Debug, PartialEq)]
pub struct Decl {
    pub name: Ident,
    pub body: P<Expr>,
    pub span: Span,
}

impl Spanned for Decl {
    fn span(&self) -> Span {
        self.span
    }
}

pub type Ident = Node<Ustr>;

/// A possibly qualified name, e.g. `x` or `snacks.lang.not`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Path {
    pub module: Option<Ustr>,
    pub name: Ustr,
}

impl Path {
    pub fn local(name: Ustr) -> Self {
        Self { module: None, name }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.module {
            Some(module) => write!(f, "{module}.{}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// An expression.
pub type Expr = Node<ExprKind>;

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Lit(Lit),
    Name(Path),
    /// Juxtaposition `f a`.
    Apply(P<Expr>, P<Expr>),
    Binary(BinOp, P<Expr>, P<Expr>),
    Unary(UnOp, P<Expr>),
    /// `x -> body`
    Lambda(Ident, P<Expr>),
    /// `if c then a else b`
    If(P<Expr>, P<Expr>, P<Expr>),
    /// `let x = value in body`
    Let(Ident, P<Expr>, P<Expr>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Lit {
    Int(i64),
    Double(f64),
    String(String),
    Bool(bool),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

impl BinOp {
    /// The name the operator is declared under.
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::And => "and",
            BinOp::Or => "or",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnOp {
    Neg,
    Plus,
    Not,
}

impl UnOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnOp::Neg => "-",
            UnOp::Plus => "+",
            UnOp::Not => "not",
        }
    }

    /// The name the operator is declared under. Prefix `+` and `-` are kept
    /// apart from their binary counterparts.
    pub fn declared_name(&self) -> &'static str {
        match self {
            UnOp::Neg => "unary-",
            UnOp::Plus => "unary+",
            UnOp::Not => "not",
        }
    }
}

impl ExprKind {
    /// Collects the unqualified names an expression refers to that are not
    /// bound inside it, in order of first appearance.
    pub fn free_names(&self) -> Vec<Ustr> {
        fn walk(e: &ExprKind, bound: &mut Vec<Ustr>, out: &mut Vec<Ustr>) {
            match e {
                ExprKind::Lit(_) => {}
                ExprKind::Name(path) => {
                    if path.module.is_none() && !bound.contains(&path.name) && !out.contains(&path.name)
                    {
                        out.push(path.name);
                    }
                }
                ExprKind::Apply(a, b) | ExprKind::Binary(_, a, b) => {
                    walk(a, bound, out);
                    walk(b, bound, out);
                }
                ExprKind::Unary(_, a) => walk(a, bound, out),
                ExprKind::Lambda(param, body) => {
                    bound.push(param.kind);
                    walk(body, bound, out);
                    bound.pop();
                }
                ExprKind::If(c, a, b) => {
                    walk(c, bound, out);
                    walk(a, bound, out);
                    walk(b, bound, out);
                }
                ExprKind::Let(x, value, body) => {
                    bound.push(x.kind);
                    walk(value, bound, out);
                    walk(body, bound, out);
                    bound.pop();
                }
            }
        }
        let mut out = vec![];
        walk(self, &mut vec![], &mut out);
        out
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lit::Int(n) => write!(f, "{n}"),
            Lit::Double(n) if n.fract() == 0.0 && n.is_finite() => write!(f, "{n:.1}"),
            Lit::Double(n) => write!(f, "{n}"),
            Lit::String(s) => write!(f, "{s:?}"),
            Lit::Bool(true) => write!(f, "True"),
            Lit::Bool(false) => write!(f, "False"),
        }
    }
}

/// Prints source syntax. Every compound subexpression is parenthesized, so
/// the output parses back to the same tree.
impl fmt::Display for ExprKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprKind::Lit(lit) => write!(f, "{lit}"),
            ExprKind::Name(path) => write!(f, "{path}"),
            ExprKind::Apply(a, b) => write!(f, "({} {})", a.kind, b.kind),
            ExprKind::Binary(op, a, b) => write!(f, "({} {} {})", a.kind, op.symbol(), b.kind),
            ExprKind::Unary(UnOp::Not, a) => write!(f, "(not {})", a.kind),
            ExprKind::Unary(op, a) => write!(f, "({}{})", op.symbol(), a.kind),
            ExprKind::Lambda(x, body) => write!(f, "({} -> {})", x.kind, body.kind),
            ExprKind::If(c, a, b) => {
                write!(f, "(if {} then {} else {})", c.kind, a.kind, b.kind)
            }
            ExprKind::Let(x, value, body) => {
                write!(f, "(let {} = {} in {})", x.kind, value.kind, body.kind)
            }
        }
    }
}

impl fmt::Display for Decl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name.kind, self.body.kind)
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for decl in &self.decls {
            writeln!(f, "{decl}")?;
        }
        Ok(())
    }
}
