use snacks_ast::*;
use snacks_diag::{self as diag, Diagnostic, IntoDiagnostic};
use snacks_solve::builtins::LANG_MODULE;
use snacks_solve::{
    infer_application, infer_declaration, unify, unify_or_error, Context, Error, Locator,
    Reference,
};
use snacks_types::Type;

use ustr::{ustr, Ustr};

fn located(span: Span) -> impl Fn(Error) -> Diagnostic {
    move |e| e.into_diagnostic().with_span(span)
}

fn lit_type(lit: &Lit) -> Type {
    match lit {
        Lit::Int(_) => Type::integer(),
        Lit::Double(_) => Type::double(),
        Lit::String(_) => Type::string(),
        Lit::Bool(_) => Type::boolean(),
    }
}

/// Types the expressions of one module.
pub struct Translator<'a> {
    ctx: &'a mut Context,
    module: Ustr,
}

impl<'a> Translator<'a> {
    pub fn new(ctx: &'a mut Context, module: Ustr) -> Self {
        Self { ctx, module }
    }

    /// Picks the locator a name refers to: a local variable, then a
    /// declaration of the current module, then a built-in.
    fn resolve(&self, path: &Path) -> Locator {
        let name = path.name;
        if let Some(module) = path.module {
            return Locator::Declaration { module, name };
        }
        [
            Locator::Variable(name),
            Locator::Declaration {
                module: self.module,
                name,
            },
            Locator::Declaration {
                module: ustr(LANG_MODULE),
                name,
            },
        ]
        .into_iter()
        .find(|l| self.ctx.is_defined(l))
        .unwrap_or(Locator::Variable(name))
    }

    fn reference(&mut self, locator: Locator, span: Span) -> diag::Result<TypedExpr> {
        let ty = self.ctx.type_of(&locator).map_err(located(span))?;
        let reference = Reference::new(locator, ty.clone());
        Ok(TypedExpr::new(TypedKind::Reference(reference), ty, span))
    }

    fn apply(&mut self, f: TypedExpr, a: TypedExpr, span: Span) -> diag::Result<TypedExpr> {
        let ty = infer_application(self.ctx, &f.ty, &a.ty).map_err(located(span))?;
        Ok(TypedExpr::new(TypedKind::Apply(P::new(f), P::new(a)), ty, span))
    }

    pub fn expr(&mut self, e: &Expr) -> diag::Result<TypedExpr> {
        let span = e.span;
        match &e.kind {
            ExprKind::Lit(lit) => Ok(TypedExpr::new(
                TypedKind::Lit(lit.clone()),
                lit_type(lit),
                span,
            )),
            ExprKind::Name(path) => {
                let locator = self.resolve(path);
                self.reference(locator, span)
            }
            ExprKind::Apply(f, a) => {
                let f = self.expr(f)?;
                let a = self.expr(a)?;
                self.apply(f, a, span)
            }
            ExprKind::Binary(op, l, r) => {
                let locator = Locator::declaration(LANG_MODULE, op.symbol());
                let op = self.reference(locator, span)?;
                let l = self.expr(l)?;
                let r = self.expr(r)?;
                let partial = self.apply(op, l, span)?;
                self.apply(partial, r, span)
            }
            ExprKind::Unary(op, x) => {
                let locator = Locator::declaration(LANG_MODULE, op.declared_name());
                let op = self.reference(locator, span)?;
                let x = self.expr(x)?;
                self.apply(op, x, span)
            }
            ExprKind::Lambda(param, body) => self.lambda(param, body, span),
            ExprKind::If(c, a, b) => self.if_else(c, a, b, span),
            ExprKind::Let(x, value, body) => {
                self.ctx.enter_scope();
                let result = self.let_in(x, value, body, span);
                self.ctx.leave_scope();
                result
            }
        }
    }

    fn lambda(&mut self, param: &Ident, body: &Expr, span: Span) -> diag::Result<TypedExpr> {
        self.ctx.enter_scope();
        let v = self.ctx.create_variable();
        let locator = Locator::Variable(param.kind);
        self.ctx.define(Reference::new(locator.clone(), v.clone()));
        self.ctx.specialize(v.clone());
        let body = self.expr(body);
        self.ctx.generify(&v);
        self.ctx.leave_scope();

        let body = body?;
        let ty = Type::func(self.ctx.expose(&v), body.ty.clone());
        let param = Reference::new(locator, v);
        Ok(TypedExpr::new(TypedKind::Lambda(param, P::new(body)), ty, span))
    }

    /// The branches of a conditional are unified; when they cannot be, the
    /// conditional has the union of both.
    fn if_else(&mut self, c: &Expr, a: &Expr, b: &Expr, span: Span) -> diag::Result<TypedExpr> {
        let c = self.expr(c)?;
        unify_or_error(self.ctx, &Type::boolean(), &c.ty).map_err(located(c.span))?;
        let a = self.expr(a)?;
        let b = self.expr(b)?;
        let ty = if unify(self.ctx, &a.ty, &b.ty) {
            self.ctx.expose(&a.ty)
        } else {
            let branches = [self.ctx.expose(&a.ty), self.ctx.expose(&b.ty)];
            Type::union(branches)
                .ok_or_else(|| Diagnostic::error("conditional has no admissible type", span))?
        };
        Ok(TypedExpr::new(
            TypedKind::If(P::new(c), P::new(a), P::new(b)),
            ty,
            span,
        ))
    }

    fn let_in(
        &mut self,
        x: &Ident,
        value: &Expr,
        body: &Expr,
        span: Span,
    ) -> diag::Result<TypedExpr> {
        let locator = Locator::Variable(x.kind);
        let module = self.module;
        let mut typed = None;
        let ty = infer_declaration(self.ctx, locator.clone(), |ctx| -> diag::Result<Type> {
            let value = Translator::new(ctx, module).expr(value)?;
            let ty = value.ty.clone();
            typed = Some(value);
            Ok(ty)
        })
        .map_err(|d| d.with_span(x.span))?;
        let Some(value) = typed else {
            return Err(Diagnostic::error("let binding has no value", x.span));
        };

        let body = self.expr(body)?;
        let ty_body = body.ty.clone();
        Ok(TypedExpr::new(
            TypedKind::Let(Reference::new(locator, ty), P::new(value), P::new(body)),
            ty_body,
            span,
        ))
    }
}
