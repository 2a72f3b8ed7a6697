use crate::handoff::finalize;
use crate::translate::Translator;
use snacks_ast::*;
use snacks_common::dep_graph::DependencyGraph;
use snacks_diag::{self as diag, Diagnostic};
use snacks_solve::{infer_declaration_group, Context, Locator, Reference};
use snacks_types::Type;

use std::collections::HashMap;
use ustr::{ustr, Ustr};

/// The declaration a stand-alone expression is typed as.
pub const EXPRESSION_NAME: &str = "it";

/// Types every declaration of a module.
///
/// Declarations are typed after the declarations they refer to; mutually
/// recursive ones are typed as one group. Redefining a name that an earlier
/// module in the same context declared replaces it.
pub fn check_module(ctx: &mut Context, module: &Module) -> diag::Result<TypedModule> {
    ctx.add_module(module.name);

    let mut index: HashMap<Ustr, usize> = HashMap::new();
    for (i, decl) in module.decls.iter().enumerate() {
        if index.insert(decl.name.kind, i).is_some() {
            return Err(Diagnostic::error(
                format!("duplicate declaration `{}`", decl.name.kind),
                decl.name.span,
            ));
        }
    }

    let mut graph = DependencyGraph::<usize>::new();
    for (i, decl) in module.decls.iter().enumerate() {
        graph.add_entry(i);
        for name in decl.body.free_names() {
            if let Some(&j) = index.get(&name) {
                graph.add_dependency(i, j);
            }
        }
    }

    let mut typed: Vec<Option<TypedDecl>> = module.decls.iter().map(|_| None).collect();
    for group in graph.into_groups() {
        log::debug!(
            "typing group [{}]",
            group
                .iter()
                .map(|&i| module.decls[i].name.kind.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        let decls = group.iter().map(|&i| &module.decls[i]).collect::<Vec<_>>();
        for (i, decl) in group.iter().zip(check_group(ctx, module.name, &decls)?) {
            typed[*i] = Some(decl);
        }
    }

    Ok(TypedModule {
        name: module.name,
        decls: typed.into_iter().flatten().collect(),
    })
}

fn check_group(
    ctx: &mut Context,
    module: Ustr,
    decls: &[&Decl],
) -> diag::Result<Vec<TypedDecl>> {
    let locators = decls
        .iter()
        .map(|d| Locator::Declaration {
            module,
            name: d.name.kind,
        })
        .collect::<Vec<_>>();
    for locator in &locators {
        ctx.env.forget(locator);
    }

    let mut bodies = vec![];
    let types = infer_declaration_group(ctx, &locators, |ctx, i| -> diag::Result<Type> {
        let body = Translator::new(ctx, module).expr(&decls[i].body)?;
        let ty = body.ty.clone();
        bodies.push(body);
        Ok(ty)
    });
    let types = match types {
        Ok(types) => types,
        Err(d) => {
            // the failing body is the last one translated
            let failed = bodies.len().saturating_sub(1);
            return Err(match decls.get(failed) {
                Some(decl) => d.with_span(decl.span),
                None => d,
            });
        }
    };

    let mut out = vec![];
    let typed = types.into_iter().zip(bodies);
    for ((decl, locator), (ty, mut body)) in decls.iter().zip(&locators).zip(typed) {
        if let Err(d) = finalize(ctx, &ty, &mut body) {
            for locator in &locators {
                ctx.env.forget(locator);
            }
            return Err(d);
        }
        out.push(TypedDecl {
            locator: locator.clone(),
            ty,
            body,
            span: decl.span,
        });
    }
    Ok(out)
}

/// Types a stand-alone expression and binds it to the declaration `it` of
/// the context's module, replacing the previous one. The expression itself
/// may still refer to the previous `it`.
pub fn check_expression(ctx: &mut Context, expr: &Expr) -> diag::Result<TypedDecl> {
    let module = ctx.module();
    let locator = Locator::Declaration {
        module,
        name: ustr(EXPRESSION_NAME),
    };
    let mut body = Translator::new(ctx, module).expr(expr)?;
    let ty = ctx.expose(&body.ty);
    finalize(ctx, &ty, &mut body)?;

    ctx.env.forget(&locator);
    ctx.define(Reference::new(locator.clone(), ty.clone()));
    Ok(TypedDecl {
        locator,
        ty,
        body,
        span: expr.span,
    })
}
