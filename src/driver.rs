use snacks_ast::print::Signature;
use snacks_common::source::{SourceFile, SourceId, SourceMap};
use snacks_diag::{self as diag, IntoDiagnostic, Report};
use snacks_parse as parse;
use snacks_print::PrettyString;
use snacks_solve::{Config, Context, Locator};
use snacks_typeck::{check_expression, check_module, Translator};
use snacks_types::print::Generalized;

use ustr::ustr;

#[derive(Clone, Copy, Debug, Default)]
pub struct Options {
    /// Print the typed tree of every declaration after its signature.
    pub typed_ast: bool,
}

/// One compilation session: the type checking context and every source seen
/// so far, so diagnostics of earlier inputs keep their snippets.
pub struct Session {
    pub ctx: Context,
    pub sources: SourceMap,
    pub options: Options,
}

impl Session {
    pub fn new(module: &str, trace: bool, options: Options) -> Self {
        let config = Config {
            module: ustr(module),
            trace,
        };
        Self {
            ctx: Context::new(config),
            sources: SourceMap::new(),
            options,
        }
    }

    /// Types a whole source as a module and prints its signatures.
    pub fn evaluate(&mut self, source_id: SourceId) -> Result<(), Report> {
        let file = source_file(&self.sources, source_id)?;
        let module = parse::parse_module(file, self.ctx.module())?;
        log::debug!("parsed {} declarations from {}", module.decls.len(), file.name());

        let typed = check_module(&mut self.ctx, &module)?;
        for decl in &typed.decls {
            println!("{}", Signature(decl).pretty_string(&self.ctx.vars));
            if self.options.typed_ast {
                let _ = decl.body.print_stdout(&self.ctx.vars);
            }
        }
        Ok(())
    }

    /// Evaluates one line of interactive input: a command, declarations or a
    /// bare expression.
    pub fn evaluate_line(&mut self, line: &str, name: String) -> Result<(), Report> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }
        if let Some(command) = line.strip_prefix(':') {
            let (command, args) = command.split_once(' ').unwrap_or((command, ""));
            return self.eval_command(command, args.trim(), name);
        }

        let source_id = self.sources.add(name, line);
        let file = source_file(&self.sources, source_id)?;
        if parse::parse_module(file, self.ctx.module()).is_ok() {
            return self.evaluate(source_id);
        }

        let expr = parse::parse_expr(file)?;
        let decl = check_expression(&mut self.ctx, &expr)?;
        println!("{}", Signature(&decl).pretty_string(&self.ctx.vars));
        if self.options.typed_ast {
            let _ = decl.body.print_stdout(&self.ctx.vars);
        }
        Ok(())
    }

    fn eval_command(&mut self, command: &str, args: &str, name: String) -> Result<(), Report> {
        match command {
            "type" | "t" => {
                let source_id = self.sources.add(name, args);
                let file = source_file(&self.sources, source_id)?;
                let expr = parse::parse_expr(file)?;
                let module = self.ctx.module();
                let typed = Translator::new(&mut self.ctx, module).expr(&expr)?;
                println!("{}", Generalized(&typed.ty).pretty_string(&self.ctx.vars));
                Ok(())
            }
            "env" => {
                let module = self.ctx.module();
                let mut names = self
                    .ctx
                    .env
                    .locators()
                    .into_iter()
                    .filter(|l| matches!(l, Locator::Declaration { module: m, .. } if *m == module))
                    .cloned()
                    .collect::<Vec<_>>();
                names.sort_by(|a, b| a.name().as_str().cmp(b.name().as_str()));
                for locator in names {
                    for ty in self.ctx.env.candidates(&locator) {
                        println!(
                            "{} : {}",
                            locator.name(),
                            Generalized(ty).pretty_string(&self.ctx.vars)
                        );
                    }
                }
                Ok(())
            }
            _ => Err(format!("unknown command `{}`", command).into_diagnostic().into()),
        }
    }
}

fn source_file(sources: &SourceMap, source_id: SourceId) -> diag::Result<&SourceFile> {
    sources
        .get(source_id)
        .ok_or_else(|| format!("unknown source {:?}", source_id).into_diagnostic())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repl_lines_accumulate_declarations() {
        let mut session = Session::new("main", false, Options::default());
        session
            .evaluate_line("double = x -> x * 2", "<repl 0>".to_owned())
            .unwrap();
        session
            .evaluate_line("double 4", "<repl 1>".to_owned())
            .unwrap();
        let it = session
            .ctx
            .type_of(&Locator::declaration("main", "it"))
            .unwrap();
        assert_eq!(
            Generalized(&it).plain_string(&session.ctx.vars),
            "Integer | Double"
        );
    }

    #[test]
    fn unknown_commands_are_reported() {
        let mut session = Session::new("main", false, Options::default());
        let report = session
            .evaluate_line(":frobnicate", "<repl 0>".to_owned())
            .unwrap_err();
        assert!(report.has_errors());
    }

    #[test]
    fn failed_lines_leave_the_session_usable() {
        let mut session = Session::new("main", false, Options::default());
        assert!(session
            .evaluate_line("bad = True + 1", "<repl 0>".to_owned())
            .is_err());
        session
            .evaluate_line("good = 1 + 1", "<repl 1>".to_owned())
            .unwrap();
        assert!(!session.ctx.is_defined(&Locator::declaration("main", "bad")));
        assert!(session.ctx.is_defined(&Locator::declaration("main", "good")));
    }
}
