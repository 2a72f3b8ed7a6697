mod parser;

use snacks_ast::*;
use snacks_common::{source::SourceFile, span::Span};
use snacks_diag::{Diagnostic, IntoDiagnostic, Level};

use ustr::Ustr;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxError {
    pub expected: String,
    pub span: Span,
}

impl IntoDiagnostic for SyntaxError {
    fn into_diagnostic(self) -> Diagnostic {
        Diagnostic::new(Level::Error, "syntax error".to_owned(), self.span)
            .with_inline_note(format!("expected {}", self.expected))
    }
}

//

macro_rules! parse_rule_impl {
    ($rule:ident, $file:expr) => {
        match parser::parser::$rule($file.source(), $file.id()) {
            Ok(result) => Ok(result),
            Err(err) => {
                let offset = err.location.offset;
                let mut expected: Vec<&str> = err.expected.tokens().collect();
                expected.sort_unstable();
                let expected = expected.join(" or ");
                let span = Span::new($file.id(), offset, offset + 1);
                Err(SyntaxError { expected, span })
            }
        }
    };
}

/// Parses a source file as a module named `name`.
pub fn parse_module(file: &SourceFile, name: Ustr) -> Result<Module, SyntaxError> {
    let decls = parse_rule_impl!(decls, file)?;
    Ok(Module { name, decls })
}

/// Parses a source file holding a single expression.
pub fn parse_expr(file: &SourceFile) -> Result<Expr, SyntaxError> {
    Ok(*parse_rule_impl!(expression, file)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use snacks_common::source::SourceMap;
    use snacks_common::ustr;

    use pretty_assertions::assert_eq;

    fn expr(source: &str) -> String {
        let mut map = SourceMap::new();
        let id = map.add("<test>", source);
        let file = map.get(id).unwrap();
        parse_expr(file).unwrap().kind.to_string()
    }

    fn module(source: &str) -> Module {
        let mut map = SourceMap::new();
        let id = map.add("<test>", source);
        parse_module(map.get(id).unwrap(), ustr("main")).unwrap()
    }

    #[test]
    fn operator_precedence() {
        assert_eq!(expr("1 + 2 * 3"), "(1 + (2 * 3))");
        assert_eq!(expr("1 - 2 - 3"), "((1 - 2) - 3)");
        assert_eq!(expr("a < b + 1 == c"), "((a < (b + 1)) == c)");
        assert_eq!(expr("x or y and z"), "(x or (y and z))");
        assert_eq!(expr("not True and False"), "((not True) and False)");
        assert_eq!(expr("-answer * 2"), "((-answer) * 2)");
    }

    #[test]
    fn application_binds_tighter_than_operators() {
        assert_eq!(expr("f x y + g 1"), "(((f x) y) + (g 1))");
        assert_eq!(expr("f (x + 1)"), "(f (x + 1))");
    }

    #[test]
    fn additive_operators_chain_after_operands() {
        assert_eq!(expr("1 + 2 + 3"), "((1 + 2) + 3)");
        assert_eq!(expr("a * b + c"), "((a * b) + c)");
        assert_eq!(expr("2 * 3 - 1"), "((2 * 3) - 1)");
        assert_eq!(expr("f x - 1"), "((f x) - 1)");
        assert_eq!(expr("f (-1)"), "(f (-1))");
    }

    #[test]
    fn lambdas_and_conditionals_extend_right() {
        assert_eq!(expr("x -> x + 1"), "(x -> (x + 1))");
        assert_eq!(
            expr("c -> if c then 1 else 2.0"),
            "(c -> (if c then 1 else 2.0))"
        );
        assert_eq!(
            expr("let y = 2 in y * y"),
            "(let y = 2 in (y * y))"
        );
    }

    #[test]
    fn literals_and_qualified_names() {
        assert_eq!(expr("\"a\\n\" + 1"), "(\"a\\n\" + 1)");
        assert_eq!(expr("snacks.lang.not True"), "(snacks.lang.not True)");
        assert_eq!(expr("2.50"), "2.5");
    }

    #[test]
    fn parses_example_module() {
        let source = "\
identity = x -> x
answer = 1 + 2 * 3   # seven

greeting = \"a\" + 1
choose = c -> if c then 1 else 2.0
neg = -answer
both = not True and False
";
        let m = module(source);
        let names = m.decls.iter().map(|d| d.name.kind.as_str()).collect::<Vec<_>>();
        assert_eq!(
            names,
            vec!["identity", "answer", "greeting", "choose", "neg", "both"]
        );
        assert_eq!(m.decls[1].to_string(), "answer = (1 + (2 * 3))");

        let printed = m.to_string();
        let reparsed = module(&printed);
        assert_eq!(reparsed.to_string(), printed);
    }

    #[test]
    fn spans_cover_declarations() {
        let source = "a = 1\nbb = a + 2";
        let m = module(source);
        let span = m.decls[1].span;
        assert_eq!(&source[span.start..span.end], "bb = a + 2");
        let body = m.decls[1].body.span;
        assert_eq!(&source[body.start..body.end], "a + 2");
    }

    #[test]
    fn reports_syntax_errors() {
        let mut map = SourceMap::new();
        let id = map.add("<test>", "x = (1 +");
        let err = parse_module(map.get(id).unwrap(), ustr("main")).unwrap_err();
        assert_eq!(err.span.source_id, id);
        assert_eq!(err.span.start, 8);
        assert!(err.into_diagnostic().is_error());
    }
}
