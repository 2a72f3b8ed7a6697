use snacks_ast::*;
use snacks_common::span::{SourceId, Span};

use ustr::Ustr;

peg::parser! {
    pub grammar parser(source_id: SourceId) for str {
        rule whitespace() = quiet!{[' ' | '\t']}
        rule line_end() = quiet!{"\r\n" / ['\r' | '\n']}
        rule comment() = quiet!{"#" (!line_end() [_])*}

        rule _ = quiet!{whitespace()*}
        rule __ = quiet!{whitespace()+}

        rule node<T>(r: rule<T>) -> Node<T> =
            s:position!() k:r() e:position!() {
                Node::new(k, Span::new(source_id, s, e))
            }

        // parses a keyword
        rule kw<T>(r: rule<T>) -> T = x:r() !ident_char_rest() {x}

        rule ident_char_start() -> char =
            quiet!{['_' | 'A'..='Z' | 'a'..='z']}

        rule ident_char_rest() -> char =
            quiet!{ident_char_start() / ['0'..='9' | '\'']}

        rule name() -> Ustr = quiet!{
            n:$(ident_char_start() ident_char_rest()*) {?
                match n {
                    "if" | "then" | "else" | "let" | "in" | "and" | "or" | "not" | "True"
                    | "False" => Err("reserved keyword"),
                    _ => Ok(Ustr::from(n)),
                }
            }} /
            expected!("identifier")

        rule ident() -> Ident = node(<name()>)

        // qualifier segments may reuse keywords, e.g. `snacks.lang.not`
        rule segment() -> Ustr =
            n:$(ident_char_start() ident_char_rest()*) { Ustr::from(n) }

        rule path() -> Path =
            first:name() rest:("." n:segment() {n})* {
                match rest.split_last() {
                    None => Path::local(first),
                    Some((name, init)) => {
                        let module = std::iter::once(first)
                            .chain(init.iter().copied())
                            .map(|n| n.as_str())
                            .collect::<Vec<_>>()
                            .join(".");
                        Path { module: Some(Ustr::from(&module)), name: *name }
                    }
                }
            }

        rule escaped_char() -> char =
            "n" {'\n'} / "r" {'\r'} / "t" {'\t'} / "\"" {'"'} / "\\" {'\\'}

        rule string_char() -> char =
            "\\" c:escaped_char() {c} /
            !['"' | '\\' | '\r' | '\n'] c:[_] {c}

        rule int_lit() -> Lit = quiet!{
            d:$(['0'..='9']+) {? d.parse::<i64>().map(Lit::Int).or(Err("integer")) }} /
            expected!("integer")

        rule double_lit() -> Lit = quiet!{
            d:$(['0'..='9']+ "." ['0'..='9']+) {? d.parse::<f64>().map(Lit::Double).or(Err("double")) }} /
            expected!("double")

        rule string_lit() -> Lit =
            quiet!{"\"" cs:string_char()* "\"" { Lit::String(cs.into_iter().collect()) }} /
            expected!("string")

        rule bool_lit() -> Lit =
            kw(<"True">) { Lit::Bool(true) } /
            kw(<"False">) { Lit::Bool(false) }

        rule lit() -> Lit = double_lit() / int_lit() / string_lit() / bool_lit()

        rule lambda() -> ExprKind =
            x:ident() _ "->" _ e:expr() { ExprKind::Lambda(x, e) }

        rule if_else() -> ExprKind =
            kw(<"if">) _ c:expr() _ kw(<"then">) _ a:expr() _ kw(<"else">) _ b:expr() {
                ExprKind::If(c, a, b)
            }

        rule let_in() -> ExprKind =
            kw(<"let">) _ x:ident() _ "=" _ v:expr() _ kw(<"in">) _ b:expr() {
                ExprKind::Let(x, v, b)
            }

        pub rule expr() -> P<Expr> = precedence!{
            s:position!() n:@ e:position!() { Box::new(Expr::new(n, Span::new(source_id, s, e))) }
            --
            x:(@) _ kw(<"or">) _ y:@ { ExprKind::Binary(BinOp::Or, x, y) }
            --
            x:(@) _ kw(<"and">) _ y:@ { ExprKind::Binary(BinOp::And, x, y) }
            --
            x:(@) _ "==" _ y:@ { ExprKind::Binary(BinOp::Eq, x, y) }
            x:(@) _ "!=" _ y:@ { ExprKind::Binary(BinOp::Ne, x, y) }
            --
            x:(@) _ "<=" _ y:@ { ExprKind::Binary(BinOp::Le, x, y) }
            x:(@) _ ">=" _ y:@ { ExprKind::Binary(BinOp::Ge, x, y) }
            x:(@) _ "<" _ y:@ { ExprKind::Binary(BinOp::Lt, x, y) }
            x:(@) _ ">" _ y:@ { ExprKind::Binary(BinOp::Gt, x, y) }
            --
            x:(@) _ "+" _ y:@ { ExprKind::Binary(BinOp::Add, x, y) }
            x:(@) _ "-" _ y:@ { ExprKind::Binary(BinOp::Sub, x, y) }
            --
            x:(@) _ "*" _ y:@ { ExprKind::Binary(BinOp::Mul, x, y) }
            x:(@) _ "/" _ y:@ { ExprKind::Binary(BinOp::Div, x, y) }
            x:(@) _ "%" _ y:@ { ExprKind::Binary(BinOp::Rem, x, y) }
            --
            "-" _ x:(@) { ExprKind::Unary(UnOp::Neg, x) }
            "+" _ x:(@) { ExprKind::Unary(UnOp::Plus, x) }
            kw(<"not">) _ x:(@) { ExprKind::Unary(UnOp::Not, x) }
            --
            // application
            x:(@) __ y:atom() { ExprKind::Apply(x, y) }
            --
            a:atom() { a.kind }
        }

        // an argument never starts with a prefix operator: `a + b` is not `a (+b)`
        rule atom() -> P<Expr> = n:node(<atom_kind()>) { Box::new(n) }

        rule atom_kind() -> ExprKind
            = l:lambda() { l }
            / i:if_else() { i }
            / l:let_in() { l }
            / l:lit() { ExprKind::Lit(l) }
            / p:path() { ExprKind::Name(p) }
            / "(" _ e:expr() _ ")" { e.kind }

        rule decl() -> Decl =
            s:position!() n:ident() _ "=" _ b:expr() e:position!() {
                Decl { name: n, body: b, span: Span::new(source_id, s, e) }
            }

        rule line() -> Option<Decl> = _ d:decl()? _ comment()? { d }

        pub rule decls() -> Vec<Decl> =
            ls:(line() ** line_end()) { ls.into_iter().flatten().collect() }

        pub rule expression() -> P<Expr> = _ e:expr() _ comment()? { e }
    }
}
