pub mod ansi;

use ansi::StripAnsi;

use std::io;

pub const TABWIDTH: &str = "  ";

/// Styled output of a value which needs a context to be rendered
/// (e.g. a type whose variables live in an arena).
pub trait PrettyPrint<Ctx, Info: Clone = usize> {
    fn pretty_print<Output: io::Write>(
        &self,
        out: &mut Output,
        ctx: &Ctx,
        info: Info,
    ) -> io::Result<()>;
}

//
//

pub trait PrettyString<Ctx, Info: Clone>: PrettyPrint<Ctx, Info> {
    fn pretty_string(&self, ctx: &Ctx) -> String;
    fn plain_string(&self, ctx: &Ctx) -> String;
    fn print_stdout(&self, ctx: &Ctx) -> io::Result<()>;
}

impl<T: PrettyPrint<Ctx, Info>, Ctx, Info: Default + Clone> PrettyString<Ctx, Info> for T {
    fn pretty_string(&self, ctx: &Ctx) -> String {
        let mut buf = Vec::new();
        self.pretty_print(&mut buf, ctx, Info::default())
            .expect("writing to a buffer");
        String::from_utf8(buf).expect("pretty printers emit utf-8")
    }

    fn plain_string(&self, ctx: &Ctx) -> String {
        let mut buf = Vec::new();
        self.pretty_print(&mut StripAnsi::new(&mut buf), ctx, Info::default())
            .expect("writing to a buffer");
        String::from_utf8(buf).expect("pretty printers emit utf-8")
    }

    fn print_stdout(&self, ctx: &Ctx) -> io::Result<()> {
        self.pretty_print(&mut io::stdout(), ctx, Info::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ansi::{BOLD, RESET};

    struct Word(&'static str);

    impl PrettyPrint<()> for Word {
        fn pretty_print<Output: io::Write>(
            &self,
            out: &mut Output,
            _: &(),
            _: usize,
        ) -> io::Result<()> {
            write!(out, "{BOLD}{}{RESET}", self.0)
        }
    }

    #[test]
    fn plain_string_strips_styling() {
        assert_eq!(Word("Integer").plain_string(&()), "Integer");
        assert_ne!(Word("Integer").pretty_string(&()), "Integer");
    }

    #[test]
    fn pretty_string_keeps_multibyte_text() {
        assert_eq!(Word("é → ü").plain_string(&()), "é → ü");
    }
}
