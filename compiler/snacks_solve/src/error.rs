use crate::env::Locator;
use snacks_common::span::Span;
use snacks_diag::{Diagnostic, IntoDiagnostic};
use snacks_types::print::Generalized;
use snacks_types::Type;

use thiserror::Error;
use ustr::Ustr;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Two types failed to unify.
    #[error("type mismatch: expected `{expected}`, found `{found}`")]
    Type { expected: Type, found: Type },
    /// No alternative of a function accepts any alternative of an argument.
    #[error("cannot apply `{function}` to `{argument}`")]
    Application { function: Type, argument: Type },
    #[error("undefined symbol `{locator}`")]
    UndefinedSymbol { locator: Locator },
    /// A module's declarations could not be located.
    #[error("cannot resolve module `{module}`: {message}")]
    Resolution { module: Ustr, message: String },
    #[error("declaration `{locator}` has no admissible type")]
    EmptyDeclaration { locator: Locator },
    #[error("type `{ty}` still contains unresolved variables")]
    Unresolved { ty: Type },
}

impl IntoDiagnostic for Error {
    fn into_diagnostic(self) -> Diagnostic {
        let diagnostic = Diagnostic::error(&self, Span::default());
        match self {
            Error::Type { expected, found } => diagnostic.with_inline_note(format!(
                "expected {}, found {}",
                Generalized(&expected),
                Generalized(&found)
            )),
            Error::Application { function, .. } => {
                diagnostic.with_inline_note(format!("function has type {}", Generalized(&function)))
            }
            Error::Unresolved { ty } => diagnostic
                .with_inline_note(format!("{} is ambiguous here", Generalized(&ty))),
            _ => diagnostic,
        }
    }
}

impl From<Error> for Diagnostic {
    fn from(error: Error) -> Self {
        error.into_diagnostic()
    }
}
