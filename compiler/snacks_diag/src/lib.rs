pub mod diagnostic;
pub mod report;

pub use diagnostic::*;
pub use report::*;

use snacks_common::span::{Span, Spanned};
use std::result;

pub type Result<T> = result::Result<T, Diagnostic>;

/// A trait for types that can be converted into a diagnostic.
pub trait IntoDiagnostic {
    fn into_diagnostic(self) -> Diagnostic;
}

impl IntoDiagnostic for Diagnostic {
    fn into_diagnostic(self) -> Diagnostic {
        self
    }
}

impl IntoDiagnostic for &str {
    fn into_diagnostic(self) -> Diagnostic {
        Diagnostic::error(self, Span::default())
    }
}

impl IntoDiagnostic for String {
    fn into_diagnostic(self) -> Diagnostic {
        Diagnostic::error(self, Span::default())
    }
}

//

pub trait IntoError<T> {
    fn into_err(self) -> Result<T>;
}

impl<T, E: IntoDiagnostic> IntoError<T> for E {
    fn into_err(self) -> Result<T> {
        Err(self.into_diagnostic())
    }
}

//

pub fn error_for<T: Spanned, E: IntoDiagnostic>(spanned: &T, err: E) -> Diagnostic {
    err.into_diagnostic().with_span(spanned.span())
}
