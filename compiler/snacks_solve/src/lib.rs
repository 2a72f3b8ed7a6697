//! Type inference for Snacks: unification over union, algebraic and
//! recursive types, the symbol environment, and overloaded application.

pub mod builtins;
mod context;
pub mod env;
pub mod error;
pub mod infer;
pub mod unify;

pub use context::*;
pub use env::{Environment, Locator, Reference};
pub use error::{Error, Result};
pub use infer::{infer_application, infer_declaration, infer_declaration_group};
pub use unify::{unify, unify_or_error};

macro_rules! trace_println {
    ($ctx:expr, $($arg:tt)*) => {
        if $ctx.config.trace {
            log::trace!($($arg)*);
        }
    };
}
pub(crate) use trace_println;
