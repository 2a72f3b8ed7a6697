//! Translates the syntax tree into the typed tree, driving the inference
//! core one node at a time.

mod handoff;
mod module;
mod translate;

pub use handoff::finalize;
pub use module::{check_expression, check_module, EXPRESSION_NAME};
pub use translate::Translator;
