pub mod ast;
pub mod node;
pub mod print;
pub mod typed;

pub use ast::*;
pub use node::Node;
pub use typed::*;
