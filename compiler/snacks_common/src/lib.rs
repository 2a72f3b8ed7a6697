#[macro_use]
pub mod id;
pub mod dep_graph;
pub mod source;
pub mod span;

pub use ustr::{ustr, Ustr};

pub type P<T> = Box<T>;
