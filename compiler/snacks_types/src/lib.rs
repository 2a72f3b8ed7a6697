#[macro_use]
extern crate snacks_common;

pub mod defs;
pub mod print;
pub mod structure;
pub mod ty;
pub mod vars;

pub use defs::TypeDefs;
pub use structure::*;
pub use ty::*;
pub use vars::{Snapshot, TyVars, VarId};
