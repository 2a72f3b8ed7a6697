use crate::ty::Type;

use ustr::{Ustr, UstrMap};

/// Algebraic and record type definitions by name.
///
/// A definition's type arguments are its parameters, so a stand-alone
/// `Recursive(name, args)` placeholder expands to the definition with the
/// parameters replaced by `args`.
#[derive(Clone, Debug, Default)]
pub struct TypeDefs {
    defs: UstrMap<Type>,
}

impl TypeDefs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a definition. Only algebraic and record types have
    /// definitions; anything else is rejected.
    pub fn define(&mut self, def: Type) -> bool {
        match def {
            Type::Algebraic(name, _, _) | Type::Record(name, _, _) => {
                self.defs.insert(name, def);
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, name: Ustr) -> Option<&Type> {
        self.defs.get(&name)
    }

    pub fn contains(&self, name: Ustr) -> bool {
        self.defs.contains_key(&name)
    }

    /// Expands a `Recursive` placeholder into its owning definition.
    pub fn expand(&self, t: &Type) -> Option<Type> {
        match t {
            Type::Recursive(name, args) => self.get(*name)?.with_arguments(args),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TyVars;

    #[test]
    fn expands_recursive_placeholders() {
        let mut vars = TyVars::new();
        let a = vars.fresh_named("a");
        let cons = Type::record(
            "Cons",
            vec![a.into()],
            [
                ("head", Type::from(a)),
                ("tail", Type::recursive("List", vec![a.into()])),
            ],
        );
        let list = Type::algebraic("List", vec![a.into()], vec![cons, Type::simple("Empty")]);

        let mut defs = TypeDefs::new();
        assert!(defs.define(list.clone()));
        assert!(!defs.define(Type::integer()));

        let expanded = defs
            .expand(&Type::recursive("List", vec![Type::integer()]))
            .unwrap();
        assert_eq!(expanded.type_arguments(), &[Type::integer()]);
        assert_eq!(defs.expand(&Type::recursive("Tree", vec![])), None);
        assert_eq!(defs.expand(&list), None);
    }
}
