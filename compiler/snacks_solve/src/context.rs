use crate::builtins;
use crate::env::{Environment, Locator, Reference};
use crate::error::{Error, Result};
use snacks_types::{self as types, Type, TyVars, TypeDefs};

use ustr::{ustr, Ustr, UstrSet};

/// Settings for a compilation session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// The module whose declarations are being typed.
    pub module: Ustr,
    /// Logs every unification and application step at trace level.
    pub trace: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            module: ustr("main"),
            trace: false,
        }
    }
}

/// The state of one compilation: the variable arena, the registry of type
/// definitions and the scope chain.
pub struct Context {
    pub config: Config,
    pub vars: TyVars,
    pub defs: TypeDefs,
    pub env: Environment,
    modules: UstrSet,
}

impl Context {
    pub fn new(config: Config) -> Self {
        let mut modules = UstrSet::default();
        modules.insert(config.module);
        modules.insert(ustr(builtins::LANG_MODULE));

        let mut ctx = Self {
            config,
            vars: TyVars::new(),
            defs: TypeDefs::new(),
            env: Environment::new(),
            modules,
        };
        builtins::seed(&mut ctx);
        ctx
    }

    pub fn new_normal() -> Self {
        Self::new(Config::default())
    }

    pub fn new_tracing() -> Self {
        Self::new(Config {
            trace: true,
            ..Config::default()
        })
    }

    pub fn module(&self) -> Ustr {
        self.config.module
    }

    /// Allocates a fresh unbound type variable.
    pub fn create_variable(&mut self) -> Type {
        Type::Variable(self.vars.fresh())
    }

    pub fn expose(&self, t: &Type) -> Type {
        types::expose(&self.vars, t)
    }

    pub fn decompose(&self, t: &Type) -> Vec<Type> {
        types::decompose(&self.vars, t)
    }

    /// Registers an algebraic or record definition so that recursive
    /// placeholders naming it can be expanded.
    pub fn define_type(&mut self, def: Type) -> bool {
        self.defs.define(def)
    }

    /// Makes another module's declarations resolvable by qualified name.
    pub fn add_module(&mut self, module: Ustr) {
        self.modules.insert(module);
    }

    pub fn has_module(&self, module: Ustr) -> bool {
        self.modules.contains(&module)
    }

    pub fn define(&mut self, reference: Reference) {
        self.env.define(reference);
    }

    pub fn is_defined(&self, locator: &Locator) -> bool {
        self.env.is_defined(locator)
    }

    /// Computes the type of a symbol: the union of its visible candidates,
    /// with generic variables replaced by fresh ones.
    pub fn type_of(&mut self, locator: &Locator) -> Result<Type> {
        if let Locator::Declaration { module, .. } = locator {
            if !self.has_module(*module) {
                return Err(Error::Resolution {
                    module: *module,
                    message: "no such module is loaded".to_string(),
                });
            }
        }
        self.env
            .type_of(&mut self.vars, locator)
            .ok_or_else(|| Error::UndefinedSymbol {
                locator: locator.clone(),
            })
    }

    pub fn get_reference(&mut self, locator: &Locator) -> Result<Reference> {
        let ty = self.type_of(locator)?;
        Ok(Reference::new(locator.clone(), ty))
    }

    /// Marks a type as non-generic within the current scope.
    pub fn specialize(&mut self, t: Type) {
        self.env.specialize(t);
    }

    /// Releases a type previously passed to [`Context::specialize`].
    pub fn generify(&mut self, t: &Type) {
        self.env.generify(t);
    }

    pub fn enter_scope(&mut self) {
        self.env.extend();
    }

    pub fn leave_scope(&mut self) {
        self.env.leave();
    }
}
