//! The symbol environment: a stack of scopes mapping locators to candidate
//! types, plus the set of non-generic types of each scope.

use snacks_types::{expose, free_vars, generic_copy, Type, TyVars, VarId};

use std::collections::{HashMap, HashSet};
use std::fmt;
use ustr::{ustr, Ustr};

/// Identifies a symbol: a module-level declaration or a local variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    Declaration { module: Ustr, name: Ustr },
    Variable(Ustr),
}

impl Locator {
    pub fn declaration(module: &str, name: &str) -> Self {
        Locator::Declaration {
            module: ustr(module),
            name: ustr(name),
        }
    }

    pub fn variable(name: &str) -> Self {
        Locator::Variable(ustr(name))
    }

    pub fn name(&self) -> Ustr {
        match self {
            Locator::Declaration { name, .. } | Locator::Variable(name) => *name,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Declaration { module, name } => write!(f, "{module}.{name}"),
            Locator::Variable(name) => write!(f, "{name}"),
        }
    }
}

/// A symbol together with one of its types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub locator: Locator,
    pub ty: Type,
}

impl Reference {
    pub fn new(locator: Locator, ty: Type) -> Self {
        Self { locator, ty }
    }
}

#[derive(Debug, Clone, Default)]
struct Frame {
    symbols: HashMap<Locator, Vec<Type>>,
    specialized: Vec<Type>,
}

/// A chain of scopes. The root scope is never removed.
#[derive(Debug, Clone)]
pub struct Environment {
    stack: Vec<Frame>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Self {
            stack: vec![Frame::default()],
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Enters a child scope.
    pub fn extend(&mut self) {
        self.stack.push(Frame::default());
    }

    /// Leaves the innermost scope. Returns false at the root.
    pub fn leave(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    fn innermost(&mut self) -> &mut Frame {
        if self.stack.is_empty() {
            self.stack.push(Frame::default());
        }
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    /// Adds a candidate type for the locator in the innermost scope.
    pub fn define(&mut self, reference: Reference) {
        let candidates = self
            .innermost()
            .symbols
            .entry(reference.locator)
            .or_default();
        if !candidates.contains(&reference.ty) {
            candidates.push(reference.ty);
        }
    }

    /// Removes one candidate from the innermost scope that holds it.
    pub fn undefine(&mut self, locator: &Locator, ty: &Type) -> bool {
        for frame in self.stack.iter_mut().rev() {
            if let Some(candidates) = frame.symbols.get_mut(locator) {
                if let Some(pos) = candidates.iter().position(|c| c == ty) {
                    candidates.remove(pos);
                    if candidates.is_empty() {
                        frame.symbols.remove(locator);
                    }
                    return true;
                }
            }
        }
        false
    }

    /// Removes every candidate of a locator from every scope.
    pub fn forget(&mut self, locator: &Locator) -> bool {
        let mut found = false;
        for frame in &mut self.stack {
            found |= frame.symbols.remove(locator).is_some();
        }
        found
    }

    pub fn is_defined(&self, locator: &Locator) -> bool {
        self.stack.iter().any(|f| f.symbols.contains_key(locator))
    }

    /// The candidates of a locator visible from the innermost scope. A
    /// variable resolves to the innermost scope binding it, shadowing outer
    /// ones; declarations collect candidates from every scope, outermost first.
    pub fn candidates(&self, locator: &Locator) -> Vec<&Type> {
        match locator {
            Locator::Variable(_) => self
                .stack
                .iter()
                .rev()
                .find_map(|f| f.symbols.get(locator))
                .map(|c| c.iter().collect())
                .unwrap_or_default(),
            Locator::Declaration { .. } => self
                .stack
                .iter()
                .filter_map(|f| f.symbols.get(locator))
                .flatten()
                .collect(),
        }
    }

    pub fn specialize(&mut self, t: Type) {
        self.innermost().specialized.push(t);
    }

    pub fn generify(&mut self, t: &Type) {
        for frame in self.stack.iter_mut().rev() {
            if let Some(pos) = frame.specialized.iter().rposition(|s| s == t) {
                frame.specialized.remove(pos);
                return;
            }
        }
        log::warn!("generify of a type that was never specialized: {t}");
    }

    /// The variables that must not be copied on lookup: those free in any
    /// specialized type, after following bindings.
    pub fn non_generic(&self, vars: &TyVars) -> HashSet<VarId> {
        self.stack
            .iter()
            .flat_map(|f| f.specialized.iter())
            .flat_map(|t| free_vars(vars, t))
            .map(|v| v.id)
            .collect()
    }

    /// Looks up a locator, copying the generic variables of every visible
    /// candidate.
    /// Returns `None` if the locator is not defined anywhere.
    pub fn type_of(&self, vars: &mut TyVars, locator: &Locator) -> Option<Type> {
        let candidates = self
            .candidates(locator)
            .into_iter()
            .cloned()
            .collect::<Vec<_>>();
        if candidates.is_empty() {
            return None;
        }

        let pinned = self.non_generic(vars);
        let is_generic = |id: VarId| !pinned.contains(&id);
        let mut mappings = HashMap::new();
        let copies = candidates
            .iter()
            .map(|c| generic_copy(vars, c, &is_generic, &mut mappings))
            .collect::<Vec<_>>();
        Type::union(copies.iter().map(|c| expose(vars, c)))
    }

    /// Every defined locator in the environment, innermost definitions last.
    pub fn locators(&self) -> Vec<&Locator> {
        let mut out: Vec<&Locator> = vec![];
        for frame in &self.stack {
            let mut names = frame.symbols.keys().collect::<Vec<_>>();
            names.sort_by_key(|l| l.to_string());
            for l in names {
                if !out.contains(&l) {
                    out.push(l);
                }
            }
        }
        out
    }
}
