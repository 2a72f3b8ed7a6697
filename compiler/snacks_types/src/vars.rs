use crate::ty::{Type, TypeVar};

use ustr::Ustr;

declare_id!(VarId);

#[derive(Clone, Debug)]
struct BindingCell {
    name: Ustr,
    binding: Option<Type>,
}

/// A trail position to which bindings can be rolled back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snapshot {
    trail_len: usize,
}

/// The arena of unification variables.
///
/// A variable is an index into `cells`; binding it writes its cell exactly
/// once. Every binding is recorded on a trail so that a failed attempt can be
/// undone with [`TyVars::rollback_to`].
#[derive(Clone, Debug, Default)]
pub struct TyVars {
    cells: Vec<BindingCell>,
    trail: Vec<VarId>,
}

impl TyVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Creates a fresh unbound variable with a unique name.
    pub fn fresh(&mut self) -> TypeVar {
        let id = VarId::new(self.cells.len());
        self.push(id, Ustr::from(&format!("t{}", id.raw)))
    }

    /// Creates a fresh unbound variable with a display name. Identity is still
    /// decided by the id.
    pub fn fresh_named(&mut self, name: &str) -> TypeVar {
        let id = VarId::new(self.cells.len());
        self.push(id, Ustr::from(name))
    }

    fn push(&mut self, id: VarId, name: Ustr) -> TypeVar {
        self.cells.push(BindingCell {
            name,
            binding: None,
        });
        TypeVar { id, name }
    }

    pub fn name(&self, id: VarId) -> Option<Ustr> {
        self.cells.get(id.index()).map(|c| c.name)
    }

    pub fn binding(&self, id: VarId) -> Option<&Type> {
        self.cells.get(id.index()).and_then(|c| c.binding.as_ref())
    }

    pub fn is_bound(&self, id: VarId) -> bool {
        self.binding(id).is_some()
    }

    /// Binds an unbound variable. Binding a variable twice leaves the first
    /// binding in place and returns `false`.
    pub fn bind(&mut self, id: VarId, ty: Type) -> bool {
        let Some(cell) = self.cells.get_mut(id.index()) else {
            log::warn!("bind of unknown variable {id}");
            return false;
        };
        if let Some(existing) = &cell.binding {
            log::warn!(
                "ignoring re-binding of '{} (bound to `{}`) to `{}`",
                cell.name,
                existing,
                ty
            );
            return false;
        }

        log::trace!("bind '{} := {}", cell.name, ty);
        cell.binding = Some(ty);
        self.trail.push(id);
        true
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            trail_len: self.trail.len(),
        }
    }

    /// Unbinds every variable bound since the snapshot was taken.
    pub fn rollback_to(&mut self, snapshot: Snapshot) {
        while self.trail.len() > snapshot.trail_len {
            if let Some(id) = self.trail.pop() {
                if let Some(cell) = self.cells.get_mut(id.index()) {
                    cell.binding = None;
                }
            }
        }
    }

    /// Returns the variables bound since the snapshot, in binding order.
    pub fn bound_since(&self, snapshot: Snapshot) -> &[VarId] {
        self.trail.get(snapshot.trail_len..).unwrap_or(&[])
    }

    /// Returns true if nothing was bound since the snapshot.
    pub fn unchanged_since(&self, snapshot: Snapshot) -> bool {
        self.trail.len() == snapshot.trail_len
    }
}
