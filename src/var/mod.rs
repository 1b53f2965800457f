//! Variables: the base [`IntVar`] handle, derived views, and [`BoolVar`].
//!
//! Every variable-like thing implements [`IntVarLike`] and is passed around
//! as `Rc<dyn IntVarLike>` (aliased [`Var`]). This, not a struct hierarchy,
//! is how the reference implementation's "view" classes (`IntVarViewOffset`,
//! `IntVarViewOpposite`, `IntVarViewMul`) compose: each view owns the `Var`
//! it wraps and forwards mutation through a coordinate transform, while
//! sharing the base variable's domain and subscriber lists.

mod view;

use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::solver::{ConstraintId, Solver, VarId};

pub use view::{mul, offset, opposite, MulView, OffsetView, OppositeView};

/// Shared interface implemented by the base [`IntVar`] and every view.
pub trait IntVarLike: fmt::Debug {
    fn solver(&self) -> &Solver;
    fn min(&self) -> i32;
    fn max(&self) -> i32;
    fn size(&self) -> usize;
    fn is_fixed(&self) -> bool {
        self.size() == 1
    }
    fn contains(&self, v: i32) -> bool;
    fn fill_array(&self, dest: &mut [i32]) -> usize;
    fn to_array(&self) -> Vec<i32> {
        let mut buf = vec![0; self.size()];
        self.fill_array(&mut buf);
        buf
    }

    fn fix(&self, v: i32) -> Result<()>;
    fn remove(&self, v: i32) -> Result<()>;
    fn remove_below(&self, v: i32) -> Result<()>;
    fn remove_above(&self, v: i32) -> Result<()>;

    fn propagate_on_fix(&self, c: ConstraintId);
    fn propagate_on_domain_change(&self, c: ConstraintId);
    fn propagate_on_bound_change(&self, c: ConstraintId);
}

/// A shared handle to a variable-like thing. Cloning is a cheap `Rc` bump.
pub type Var = Rc<dyn IntVarLike>;

/// A base integer variable: a handle into the solver's variable arena.
#[derive(Clone)]
pub struct IntVar {
    solver: Solver,
    id: VarId,
}

impl fmt::Debug for IntVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IntVar(#{})[{}..={}]", self.id, self.min(), self.max())
    }
}

impl IntVar {
    pub(crate) fn new(solver: Solver, id: VarId) -> Self {
        Self { solver, id }
    }

    pub(crate) fn id(&self) -> VarId {
        self.id
    }
}

impl IntVarLike for IntVar {
    fn solver(&self) -> &Solver {
        &self.solver
    }
    fn min(&self) -> i32 {
        self.solver.domain_min(self.id)
    }
    fn max(&self) -> i32 {
        self.solver.domain_max(self.id)
    }
    fn size(&self) -> usize {
        self.solver.domain_size(self.id)
    }
    fn contains(&self, v: i32) -> bool {
        self.solver.domain_contains(self.id, v)
    }
    fn fill_array(&self, dest: &mut [i32]) -> usize {
        self.solver.domain_fill_array(self.id, dest)
    }
    fn to_array(&self) -> Vec<i32> {
        self.solver.domain_to_array(self.id)
    }
    fn fix(&self, v: i32) -> Result<()> {
        self.solver.domain_remove_all_but(self.id, v)
    }
    fn remove(&self, v: i32) -> Result<()> {
        self.solver.domain_remove(self.id, v)
    }
    fn remove_below(&self, v: i32) -> Result<()> {
        self.solver.domain_remove_below(self.id, v)
    }
    fn remove_above(&self, v: i32) -> Result<()> {
        self.solver.domain_remove_above(self.id, v)
    }
    fn propagate_on_fix(&self, c: ConstraintId) {
        self.solver.propagate_on_fix(self.id, c);
    }
    fn propagate_on_domain_change(&self, c: ConstraintId) {
        self.solver.propagate_on_domain_change(self.id, c);
    }
    fn propagate_on_bound_change(&self, c: ConstraintId) {
        self.solver.propagate_on_bound_change(self.id, c);
    }
}

/// Creates a base variable with domain `min..=max`.
pub fn make_int_var(solver: &Solver, min: i32, max: i32) -> Result<Var> {
    let id = solver.new_var(min, max)?;
    Ok(Rc::new(IntVar::new(solver.clone(), id)))
}

/// Creates `n` base variables, each with domain `min..=max`.
pub fn make_int_var_array(solver: &Solver, n: usize, min: i32, max: i32) -> Result<Vec<Var>> {
    (0..n).map(|_| make_int_var(solver, min, max)).collect()
}

/// A 0/1 variable. Not a distinct arena entry: it wraps any `Var` whose
/// domain is known to live within `{0, 1}`, matching how the reference
/// implementation's `Not(b)` produces a fresh boolean backed by a
/// transformed view rather than a dedicated boolean storage cell.
#[derive(Clone, Debug)]
pub struct BoolVar(Var);

impl BoolVar {
    pub(crate) fn from_var(v: Var) -> Self {
        Self(v)
    }

    pub fn as_var(&self) -> Var {
        self.0.clone()
    }

    pub fn is_true(&self) -> bool {
        self.0.min() == 1
    }

    pub fn is_false(&self) -> bool {
        self.0.max() == 0
    }

    pub fn is_fixed(&self) -> bool {
        self.0.is_fixed()
    }

    pub fn fix(&self, value: bool) -> Result<()> {
        self.0.fix(value as i32)
    }
}

/// Creates a boolean variable.
pub fn make_bool_var(solver: &Solver) -> Result<BoolVar> {
    let v = make_int_var(solver, 0, 1)?;
    Ok(BoolVar::from_var(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::Solver;

    #[test]
    fn fix_narrows_to_singleton() {
        let s = Solver::new(false);
        let x = make_int_var(&s, 0, 9).unwrap();
        x.fix(4).unwrap();
        assert!(x.is_fixed());
        assert_eq!(x.min(), 4);
        assert_eq!(x.max(), 4);
    }

    #[test]
    fn bool_var_starts_unfixed() {
        let s = Solver::new(false);
        let b = make_bool_var(&s).unwrap();
        assert!(!b.is_fixed());
        b.fix(true).unwrap();
        assert!(b.is_true());
    }
}
