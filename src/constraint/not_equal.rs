//! `x != y + v`, an optionally-offset disequality.

use crate::constraint::{impl_constraint_state, Constraint, ConstraintState};
use crate::error::Result;
use crate::solver::{ConstraintId, Solver};
use crate::var::{IntVarLike, Var};

#[derive(Debug)]
pub struct NotEqual {
    x: Var,
    y: Var,
    v: i32,
    state: ConstraintState,
}

impl NotEqual {
    /// `x != y`.
    pub fn new(solver: &Solver, x: Var, y: Var) -> Self {
        Self::with_offset(solver, x, y, 0)
    }

    /// `x != y + v`.
    pub fn with_offset(solver: &Solver, x: Var, y: Var, v: i32) -> Self {
        Self {
            x,
            y,
            v,
            state: ConstraintState::new(solver),
        }
    }
}

impl Constraint for NotEqual {
    fn post(&self, _solver: &Solver, id: ConstraintId) -> Result<()> {
        if self.x.is_fixed() {
            self.y.remove(self.x.min() - self.v)?;
        } else if self.y.is_fixed() {
            self.x.remove(self.y.min() + self.v)?;
        } else {
            self.x.propagate_on_fix(id);
            self.y.propagate_on_fix(id);
        }
        Ok(())
    }

    fn propagate(&self, _solver: &Solver) -> Result<()> {
        if self.x.is_fixed() {
            self.y.remove(self.x.min() - self.v)?;
        } else {
            self.x.remove(self.y.min() + self.v)?;
        }
        self.state.set_active(false);
        Ok(())
    }

    impl_constraint_state!();
}
