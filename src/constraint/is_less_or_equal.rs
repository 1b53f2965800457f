//! Reified comparison: `b <=> (x <= v)`.

use crate::constraint::{impl_constraint_state, Constraint, ConstraintState};
use crate::error::Result;
use crate::solver::{ConstraintId, Solver};
use crate::var::{BoolVar, IntVarLike, Var};

#[derive(Debug)]
pub struct IsLessOrEqual {
    b: BoolVar,
    x: Var,
    v: i32,
    state: ConstraintState,
}

impl IsLessOrEqual {
    pub fn new(solver: &Solver, b: BoolVar, x: Var, v: i32) -> Self {
        Self {
            b,
            x,
            v,
            state: ConstraintState::new(solver),
        }
    }
}

impl Constraint for IsLessOrEqual {
    fn post(&self, solver: &Solver, id: ConstraintId) -> Result<()> {
        self.x.propagate_on_bound_change(id);
        self.b.as_var().propagate_on_fix(id);
        self.propagate(solver)
    }

    fn propagate(&self, _solver: &Solver) -> Result<()> {
        if self.b.is_fixed() {
            if self.b.is_true() {
                self.x.remove_above(self.v)?;
            } else {
                self.x.remove_below(self.v + 1)?;
            }
            self.state.set_active(false);
        } else if self.x.max() <= self.v {
            self.b.fix(true)?;
            self.state.set_active(false);
        } else if self.x.min() > self.v {
            self.b.fix(false)?;
            self.state.set_active(false);
        }
        Ok(())
    }

    impl_constraint_state!();
}
