//! Reified equality: `b <=> (x == v)`.

use crate::constraint::{impl_constraint_state, Constraint, ConstraintState};
use crate::error::Result;
use crate::solver::{ConstraintId, Solver};
use crate::var::{BoolVar, IntVarLike, Var};

#[derive(Debug)]
pub struct IsEqual {
    b: BoolVar,
    x: Var,
    v: i32,
    state: ConstraintState,
}

impl IsEqual {
    pub fn new(solver: &Solver, b: BoolVar, x: Var, v: i32) -> Self {
        Self {
            b,
            x,
            v,
            state: ConstraintState::new(solver),
        }
    }
}

impl Constraint for IsEqual {
    fn post(&self, solver: &Solver, id: ConstraintId) -> Result<()> {
        self.x.propagate_on_domain_change(id);
        self.b.as_var().propagate_on_fix(id);
        self.propagate(solver)
    }

    fn propagate(&self, _solver: &Solver) -> Result<()> {
        if self.b.is_fixed() {
            if self.b.is_true() {
                self.x.fix(self.v)?;
            } else {
                self.x.remove(self.v)?;
            }
            self.state.set_active(false);
        } else if !self.x.contains(self.v) {
            self.b.fix(false)?;
            self.state.set_active(false);
        } else if self.x.is_fixed() {
            self.b.fix(true)?;
            self.state.set_active(false);
        }
        Ok(())
    }

    impl_constraint_state!();
}
