//! `x == y`.
//!
//! Re-propagates on every domain change of either side (not just fixation)
//! since equality must keep the two domains in lock-step, not merely agree
//! once both are singletons.

use std::cell::RefCell;

use crate::constraint::{impl_constraint_state, Constraint, ConstraintState};
use crate::error::Result;
use crate::solver::{ConstraintId, Solver};
use crate::var::{IntVarLike, Var};

#[derive(Debug)]
pub struct Equal {
    x: Var,
    y: Var,
    /// Scratch buffer reused across `propagate` calls instead of
    /// reallocating a `Vec` every time the fix-point loop visits this
    /// constraint.
    buffer: RefCell<Vec<i32>>,
    state: ConstraintState,
}

impl Equal {
    pub fn new(solver: &Solver, x: Var, y: Var) -> Self {
        Self {
            x,
            y,
            buffer: RefCell::new(Vec::new()),
            state: ConstraintState::new(solver),
        }
    }
}

impl Constraint for Equal {
    fn post(&self, solver: &Solver, id: ConstraintId) -> Result<()> {
        self.x.propagate_on_domain_change(id);
        self.y.propagate_on_domain_change(id);
        self.propagate(solver)
    }

    fn propagate(&self, _solver: &Solver) -> Result<()> {
        let min = self.x.min().max(self.y.min());
        let max = self.x.max().min(self.y.max());
        self.x.remove_below(min)?;
        self.x.remove_above(max)?;
        self.y.remove_below(min)?;
        self.y.remove_above(max)?;

        let mut buf = self.buffer.borrow_mut();
        buf.resize(self.x.size().max(self.y.size()).max(1), 0);

        let n = self.x.fill_array(&mut buf);
        let snapshot: Vec<i32> = buf[..n].to_vec();
        for v in snapshot {
            if !self.y.contains(v) {
                self.x.remove(v)?;
            }
        }

        let n = self.y.fill_array(&mut buf);
        let snapshot: Vec<i32> = buf[..n].to_vec();
        for v in snapshot {
            if !self.x.contains(v) {
                self.y.remove(v)?;
            }
        }
        Ok(())
    }

    impl_constraint_state!();
}
