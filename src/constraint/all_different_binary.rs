//! `AllDifferent` decomposed into pairwise [`NotEqual`](super::not_equal::NotEqual)
//! constraints at post time. Weaker than a dedicated all-different filter
//! (no Hall-set reasoning) but posts O(n^2) simple constraints instead of
//! maintaining its own propagator — this constraint itself is never
//! scheduled.

use std::rc::Rc;

use crate::constraint::not_equal::NotEqual;
use crate::constraint::Constraint;
use crate::error::Result;
use crate::solver::{ConstraintId, Solver};
use crate::var::{IntVarLike, Var};

#[derive(Debug)]
pub struct AllDifferentBinary {
    vars: Vec<Var>,
}

impl AllDifferentBinary {
    pub fn new(vars: Vec<Var>) -> Self {
        Self { vars }
    }
}

impl Constraint for AllDifferentBinary {
    fn post(&self, solver: &Solver, _id: ConstraintId) -> Result<()> {
        for i in 0..self.vars.len() {
            for j in (i + 1)..self.vars.len() {
                let pair = Rc::new(NotEqual::new(solver, self.vars[i].clone(), self.vars[j].clone()));
                solver.post(pair, false)?;
            }
        }
        Ok(())
    }

    fn propagate(&self, _solver: &Solver) -> Result<()> {
        Ok(())
    }

    fn is_active(&self) -> bool {
        false
    }
    fn set_active(&self, _active: bool) {}
    fn is_scheduled(&self) -> bool {
        false
    }
    fn set_scheduled(&self, _scheduled: bool) {}
}
