//! `x <= y`. Bound-consistent: only reacts to bound changes.

use crate::constraint::{impl_constraint_state, Constraint, ConstraintState};
use crate::error::Result;
use crate::solver::{ConstraintId, Solver};
use crate::var::{IntVarLike, Var};

#[derive(Debug)]
pub struct LessOrEqual {
    x: Var,
    y: Var,
    state: ConstraintState,
}

impl LessOrEqual {
    pub fn new(solver: &Solver, x: Var, y: Var) -> Self {
        Self {
            x,
            y,
            state: ConstraintState::new(solver),
        }
    }
}

impl Constraint for LessOrEqual {
    fn post(&self, solver: &Solver, id: ConstraintId) -> Result<()> {
        self.x.propagate_on_bound_change(id);
        self.y.propagate_on_bound_change(id);
        self.propagate(solver)
    }

    fn propagate(&self, _solver: &Solver) -> Result<()> {
        self.x.remove_above(self.y.max())?;
        self.y.remove_below(self.x.min())?;
        if self.x.max() <= self.y.min() {
            self.state.set_active(false);
        }
        Ok(())
    }

    impl_constraint_state!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::Solver;
    use crate::var::make_int_var;
    use std::rc::Rc;

    #[test]
    fn tightens_both_bounds() {
        let s = Solver::new(false);
        let x = make_int_var(&s, 0, 9).unwrap();
        let y = make_int_var(&s, 3, 6).unwrap();
        let c = Rc::new(LessOrEqual::new(&s, x.clone(), y.clone()));
        s.post(c, true).unwrap();
        assert_eq!(x.max(), 6);
        assert_eq!(y.min(), 3);
    }
}
