//! `vars[0] + vars[1] + ... + vars[n-1] == y`, bound-consistent.
//!
//! Recomputes the running min/max sum every propagate rather than the
//! reference implementation's reversible fixed/non-fixed term partition
//! (which keeps a running sum of already-fixed terms in a `StateInt` so a
//! propagate only has to re-scan the non-fixed terms). The simpler version
//! is O(n) per propagate instead of amortized O(non-fixed terms); filtering
//! strength is identical.

use crate::constraint::{impl_constraint_state, Constraint, ConstraintState};
use crate::error::{Error, Result};
use crate::solver::{ConstraintId, Solver};
use crate::var::{IntVarLike, Var};

#[derive(Debug)]
pub struct Sum {
    vars: Vec<Var>,
    y: Var,
    state: ConstraintState,
}

impl Sum {
    /// Fails with [`Error::Overflow`] if the terms' bound-sum doesn't fit
    /// `i32`, whether `y` is a fresh variable or a variable fixed to a
    /// constant — the same policy either way.
    pub fn new(solver: &Solver, vars: Vec<Var>, y: Var) -> Result<Self> {
        let mut min: i64 = 0;
        let mut max: i64 = 0;
        for v in &vars {
            min += v.min() as i64;
            max += v.max() as i64;
        }
        if min < i32::MIN as i64 || max > i32::MAX as i64 {
            return Err(Error::Overflow("sum bound sum overflows i32".into()));
        }
        Ok(Self {
            vars,
            y,
            state: ConstraintState::new(solver),
        })
    }
}

fn clamp_to_i32(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

impl Constraint for Sum {
    fn post(&self, solver: &Solver, id: ConstraintId) -> Result<()> {
        for v in &self.vars {
            v.propagate_on_bound_change(id);
        }
        self.y.propagate_on_bound_change(id);
        self.propagate(solver)
    }

    fn propagate(&self, _solver: &Solver) -> Result<()> {
        let mut sum_min: i64 = 0;
        let mut sum_max: i64 = 0;
        for v in &self.vars {
            sum_min += v.min() as i64;
            sum_max += v.max() as i64;
        }

        self.y.remove_below(clamp_to_i32(sum_min))?;
        self.y.remove_above(clamp_to_i32(sum_max))?;

        let y_min = self.y.min() as i64;
        let y_max = self.y.max() as i64;

        for v in &self.vars {
            let v_min = v.min() as i64;
            let v_max = v.max() as i64;
            let max_i = y_max - (sum_min - v_min);
            let min_i = y_min - (sum_max - v_max);
            v.remove_above(clamp_to_i32(max_i))?;
            v.remove_below(clamp_to_i32(min_i))?;
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
    fn tightens_sum_bounds() {
        let s = Solver::new(false);
        let x0 = make_int_var(&s, 0, 5).unwrap();
        let x1 = make_int_var(&s, 0, 5).unwrap();
        let y = make_int_var(&s, 0, 3).unwrap();
        let c = Rc::new(Sum::new(&s, vec![x0.clone(), x1.clone()], y.clone()).unwrap());
        s.post(c, true).unwrap();
        assert_eq!(x0.max(), 3);
        assert_eq!(x1.max(), 3);
    }

    #[test]
    fn infeasible_sum_fails_at_post() {
        let s = Solver::new(false);
        let x0 = make_int_var(&s, 5, 5).unwrap();
        let x1 = make_int_var(&s, 5, 5).unwrap();
        let y = make_int_var(&s, 0, 3).unwrap();
        let c = Rc::new(Sum::new(&s, vec![x0, x1], y).unwrap());
        assert!(s.post(c, true).is_err());
    }

    #[test]
    fn bound_sum_overflow_is_rejected_at_construction() {
        let s = Solver::new(false);
        let x0 = make_int_var(&s, i32::MAX - 1, i32::MAX).unwrap();
        let x1 = make_int_var(&s, i32::MAX - 1, i32::MAX).unwrap();
        let y = make_int_var(&s, 0, 3).unwrap();
        assert!(Sum::new(&s, vec![x0, x1], y).is_err());
    }
}
