//! `z == matrix[x][y]`, full-recompute arc-consistent filtering.
//!
//! Each propagate recomputes support for every remaining `x`, `y`, and `z`
//! value from the current domains rather than maintaining the reference
//! implementation's incremental sorted-triple/support-count bookkeeping.
//! Soundness and completeness of the filter are unaffected; only the
//! constant factor on large matrices is worse.

use crate::constraint::{impl_constraint_state, Constraint, ConstraintState};
use crate::error::{Error, Result};
use crate::solver::{ConstraintId, Solver};
use crate::var::{IntVarLike, Var};

#[derive(Debug)]
pub struct Element2D {
    x: Var,
    y: Var,
    z: Var,
    matrix: Vec<Vec<i32>>,
    state: ConstraintState,
}

impl Element2D {
    pub fn new(solver: &Solver, x: Var, y: Var, matrix: Vec<Vec<i32>>, z: Var) -> Result<Self> {
        if matrix.is_empty() || matrix[0].is_empty() {
            return Err(Error::Misuse("element2d matrix must be non-empty".into()));
        }
        let cols = matrix[0].len();
        if matrix.iter().any(|row| row.len() != cols) {
            return Err(Error::Misuse("element2d matrix rows must be equal length".into()));
        }
        Ok(Self {
            x,
            y,
            z,
            matrix,
            state: ConstraintState::new(solver),
        })
    }
}

impl Constraint for Element2D {
    fn post(&self, solver: &Solver, id: ConstraintId) -> Result<()> {
        self.x.propagate_on_domain_change(id);
        self.y.propagate_on_domain_change(id);
        self.z.propagate_on_domain_change(id);
        self.propagate(solver)
    }

    fn propagate(&self, _solver: &Solver) -> Result<()> {
        let rows = self.matrix.len() as i32;
        let cols = self.matrix[0].len() as i32;
        let in_rows = |v: i32| v >= 0 && v < rows;
        let in_cols = |v: i32| v >= 0 && v < cols;

        let xs = self.x.to_array();
        let ys = self.y.to_array();

        for &xi in &xs {
            let supported = in_rows(xi)
                && ys
                    .iter()
                    .any(|&yi| in_cols(yi) && self.z.contains(self.matrix[xi as usize][yi as usize]));
            if !supported {
                self.x.remove(xi)?;
            }
        }
        let xs: Vec<i32> = self.x.to_array().into_iter().filter(|&xi| in_rows(xi)).collect();

        for &yi in &ys {
            let supported = in_cols(yi)
                && xs
                    .iter()
                    .any(|&xi| self.z.contains(self.matrix[xi as usize][yi as usize]));
            if !supported {
                self.y.remove(yi)?;
            }
        }
        let ys: Vec<i32> = self.y.to_array().into_iter().filter(|&yi| in_cols(yi)).collect();

        for v in self.z.to_array() {
            let supported = xs
                .iter()
                .any(|&xi| ys.iter().any(|&yi| self.matrix[xi as usize][yi as usize] == v));
            if !supported {
                self.z.remove(v)?;
            }
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
    fn fixing_indices_fixes_z() {
        let s = Solver::new(false);
        let x = make_int_var(&s, 0, 1).unwrap();
        let y = make_int_var(&s, 0, 1).unwrap();
        let z = make_int_var(&s, -10, 10).unwrap();
        let matrix = vec![vec![1, 2], vec![3, 4]];
        let c = Rc::new(Element2D::new(&s, x.clone(), y.clone(), matrix, z.clone()).unwrap());
        s.post(c, true).unwrap();
        x.fix(1).unwrap();
        y.fix(0).unwrap();
        s.fix_point().unwrap();
        assert!(z.is_fixed());
        assert_eq!(z.min(), 3);
    }

    #[test]
    fn z_domain_prunes_indices() {
        let s = Solver::new(false);
        let x = make_int_var(&s, 0, 1).unwrap();
        let y = make_int_var(&s, 0, 1).unwrap();
        let z = make_int_var(&s, 1, 2).unwrap();
        let matrix = vec![vec![1, 2], vec![3, 4]];
        let c = Rc::new(Element2D::new(&s, x.clone(), y.clone(), matrix, z.clone()).unwrap());
        s.post(c, true).unwrap();
        assert!(!x.contains(1));
    }

    #[test]
    fn indices_outside_the_matrix_are_pruned_not_indexed() {
        let s = Solver::new(false);
        let x = make_int_var(&s, -2, 5).unwrap();
        let y = make_int_var(&s, -3, 4).unwrap();
        let z = make_int_var(&s, -20, 20).unwrap();
        let matrix = vec![vec![1, 2], vec![3, 4]];
        let c = Rc::new(Element2D::new(&s, x.clone(), y.clone(), matrix, z.clone()).unwrap());
        s.post(c, true).unwrap();
        assert_eq!(x.min(), 0);
        assert_eq!(x.max(), 1);
        assert_eq!(y.min(), 0);
        assert_eq!(y.max(), 1);
    }
}
