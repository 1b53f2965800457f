//! Convenience constructors mirroring the reference implementation's
//! `factory` module: one function per variable, view, or constraint kind.
//! Constraint factories post with `enforce_fix_point = true`, matching the
//! reference's "post and immediately propagate" convention.

use std::rc::Rc;

use crate::constraint::all_different_binary::AllDifferentBinary;
use crate::constraint::element2d::Element2D;
use crate::constraint::equal::Equal;
use crate::constraint::is_equal::IsEqual;
use crate::constraint::is_less_or_equal::IsLessOrEqual;
use crate::constraint::less_or_equal::LessOrEqual;
use crate::constraint::not_equal::NotEqual;
use crate::constraint::sum::Sum;
use crate::error::Result;
use crate::search::DfSearch;
use crate::solver::{ConstraintId, Solver};
use crate::var::{self, BoolVar, IntVarLike, Var};

pub fn make_solver(by_copy: bool) -> Solver {
    Solver::new(by_copy)
}

pub fn make_int_var(solver: &Solver, min: i32, max: i32) -> Result<Var> {
    var::make_int_var(solver, min, max)
}

pub fn make_int_var_array(solver: &Solver, n: usize, min: i32, max: i32) -> Result<Vec<Var>> {
    var::make_int_var_array(solver, n, min, max)
}

pub fn make_bool_var(solver: &Solver) -> Result<BoolVar> {
    var::make_bool_var(solver)
}

pub fn make_dfs(solver: &Solver, branching: crate::search::Branching) -> DfSearch {
    DfSearch::new(solver.clone(), branching)
}

/// `x + delta`.
pub fn plus(x: Var, delta: i32) -> Result<Var> {
    var::offset(x, delta)
}

/// `x - delta`.
pub fn minus(x: Var, delta: i32) -> Result<Var> {
    var::offset(x, -delta)
}

/// `a * x`.
pub fn mul(x: Var, a: i32) -> Result<Var> {
    var::mul(x, a)
}

/// `-x`.
pub fn opposite(x: Var) -> Result<Var> {
    var::opposite(x)
}

/// `!b`, as a view: `1 - b`.
pub fn not(b: &BoolVar) -> Result<BoolVar> {
    let v = var::offset(var::opposite(b.as_var())?, 1)?;
    Ok(crate::var::BoolVar::from_var(v))
}

pub fn equal(solver: &Solver, x: Var, y: Var) -> Result<ConstraintId> {
    solver.post(Rc::new(Equal::new(solver, x, y)), true)
}

pub fn not_equal(solver: &Solver, x: Var, y: Var) -> Result<ConstraintId> {
    solver.post(Rc::new(NotEqual::new(solver, x, y)), true)
}

/// `x != y + v`.
pub fn not_equal_with_offset(solver: &Solver, x: Var, y: Var, v: i32) -> Result<ConstraintId> {
    solver.post(Rc::new(NotEqual::with_offset(solver, x, y, v)), true)
}

pub fn less_or_equal(solver: &Solver, x: Var, y: Var) -> Result<ConstraintId> {
    solver.post(Rc::new(LessOrEqual::new(solver, x, y)), true)
}

/// `x >= y`, i.e. `less_or_equal(y, x)`.
pub fn larger_or_equal(solver: &Solver, x: Var, y: Var) -> Result<ConstraintId> {
    solver.post(Rc::new(LessOrEqual::new(solver, y, x)), true)
}

pub fn is_equal(solver: &Solver, b: BoolVar, x: Var, v: i32) -> Result<ConstraintId> {
    solver.post(Rc::new(IsEqual::new(solver, b, x, v)), true)
}

pub fn is_less_or_equal(solver: &Solver, b: BoolVar, x: Var, v: i32) -> Result<ConstraintId> {
    solver.post(Rc::new(IsLessOrEqual::new(solver, b, x, v)), true)
}

/// `b <=> (x < v)`, i.e. `is_less_or_equal(b, x, v - 1)`.
pub fn is_less(solver: &Solver, b: BoolVar, x: Var, v: i32) -> Result<ConstraintId> {
    is_less_or_equal(solver, b, x, v - 1)
}

/// `b <=> (x >= v)`, i.e. `is_less_or_equal(!b, x, v - 1)`.
pub fn is_larger_or_equal(solver: &Solver, b: BoolVar, x: Var, v: i32) -> Result<ConstraintId> {
    is_less_or_equal(solver, not(&b)?, x, v - 1)
}

/// `b <=> (x > v)`, i.e. `is_less_or_equal(!b, x, v)`.
pub fn is_larger(solver: &Solver, b: BoolVar, x: Var, v: i32) -> Result<ConstraintId> {
    is_less_or_equal(solver, not(&b)?, x, v)
}

/// Fails with [`crate::error::Error::Overflow`] if the terms' bound-sum
/// doesn't fit `i32` — see [`Sum::new`].
pub fn sum(solver: &Solver, vars: Vec<Var>, y: Var) -> Result<ConstraintId> {
    solver.post(Rc::new(Sum::new(solver, vars, y)?), true)
}

/// `vars[0] + vars[1] + ... + vars[n-1] == v`, a constant target. Subject to
/// the same bound-sum overflow check as [`sum`]: the policy does not depend
/// on whether the right-hand side is a variable or a constant.
pub fn sum_eq(solver: &Solver, vars: Vec<Var>, v: i32) -> Result<ConstraintId> {
    let target = var::make_int_var(solver, v, v)?;
    sum(solver, vars, target)
}

/// Returns a fresh variable constrained to equal the sum of `vars`, with
/// bounds computed from their current min/max (overflow-checked).
pub fn sum_var(solver: &Solver, vars: Vec<Var>) -> Result<Var> {
    let mut min: i64 = 0;
    let mut max: i64 = 0;
    for v in &vars {
        min += v.min() as i64;
        max += v.max() as i64;
    }
    if min < i32::MIN as i64 || max > i32::MAX as i64 {
        return Err(crate::error::Error::Overflow(
            "sum_var bound sum overflows i32".into(),
        ));
    }
    let total = var::make_int_var(solver, min as i32, max as i32)?;
    sum(solver, vars, total.clone())?;
    Ok(total)
}

pub fn all_different(solver: &Solver, vars: Vec<Var>) -> Result<ConstraintId> {
    solver.post(Rc::new(AllDifferentBinary::new(vars)), true)
}

pub fn element_2d(solver: &Solver, x: Var, y: Var, matrix: Vec<Vec<i32>>, z: Var) -> Result<ConstraintId> {
    solver.post(Rc::new(Element2D::new(solver, x, y, matrix, z)?), true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_var_tracks_the_total_of_its_terms() {
        let s = make_solver(false);
        let x = make_int_var(&s, 0, 3).unwrap();
        let y = make_int_var(&s, 0, 3).unwrap();
        let total = sum_var(&s, vec![x.clone(), y.clone()]).unwrap();
        x.fix(2).unwrap();
        y.fix(1).unwrap();
        s.fix_point().unwrap();
        assert!(total.is_fixed());
        assert_eq!(total.min(), 3);
    }

    #[test]
    fn is_larger_or_equal_reifies_the_opposite_bound() {
        let s = make_solver(false);
        let x = make_int_var(&s, 0, 9).unwrap();
        let b = make_bool_var(&s).unwrap();
        is_larger_or_equal(&s, b.clone(), x.clone(), 5).unwrap();
        x.remove_below(5).unwrap();
        s.fix_point().unwrap();
        assert!(b.is_true());
    }
}
