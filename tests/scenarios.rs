//! End-to-end scenarios exercising the public `factory` API together:
//! posting constraints and running depth-first search to a fixed point.

use std::rc::Rc;

use plico::factory;
use plico::search::{first_fail, maximize, DfSearch};
use plico::IntVarLike;

// S1: NotEqual narrows the other side only once one of them is fixed.
#[test]
fn not_equal_narrows_once_one_side_is_fixed() {
    let s = factory::make_solver(false);
    let x = factory::make_int_var(&s, 0, 9).unwrap();
    let y = factory::make_int_var(&s, 0, 9).unwrap();
    factory::not_equal(&s, x.clone(), y.clone()).unwrap();
    assert_eq!(y.size(), 10);

    x.fix(6).unwrap();
    s.fix_point().unwrap();
    assert_eq!(y.size(), 9);
    assert!(!y.contains(6));
}

// S2: three independent boolean variables, no constraints. The full binary
// tree has 8 leaves, 0 failures, and 14 internal+leaf nodes below the root.
#[test]
fn dfs_over_independent_booleans_matches_tree_shape() {
    let s = factory::make_solver(false);
    let vars = factory::make_int_var_array(&s, 3, 0, 1).unwrap();
    let search = factory::make_dfs(&s, first_fail(vars));
    let stats = search.solve(None).unwrap();
    assert_eq!(stats.solutions(), 8);
    assert_eq!(stats.failures(), 0);
    assert_eq!(stats.nodes(), 14);
    assert!(stats.is_completed());
}

// S3: a single variable over an 11-value domain, branched fix(min) |
// remove(min). Every level of the chain either fixes the current minimum
// (a solution) or strips it and recurses, so all 11 values are visited as
// exactly 11 solutions.
#[test]
fn enumeration_over_eleven_values_explores_eleven_solutions() {
    let s = factory::make_solver(false);
    let y = factory::make_int_var(&s, 10, 20).unwrap();
    let search = factory::make_dfs(&s, first_fail(vec![y]));
    let stats = search.solve(None).unwrap();
    assert_eq!(stats.solutions(), 11);
    assert_eq!(stats.failures(), 0);
}

// S4: z == matrix[x][y] over a 4x5 matrix, with x/y/z domains far wider than
// the matrix itself. Element2D must prune out-of-range indices rather than
// index into the matrix with them, leaving exactly the 20 (x, y) pairs the
// matrix actually defines.
#[test]
fn element2d_enumerates_twenty_solutions_over_oversized_domains() {
    let matrix = vec![
        vec![3, 2, 1, -1, 0],
        vec![3, -5, -1, -4, 2],
        vec![2, -3, -5, -2, 3],
        vec![3, -5, -4, 2, 0],
    ];
    let s = factory::make_solver(false);
    let x = factory::make_int_var(&s, -2, 40).unwrap();
    let y = factory::make_int_var(&s, -3, 10).unwrap();
    let z = factory::make_int_var(&s, -20, 40).unwrap();
    factory::element_2d(&s, x.clone(), y.clone(), matrix, z.clone()).unwrap();

    let search = DfSearch::new(s.clone(), first_fail(vec![x, y, z]));
    let stats = search.solve(None).unwrap();
    assert_eq!(stats.solutions(), 20);
    assert_eq!(stats.failures(), 0);
}

// S5: a single fixed variable whose only possible sum can never meet a
// constant target of 0 fails right at post time, before any search starts.
#[test]
fn sum_against_constant_target_fails_at_post() {
    let s = factory::make_solver(false);
    let x = factory::make_int_var(&s, -9, -9).unwrap();
    let result = factory::sum_eq(&s, vec![x], 0);
    assert!(result.is_err());
}

// S6: b <=> (x <= 3) reified over x in -4..=7 (12 values). Enumerating x
// alone visits all 12 values as 12 solutions, and the reification holds at
// every one of them.
#[test]
fn reified_is_less_or_equal_matches_every_assignment() {
    let s = factory::make_solver(false);
    let x = factory::make_int_var(&s, -4, 7).unwrap();
    let b = factory::make_bool_var(&s).unwrap();
    factory::is_less_or_equal(&s, b.clone(), x.clone(), 3).unwrap();

    let checks = Rc::new(std::cell::RefCell::new(Vec::new()));
    let checks_for_closure = checks.clone();
    let x_check = x.clone();
    let b_check = b.clone();
    let search = DfSearch::new(s.clone(), first_fail(vec![x.clone()]));
    search.on_solution(move || {
        checks_for_closure.borrow_mut().push((x_check.min(), b_check.is_true()));
        Ok(())
    });
    let stats = search.solve(None).unwrap();
    assert_eq!(stats.solutions(), 12);
    for (xval, bval) in checks.borrow().iter() {
        assert_eq!(*xval <= 3, *bval);
    }
}

// Branch-and-bound: maximizing x + y subject to x + y <= 4 should converge
// on the optimum (4) without exhausting every assignment in the 4x4 grid.
#[test]
fn branch_and_bound_converges_on_the_optimum() {
    let s = factory::make_solver(false);
    let x = factory::make_int_var(&s, 0, 3).unwrap();
    let y = factory::make_int_var(&s, 0, 3).unwrap();
    let total = factory::make_int_var(&s, 0, 4).unwrap();
    factory::sum(&s, vec![x.clone(), y.clone()], total.clone()).unwrap();

    let obj = maximize(&s, total.clone()).unwrap();
    let search = DfSearch::new(s.clone(), first_fail(vec![x, y]));
    let stats = search.optimize(Rc::new(obj), None).unwrap();
    assert!(stats.solutions() >= 1);
    assert_eq!(total.max(), 4);
}
