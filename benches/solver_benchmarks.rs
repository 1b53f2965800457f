use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use plico::factory;
use plico::search::first_fail;
use plico::IntVarLike;

/// Builds and solves the n-queens problem, counting every solution.
fn solve_n_queens(n: usize) -> u64 {
    let solver = factory::make_solver(false);
    let rows = factory::make_int_var_array(&solver, n, 0, n as i32 - 1).unwrap();

    factory::all_different(&solver, rows.clone()).unwrap();

    let ups: Vec<_> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| factory::plus(r.clone(), i as i32).unwrap())
        .collect();
    let downs: Vec<_> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| factory::minus(r.clone(), i as i32).unwrap())
        .collect();
    factory::all_different(&solver, ups).unwrap();
    factory::all_different(&solver, downs).unwrap();

    let search = factory::make_dfs(&solver, first_fail(rows));
    let stats = search.solve(None).unwrap();
    stats.solutions()
}

fn bench_n_queens(c: &mut Criterion) {
    let mut group = c.benchmark_group("n_queens");
    for n in [4usize, 6, 8] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| solve_n_queens(n));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_n_queens);
criterion_main!(benches);
