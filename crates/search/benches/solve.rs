use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hatetris_core::{Board, WellConfig};
use hatetris_engine::PlacementGraphs;
use hatetris_search::{solve_parallel, Solver, SolverConfig};

fn bench_solve(c: &mut Criterion) {
    for height in [2, 3] {
        let config = WellConfig::new(4, height).unwrap();
        let graphs = PlacementGraphs::build(&config);
        let board = Board::empty(&config);

        c.bench_function(&format!("solve_4x{}", height), |b| {
            b.iter(|| {
                let mut solver = Solver::new(&graphs, &SolverConfig::default());
                solver.solve(&mut black_box(board.clone()))
            })
        });
        c.bench_function(&format!("solve_4x{}_no_cache", height), |b| {
            let config = SolverConfig {
                use_cache: false,
                ..SolverConfig::default()
            };
            b.iter(|| {
                let mut solver = Solver::new(&graphs, &config);
                solver.solve(&mut black_box(board.clone()))
            })
        });
    }
}

fn bench_solve_parallel(c: &mut Criterion) {
    let config = WellConfig::new(4, 3).unwrap();
    let graphs = PlacementGraphs::build(&config);
    let board = Board::empty(&config);

    c.bench_function("solve_parallel_4x3", |b| {
        b.iter(|| solve_parallel(&graphs, black_box(&board), &SolverConfig::default()))
    });
}

criterion_group!(benches, bench_solve, bench_solve_parallel);
criterion_main!(benches);
