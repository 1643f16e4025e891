//! Root-split parallel search.
//!
//! Each piece kind at the root is answered by its own worker with its own
//! cache. Once a worker finds no forcing landing it publishes its index, and
//! workers for later kinds give up: the sequential search would never have
//! reached them. Earlier kinds keep going, so the cited piece is the same one
//! the sequential search reports.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use hatetris_core::{Board, Piece};
use hatetris_engine::PlacementGraphs;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::solver::{SearchStats, Solver, SolverConfig, StopAfter};
use crate::verdict::{Forcing, Verdict};

struct WorkerResult {
    forcing: Option<Forcing>,
    interrupted: bool,
    stats: SearchStats,
}

/// Solve `board` with one worker per root piece kind.
pub fn solve_parallel(
    graphs: &PlacementGraphs,
    board: &Board,
    config: &SolverConfig,
) -> (Verdict, SearchStats) {
    let started = Instant::now();
    let failed = AtomicUsize::new(usize::MAX);

    let results: Vec<WorkerResult> = Piece::ALL
        .par_iter()
        .map(|&piece| {
            let index = piece.index();
            let stop = StopAfter {
                failed: &failed,
                index,
            };
            // progress lines from seven workers would interleave
            let worker_config = SolverConfig {
                progress_interval: None,
                ..config.clone()
            };
            let mut solver = Solver::with_stop(graphs, &worker_config, stop);
            let mut local_board = board.clone();
            let forcing = solver.find_forcing_landing(&mut local_board, piece);
            let interrupted = solver.interrupted();
            if forcing.is_none() && !interrupted {
                failed.fetch_min(index, Ordering::Relaxed);
            }
            debug!(
                piece = %piece,
                answered = forcing.is_some(),
                interrupted,
                wells = solver.stats().wells,
                "worker done"
            );
            WorkerResult {
                forcing,
                interrupted,
                stats: solver.stats(),
            }
        })
        .collect();

    let mut stats = SearchStats::default();
    for result in &results {
        stats.merge(&result.stats);
    }

    let mut strategy = [Forcing::Line(0); Piece::COUNT];
    let mut verdict = None;
    for (piece, result) in Piece::ALL.into_iter().zip(&results) {
        match result.forcing {
            Some(forcing) => strategy[piece.index()] = forcing,
            None if !result.interrupted => {
                verdict = Some(Verdict::Adversary(piece));
                break;
            }
            // a smaller index failed for real; the loop reaches it first
            None => {}
        }
    }
    let verdict = verdict.unwrap_or(Verdict::Placer(strategy));

    info!(
        winner = %verdict.winner(),
        wells = stats.wells,
        cache_hits = stats.cache_hits,
        max_depth = stats.max_depth,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "parallel search finished"
    );
    (verdict, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hatetris_core::WellConfig;

    fn sequential(graphs: &PlacementGraphs, board: &Board) -> Verdict {
        let mut solver = Solver::new(graphs, &SolverConfig::default());
        solver.solve(&mut board.clone())
    }

    #[test]
    fn test_parallel_matches_sequential_small_wells() {
        for height in 1..=3 {
            let config = WellConfig::new(4, height).unwrap();
            let graphs = PlacementGraphs::build(&config);
            let board = Board::empty(&config);
            let (verdict, _) = solve_parallel(&graphs, &board, &SolverConfig::default());
            assert_eq!(verdict, sequential(&graphs, &board), "4x{height}");
        }
    }

    #[test]
    fn test_parallel_matches_sequential_with_debris() {
        let config = WellConfig::new(4, 3).unwrap();
        let graphs = PlacementGraphs::build(&config);
        let board = Board::from_rows(&config, &[0, 0, 0, 0b1000, 0b1001]).unwrap();
        let (verdict, _) = solve_parallel(&graphs, &board, &SolverConfig::default());
        assert_eq!(verdict, sequential(&graphs, &board));
    }

    #[test]
    fn test_parallel_without_cache() {
        let config = WellConfig::new(4, 2).unwrap();
        let graphs = PlacementGraphs::build(&config);
        let board = Board::empty(&config);
        let no_cache = SolverConfig {
            use_cache: false,
            ..SolverConfig::default()
        };
        let (verdict, _) = solve_parallel(&graphs, &board, &no_cache);
        assert_eq!(verdict.winner(), sequential(&graphs, &board).winner());
    }
}
