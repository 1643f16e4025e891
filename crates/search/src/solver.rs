//! Adversarial solver - can the placer force a line whatever pieces arrive?
//!
//! The adversary wins a well if some piece kind leaves the placer without a
//! forcing landing; the placer wins if every kind has one. A landing is
//! forcing when it completes a row or when the well it leaves is a placer win.
//! The board is mutated in place on the way down and restored on the way up,
//! so sibling branches always see the board their parent saw.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use hatetris_core::{Board, Piece};
use hatetris_engine::{
    apply_placement_mut, describe, find_landings, unapply_placement, Landings, PlacementGraphs,
};
use tracing::{debug, info, info_span};

use crate::cache::SolutionCache;
use crate::progress::Progress;
use crate::verdict::{Forcing, Role, Verdict};

#[derive(Clone, Debug)]
pub struct SolverConfig {
    /// Memoize verdicts by board. Turning it off only costs time.
    pub use_cache: bool,
    /// Log a completion estimate this often; `None` disables it.
    pub progress_interval: Option<Duration>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            use_cache: true,
            progress_interval: None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Wells whose verdict was requested, cache hits included.
    pub wells: u64,
    pub cache_hits: u64,
    /// Non-winning landing sites enumerated.
    pub landings: u64,
    pub max_depth: usize,
}

impl SearchStats {
    pub fn merge(&mut self, other: &SearchStats) {
        self.wells += other.wells;
        self.cache_hits += other.cache_hits;
        self.landings += other.landings;
        self.max_depth = self.max_depth.max(other.max_depth);
    }
}

/// Cooperative stop for root-split workers: stop once a piece kind earlier in
/// the evaluation order than ours has already failed.
#[derive(Clone, Copy, Debug)]
pub(crate) struct StopAfter<'a> {
    pub failed: &'a AtomicUsize,
    pub index: usize,
}

impl StopAfter<'_> {
    #[inline]
    fn triggered(&self) -> bool {
        self.failed.load(Ordering::Relaxed) < self.index
    }
}

pub struct Solver<'g> {
    graphs: &'g PlacementGraphs,
    cache: Option<SolutionCache>,
    progress: Option<Progress>,
    stop: Option<StopAfter<'g>>,
    stats: SearchStats,
    depth: usize,
    interrupted: bool,
}

impl<'g> Solver<'g> {
    pub fn new(graphs: &'g PlacementGraphs, config: &SolverConfig) -> Self {
        let cache = config
            .use_cache
            .then(|| SolutionCache::new(graphs.config().full_height()));
        Self {
            graphs,
            cache,
            progress: config.progress_interval.map(Progress::new),
            stop: None,
            stats: SearchStats::default(),
            depth: 0,
            interrupted: false,
        }
    }

    pub(crate) fn with_stop(
        graphs: &'g PlacementGraphs,
        config: &SolverConfig,
        stop: StopAfter<'g>,
    ) -> Self {
        Self {
            stop: Some(stop),
            ..Self::new(graphs, config)
        }
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Wells currently memoized, zero when caching is off.
    pub fn cached_wells(&self) -> usize {
        self.cache.as_ref().map_or(0, SolutionCache::len)
    }

    /// Interior nodes of the cache trie, zero when caching is off.
    pub fn cache_trie_nodes(&self) -> usize {
        self.cache.as_ref().map_or(0, SolutionCache::trie_nodes)
    }

    /// Whether the last search was cut short by a stop signal. Its result is
    /// meaningless then.
    pub(crate) fn interrupted(&self) -> bool {
        self.interrupted
    }

    /// Decide who wins `board`. The board is returned unchanged.
    pub fn solve(&mut self, board: &mut Board) -> Verdict {
        debug_assert_eq!(board.height(), self.graphs.config().full_height());
        debug_assert_eq!(board.width(), self.graphs.config().width());
        let _span = info_span!(
            "solve",
            width = self.graphs.config().width(),
            height = self.graphs.config().height()
        )
        .entered();

        let started = Instant::now();
        self.depth = 0;
        self.interrupted = false;
        let verdict = self.solve_well(board);
        info!(
            winner = %verdict.winner(),
            wells = self.stats.wells,
            cache_hits = self.stats.cache_hits,
            cached = self.cached_wells(),
            trie_nodes = self.cache_trie_nodes(),
            max_depth = self.stats.max_depth,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "search finished"
        );
        verdict
    }

    /// First landing of `piece` that wins for the placer on `board`: an
    /// immediate line if one is reachable, else the first site whose
    /// resulting well the placer wins. `None` means the adversary wins by
    /// handing over `piece`.
    pub fn find_forcing_landing(&mut self, board: &mut Board, piece: Piece) -> Option<Forcing> {
        let graph = self.graphs.graph(piece);
        let sites = match find_landings(board, graph) {
            Landings::Line(id) => return Some(Forcing::Line(id)),
            Landings::Sites(sites) => sites,
        };
        self.stats.landings += sites.len() as u64;
        if let Some(progress) = &mut self.progress {
            progress.enter_landings(self.depth, sites.len());
        }

        for (i, &id) in sites.iter().enumerate() {
            if let Some(progress) = &mut self.progress {
                progress.set_landing(self.depth, i);
            }
            let node = graph.node(id);
            apply_placement_mut(board, node);
            self.depth += 1;
            let verdict = self.solve_well(board);
            self.depth -= 1;
            unapply_placement(board, node);

            if self.interrupted {
                return None;
            }
            if verdict.winner() == Role::Placer {
                return Some(Forcing::Survive(id));
            }
        }
        None
    }

    fn solve_well(&mut self, board: &mut Board) -> Verdict {
        if self.stop.is_some_and(|stop| stop.triggered()) {
            self.interrupted = true;
        }
        if self.interrupted {
            // discarded by the caller, never cached
            return Verdict::Adversary(Piece::O);
        }

        self.stats.wells += 1;
        self.stats.max_depth = self.stats.max_depth.max(self.depth);
        if let Some(verdict) = self.cache.as_ref().and_then(|c| c.lookup(board.rows())) {
            self.stats.cache_hits += 1;
            return *verdict;
        }
        if let Some(progress) = &mut self.progress {
            progress.tick(self.depth);
        }

        let mut strategy = [Forcing::Line(0); Piece::COUNT];
        let mut verdict = None;
        for piece in Piece::ALL {
            if let Some(progress) = &mut self.progress {
                progress.enter_piece(self.depth, piece);
            }
            match self.find_forcing_landing(board, piece) {
                Some(forcing) => {
                    if self.depth == 0 {
                        let node = self.graphs.graph(piece).node(forcing.node());
                        debug!(piece = %piece, landing = %describe(node), "placer answers");
                    }
                    strategy[piece.index()] = forcing;
                }
                None => {
                    verdict = Some(Verdict::Adversary(piece));
                    break;
                }
            }
        }
        let verdict = verdict.unwrap_or(Verdict::Placer(strategy));

        if !self.interrupted {
            if let Some(cache) = &mut self.cache {
                cache.store(board.rows(), verdict);
            }
        }
        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hatetris_core::WellConfig;

    fn solve(config: &WellConfig, board: &Board, use_cache: bool) -> Verdict {
        let graphs = PlacementGraphs::build(config);
        let mut solver = Solver::new(
            &graphs,
            &SolverConfig {
                use_cache,
                ..SolverConfig::default()
            },
        );
        let mut board = board.clone();
        solver.solve(&mut board)
    }

    #[test]
    fn test_spawn_overlap_everywhere_cites_o() {
        let config = WellConfig::new(4, 1).unwrap();
        let board = Board::empty(&config);
        assert_eq!(solve(&config, &board, true), Verdict::Adversary(Piece::O));
        assert_eq!(solve(&config, &board, false), Verdict::Adversary(Piece::O));
    }

    #[test]
    fn test_blocked_spawn_is_adversary_win() {
        let config = WellConfig::new(4, 3).unwrap();
        let board = Board::from_rows(&config, &[0b0110, 0, 0, 0, 0]).unwrap();
        assert_eq!(solve(&config, &board, true), Verdict::Adversary(Piece::O));
    }

    #[test]
    fn test_solve_restores_board() {
        let config = WellConfig::new(4, 3).unwrap();
        let graphs = PlacementGraphs::build(&config);
        let mut solver = Solver::new(&graphs, &SolverConfig::default());
        let mut board = Board::from_rows(&config, &[0, 0, 0, 0, 0b1001]).unwrap();
        let before = board.clone();
        solver.solve(&mut board);
        assert_eq!(board, before);
    }

    #[test]
    fn test_line_landing_is_forcing() {
        let config = WellConfig::new(4, 4).unwrap();
        let graphs = PlacementGraphs::build(&config);
        let mut board = Board::from_rows(&config, &[0, 0, 0, 0b1110, 0b1110, 0b1110]).unwrap();
        let line = find_landings(&board, graphs.graph(Piece::I)).line().unwrap();
        let mut solver = Solver::new(&graphs, &SolverConfig::default());
        assert_eq!(
            solver.find_forcing_landing(&mut board, Piece::I),
            Some(Forcing::Line(line))
        );
        let verdict = solver.solve(&mut board);
        assert_ne!(verdict, Verdict::Adversary(Piece::I));
        if let Some(forcing) = verdict.forcing(Piece::I) {
            assert_eq!(forcing, Forcing::Line(line));
        }
    }

    #[test]
    fn test_cache_fills_and_hits() {
        let config = WellConfig::new(4, 3).unwrap();
        let graphs = PlacementGraphs::build(&config);
        let mut solver = Solver::new(&graphs, &SolverConfig::default());
        let mut board = Board::empty(&config);
        let first = solver.solve(&mut board);
        assert!(solver.cached_wells() > 0);
        // one trie level per row, so at least a full path per cached well
        assert!(solver.cache_trie_nodes() >= config.full_height());
        let wells = solver.stats().wells;
        let second = solver.solve(&mut board);
        assert_eq!(first, second);
        // the root itself is now cached
        assert_eq!(solver.stats().wells, wells + 1);
        assert!(solver.stats().cache_hits >= 1);
    }

    #[test]
    fn test_stats_merge() {
        let mut a = SearchStats {
            wells: 3,
            cache_hits: 1,
            landings: 10,
            max_depth: 2,
        };
        a.merge(&SearchStats {
            wells: 2,
            cache_hits: 0,
            landings: 5,
            max_depth: 4,
        });
        assert_eq!(
            a,
            SearchStats {
                wells: 5,
                cache_hits: 1,
                landings: 15,
                max_depth: 4
            }
        );
    }
}
