//! HATETRIS search crate - adversarial solver over placement graphs.

mod cache;
mod parallel;
mod progress;
mod solver;
mod verdict;

pub use cache::SolutionCache;
pub use parallel::solve_parallel;
pub use progress::Progress;
pub use solver::{SearchStats, Solver, SolverConfig};
pub use verdict::{Forcing, Role, Verdict};
