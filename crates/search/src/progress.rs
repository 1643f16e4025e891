//! Progress estimate for long searches.
//!
//! The search interleaves two stacks per depth: which piece kind is being
//! answered and which landing of it is being tried. Reading both as digits of
//! a mixed-radix fraction gives the share of the tree already exhausted.

use std::time::{Duration, Instant};

use hatetris_core::Piece;
use tracing::info;

/// Searched (uncached) wells between clock reads.
const CHECK_EVERY: u64 = 1 << 12;

#[derive(Clone, Copy, Debug, Default)]
struct Frame {
    piece: usize,
    landing: usize,
    landings: usize,
}

#[derive(Debug)]
pub struct Progress {
    interval: Duration,
    start: Instant,
    last: Instant,
    /// Wells searched since construction, cache hits excluded.
    misses: u64,
    frames: Vec<Frame>,
}

impl Progress {
    pub fn new(interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            interval,
            start: now,
            last: now,
            misses: 0,
            frames: Vec::new(),
        }
    }

    fn frame(&mut self, depth: usize) -> &mut Frame {
        if self.frames.len() <= depth {
            self.frames.resize(depth + 1, Frame::default());
        }
        &mut self.frames[depth]
    }

    pub fn enter_piece(&mut self, depth: usize, piece: Piece) {
        *self.frame(depth) = Frame {
            piece: piece.index(),
            landing: 0,
            landings: 1,
        };
    }

    pub fn enter_landings(&mut self, depth: usize, landings: usize) {
        self.frame(depth).landings = landings.max(1);
    }

    pub fn set_landing(&mut self, depth: usize, landing: usize) {
        self.frame(depth).landing = landing;
    }

    /// Share of the search tree finished, looking at the frames above `depth`.
    pub fn completion(&self, depth: usize) -> f64 {
        let mut completion = 0.0;
        let mut scale = 1.0;
        for frame in self.frames.iter().take(depth) {
            completion += scale * frame.piece as f64 / Piece::COUNT as f64;
            scale /= Piece::COUNT as f64;
            completion += scale * frame.landing as f64 / frame.landings as f64;
            scale /= frame.landings as f64;
        }
        completion
    }

    /// Log a progress line if the interval has passed.
    pub fn tick(&mut self, depth: usize) {
        self.misses += 1;
        if self.misses % CHECK_EVERY != 0 {
            return;
        }
        let now = Instant::now();
        if now.duration_since(self.last) < self.interval {
            return;
        }
        self.last = now;
        let completion = self.completion(depth);
        let elapsed = now.duration_since(self.start).as_secs_f64();
        let estimate = if completion > 0.0 {
            elapsed / completion
        } else {
            f64::INFINITY
        };
        info!(
            depth,
            misses = self.misses,
            elapsed_secs = elapsed as u64,
            estimated_total_secs = estimate,
            "{:.10}% complete",
            completion * 100.0
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_counts_misses() {
        let mut progress = Progress::new(Duration::from_secs(3600));
        for _ in 0..CHECK_EVERY + 3 {
            progress.tick(0);
        }
        assert_eq!(progress.misses, CHECK_EVERY + 3);
    }

    #[test]
    fn test_completion_empty() {
        let progress = Progress::new(Duration::from_secs(1));
        assert_eq!(progress.completion(0), 0.0);
    }

    #[test]
    fn test_completion_mixed_radix() {
        let mut progress = Progress::new(Duration::from_secs(1));
        progress.enter_piece(0, Piece::J); // 2 of 7 kinds done
        progress.enter_landings(0, 4);
        progress.set_landing(0, 1); // 1 of 4 landings done
        let expected = 2.0 / 7.0 + (1.0 / 7.0) * (1.0 / 4.0);
        assert!((progress.completion(1) - expected).abs() < 1e-12);
        // frames at or below the current depth are ignored
        progress.enter_piece(1, Piece::Z);
        assert!((progress.completion(1) - expected).abs() < 1e-12);
        assert!(progress.completion(2) > expected);
    }
}
