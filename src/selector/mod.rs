//! Weighted exercise selection.
//!
//! Populates a training session from the catalog pool using roulette-wheel
//! sampling without replacement: selection probability is proportional to each
//! exercise's `weight`. A balanced variant splits the target count across fast
//! and slow thinking modes, emitting fast exercises first so sessions warm up
//! before deepening.
//!
//! Leniency policy (deliberate, must be preserved): a thinking-mode filter
//! that leaves no candidates silently falls back to the unfiltered pool
//! rather than failing.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::types::{ExerciseRecord, SelectionRequest, ThinkingMode};

/// Seedable weighted sampler over catalog pools.
pub struct WeightedSelector {
    rng: ChaCha8Rng,
}

impl WeightedSelector {
    pub fn new() -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42);
        Self::with_seed(seed)
    }

    /// Create a selector with a fixed seed (for deterministic tests/replay).
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Draw `count` exercises from `pool` without replacement, probability
    /// proportional to weight. Returns the whole pool (in draw order) when
    /// `count` exceeds it; an empty pool yields an empty result.
    pub fn select(&mut self, pool: &[ExerciseRecord], count: usize) -> Vec<ExerciseRecord> {
        let mut remaining: Vec<ExerciseRecord> = pool.to_vec();
        let target = count.min(remaining.len());
        let mut drawn = Vec::with_capacity(target);

        while drawn.len() < target && !remaining.is_empty() {
            let idx = self.spin(&remaining);
            drawn.push(remaining.remove(idx));
        }

        drawn
    }

    /// Balanced variant: ceil(count/2) fast-mode draws followed by the
    /// remainder from the slow-mode partition. A partition smaller than its
    /// share has the shortfall topped up from the other one, keeping the
    /// fast-before-slow ordering. Falls back to a plain weighted draw when
    /// either partition is empty.
    pub fn select_balanced(&mut self, pool: &[ExerciseRecord], count: usize) -> Vec<ExerciseRecord> {
        let fast: Vec<ExerciseRecord> = pool
            .iter()
            .filter(|e| e.thinking_mode == ThinkingMode::Fast)
            .cloned()
            .collect();
        let slow: Vec<ExerciseRecord> = pool
            .iter()
            .filter(|e| e.thinking_mode == ThinkingMode::Slow)
            .cloned()
            .collect();

        if fast.is_empty() || slow.is_empty() {
            return self.select(pool, count);
        }

        let fast_target = count.div_ceil(2);

        // A short fast partition shifts its shortfall onto the slow share; a
        // short slow partition is topped up from the undrawn fast leftovers.
        let mut session = self.select(&fast, fast_target);
        let slow_drawn = self.select(&slow, count - session.len());
        let shortfall = count - session.len() - slow_drawn.len();
        if shortfall > 0 {
            let leftover: Vec<ExerciseRecord> = fast
                .iter()
                .filter(|e| !session.iter().any(|s| s.id == e.id))
                .cloned()
                .collect();
            session.extend(self.select(&leftover, shortfall));
        }
        session.extend(slow_drawn);
        session
    }

    /// Apply a full selection request: optional mode filter (with silent
    /// fallback to the unfiltered pool), optional balanced split, count range
    /// clamped to what the pool can supply.
    pub fn select_for_request(
        &mut self,
        pool: &[ExerciseRecord],
        request: &SelectionRequest,
    ) -> Vec<ExerciseRecord> {
        let filtered: Vec<ExerciseRecord> = match request.mode {
            Some(mode) => {
                let subset: Vec<ExerciseRecord> = pool
                    .iter()
                    .filter(|e| e.thinking_mode == mode)
                    .cloned()
                    .collect();
                if subset.is_empty() {
                    tracing::debug!(
                        mode = mode.as_str(),
                        "thinking-mode filter left no candidates, falling back to full pool"
                    );
                    pool.to_vec()
                } else {
                    subset
                }
            }
            None => pool.to_vec(),
        };

        let count = request
            .max_count
            .min(filtered.len())
            .max(request.min_count.min(filtered.len()));

        if request.balanced {
            self.select_balanced(&filtered, count)
        } else {
            self.select(&filtered, count)
        }
    }

    /// One roulette-wheel spin over the remaining candidates. Returns the
    /// index of the winner.
    fn spin(&mut self, remaining: &[ExerciseRecord]) -> usize {
        let total_weight: f64 = remaining.iter().map(|e| e.weight).sum();
        if total_weight <= 0.0 || !total_weight.is_finite() {
            // Degenerate pool: every weight should have been sanitized at
            // decode time, but tolerate it with a uniform pick.
            return self.rng.gen_range(0..remaining.len());
        }

        let mut r = self.rng.gen::<f64>() * total_weight;
        for (idx, exercise) in remaining.iter().enumerate() {
            r -= exercise.weight;
            if r <= 0.0 {
                return idx;
            }
        }
        remaining.len() - 1
    }
}

impl Default for WeightedSelector {
    fn default() -> Self {
        Self::new()
    }
}
