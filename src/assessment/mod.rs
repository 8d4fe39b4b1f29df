//! Onboarding assessment and cognitive-age estimation.
//!
//! Runs a fixed six-slot battery (one fast and one slow drill per area, in a
//! fixed warm-up order) and converts overall performance into a one-shot
//! "cognitive age" relative to chronological age. The result is a standalone
//! report; it never feeds the rolling `UserMetricsState`.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::types::{
    Area, AssessmentResult, DrillResult, ExerciseRecord, ThinkingMode, MIN_COGNITIVE_AGE,
};

/// Fixed battery order: focus warms up before reasoning, fast before slow.
pub const BATTERY_ORDER: [(Area, ThinkingMode); 6] = [
    (Area::Focus, ThinkingMode::Fast),
    (Area::Focus, ThinkingMode::Slow),
    (Area::Reasoning, ThinkingMode::Fast),
    (Area::Reasoning, ThinkingMode::Slow),
    (Area::Creativity, ThinkingMode::Fast),
    (Area::Creativity, ThinkingMode::Slow),
];

/// Builds assessment batteries with a seedable uniform pick per slot.
pub struct AssessmentBattery {
    rng: ChaCha8Rng,
}

impl AssessmentBattery {
    pub fn new() -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42);
        Self::with_seed(seed)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// One uniform-random exercise per `(area, mode)` slot, in battery
    /// order. Slots the catalog cannot fill are skipped; the estimator's
    /// per-dimension defaults cover them.
    pub fn build(&mut self, catalog: &[ExerciseRecord]) -> Vec<ExerciseRecord> {
        let mut battery = Vec::with_capacity(BATTERY_ORDER.len());
        for (area, mode) in BATTERY_ORDER {
            let slot: Vec<&ExerciseRecord> = catalog
                .iter()
                .filter(|e| e.area == area && e.thinking_mode == mode)
                .collect();
            match slot.choose(&mut self.rng) {
                Some(exercise) => battery.push((*exercise).clone()),
                None => tracing::debug!(
                    area = area.as_str(),
                    mode = mode.as_str(),
                    "catalog has no exercise for battery slot, skipping"
                ),
            }
        }
        battery
    }
}

impl Default for AssessmentBattery {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute the onboarding report from completed battery drills, paired by
/// position. Every dimension defaults to 50 when its subset is empty; zero
/// completed drills yield an all-50 report and `cognitive_age ==
/// chronological_age`.
pub fn estimate(
    exercises: &[ExerciseRecord],
    results: &[DrillResult],
    chronological_age: u32,
) -> AssessmentResult {
    let paired: Vec<(&ExerciseRecord, &DrillResult)> =
        exercises.iter().zip(results.iter()).collect();

    let fast_score = dimension_mean(&paired, |e| e.thinking_mode == ThinkingMode::Fast);
    let slow_score = dimension_mean(&paired, |e| e.thinking_mode == ThinkingMode::Slow);
    let focus_score = dimension_mean(&paired, |e| e.area == Area::Focus);
    let reasoning_score = dimension_mean(&paired, |e| e.area == Area::Reasoning);
    let creativity_score = dimension_mean(&paired, |e| e.area == Area::Creativity);

    let overall_score = if paired.is_empty() {
        50
    } else {
        let sum: i64 = paired.iter().map(|(_, r)| r.score.clamp(0, 100) as i64).sum();
        (sum as f64 / paired.len() as f64).round() as i32
    };

    AssessmentResult {
        fast_score,
        slow_score,
        focus_score,
        reasoning_score,
        creativity_score,
        overall_score,
        cognitive_age: cognitive_age(chronological_age, overall_score),
    }
}

/// `max(18, round(age - (overall - 50) / 10))`: ten score points above or
/// below 50 shift cognitive age by one year in the corresponding direction.
pub fn cognitive_age(chronological_age: u32, overall_score: i32) -> u32 {
    let shifted = chronological_age as f64 - (overall_score as f64 - 50.0) / 10.0;
    shifted.round().max(MIN_COGNITIVE_AGE as f64) as u32
}

fn dimension_mean(
    paired: &[(&ExerciseRecord, &DrillResult)],
    matches: impl Fn(&ExerciseRecord) -> bool,
) -> i32 {
    let scores: Vec<i64> = paired
        .iter()
        .filter(|(e, _)| matches(e))
        .map(|(_, r)| r.score.clamp(0, 100) as i64)
        .collect();
    if scores.is_empty() {
        50
    } else {
        (scores.iter().sum::<i64>() as f64 / scores.len() as f64).round() as i32
    }
}
