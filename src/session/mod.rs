//! Session aggregation.
//!
//! Pure reduction of an ordered sequence of drill results (paired by position
//! with the exercises that produced them) into one `SessionResult`: the
//! session-level average score, correctness totals, and the earned-points
//! deltas each affected metric should receive.

use crate::types::{
    DrillResult, ExerciseRecord, MetricDeltas, SessionResult, REFLECTION_FULL_LEN,
};

/// Full credit multiplier applied to the exercise weight.
const FULL_CREDIT: f64 = 2.0;
/// Partial credit multiplier for attempted-but-wrong answers.
const PARTIAL_CREDIT: f64 = 0.5;

/// Aggregate one completed session. `results` and `exercises` are paired by
/// position; a length mismatch truncates to the shorter of the two.
/// `aggregate(&[], &[])` yields a zeroed result, never an error.
pub fn aggregate(results: &[DrillResult], exercises: &[ExerciseRecord]) -> SessionResult {
    let average_score = if results.is_empty() {
        0
    } else {
        let sum: i64 = results.iter().map(|r| clamp_incoming(r.score) as i64).sum();
        (sum as f64 / results.len() as f64).round() as i32
    };

    let total_correct = results.iter().map(|r| r.correct).sum();
    let total_questions = results.iter().map(|r| r.total).sum();

    let mut metric_deltas = MetricDeltas::new();
    for (result, exercise) in results.iter().zip(exercises.iter()) {
        let earned = earned_points(result, exercise);
        if earned <= 0.0 {
            continue;
        }
        for metric in &exercise.metrics_affected {
            *metric_deltas.entry(*metric).or_insert(0.0) += earned;
        }
    }

    SessionResult {
        average_score,
        total_correct,
        total_questions,
        exercises_used: exercises.iter().map(|e| e.id.clone()).collect(),
        metric_deltas,
    }
}

/// 2-tier earned-points rule.
///
/// Objective drills: full credit (`2 * weight`) when the answer was
/// objectively correct, partial credit (`0.5 * weight`) when attempted but
/// wrong, nothing when not attempted. Reflection drills: length-gated, with
/// full credit above `REFLECTION_FULL_LEN` characters, partial below, zero
/// for an empty response.
fn earned_points(result: &DrillResult, exercise: &ExerciseRecord) -> f64 {
    if exercise.drill_type.is_reflection() {
        return reflection_points(result, exercise.weight);
    }

    if result.total == 0 {
        return 0.0;
    }
    if objectively_correct(result) {
        FULL_CREDIT * exercise.weight
    } else {
        PARTIAL_CREDIT * exercise.weight
    }
}

/// A drill counts as objectively correct when correct responses are at least
/// half of the attempts; single-answer drills reduce to "answered correctly".
/// Widened arithmetic keeps contract-violating counts from overflowing.
fn objectively_correct(result: &DrillResult) -> bool {
    result.correct > 0 && u64::from(result.correct) * 2 >= u64::from(result.total)
}

fn reflection_points(result: &DrillResult, weight: f64) -> f64 {
    let len = result
        .metadata
        .get("responseLength")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as usize;

    if len == 0 {
        0.0
    } else if len >= REFLECTION_FULL_LEN {
        FULL_CREDIT * weight
    } else {
        PARTIAL_CREDIT * weight
    }
}

/// Contract-violation guard: a misbehaving scorer handing over an
/// out-of-range score is clamped here, since downstream composite formulas
/// assume bounded inputs.
fn clamp_incoming(score: i32) -> i32 {
    score.clamp(0, 100)
}
