//! Drill scoring.
//!
//! One pure function per drill archetype, turning a finalized trial log into a
//! `DrillResult`. The per-drill constants are product calibration data: each
//! drill type fixes its own accuracy weight, speed-bonus cap and decay divisor
//! in [`calibration`], and those numbers are copied, not derived.
//!
//! Invariants shared by every scorer:
//! - the returned `score` is clamped into [0, 100]
//! - a timed-out trial counts as an attempted miss, never dropped
//! - reaction time is averaged only over correct, in-window responses
//! - a zero denominator contributes 0 to the score, never NaN or a panic
//! - a malformed or mismatched trial log degrades to `DrillResult::empty()`

use serde_json::json;

use crate::types::{DrillResult, DrillType, REFLECTION_FULL_LEN};

// ==================== Trial logs ====================

/// One trial of a choice/classification drill.
#[derive(Debug, Clone)]
pub struct ChoiceTrial {
    pub correct: bool,
    pub reaction_time_ms: f64,
    /// No answer arrived before the per-trial limit. Counts as a miss.
    pub timed_out: bool,
}

/// One trial of a go/no-go or sustained-attention drill.
#[derive(Debug, Clone)]
pub struct VigilanceTrial {
    /// Whether this trial showed a target (go) stimulus.
    pub is_target: bool,
    /// Whether the user responded within the window.
    pub responded: bool,
    pub reaction_time_ms: f64,
}

/// Single-shot structured-judgment answers.
#[derive(Debug, Clone)]
pub struct JudgmentLog {
    pub structure_matches: bool,
    pub projection_correct: bool,
}

/// Multi-stage causal-graph drill log.
#[derive(Debug, Clone)]
pub struct CausalGraphLog {
    pub classifications: Vec<ChoiceTrial>,
    pub correct_detections: u32,
    pub expected_detections: u32,
    pub false_positives: u32,
}

/// Finalized trial log for one completed drill.
#[derive(Debug, Clone)]
pub enum DrillLog {
    Choice(Vec<ChoiceTrial>),
    Vigilance(Vec<VigilanceTrial>),
    Judgment(JudgmentLog),
    Binary { correct: bool },
    CausalGraph(CausalGraphLog),
    Reflection { response: String },
}

// ==================== Calibration ====================

/// Capped, decaying speed bonus: `max(0, cap - avg_rt_ms / divisor_ms)`.
#[derive(Debug, Clone, Copy)]
pub struct SpeedBonus {
    pub cap: f64,
    pub divisor_ms: f64,
}

impl SpeedBonus {
    fn apply(&self, avg_reaction_time_ms: Option<f64>) -> f64 {
        match avg_reaction_time_ms {
            Some(rt) => (self.cap - rt / self.divisor_ms).max(0.0),
            None => 0.0,
        }
    }
}

/// Scoring archetype with its tuning constants resolved.
#[derive(Debug, Clone, Copy)]
pub enum Archetype {
    /// `accuracy * weight + speed bonus`
    TimedChoice { accuracy_weight: f64, bonus: SpeedBonus },
    /// `accuracy * weight + speed bonus - falseAlarmRatio * penalty`
    Vigilance {
        accuracy_weight: f64,
        bonus: SpeedBonus,
        false_alarm_penalty: f64,
    },
    /// Independently-gated partial-credit terms.
    StructuredJudgment,
    /// Exactly 0 or 100.
    Binary,
    /// 60% classification, 40% cycle detection.
    CausalGraph,
    /// Length-gated open-ended response.
    Reflection,
}

/// Fixed calibration table, one row per drill type.
pub mod calibration {
    use super::{Archetype, SpeedBonus};
    use crate::types::DrillType;

    pub fn archetype_for(drill_type: DrillType) -> Archetype {
        match drill_type {
            DrillType::CausalClassification => Archetype::TimedChoice {
                accuracy_weight: 85.0,
                bonus: SpeedBonus { cap: 15.0, divisor_ms: 200.0 },
            },
            // Faster-paced variant: bigger bonus, steeper decay.
            DrillType::SymbolMatch => Archetype::TimedChoice {
                accuracy_weight: 85.0,
                bonus: SpeedBonus { cap: 20.0, divisor_ms: 100.0 },
            },
            DrillType::SustainedAttention => Archetype::Vigilance {
                accuracy_weight: 60.0,
                bonus: SpeedBonus { cap: 15.0, divisor_ms: 200.0 },
                false_alarm_penalty: 20.0,
            },
            DrillType::GoNoGo => Archetype::Vigilance {
                accuracy_weight: 70.0,
                bonus: SpeedBonus { cap: 20.0, divisor_ms: 100.0 },
                false_alarm_penalty: 20.0,
            },
            DrillType::ConceptProjection => Archetype::StructuredJudgment,
            DrillType::BestExplanation => Archetype::Binary,
            DrillType::CausalGraph => Archetype::CausalGraph,
            DrillType::Reflection => Archetype::Reflection,
        }
    }
}

// ==================== Scoring entry point ====================

/// Score one finalized drill log. Mismatched (drill type, log) pairings
/// degrade to an empty result rather than erroring.
pub fn score_drill(drill_type: DrillType, log: &DrillLog) -> DrillResult {
    let archetype = calibration::archetype_for(drill_type);
    match (archetype, log) {
        (Archetype::TimedChoice { accuracy_weight, bonus }, DrillLog::Choice(trials)) => {
            score_timed_choice(trials, accuracy_weight, bonus)
        }
        (
            Archetype::Vigilance { accuracy_weight, bonus, false_alarm_penalty },
            DrillLog::Vigilance(trials),
        ) => score_vigilance(trials, accuracy_weight, bonus, false_alarm_penalty),
        (Archetype::StructuredJudgment, DrillLog::Judgment(answers)) => {
            score_structured_judgment(answers)
        }
        (Archetype::Binary, DrillLog::Binary { correct }) => score_binary(*correct),
        (Archetype::CausalGraph, DrillLog::CausalGraph(log)) => score_causal_graph(log),
        (Archetype::Reflection, DrillLog::Reflection { response }) => score_reflection(response),
        _ => {
            tracing::warn!(
                drill_type = drill_type.id(),
                "trial log does not match drill archetype, scoring as empty"
            );
            DrillResult::empty()
        }
    }
}

// ==================== Per-archetype scorers ====================

fn score_timed_choice(trials: &[ChoiceTrial], accuracy_weight: f64, bonus: SpeedBonus) -> DrillResult {
    if trials.is_empty() {
        return DrillResult::empty();
    }

    let total = trials.len() as u32;
    let correct = trials.iter().filter(|t| t.correct && !t.timed_out).count() as u32;
    let accuracy = ratio(correct, total);
    let avg_rt = mean_reaction_time(
        trials
            .iter()
            .filter(|t| t.correct && !t.timed_out)
            .map(|t| t.reaction_time_ms),
    );
    let speed_bonus = bonus.apply(avg_rt);

    let mut result = DrillResult {
        score: clamp_score(accuracy * accuracy_weight + speed_bonus),
        correct,
        total,
        avg_reaction_time_ms: avg_rt,
        metadata: serde_json::Map::new(),
    };
    result.metadata.insert("accuracy".into(), json!(accuracy));
    result.metadata.insert("speedBonus".into(), json!(speed_bonus));
    result
}

fn score_vigilance(
    trials: &[VigilanceTrial],
    accuracy_weight: f64,
    bonus: SpeedBonus,
    false_alarm_penalty: f64,
) -> DrillResult {
    if trials.is_empty() {
        return DrillResult::empty();
    }

    let hits = trials.iter().filter(|t| t.is_target && t.responded).count() as u32;
    let misses = trials.iter().filter(|t| t.is_target && !t.responded).count() as u32;
    let false_alarms = trials.iter().filter(|t| !t.is_target && t.responded).count() as u32;
    let responses = hits + false_alarms;

    let accuracy = ratio(hits, hits + misses);
    let false_alarm_ratio = ratio(false_alarms, responses);
    let avg_rt = mean_reaction_time(
        trials
            .iter()
            .filter(|t| t.is_target && t.responded)
            .map(|t| t.reaction_time_ms),
    );
    let speed_bonus = bonus.apply(avg_rt);
    let penalty = false_alarm_ratio * false_alarm_penalty;

    let mut result = DrillResult {
        score: clamp_score(accuracy * accuracy_weight + speed_bonus - penalty),
        correct: hits,
        total: hits + misses + false_alarms,
        avg_reaction_time_ms: avg_rt,
        metadata: serde_json::Map::new(),
    };
    result.metadata.insert("hits".into(), json!(hits));
    result.metadata.insert("misses".into(), json!(misses));
    result.metadata.insert("falseAlarms".into(), json!(false_alarms));
    result
        .metadata
        .insert("falseAlarmRatio".into(), json!(false_alarm_ratio));
    result
}

/// Wrong-but-plausible answers keep a floor credit (20 for structure, 15 for
/// projection). Rewarding attempted reasoning over blank wrongness is a
/// product decision, not a bug.
fn score_structured_judgment(answers: &JudgmentLog) -> DrillResult {
    let structure_points = if answers.structure_matches { 50.0 } else { 20.0 };
    let projection_points = if answers.projection_correct { 50.0 } else { 15.0 };
    let correct = answers.structure_matches as u32 + answers.projection_correct as u32;

    let mut result = DrillResult {
        score: clamp_score(structure_points + projection_points),
        correct,
        total: 2,
        avg_reaction_time_ms: None,
        metadata: serde_json::Map::new(),
    };
    result
        .metadata
        .insert("structurePoints".into(), json!(structure_points));
    result
        .metadata
        .insert("projectionPoints".into(), json!(projection_points));
    result
}

fn score_binary(correct: bool) -> DrillResult {
    DrillResult {
        score: if correct { 100 } else { 0 },
        correct: correct as u32,
        total: 1,
        avg_reaction_time_ms: None,
        metadata: serde_json::Map::new(),
    }
}

fn score_causal_graph(log: &CausalGraphLog) -> DrillResult {
    let class_total = log.classifications.len() as u32;
    let class_correct = log
        .classifications
        .iter()
        .filter(|t| t.correct && !t.timed_out)
        .count() as u32;
    let class_component = ratio(class_correct, class_total) * 100.0;

    // Each false-positive cycle detection costs 10 points, floored at 0.
    let detection_accuracy = ratio(log.correct_detections, log.expected_detections);
    let detection_component =
        (detection_accuracy * 100.0 - log.false_positives as f64 * 10.0).max(0.0);

    let mut result = DrillResult {
        score: clamp_score(class_component * 0.6 + detection_component * 0.4),
        correct: class_correct + log.correct_detections,
        total: class_total + log.expected_detections,
        avg_reaction_time_ms: mean_reaction_time(
            log.classifications
                .iter()
                .filter(|t| t.correct && !t.timed_out)
                .map(|t| t.reaction_time_ms),
        ),
        metadata: serde_json::Map::new(),
    };
    result
        .metadata
        .insert("classificationComponent".into(), json!(class_component));
    result
        .metadata
        .insert("detectionComponent".into(), json!(detection_component));
    result
}

fn score_reflection(response: &str) -> DrillResult {
    let len = response.trim().chars().count();
    let score = if len == 0 {
        0
    } else if len >= REFLECTION_FULL_LEN {
        100
    } else {
        60
    };

    let mut result = DrillResult {
        score,
        correct: (len > 0) as u32,
        total: 1,
        avg_reaction_time_ms: None,
        metadata: serde_json::Map::new(),
    };
    result.metadata.insert("responseLength".into(), json!(len));
    result
}

// ==================== Helpers ====================

fn mean_reaction_time(times: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut n = 0u32;
    for rt in times {
        if rt.is_finite() && rt >= 0.0 {
            sum += rt;
            n += 1;
        }
    }
    if n == 0 {
        None
    } else {
        Some(sum / n as f64)
    }
}

fn ratio(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn clamp_score(raw: f64) -> i32 {
    if !raw.is_finite() {
        return 0;
    }
    raw.round().clamp(0.0, 100.0) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choice(correct: bool, rt: f64) -> ChoiceTrial {
        ChoiceTrial {
            correct,
            reaction_time_ms: rt,
            timed_out: false,
        }
    }

    fn timeout() -> ChoiceTrial {
        ChoiceTrial {
            correct: false,
            reaction_time_ms: 0.0,
            timed_out: true,
        }
    }

    #[test]
    fn timed_choice_formula() {
        // 3/4 correct at 1000ms avg: 0.75*85 + max(0, 15 - 1000/200) = 63.75 + 10
        let trials = vec![
            choice(true, 1000.0),
            choice(true, 1000.0),
            choice(true, 1000.0),
            choice(false, 500.0),
        ];
        let result = score_drill(DrillType::CausalClassification, &DrillLog::Choice(trials));
        assert_eq!(result.score, 74);
        assert_eq!(result.correct, 3);
        assert_eq!(result.total, 4);
        assert_eq!(result.avg_reaction_time_ms, Some(1000.0));
    }

    #[test]
    fn symbol_match_uses_faster_paced_bonus() {
        // Perfect at 500ms avg: 85 + max(0, 20 - 500/100) = 85 + 15 = 100
        let trials = vec![choice(true, 500.0), choice(true, 500.0)];
        let result = score_drill(DrillType::SymbolMatch, &DrillLog::Choice(trials));
        assert_eq!(result.score, 100);
    }

    #[test]
    fn slow_responses_lose_the_speed_bonus() {
        // Perfect but 4000ms avg: bonus decays to 0, score is pure accuracy.
        let trials = vec![choice(true, 4000.0)];
        let result = score_drill(DrillType::CausalClassification, &DrillLog::Choice(trials));
        assert_eq!(result.score, 85);
    }

    #[test]
    fn timeouts_count_as_attempted_misses() {
        let with_timeout = vec![choice(true, 800.0), timeout()];
        let without = vec![choice(true, 800.0)];
        let a = score_drill(DrillType::CausalClassification, &DrillLog::Choice(with_timeout));
        let b = score_drill(DrillType::CausalClassification, &DrillLog::Choice(without));
        assert_eq!(a.total, 2);
        assert!(a.score < b.score, "timeout must dilute accuracy");
        // The timed-out trial must not pollute the reaction-time average.
        assert_eq!(a.avg_reaction_time_ms, Some(800.0));
    }

    #[test]
    fn incorrect_responses_do_not_pollute_reaction_time() {
        let trials = vec![choice(true, 600.0), choice(false, 9000.0)];
        let result = score_drill(DrillType::SymbolMatch, &DrillLog::Choice(trials));
        assert_eq!(result.avg_reaction_time_ms, Some(600.0));
    }

    #[test]
    fn empty_choice_log_scores_zero_without_panicking() {
        let result = score_drill(DrillType::CausalClassification, &DrillLog::Choice(vec![]));
        assert_eq!(result.score, 0);
        assert_eq!(result.total, 0);
        assert!(result.avg_reaction_time_ms.is_none());
    }

    #[test]
    fn vigilance_penalizes_false_alarms() {
        let hit = |rt| VigilanceTrial {
            is_target: true,
            responded: true,
            reaction_time_ms: rt,
        };
        let false_alarm = VigilanceTrial {
            is_target: false,
            responded: true,
            reaction_time_ms: 300.0,
        };

        let clean = vec![hit(1000.0), hit(1000.0)];
        let noisy = vec![hit(1000.0), hit(1000.0), false_alarm.clone(), false_alarm];
        let a = score_drill(DrillType::SustainedAttention, &DrillLog::Vigilance(clean));
        let b = score_drill(DrillType::SustainedAttention, &DrillLog::Vigilance(noisy));
        assert!(b.score < a.score);
        // 2 false alarms out of 4 responses: ratio 0.5 -> 10-point penalty.
        assert_eq!(a.score - b.score, 10);
    }

    #[test]
    fn vigilance_miss_hits_accuracy_denominator() {
        let trials = vec![
            VigilanceTrial { is_target: true, responded: true, reaction_time_ms: 1000.0 },
            VigilanceTrial { is_target: true, responded: false, reaction_time_ms: 0.0 },
        ];
        let result = score_drill(DrillType::SustainedAttention, &DrillLog::Vigilance(trials));
        // accuracy 0.5 * 60 + bonus max(0, 15 - 1000/200) = 30 + 10
        assert_eq!(result.score, 40);
        assert_eq!(result.correct, 1);
        assert_eq!(result.total, 2);
    }

    #[test]
    fn structured_judgment_keeps_partial_credit_floor() {
        let both_wrong = score_drill(
            DrillType::ConceptProjection,
            &DrillLog::Judgment(JudgmentLog {
                structure_matches: false,
                projection_correct: false,
            }),
        );
        assert_eq!(both_wrong.score, 35); // 20 + 15, never zeroed
        assert_eq!(both_wrong.correct, 0);

        let both_right = score_drill(
            DrillType::ConceptProjection,
            &DrillLog::Judgment(JudgmentLog {
                structure_matches: true,
                projection_correct: true,
            }),
        );
        assert_eq!(both_right.score, 100);
        assert_eq!(both_right.correct, 2);
    }

    #[test]
    fn binary_is_exactly_zero_or_hundred() {
        let right = score_drill(DrillType::BestExplanation, &DrillLog::Binary { correct: true });
        let wrong = score_drill(DrillType::BestExplanation, &DrillLog::Binary { correct: false });
        assert_eq!((right.score, right.correct), (100, 1));
        assert_eq!((wrong.score, wrong.correct), (0, 0));
    }

    #[test]
    fn causal_graph_weights_components_60_40() {
        let log = CausalGraphLog {
            classifications: vec![choice(true, 1200.0), choice(true, 1200.0)],
            correct_detections: 1,
            expected_detections: 2,
            false_positives: 0,
        };
        // 0.6*100 + 0.4*50 = 80
        let result = score_drill(DrillType::CausalGraph, &DrillLog::CausalGraph(log));
        assert_eq!(result.score, 80);
    }

    #[test]
    fn causal_graph_false_positive_penalty_floors_at_zero() {
        let log = CausalGraphLog {
            classifications: vec![choice(true, 1200.0)],
            correct_detections: 0,
            expected_detections: 1,
            false_positives: 7,
        };
        // Detection component would be -70; floors at 0 before weighting.
        let result = score_drill(DrillType::CausalGraph, &DrillLog::CausalGraph(log));
        assert_eq!(result.score, 60);
    }

    #[test]
    fn causal_graph_zero_denominators_are_safe() {
        let log = CausalGraphLog {
            classifications: vec![],
            correct_detections: 0,
            expected_detections: 0,
            false_positives: 0,
        };
        let result = score_drill(DrillType::CausalGraph, &DrillLog::CausalGraph(log));
        assert_eq!(result.score, 0);
    }

    #[test]
    fn reflection_is_length_gated() {
        let empty = score_drill(
            DrillType::Reflection,
            &DrillLog::Reflection { response: "   ".into() },
        );
        assert_eq!(empty.score, 0);

        let short = score_drill(
            DrillType::Reflection,
            &DrillLog::Reflection { response: "a few words".into() },
        );
        assert_eq!(short.score, 60);

        let long = score_drill(
            DrillType::Reflection,
            &DrillLog::Reflection {
                response: "a".repeat(REFLECTION_FULL_LEN),
            },
        );
        assert_eq!(long.score, 100);
        assert_eq!(long.metadata["responseLength"], REFLECTION_FULL_LEN);
    }

    #[test]
    fn mismatched_log_degrades_to_empty() {
        let result = score_drill(DrillType::BestExplanation, &DrillLog::Choice(vec![]));
        assert_eq!(result.score, 0);
        assert_eq!(result.total, 0);
    }

    #[test]
    fn scores_stay_in_bounds_for_extreme_logs() {
        // Instant perfect answers on the fast-paced variant would overflow
        // 100 without the clamp: 85 + 20 = 105.
        let trials = vec![choice(true, 0.0), choice(true, 0.0)];
        let result = score_drill(DrillType::SymbolMatch, &DrillLog::Choice(trials));
        assert_eq!(result.score, 100);
    }
}
