//! Rolling metrics accumulation.
//!
//! `apply` is the pure read-modify-write core: given the freshest persisted
//! `UserMetricsState` and a session's earned-points deltas, it produces the
//! next state. It owns no I/O and is idempotent for a fixed `(current,
//! deltas)` pair, so the surrounding persistence call can be retried safely.
//!
//! Update rule per named metric: `min(100, current + delta * 0.5)`, rounded
//! to one decimal place. The 0.5 dampening prevents a single strong session
//! from saturating a metric; meaningful movement requires consistency across
//! sessions. Derived composites are recomputed on every update from the
//! just-updated metrics, never from stale values.

use serde::{Deserialize, Serialize};

use crate::types::{MetricDeltas, MetricId, ReadinessLevel, UserMetricsState, DAMPENING, METRIC_MAX};

// ==================== Composite configuration ====================

/// Weights for the cognitive-performance composite. Injected so the enclosing
/// app can retune without touching the update arithmetic; defaults sum to 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeWeights {
    pub reasoning_accuracy: f64,
    pub focus_stability: f64,
    pub working_memory: f64,
    pub fast_thinking: f64,
    pub slow_thinking: f64,
    pub creativity: f64,
    /// Share of the readiness score taken from an external physiological
    /// input when one is supplied.
    pub physio_weight: f64,
}

impl Default for CompositeWeights {
    fn default() -> Self {
        Self {
            reasoning_accuracy: 0.25,
            focus_stability: 0.20,
            working_memory: 0.15,
            fast_thinking: 0.15,
            slow_thinking: 0.15,
            creativity: 0.10,
            physio_weight: 0.3,
        }
    }
}

impl CompositeWeights {
    /// Weighted cognitive-performance composite over the named metrics.
    pub fn performance(&self, state: &UserMetricsState) -> f64 {
        let raw = state.reasoning_accuracy * self.reasoning_accuracy
            + state.focus_stability * self.focus_stability
            + state.working_memory * self.working_memory
            + state.fast_thinking * self.fast_thinking
            + state.slow_thinking * self.slow_thinking
            + state.creativity * self.creativity;
        round1(raw.clamp(0.0, METRIC_MAX))
    }

    /// Readiness: the performance score, optionally blended with an external
    /// physiological input (0-100) when the caller has one.
    pub fn readiness(&self, performance: f64, physio: Option<f64>) -> f64 {
        let value = match physio {
            Some(p) if p.is_finite() => {
                let p = p.clamp(0.0, METRIC_MAX);
                performance * (1.0 - self.physio_weight) + p * self.physio_weight
            }
            _ => performance,
        };
        round1(value.clamp(0.0, METRIC_MAX))
    }
}

/// Ordered bucketing of the readiness score.
pub fn classify_readiness(readiness: f64) -> ReadinessLevel {
    if readiness < 40.0 {
        ReadinessLevel::Low
    } else if readiness <= 70.0 {
        ReadinessLevel::Moderate
    } else {
        ReadinessLevel::High
    }
}

// ==================== Accumulator ====================

/// Apply one session's deltas to the freshest fetched state, producing the
/// next state for the caller to persist. `total_sessions` advances by exactly
/// one per call regardless of how many drills the session held.
pub fn apply(current: &UserMetricsState, deltas: &MetricDeltas, weights: &CompositeWeights) -> UserMetricsState {
    apply_with_physio(current, deltas, weights, None)
}

/// Variant taking an external physiological input for the readiness blend.
pub fn apply_with_physio(
    current: &UserMetricsState,
    deltas: &MetricDeltas,
    weights: &CompositeWeights,
    physio: Option<f64>,
) -> UserMetricsState {
    let mut next = current.clone();

    for id in MetricId::all() {
        let Some(delta) = deltas.get(id) else { continue };
        if !delta.is_finite() {
            continue;
        }
        let updated = (current.metric(*id) + delta * DAMPENING).min(METRIC_MAX);
        next.set_metric(*id, round1(updated.max(0.0)));
    }

    next.total_sessions = current.total_sessions.saturating_add(1);

    // Composites always read the just-updated metrics.
    next.cognitive_performance_score = weights.performance(&next);
    next.cognitive_readiness_score = weights.readiness(next.cognitive_performance_score, physio);
    next.readiness_classification = classify_readiness(next.cognitive_readiness_score);

    next
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
