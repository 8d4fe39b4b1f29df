//! Session engine facade.
//!
//! Wires the subsystems together for one training session: plan (area filter +
//! weighted selection), score each finished drill, then aggregate and fold the
//! result into the user's rolling metrics. Owns no I/O; the caller fetches and
//! persists state around `complete_session`.

use crate::metrics::{self, CompositeWeights};
use crate::scoring::{score_drill, DrillLog};
use crate::selector::WeightedSelector;
use crate::session;
use crate::types::{
    Area, DrillResult, ExerciseRecord, SelectionRequest, SessionResult, UserMetricsState,
};

pub struct SessionEngine {
    selector: WeightedSelector,
    weights: CompositeWeights,
}

impl SessionEngine {
    pub fn new() -> Self {
        Self {
            selector: WeightedSelector::new(),
            weights: CompositeWeights::default(),
        }
    }

    /// Deterministic engine for tests and replay.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            selector: WeightedSelector::with_seed(seed),
            weights: CompositeWeights::default(),
        }
    }

    pub fn with_composite_weights(mut self, weights: CompositeWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Populate a session for one training area. An empty catalog yields an
    /// empty plan, never an error.
    pub fn plan_session(
        &mut self,
        catalog: &[ExerciseRecord],
        area: Area,
        request: &SelectionRequest,
    ) -> Vec<ExerciseRecord> {
        let pool: Vec<ExerciseRecord> = catalog
            .iter()
            .filter(|e| e.area == area)
            .cloned()
            .collect();

        let plan = self.selector.select_for_request(&pool, request);
        tracing::debug!(
            area = area.as_str(),
            pool = pool.len(),
            selected = plan.len(),
            balanced = request.balanced,
            "planned training session"
        );
        plan
    }

    /// Score one finished drill against its exercise's archetype.
    pub fn score(&self, exercise: &ExerciseRecord, log: &DrillLog) -> DrillResult {
        score_drill(exercise.drill_type, log)
    }

    /// Close out a session: aggregate the drill results and apply the earned
    /// deltas to the freshest fetched state. Returns both the session summary
    /// (for the caller to persist) and the next metrics state.
    pub fn complete_session(
        &self,
        exercises: &[ExerciseRecord],
        results: &[DrillResult],
        current: &UserMetricsState,
    ) -> (SessionResult, UserMetricsState) {
        let summary = session::aggregate(results, exercises);
        let next = metrics::apply(current, &summary.metric_deltas, &self.weights);
        tracing::debug!(
            drills = results.len(),
            average_score = summary.average_score,
            total_sessions = next.total_sessions,
            readiness = next.readiness_classification.as_str(),
            "session completed"
        );
        (summary, next)
    }
}

impl Default for SessionEngine {
    fn default() -> Self {
        Self::new()
    }
}
