//! End-to-end session flow: decode a raw catalog, plan a balanced session,
//! score the drills, and fold the results into persisted user metrics.

use std::cell::RefCell;
use std::collections::HashMap;

use mindgym_algo::metrics::CompositeWeights;
use mindgym_algo::persistence::{record_session, MetricsStore, SessionRecord, StoreError};
use mindgym_algo::scoring::{ChoiceTrial, DrillLog};
use mindgym_algo::types::{
    Area, MetricId, SelectionRequest, ThinkingMode, UserMetricsState,
};
use mindgym_algo::{decode_catalog, RawExerciseRow, SessionEngine};

#[derive(Default)]
struct MemoryStore {
    metrics: RefCell<HashMap<String, UserMetricsState>>,
    sessions: RefCell<Vec<SessionRecord>>,
}

impl MetricsStore for MemoryStore {
    fn load_metrics(&self, user_id: &str) -> Result<Option<UserMetricsState>, StoreError> {
        Ok(self.metrics.borrow().get(user_id).cloned())
    }

    fn save_metrics(&self, user_id: &str, state: &UserMetricsState) -> Result<(), StoreError> {
        self.metrics
            .borrow_mut()
            .insert(user_id.to_string(), state.clone());
        Ok(())
    }

    fn insert_session(&self, record: &SessionRecord) -> Result<(), StoreError> {
        self.sessions.borrow_mut().push(record.clone());
        Ok(())
    }
}

fn raw_row(id: &str, mode: &str) -> RawExerciseRow {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "gym_area": "focus",
        "thinking_mode": mode,
        "difficulty": "medium",
        "drill_type": "symbol_match",
        "metrics_affected": ["focus_stability", "processing_speed"],
    }))
    .unwrap()
}

#[test]
fn balanced_session_from_raw_catalog_updates_metrics() {
    let rows = vec![
        raw_row("a", "fast"),
        raw_row("b", "fast"),
        raw_row("c", "slow"),
        raw_row("d", "slow"),
    ];
    let catalog = decode_catalog(&rows);
    assert_eq!(catalog.len(), 4);

    let mut engine = SessionEngine::with_seed(17);
    let request = SelectionRequest {
        min_count: 2,
        max_count: 2,
        mode: None,
        balanced: true,
    };
    let plan = engine.plan_session(&catalog, Area::Focus, &request);
    assert_eq!(plan.len(), 2);
    assert_eq!(plan[0].thinking_mode, ThinkingMode::Fast);
    assert_eq!(plan[1].thinking_mode, ThinkingMode::Slow);

    let results: Vec<_> = plan
        .iter()
        .map(|e| {
            engine.score(
                e,
                &DrillLog::Choice(vec![
                    ChoiceTrial { correct: true, reaction_time_ms: 800.0, timed_out: false },
                    ChoiceTrial { correct: true, reaction_time_ms: 900.0, timed_out: false },
                ]),
            )
        })
        .collect();

    let (summary, _) = engine.complete_session(&plan, &results, &UserMetricsState::default());
    assert_eq!(summary.exercises_used.len(), 2);
    assert!(summary.average_score > 80);
    assert!(summary.metric_deltas.contains_key(&MetricId::FocusStability));

    let store = MemoryStore::default();
    let weights = CompositeWeights::default();
    let next = record_session(&store, "user-1", &summary, &weights).unwrap();
    assert_eq!(next.total_sessions, 1);
    assert!(next.metric(MetricId::FocusStability) > 50.0);
    assert_eq!(store.sessions.borrow().len(), 1);

    // A second identical session keeps building on persisted state.
    let again = record_session(&store, "user-1", &summary, &weights).unwrap();
    assert_eq!(again.total_sessions, 2);
    assert!(again.metric(MetricId::FocusStability) > next.metric(MetricId::FocusStability));
}

#[test]
fn empty_catalog_degrades_to_empty_session() {
    let mut engine = SessionEngine::with_seed(17);
    let request = SelectionRequest {
        min_count: 3,
        max_count: 5,
        mode: Some(ThinkingMode::Fast),
        balanced: true,
    };
    let plan = engine.plan_session(&[], Area::Reasoning, &request);
    assert!(plan.is_empty());

    let (summary, next) = engine.complete_session(&plan, &[], &UserMetricsState::default());
    assert_eq!(summary.average_score, 0);
    assert_eq!(next.total_sessions, 1);
}
