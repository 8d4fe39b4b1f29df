//! Persistence boundary.
//!
//! The core owns no storage; this module defines the row shapes the external
//! store exchanges, the `MetricsStore` port the enclosing app implements, and
//! a `record_session` helper for the fetch -> apply -> save cycle. The pure
//! `metrics::apply` core is idempotent for a fixed `(current, deltas)` pair,
//! so a failed or raced save can simply be retried with the freshest fetched
//! state; any transactional guarantee (conditional update) belongs to the
//! store implementation.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::metrics::{self, CompositeWeights};
use crate::types::{SessionResult, UserMetricsState};

/// Session row handed to the store after a completed session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub user_id: String,
    pub exercises_used: Vec<String>,
    pub score: i32,
    pub correct_answers: u32,
    pub total_questions: u32,
    /// RFC 3339 timestamp.
    pub completed_at: String,
}

impl SessionRecord {
    pub fn from_session(user_id: &str, session: &SessionResult) -> Self {
        Self {
            user_id: user_id.to_string(),
            exercises_used: session.exercises_used.clone(),
            score: session.average_score,
            correct_answers: session.total_correct,
            total_questions: session.total_questions,
            completed_at: Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("conflicting concurrent update for user {0}")]
    Conflict(String),
}

/// Port implemented by the enclosing app's storage adapter. Upsert semantics
/// are unique-per-user for the metrics row.
pub trait MetricsStore {
    fn load_metrics(&self, user_id: &str) -> Result<Option<UserMetricsState>, StoreError>;
    fn save_metrics(&self, user_id: &str, state: &UserMetricsState) -> Result<(), StoreError>;
    fn insert_session(&self, record: &SessionRecord) -> Result<(), StoreError>;
}

/// Fetch the freshest state, apply the session's deltas, and persist both the
/// next metrics state and the session row. The metrics upsert happens first:
/// a failed save surfaces before anything is written, so the store never
/// holds a session row without its matching state and a retry cannot
/// double-insert. A missing row means a first session: deltas apply against
/// the all-50 baseline and `total_sessions` lands at 1.
pub fn record_session<S: MetricsStore>(
    store: &S,
    user_id: &str,
    session: &SessionResult,
    weights: &CompositeWeights,
) -> Result<UserMetricsState, StoreError> {
    let current = store.load_metrics(user_id)?.unwrap_or_default();
    let next = metrics::apply(&current, &session.metric_deltas, weights);

    if let Err(err) = store.save_metrics(user_id, &next) {
        tracing::warn!(error = %err, user_id = %user_id, "failed to save user metrics");
        return Err(err);
    }
    store.insert_session(&SessionRecord::from_session(user_id, session))?;

    tracing::debug!(
        user_id = %user_id,
        total_sessions = next.total_sessions,
        performance = next.cognitive_performance_score,
        "recorded training session"
    );
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MetricDeltas, MetricId};
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MemoryStore {
        metrics: RefCell<HashMap<String, UserMetricsState>>,
        sessions: RefCell<Vec<SessionRecord>>,
        fail_save: bool,
    }

    impl MetricsStore for MemoryStore {
        fn load_metrics(&self, user_id: &str) -> Result<Option<UserMetricsState>, StoreError> {
            Ok(self.metrics.borrow().get(user_id).cloned())
        }

        fn save_metrics(&self, user_id: &str, state: &UserMetricsState) -> Result<(), StoreError> {
            if self.fail_save {
                return Err(StoreError::Backend("connection reset".into()));
            }
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

    fn session_with_delta(points: f64) -> SessionResult {
        let mut deltas = MetricDeltas::new();
        deltas.insert(MetricId::FocusStability, points);
        SessionResult {
            average_score: 72,
            total_correct: 5,
            total_questions: 6,
            exercises_used: vec!["a".into(), "b".into()],
            metric_deltas: deltas,
        }
    }

    #[test]
    fn first_session_initializes_from_baseline() {
        let store = MemoryStore::default();
        let weights = CompositeWeights::default();
        let next = record_session(&store, "u1", &session_with_delta(2.0), &weights).unwrap();
        assert_eq!(next.total_sessions, 1);
        assert_eq!(next.metric(MetricId::FocusStability), 51.0);
        assert_eq!(store.sessions.borrow().len(), 1);
        assert_eq!(store.sessions.borrow()[0].score, 72);
    }

    #[test]
    fn subsequent_sessions_build_on_persisted_state() {
        let store = MemoryStore::default();
        let weights = CompositeWeights::default();
        record_session(&store, "u1", &session_with_delta(2.0), &weights).unwrap();
        let next = record_session(&store, "u1", &session_with_delta(2.0), &weights).unwrap();
        assert_eq!(next.total_sessions, 2);
        assert_eq!(next.metric(MetricId::FocusStability), 52.0);
    }

    #[test]
    fn save_failure_surfaces_and_leaves_metrics_untouched() {
        let store = MemoryStore {
            fail_save: true,
            ..Default::default()
        };
        let weights = CompositeWeights::default();
        let err = record_session(&store, "u1", &session_with_delta(2.0), &weights);
        assert!(matches!(err, Err(StoreError::Backend(_))));
        assert!(store.metrics.borrow().is_empty());
        // No half-written session: the row is only inserted once the
        // metrics upsert succeeded.
        assert!(store.sessions.borrow().is_empty());
    }

    #[test]
    fn session_record_maps_session_fields() {
        let record = SessionRecord::from_session("u9", &session_with_delta(1.0));
        assert_eq!(record.user_id, "u9");
        assert_eq!(record.exercises_used, vec!["a", "b"]);
        assert_eq!(record.correct_answers, 5);
        assert_eq!(record.total_questions, 6);
        assert!(!record.completed_at.is_empty());
    }

    #[test]
    fn session_record_json_roundtrip() {
        let record = SessionRecord::from_session("u9", &session_with_delta(1.0));
        let json = serde_json::to_value(&record).unwrap();
        let restored: SessionRecord = serde_json::from_value(json).unwrap();
        assert_eq!(restored.exercises_used, record.exercises_used);
        assert_eq!(restored.score, record.score);
    }
}
