//! # mindgym-algo - cognitive training core
//!
//! Pure Rust implementation of the session scoring and exercise-selection
//! subsystem behind the training app:
//!
//! - **Weighted Exercise Selector** - roulette-wheel sampling without
//!   replacement over the exercise catalog, with a balanced fast/slow variant
//! - **Drill Scoring** - one calibrated scorer per drill archetype, turning
//!   raw trial logs into 0-100 performance numbers
//! - **Session Aggregation** - per-session average score and earned-points
//!   deltas for each affected metric
//! - **Metrics Accumulator** - dampened incremental updates to the user's
//!   rolling cognitive metrics plus derived performance/readiness composites
//! - **Assessment** - the fixed onboarding battery and cognitive-age estimate
//!
//! All core computation is synchronous and side-effect free: selection and
//! scoring take explicit inputs (including a seedable random source) and
//! return plain values. Persistence is a port (`persistence::MetricsStore`)
//! the enclosing application implements; the accumulator's `apply` is
//! idempotent so the surrounding read-modify-write cycle is safe to retry.
//!
//! ## Module structure
//!
//! - [`types`] - shared enums, records, and constants
//! - [`catalog`] - tolerant decoding of raw catalog rows
//! - [`selector`] - weighted sampling
//! - [`scoring`] - drill archetype scorers and calibration table
//! - [`session`] - session aggregation
//! - [`metrics`] - rolling metrics accumulator and composites
//! - [`assessment`] - onboarding battery and cognitive age
//! - [`engine`] - session facade wiring the above together
//! - [`persistence`] - boundary row shapes and the store port
//!
//! ## Usage example
//!
//! ```rust
//! use mindgym_algo::{Area, SelectionRequest, SessionEngine, UserMetricsState};
//!
//! let mut engine = SessionEngine::with_seed(42);
//! let catalog = vec![]; // supplied by the catalog collaborator
//! let request = SelectionRequest {
//!     min_count: 3,
//!     max_count: 5,
//!     mode: None,
//!     balanced: true,
//! };
//! let plan = engine.plan_session(&catalog, Area::Focus, &request);
//! let (summary, next_state) =
//!     engine.complete_session(&plan, &[], &UserMetricsState::default());
//! assert_eq!(next_state.total_sessions, 1);
//! assert_eq!(summary.average_score, 0);
//! ```

pub mod assessment;
pub mod catalog;
pub mod engine;
pub mod metrics;
pub mod persistence;
pub mod scoring;
pub mod selector;
pub mod session;
pub mod types;

pub use types::*;

pub use assessment::{cognitive_age, estimate, AssessmentBattery, BATTERY_ORDER};
pub use catalog::{decode_catalog, decode_record, RawExerciseRow};
pub use engine::SessionEngine;
pub use metrics::{apply, classify_readiness, CompositeWeights};
pub use persistence::{record_session, MetricsStore, SessionRecord, StoreError};
pub use scoring::{score_drill, DrillLog};
pub use selector::WeightedSelector;
pub use session::aggregate;
