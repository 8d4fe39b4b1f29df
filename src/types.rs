//! Shared types and constants for the training core.

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ==================== Constants ====================

/// Baseline value every named metric starts from.
pub const METRIC_BASELINE: f64 = 50.0;

/// Upper bound for every named metric and drill score.
pub const METRIC_MAX: f64 = 100.0;

/// Dampening factor applied to earned points before they move a metric.
/// A single strong session cannot saturate a metric; meaningful movement
/// requires multi-session consistency.
pub const DAMPENING: f64 = 0.5;

/// Minimum reflection response length (chars) for full earned-points credit.
pub const REFLECTION_FULL_LEN: usize = 40;

/// Cognitive age never drops below this regardless of performance.
pub const MIN_COGNITIVE_AGE: u32 = 18;

// ==================== Closed-set enums ====================

/// Training domain an exercise belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Area {
    Focus,
    Reasoning,
    Creativity,
}

impl Area {
    pub fn all() -> &'static [Area] {
        &[Area::Focus, Area::Reasoning, Area::Creativity]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Focus => "focus",
            Self::Reasoning => "reasoning",
            Self::Creativity => "creativity",
        }
    }
}

impl FromStr for Area {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "focus" => Ok(Self::Focus),
            "reasoning" => Ok(Self::Reasoning),
            "creativity" => Ok(Self::Creativity),
            _ => Err(()),
        }
    }
}

/// System-1 / System-2 framing applied to exercise categorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThinkingMode {
    Fast,
    Slow,
}

impl ThinkingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Slow => "slow",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fast" => Some(Self::Fast),
            "slow" => Some(Self::Slow),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "easy" => Self::Easy,
            "hard" => Self::Hard,
            _ => Self::Medium,
        }
    }
}

/// Named rolling metric tracked per user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricId {
    ReasoningAccuracy,
    FastThinking,
    SlowThinking,
    FocusStability,
    WorkingMemory,
    ProcessingSpeed,
    Creativity,
}

impl MetricId {
    pub fn all() -> &'static [MetricId] {
        &[
            MetricId::ReasoningAccuracy,
            MetricId::FastThinking,
            MetricId::SlowThinking,
            MetricId::FocusStability,
            MetricId::WorkingMemory,
            MetricId::ProcessingSpeed,
            MetricId::Creativity,
        ]
    }

    pub fn id(&self) -> &'static str {
        match self {
            MetricId::ReasoningAccuracy => "reasoning_accuracy",
            MetricId::FastThinking => "fast_thinking",
            MetricId::SlowThinking => "slow_thinking",
            MetricId::FocusStability => "focus_stability",
            MetricId::WorkingMemory => "working_memory",
            MetricId::ProcessingSpeed => "processing_speed",
            MetricId::Creativity => "creativity",
        }
    }
}

impl FromStr for MetricId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reasoning_accuracy" => Ok(MetricId::ReasoningAccuracy),
            "fast_thinking" => Ok(MetricId::FastThinking),
            "slow_thinking" => Ok(MetricId::SlowThinking),
            "focus_stability" => Ok(MetricId::FocusStability),
            "working_memory" => Ok(MetricId::WorkingMemory),
            "processing_speed" => Ok(MetricId::ProcessingSpeed),
            "creativity" => Ok(MetricId::Creativity),
            _ => Err(()),
        }
    }
}

/// Drill archetype tag. Each variant fixes its own calibration constants
/// in `scoring::calibration`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrillType {
    CausalClassification,
    SymbolMatch,
    SustainedAttention,
    GoNoGo,
    ConceptProjection,
    BestExplanation,
    CausalGraph,
    Reflection,
}

impl DrillType {
    pub fn id(&self) -> &'static str {
        match self {
            DrillType::CausalClassification => "causal_classification",
            DrillType::SymbolMatch => "symbol_match",
            DrillType::SustainedAttention => "sustained_attention",
            DrillType::GoNoGo => "go_no_go",
            DrillType::ConceptProjection => "concept_projection",
            DrillType::BestExplanation => "best_explanation",
            DrillType::CausalGraph => "causal_graph",
            DrillType::Reflection => "reflection",
        }
    }

    /// Reflection drills are scored by response length, not correctness.
    pub fn is_reflection(&self) -> bool {
        matches!(self, DrillType::Reflection)
    }
}

/// Categorical bucketing of the readiness score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReadinessLevel {
    Low,
    #[default]
    Moderate,
    High,
}

impl ReadinessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Moderate => "moderate",
            Self::High => "high",
        }
    }
}

// ==================== Catalog records ====================

/// Immutable catalog entry for a single exercise.
///
/// Constructed through `catalog::decode_record`, which enforces the
/// weight default so scoring code never null-coalesces at use sites.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRecord {
    pub id: String,
    pub area: Area,
    pub thinking_mode: ThinkingMode,
    pub difficulty: Difficulty,
    pub weight: f64,
    pub drill_type: DrillType,
    pub metrics_affected: Vec<MetricId>,
}

/// Ephemeral input to the selector for one session plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionRequest {
    pub min_count: usize,
    pub max_count: usize,
    /// Restrict to one thinking mode. Falls back to the full pool when
    /// the filter leaves nothing.
    pub mode: Option<ThinkingMode>,
    /// Split the target count across fast and slow exercises.
    pub balanced: bool,
}

// ==================== Results ====================

/// Output of a single completed drill.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrillResult {
    /// Always clamped into [0, 100].
    pub score: i32,
    /// Correct responses within the drill.
    pub correct: u32,
    /// Attempts, timeouts included.
    pub total: u32,
    /// Mean reaction time over correct, in-window responses only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_reaction_time_ms: Option<f64>,
    /// Free-form per-drill diagnostics.
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl DrillResult {
    /// Zero-attempt result used when a trial log is malformed or empty.
    pub fn empty() -> Self {
        Self {
            score: 0,
            correct: 0,
            total: 0,
            avg_reaction_time_ms: None,
            metadata: serde_json::Map::new(),
        }
    }
}

/// Mapping metric-name -> earned points accumulated across a session.
pub type MetricDeltas = HashMap<MetricId, f64>;

/// Aggregate over an ordered sequence of drill results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResult {
    pub average_score: i32,
    pub total_correct: u32,
    pub total_questions: u32,
    pub exercises_used: Vec<String>,
    pub metric_deltas: MetricDeltas,
}

// ==================== Persisted user state ====================

/// Persisted, caller-owned rolling metrics. One record per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMetricsState {
    pub reasoning_accuracy: f64,
    pub fast_thinking: f64,
    pub slow_thinking: f64,
    pub focus_stability: f64,
    pub working_memory: f64,
    pub processing_speed: f64,
    pub creativity: f64,
    pub total_sessions: u32,
    pub cognitive_performance_score: f64,
    pub cognitive_readiness_score: f64,
    pub readiness_classification: ReadinessLevel,
}

impl Default for UserMetricsState {
    fn default() -> Self {
        Self {
            reasoning_accuracy: METRIC_BASELINE,
            fast_thinking: METRIC_BASELINE,
            slow_thinking: METRIC_BASELINE,
            focus_stability: METRIC_BASELINE,
            working_memory: METRIC_BASELINE,
            processing_speed: METRIC_BASELINE,
            creativity: METRIC_BASELINE,
            total_sessions: 0,
            cognitive_performance_score: METRIC_BASELINE,
            cognitive_readiness_score: METRIC_BASELINE,
            readiness_classification: ReadinessLevel::Moderate,
        }
    }
}

impl UserMetricsState {
    pub fn metric(&self, id: MetricId) -> f64 {
        match id {
            MetricId::ReasoningAccuracy => self.reasoning_accuracy,
            MetricId::FastThinking => self.fast_thinking,
            MetricId::SlowThinking => self.slow_thinking,
            MetricId::FocusStability => self.focus_stability,
            MetricId::WorkingMemory => self.working_memory,
            MetricId::ProcessingSpeed => self.processing_speed,
            MetricId::Creativity => self.creativity,
        }
    }

    pub fn set_metric(&mut self, id: MetricId, value: f64) {
        let slot = match id {
            MetricId::ReasoningAccuracy => &mut self.reasoning_accuracy,
            MetricId::FastThinking => &mut self.fast_thinking,
            MetricId::SlowThinking => &mut self.slow_thinking,
            MetricId::FocusStability => &mut self.focus_stability,
            MetricId::WorkingMemory => &mut self.working_memory,
            MetricId::ProcessingSpeed => &mut self.processing_speed,
            MetricId::Creativity => &mut self.creativity,
        };
        *slot = value;
    }
}

// ==================== Assessment ====================

/// One-shot onboarding report. Not part of `UserMetricsState`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    pub fast_score: i32,
    pub slow_score: i32,
    pub focus_score: i32,
    pub reasoning_score: i32,
    pub creativity_score: i32,
    pub overall_score: i32,
    pub cognitive_age: u32,
}
