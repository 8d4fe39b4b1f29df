//! Catalog decoding.
//!
//! The catalog collaborator supplies loosely-typed exercise rows (persistent
//! store schema: `id`, `area`/`gym_area`, `thinking_mode`, `difficulty`,
//! `weight`, `drill_type`, `metrics_affected[]`). This module turns them into
//! strongly-typed `ExerciseRecord`s once, at the boundary, so scoring code
//! never re-checks optional fields:
//!
//! - missing/zero/invalid `weight` defaults to 1
//! - `gym_area` is accepted as an alias for `area`
//! - rows with an unknown area, mode, or drill type are skipped, not errors
//! - unknown metric names inside `metrics_affected` are dropped per-entry

use serde::Deserialize;

use crate::types::{Area, Difficulty, DrillType, ExerciseRecord, MetricId, ThinkingMode};

/// Default selection weight when the store omits or corrupts the field.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Wire shape of a catalog row before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawExerciseRow {
    pub id: String,
    #[serde(alias = "gym_area")]
    pub area: String,
    pub thinking_mode: String,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub weight: Option<f64>,
    pub drill_type: String,
    #[serde(default)]
    pub metrics_affected: Vec<String>,
}

/// Clamp a stored weight into something the roulette wheel can use.
fn sanitize_weight(raw: Option<f64>) -> f64 {
    match raw {
        Some(w) if w.is_finite() && w > 0.0 => w,
        _ => DEFAULT_WEIGHT,
    }
}

/// Decode one row. Returns `None` when a required closed-set field does not
/// parse; the caller treats that as a skippable row.
pub fn decode_record(row: &RawExerciseRow) -> Option<ExerciseRecord> {
    if row.id.is_empty() {
        return None;
    }

    let area: Area = row.area.parse().ok()?;
    let thinking_mode = ThinkingMode::parse(&row.thinking_mode)?;
    let drill_type = parse_drill_type(&row.drill_type)?;

    let metrics_affected: Vec<MetricId> = row
        .metrics_affected
        .iter()
        .filter_map(|name| name.parse().ok())
        .collect();

    Some(ExerciseRecord {
        id: row.id.clone(),
        area,
        thinking_mode,
        difficulty: row
            .difficulty
            .as_deref()
            .map(Difficulty::parse)
            .unwrap_or_default(),
        weight: sanitize_weight(row.weight),
        drill_type,
        metrics_affected,
    })
}

/// Decode a whole catalog, silently dropping rows that do not parse.
/// An empty catalog decodes to an empty pool, never an error.
pub fn decode_catalog(rows: &[RawExerciseRow]) -> Vec<ExerciseRecord> {
    let decoded: Vec<ExerciseRecord> = rows.iter().filter_map(decode_record).collect();
    if decoded.len() < rows.len() {
        tracing::warn!(
            skipped = rows.len() - decoded.len(),
            total = rows.len(),
            "skipped undecodable catalog rows"
        );
    }
    decoded
}

fn parse_drill_type(s: &str) -> Option<DrillType> {
    match s {
        "causal_classification" => Some(DrillType::CausalClassification),
        "symbol_match" => Some(DrillType::SymbolMatch),
        "sustained_attention" => Some(DrillType::SustainedAttention),
        "go_no_go" => Some(DrillType::GoNoGo),
        "concept_projection" => Some(DrillType::ConceptProjection),
        "best_explanation" => Some(DrillType::BestExplanation),
        "causal_graph" => Some(DrillType::CausalGraph),
        "reflection" => Some(DrillType::Reflection),
        _ => None,
    }
}
