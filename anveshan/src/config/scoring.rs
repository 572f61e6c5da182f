//! Candidate scoring configuration section.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Scoring settings section
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoringSection {
    /// Candidates enumerated per scoring pass
    #[serde(default = "defaults::max_candidates")]
    pub max_candidates: usize,

    /// Wall-clock budget of one scoring pass (milliseconds)
    #[serde(default = "defaults::scoring_budget_ms")]
    pub budget_ms: f32,

    /// Reward for distance beyond the minimum hop
    #[serde(default = "defaults::hop_weight")]
    pub hop_weight: f32,

    /// Penalty for distance beyond the effective radius
    #[serde(default = "defaults::overshoot_weight")]
    pub overshoot_weight: f32,

    /// Reward for keeping the current travel direction
    #[serde(default = "defaults::direction_weight")]
    pub direction_weight: f32,

    /// Penalty for landing near a recent target
    #[serde(default = "defaults::recency_weight")]
    pub recency_weight: f32,
}

impl Default for ScoringSection {
    fn default() -> Self {
        Self {
            max_candidates: defaults::max_candidates(),
            budget_ms: defaults::scoring_budget_ms(),
            hop_weight: defaults::hop_weight(),
            overshoot_weight: defaults::overshoot_weight(),
            direction_weight: defaults::direction_weight(),
            recency_weight: defaults::recency_weight(),
        }
    }
}
