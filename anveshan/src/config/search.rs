//! Main SearchConfig: loading, validation and builder setters.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};

use super::coverage::CoverageSection;
use super::frontier::FrontierSection;
use super::planner::PlannerSection;
use super::scoring::ScoringSection;

/// Default config path, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "configs/search.toml";

/// Full search configuration loaded from TOML
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct SearchConfig {
    /// Coverage and cone marking
    #[serde(default)]
    pub coverage: CoverageSection,

    /// Frontier seeding
    #[serde(default)]
    pub frontier: FrontierSection,

    /// Decision timing, hop and radius adaptation
    #[serde(default)]
    pub planner: PlannerSection,

    /// Candidate scoring
    #[serde(default)]
    pub scoring: ScoringSection,
}

impl SearchConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Load from default config path (configs/search.toml)
    pub fn load_default() -> Result<Self> {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse from a TOML string and validate
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: SearchConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the planner cannot work with.
    pub fn validate(&self) -> Result<()> {
        if let Some((field, _)) = self.float_fields().into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(field, "must be finite"));
        }

        let c = &self.coverage;
        if !(c.target > 0.0 && c.target <= 1.0) {
            return Err(invalid("coverage.target", "must be in (0, 1]"));
        }
        if c.leave_hysteresis < 0.0 {
            return Err(invalid("coverage.leave_hysteresis", "must be >= 0"));
        }
        if c.cone_radius <= 0.0 {
            return Err(invalid("coverage.cone_radius", "must be positive"));
        }
        if c.cone_half_angle_deg <= 0.0 {
            return Err(invalid("coverage.cone_half_angle_deg", "must be positive"));
        }
        if c.marking_stride == 0 {
            return Err(invalid("coverage.marking_stride", "must be at least 1"));
        }

        if self.frontier.batch_size == 0 {
            return Err(invalid("frontier.batch_size", "must be at least 1"));
        }

        let p = &self.planner;
        if p.min_hop_distance <= 0.0 {
            return Err(invalid("planner.min_hop_distance", "must be positive"));
        }
        if p.hard_min_separation < 0.0 {
            return Err(invalid("planner.hard_min_separation", "must be >= 0"));
        }
        if p.base_search_radius <= 0.0 {
            return Err(invalid("planner.base_search_radius", "must be positive"));
        }
        if p.max_search_radius < p.base_search_radius {
            return Err(SearchError::InvalidConfig {
                field: "planner.max_search_radius",
                reason: format!(
                    "{} is below base_search_radius {}",
                    p.max_search_radius, p.base_search_radius
                ),
            });
        }
        if p.radius_boost_step < 0.0 || p.radius_boost_decay < 0.0 {
            return Err(invalid("planner.radius_boost_step", "boost steps must be >= 0"));
        }
        if p.pick_interval_secs <= 0.0 {
            return Err(invalid("planner.pick_interval_secs", "must be positive"));
        }
        if p.think_delay_secs < 0.0 {
            return Err(invalid("planner.think_delay_secs", "must be >= 0"));
        }
        if p.global_radius_scale < 1.0 {
            return Err(invalid("planner.global_radius_scale", "must be >= 1"));
        }

        let s = &self.scoring;
        if s.max_candidates == 0 {
            return Err(invalid("scoring.max_candidates", "must be at least 1"));
        }
        if s.budget_ms <= 0.0 {
            return Err(invalid("scoring.budget_ms", "must be positive"));
        }
        Ok(())
    }

    fn float_fields(&self) -> [(&'static str, f32); 25] {
        let (c, p, s) = (&self.coverage, &self.planner, &self.scoring);
        [
            ("coverage.target", c.target),
            ("coverage.leave_hysteresis", c.leave_hysteresis),
            ("coverage.cone_radius", c.cone_radius),
            ("coverage.cone_half_angle_deg", c.cone_half_angle_deg),
            ("planner.min_hop_distance", p.min_hop_distance),
            ("planner.hard_min_separation", p.hard_min_separation),
            ("planner.pick_interval_secs", p.pick_interval_secs),
            ("planner.think_delay_secs", p.think_delay_secs),
            ("planner.arrive_tolerance", p.arrive_tolerance),
            ("planner.min_dwell_secs", p.min_dwell_secs),
            ("planner.area_exit_cooldown_secs", p.area_exit_cooldown_secs),
            ("planner.plateau_window_secs", p.plateau_window_secs),
            ("planner.plateau_delta", p.plateau_delta),
            ("planner.plateau_reseed_cooldown_secs", p.plateau_reseed_cooldown_secs),
            ("planner.base_search_radius", p.base_search_radius),
            ("planner.max_search_radius", p.max_search_radius),
            ("planner.radius_boost_step", p.radius_boost_step),
            ("planner.radius_boost_decay", p.radius_boost_decay),
            ("planner.portal_nudge_distance", p.portal_nudge_distance),
            ("planner.global_radius_scale", p.global_radius_scale),
            ("scoring.budget_ms", s.budget_ms),
            ("scoring.hop_weight", s.hop_weight),
            ("scoring.overshoot_weight", s.overshoot_weight),
            ("scoring.direction_weight", s.direction_weight),
            ("scoring.recency_weight", s.recency_weight),
        ]
    }

    // ========================================================================
    // Builder setters
    // ========================================================================

    /// Builder-style setter for the coverage target
    pub fn with_coverage_target(mut self, target: f32) -> Self {
        self.coverage.target = target;
        self
    }

    /// Builder-style setter for the minimum hop distance
    pub fn with_min_hop(mut self, distance: f32) -> Self {
        self.planner.min_hop_distance = distance;
        self
    }

    /// Builder-style setter for the frontier batch size
    pub fn with_frontier_batch(mut self, count: usize) -> Self {
        self.frontier.batch_size = count;
        self
    }

    /// Builder-style setter for the pick interval
    pub fn with_pick_interval(mut self, secs: f32) -> Self {
        self.planner.pick_interval_secs = secs;
        self
    }

    /// Builder-style setter for the marking stride
    pub fn with_marking_stride(mut self, stride: u32) -> Self {
        self.coverage.marking_stride = stride;
        self
    }

    /// Builder-style setter for base and max search radius
    pub fn with_search_radius(mut self, base: f32, max: f32) -> Self {
        self.planner.base_search_radius = base;
        self.planner.max_search_radius = max;
        self
    }

    /// Builder-style setter for the visibility cone
    pub fn with_cone(mut self, radius: f32, half_angle_deg: f32) -> Self {
        self.coverage.cone_radius = radius;
        self.coverage.cone_half_angle_deg = half_angle_deg;
        self
    }

    /// Builder-style setter for portal targets
    pub fn with_portal_targets(mut self, allow: bool) -> Self {
        self.frontier.allow_portal_targets = allow;
        self
    }

    /// Builder-style setter for line-of-sight gating
    pub fn with_line_of_sight(mut self, enabled: bool) -> Self {
        self.coverage.use_line_of_sight = enabled;
        self
    }

    /// Builder-style setter for the think delay
    pub fn with_think_delay(mut self, secs: f32) -> Self {
        self.planner.think_delay_secs = secs;
        self
    }

    /// Builder-style setter for dwell time and local pick requirements
    pub fn with_dwell(mut self, secs: f32, picks: u32) -> Self {
        self.planner.min_dwell_secs = secs;
        self.planner.min_local_picks = picks;
        self
    }
}

fn invalid(field: &'static str, reason: &str) -> SearchError {
    SearchError::InvalidConfig {
        field,
        reason: reason.to_string(),
    }
}
