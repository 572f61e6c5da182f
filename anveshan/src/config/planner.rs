//! Planner timing, hop and radius configuration section.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Planner settings section
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlannerSection {
    /// Minimum distance between the agent and a committed target
    #[serde(default = "defaults::min_hop_distance")]
    pub min_hop_distance: f32,

    /// Candidates closer than this to a recent target are excluded
    #[serde(default = "defaults::hard_min_separation")]
    pub hard_min_separation: f32,

    /// Re-pick a target at least this often (seconds)
    #[serde(default = "defaults::pick_interval_secs")]
    pub pick_interval_secs: f32,

    /// Reaction delay before a new target is computed (seconds)
    #[serde(default = "defaults::think_delay_secs")]
    pub think_delay_secs: f32,

    /// Distance at which the current target counts as reached
    #[serde(default = "defaults::arrive_tolerance")]
    pub arrive_tolerance: f32,

    /// Minimum time spent in an area before it can complete (seconds)
    #[serde(default = "defaults::min_dwell_secs")]
    pub min_dwell_secs: f32,

    /// Minimum local picks in an area before it can complete
    #[serde(default = "defaults::min_local_picks")]
    pub min_local_picks: u32,

    /// Time an area stays avoided after leaving it (seconds)
    #[serde(default = "defaults::area_exit_cooldown_secs")]
    pub area_exit_cooldown_secs: f32,

    /// Window without coverage gain that counts as a plateau (seconds)
    #[serde(default = "defaults::plateau_window_secs")]
    pub plateau_window_secs: f32,

    /// Coverage gain that resets the plateau timer
    #[serde(default = "defaults::plateau_delta")]
    pub plateau_delta: f32,

    /// Minimum time between plateau reseeds (seconds)
    #[serde(default = "defaults::plateau_reseed_cooldown_secs")]
    pub plateau_reseed_cooldown_secs: f32,

    /// Local frontier searches per decision
    #[serde(default = "defaults::bfs_attempts")]
    pub bfs_attempts: u32,

    /// Dequeue budget of one local frontier search
    #[serde(default = "defaults::bfs_max_expansions")]
    pub bfs_max_expansions: usize,

    /// Sampling radius before any boost
    #[serde(default = "defaults::base_search_radius")]
    pub base_search_radius: f32,

    /// Upper bound of base radius plus boost
    #[serde(default = "defaults::max_search_radius")]
    pub max_search_radius: f32,

    /// Boost added on every failed or degraded pick
    #[serde(default = "defaults::radius_boost_step")]
    pub radius_boost_step: f32,

    /// Boost removed on every successful pick
    #[serde(default = "defaults::radius_boost_decay")]
    pub radius_boost_decay: f32,

    /// Short step taken toward a portal target instead of crossing it
    #[serde(default = "defaults::portal_nudge_distance")]
    pub portal_nudge_distance: f32,

    /// Radius multiplier for global sampling once an area is complete
    #[serde(default = "defaults::global_radius_scale")]
    pub global_radius_scale: f32,
}

impl Default for PlannerSection {
    fn default() -> Self {
        Self {
            min_hop_distance: defaults::min_hop_distance(),
            hard_min_separation: defaults::hard_min_separation(),
            pick_interval_secs: defaults::pick_interval_secs(),
            think_delay_secs: defaults::think_delay_secs(),
            arrive_tolerance: defaults::arrive_tolerance(),
            min_dwell_secs: defaults::min_dwell_secs(),
            min_local_picks: defaults::min_local_picks(),
            area_exit_cooldown_secs: defaults::area_exit_cooldown_secs(),
            plateau_window_secs: defaults::plateau_window_secs(),
            plateau_delta: defaults::plateau_delta(),
            plateau_reseed_cooldown_secs: defaults::plateau_reseed_cooldown_secs(),
            bfs_attempts: defaults::bfs_attempts(),
            bfs_max_expansions: defaults::bfs_max_expansions(),
            base_search_radius: defaults::base_search_radius(),
            max_search_radius: defaults::max_search_radius(),
            radius_boost_step: defaults::radius_boost_step(),
            radius_boost_decay: defaults::radius_boost_decay(),
            portal_nudge_distance: defaults::portal_nudge_distance(),
            global_radius_scale: defaults::global_radius_scale(),
        }
    }
}

impl PlannerSection {
    /// Largest boost the radius adaptation may reach
    pub fn max_radius_boost(&self) -> f32 {
        (self.max_search_radius - self.base_search_radius).max(0.0)
    }
}
