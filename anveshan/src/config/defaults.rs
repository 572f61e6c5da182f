//! Default value functions for serde deserialization.

// Coverage
pub fn coverage_target() -> f32 {
    0.85
}
pub fn leave_hysteresis() -> f32 {
    0.02
}
pub fn cone_radius() -> f32 {
    6.0
}
pub fn cone_half_angle_deg() -> f32 {
    60.0
}
pub fn marking_stride() -> u32 {
    3
}
pub fn occlusion_mask() -> u32 {
    1
}

// Frontier
pub fn batch_size() -> usize {
    12
}

// Planner
pub fn min_hop_distance() -> f32 {
    2.5
}
pub fn hard_min_separation() -> f32 {
    1.5
}
pub fn pick_interval_secs() -> f32 {
    6.0
}
pub fn think_delay_secs() -> f32 {
    0.35
}
pub fn arrive_tolerance() -> f32 {
    0.75
}
pub fn min_dwell_secs() -> f32 {
    4.0
}
pub fn min_local_picks() -> u32 {
    3
}
pub fn area_exit_cooldown_secs() -> f32 {
    20.0
}
pub fn plateau_window_secs() -> f32 {
    6.0
}
pub fn plateau_delta() -> f32 {
    0.01
}
pub fn plateau_reseed_cooldown_secs() -> f32 {
    5.0
}
pub fn bfs_attempts() -> u32 {
    3
}
pub fn bfs_max_expansions() -> usize {
    4096
}
pub fn base_search_radius() -> f32 {
    8.0
}
pub fn max_search_radius() -> f32 {
    16.0
}
pub fn radius_boost_step() -> f32 {
    1.5
}
pub fn radius_boost_decay() -> f32 {
    0.75
}
pub fn portal_nudge_distance() -> f32 {
    1.0
}
pub fn global_radius_scale() -> f32 {
    1.75
}

// Scoring
pub fn max_candidates() -> usize {
    24
}
pub fn scoring_budget_ms() -> f32 {
    2.0
}
pub fn hop_weight() -> f32 {
    0.25
}
pub fn overshoot_weight() -> f32 {
    0.2
}
pub fn direction_weight() -> f32 {
    0.35
}
pub fn recency_weight() -> f32 {
    0.6
}

pub fn enabled() -> bool {
    true
}
