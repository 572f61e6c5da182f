//! Per-agent planner state, discarded when the search behavior ends.

use crate::core::{AreaId, WorldPoint};
use crate::frontier::Frontier;

use super::avoidance::AreaMemory;
use super::events::SeedMode;
use super::recency::{RecencyRing, RECENT_TARGETS};

/// Weight of the previous estimate when blending travel direction
const TRAVEL_SMOOTHING: f32 = 0.6;

/// Movement below this does not update the travel direction
const MIN_TRAVEL_STEP: f32 = 1e-4;

/// Decision debounce state.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum DecisionPhase {
    /// Following the current target
    #[default]
    Idle,
    /// Reaction delay running; a new target is picked at `ready_at`
    Thinking { ready_at: f32 },
}

/// Bookkeeping for the area the agent is in.
#[derive(Clone, Debug, Default)]
pub struct AreaContext {
    pub current: Option<AreaId>,
    pub previous: Option<AreaId>,
    /// Time the current area was entered
    pub entered_at: f32,
    /// Targets committed while in the current area
    pub local_picks: u32,
    /// Local searches that found nothing usable in this area
    pub bfs_failures: u32,
    /// Local searches that found a cell but it was rejected
    pub bfs_rejections: u32,
    /// Exit target already committed for the current area
    pub exit_committed: bool,
    /// Completion already reported for the current area
    pub completion_reported: bool,
}

impl AreaContext {
    /// Switch to `area`, returning the area left behind.
    pub fn enter_area(&mut self, area: AreaId, now: f32) -> Option<AreaId> {
        let left = self.current;
        *self = AreaContext {
            current: Some(area),
            previous: left,
            entered_at: now,
            ..AreaContext::default()
        };
        left
    }

    /// Seconds spent in the current area
    pub fn dwell(&self, now: f32) -> f32 {
        (now - self.entered_at).max(0.0)
    }
}

/// Everything the planner remembers about one agent's search.
#[derive(Clone, Debug)]
pub struct PlannerSession {
    /// Where the session started or last re-anchored (area entry)
    pub anchor: WorldPoint,
    pub area: AreaContext,
    /// Best coverage of the current area since the plateau timer reset
    pub best_coverage: f32,
    pub plateau_since: f32,
    pub last_plateau_reseed: Option<f32>,
    /// Halve the next think delay
    pub hurry_next: bool,
    pub radius_boost: f32,
    /// Smoothed unit travel direction (zero until the agent moves)
    pub travel_dir: WorldPoint,
    pub last_position: Option<WorldPoint>,
    pub phase: DecisionPhase,
    pub last_pick_at: Option<f32>,
    pub ticks: u64,
    pub frontier: Frontier,
    pub frontier_mode: SeedMode,
    pub recent_targets: RecencyRing<RECENT_TARGETS>,
    pub areas: AreaMemory,
}

impl PlannerSession {
    pub fn new(now: f32) -> Self {
        Self {
            anchor: WorldPoint::ZERO,
            area: AreaContext {
                entered_at: now,
                ..AreaContext::default()
            },
            best_coverage: 0.0,
            plateau_since: now,
            last_plateau_reseed: None,
            hurry_next: false,
            radius_boost: 0.0,
            travel_dir: WorldPoint::ZERO,
            last_position: None,
            phase: DecisionPhase::Idle,
            last_pick_at: None,
            ticks: 0,
            frontier: Frontier::new(),
            frontier_mode: SeedMode::Local,
            recent_targets: RecencyRing::new(),
            areas: AreaMemory::new(),
        }
    }

    /// Blend the latest movement into the travel direction estimate.
    pub fn update_travel(&mut self, position: WorldPoint) {
        if let Some(last) = self.last_position {
            let delta = position - last;
            if delta.length() > MIN_TRAVEL_STEP {
                let step = delta.normalize();
                let blended = if self.travel_dir.length() > 0.0 {
                    self.travel_dir * TRAVEL_SMOOTHING + step * (1.0 - TRAVEL_SMOOTHING)
                } else {
                    step
                };
                self.travel_dir = blended.normalize();
            }
        }
        self.last_position = Some(position);
    }

    /// Enter a new area and restart the per-area timers.
    pub fn enter_area(&mut self, area: AreaId, position: WorldPoint, coverage: f32, now: f32) -> Option<AreaId> {
        let left = self.area.enter_area(area, now);
        self.anchor = position;
        self.best_coverage = coverage;
        self.plateau_since = now;
        self.last_plateau_reseed = None;
        left
    }

    /// Record coverage progress; a gain above `delta` resets the plateau timer.
    pub fn track_progress(&mut self, coverage: f32, delta: f32, now: f32) {
        if coverage > self.best_coverage + delta {
            self.best_coverage = coverage;
            self.plateau_since = now;
        }
    }

    /// Has coverage stalled for `window` and is a reseed allowed again?
    pub fn plateau_reseed_due(&self, window: f32, cooldown: f32, now: f32) -> bool {
        let stalled = now - self.plateau_since >= window;
        let cooled = self
            .last_plateau_reseed
            .map_or(true, |t| now - t >= cooldown);
        stalled && cooled
    }

    /// Start the reaction delay
    pub fn begin_thinking(&mut self, ready_at: f32) {
        self.phase = DecisionPhase::Thinking { ready_at };
    }

    /// Leave the thinking phase if its delay has expired. Returns true when
    /// a decision is due now.
    pub fn finish_thinking(&mut self, now: f32) -> bool {
        match self.phase {
            DecisionPhase::Thinking { ready_at } if now >= ready_at => {
                self.phase = DecisionPhase::Idle;
                true
            }
            _ => false,
        }
    }

    pub fn is_thinking(&self) -> bool {
        matches!(self.phase, DecisionPhase::Thinking { .. })
    }

    /// Grow the radius boost, capped at `max`
    pub fn boost_radius(&mut self, step: f32, max: f32) {
        self.radius_boost = (self.radius_boost + step).clamp(0.0, max.max(0.0));
    }

    /// Shrink the radius boost toward zero
    pub fn decay_radius(&mut self, decay: f32, max: f32) {
        self.radius_boost = (self.radius_boost - decay).clamp(0.0, max.max(0.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_enter_area_resets_context() {
        let mut session = PlannerSession::new(0.0);
        session.area.local_picks = 4;
        session.area.bfs_failures = 2;
        session.area.exit_committed = true;

        assert_eq!(session.enter_area(AreaId(1), WorldPoint::new(1.0, 1.0), 0.3, 5.0), None);
        let left = session.enter_area(AreaId(2), WorldPoint::new(2.0, 1.0), 0.0, 9.0);
        assert_eq!(left, Some(AreaId(1)));
        assert_eq!(session.area.previous, Some(AreaId(1)));
        assert_eq!(session.area.local_picks, 0);
        assert_eq!(session.area.bfs_failures, 0);
        assert!(!session.area.exit_committed);
        assert_relative_eq!(session.area.dwell(12.0), 3.0);
        assert_relative_eq!(session.plateau_since, 9.0);
    }

    #[test]
    fn test_thinking_transitions() {
        let mut session = PlannerSession::new(0.0);
        assert!(!session.finish_thinking(1.0));

        session.begin_thinking(2.0);
        assert!(session.is_thinking());
        assert!(!session.finish_thinking(1.9));
        assert!(session.finish_thinking(2.0));
        assert_eq!(session.phase, DecisionPhase::Idle);
    }

    #[test]
    fn test_travel_direction_blends() {
        let mut session = PlannerSession::new(0.0);
        session.update_travel(WorldPoint::ZERO);
        assert_eq!(session.travel_dir, WorldPoint::ZERO);

        session.update_travel(WorldPoint::new(1.0, 0.0));
        assert_relative_eq!(session.travel_dir.x, 1.0);

        session.update_travel(WorldPoint::new(1.0, 1.0));
        assert!(session.travel_dir.x > 0.0 && session.travel_dir.y > 0.0);
        assert_relative_eq!(session.travel_dir.length(), 1.0, epsilon = 1e-5);

        // Standing still keeps the estimate
        let before = session.travel_dir;
        session.update_travel(WorldPoint::new(1.0, 1.0));
        assert_eq!(session.travel_dir, before);
    }

    #[test]
    fn test_plateau_timing() {
        let mut session = PlannerSession::new(0.0);
        session.track_progress(0.005, 0.01, 1.0);
        assert_relative_eq!(session.plateau_since, 0.0);
        assert!(session.plateau_reseed_due(6.0, 5.0, 6.0));

        session.last_plateau_reseed = Some(6.0);
        assert!(!session.plateau_reseed_due(6.0, 5.0, 8.0));

        session.track_progress(0.2, 0.01, 9.0);
        assert!(!session.plateau_reseed_due(6.0, 5.0, 12.0));
    }

    #[test]
    fn test_radius_boost_bounds() {
        let mut session = PlannerSession::new(0.0);
        for _ in 0..20 {
            session.boost_radius(1.5, 8.0);
        }
        assert_relative_eq!(session.radius_boost, 8.0);
        for _ in 0..20 {
            session.decay_radius(0.75, 8.0);
        }
        assert_relative_eq!(session.radius_boost, 0.0);
    }
}
