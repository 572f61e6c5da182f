//! Per-tick exploration planner.
//!
//! Each tick updates the agent's travel estimate and area, marks what the
//! agent can see, and decides whether a new move target is due. Target
//! selection walks a priority chain that always ends with a usable point.
//!
//! ## Selection while the area is incomplete
//!
//! 1. Local breadth-first search for the nearest unsearched cell
//! 2. Scored candidates inside the area
//! 3. Next local frontier point
//! 4. Fixed-direction fallback (degraded)
//!
//! ## Selection once the area is complete
//!
//! 1. Next cross-area frontier point
//! 2. Scored candidates outside avoided areas at an enlarged radius
//! 3. Random point of the least covered non-avoided area
//! 4. Fixed-direction fallback (degraded)

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::SearchConfig;
use crate::core::math::TWO_PI;
use crate::core::{AreaId, GridCoord, WorldPoint};
use crate::coverage::{CoverageGrid, SightTest};
use crate::error::Result;
use crate::frontier::{FrontierSeeder, SeedParams};
use crate::search::LocalFrontierSearch;
use crate::world::{SearchWorld, World};

use super::events::{
    PickSource, PlannerEvent, PlannerObserver, RejectReason, SeedMode, TracingObserver,
};
use super::scoring::{AreaFilter, CandidateQuery, CandidateScorer};
use super::session::{DecisionPhase, PlannerSession};

/// Directions tried by the fallback
const FALLBACK_DIRECTIONS: usize = 16;

/// Radius growth per fallback direction, as a fraction of the minimum hop
const FALLBACK_RADIUS_GROWTH: f32 = 0.05;

/// Frontier points tried when a pick is closer than the minimum hop
const MIN_HOP_FRONTIER_TRIES: usize = 3;

/// Rejected search hits remembered within one decision
const MAX_REJECTED: usize = 8;

/// Seed offsets so each random stream of one agent differs
const SEEDER_STREAM: u64 = 0x5EED_F00D;
const PLANNER_STREAM: u64 = 0xA11C_E5ED;

/// Agent state read and written by the planner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentState {
    pub position: WorldPoint,
    /// The planner's only output
    pub move_target: Option<WorldPoint>,
}

impl AgentState {
    pub fn at(position: WorldPoint) -> Self {
        Self {
            position,
            move_target: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Readiness {
    /// Not initialized, or grid/partition missing this tick
    NotReady,
    Ready,
}

/// A committed target
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pick {
    pub point: WorldPoint,
    pub source: PickSource,
    /// Produced by a fallback rather than a real search result
    pub degraded: bool,
}

/// Summary of one tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickReport {
    pub readiness: Readiness,
    pub area: Option<AreaId>,
    pub area_coverage: f32,
    pub area_complete: bool,
    pub phase: DecisionPhase,
    /// Target committed during this tick
    pub pick: Option<Pick>,
}

impl TickReport {
    fn not_ready(phase: DecisionPhase) -> Self {
        Self {
            readiness: Readiness::NotReady,
            area: None,
            area_coverage: 0.0,
            area_complete: false,
            phase,
            pick: None,
        }
    }
}

/// Search planner for one agent.
pub struct ExplorationPlanner {
    config: SearchConfig,
    agent_id: u64,
    search: LocalFrontierSearch,
    seeder: FrontierSeeder,
    scorer: CandidateScorer,
    rng: StdRng,
    session: PlannerSession,
    observer: Box<dyn PlannerObserver + Send>,
    ready: bool,
}

impl ExplorationPlanner {
    /// Planner for `agent_id`. Random streams are seeded from the id.
    pub fn new(config: SearchConfig, agent_id: u64) -> Self {
        let scorer = CandidateScorer::new(&config.scoring, config.planner.hard_min_separation);
        Self {
            agent_id,
            search: LocalFrontierSearch::default(),
            seeder: FrontierSeeder::new(agent_id ^ SEEDER_STREAM, config.frontier.batch_size),
            scorer,
            rng: StdRng::seed_from_u64(agent_id ^ PLANNER_STREAM),
            session: PlannerSession::new(0.0),
            observer: Box::new(TracingObserver { agent_id }),
            ready: false,
            config,
        }
    }

    /// Builder-style setter for the event observer
    pub fn with_observer(mut self, observer: Box<dyn PlannerObserver + Send>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn agent_id(&self) -> u64 {
        self.agent_id
    }

    pub fn session(&self) -> &PlannerSession {
        &self.session
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Current sampling radius (base plus boost)
    pub fn search_radius(&self) -> f32 {
        self.config.planner.base_search_radius + self.session.radius_boost
    }

    /// Size the search buffers for the world's grid. Ticks before a
    /// successful call report [`Readiness::NotReady`].
    pub fn initialize(&mut self, world: &SearchWorld<'_>) -> Result<()> {
        let resolved = world.resolve()?;
        self.search.resize(resolved.grid.layout());
        self.ready = true;
        Ok(())
    }

    /// Drop the per-agent session (behavior switch). Coverage is untouched.
    pub fn reset_session(&mut self, now: f32) {
        self.session = PlannerSession::new(now);
    }

    /// Has the agent finished its current area?
    pub fn is_complete(&self, coverage: &CoverageGrid, now: f32) -> bool {
        match self.session.area.current {
            Some(area) => self.area_done(coverage.area_coverage(area), now),
            None => false,
        }
    }

    fn area_done(&self, coverage: f32, now: f32) -> bool {
        let c = &self.config;
        coverage >= c.coverage.effective_target() + c.coverage.leave_hysteresis
            && self.session.area.dwell(now) >= c.planner.min_dwell_secs
            && self.session.area.local_picks >= c.planner.min_local_picks
    }

    fn emit(&mut self, event: PlannerEvent) {
        self.observer.on_event(&event);
    }

    fn seed_params(&self) -> SeedParams {
        SeedParams {
            min_hop: self.config.planner.min_hop_distance,
            max_step: self.search_radius(),
            allow_portals: self.config.frontier.allow_portal_targets,
            use_line_of_sight: self.config.coverage.use_line_of_sight,
            mask: self.config.coverage.mask(),
        }
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Advance the planner by one tick.
    ///
    /// Writes `agent.move_target` when a new target is committed; nothing
    /// else outside the planner is modified except `coverage`.
    pub fn tick(
        &mut self,
        world: &SearchWorld<'_>,
        coverage: &mut CoverageGrid,
        agent: &mut AgentState,
        now: f32,
    ) -> TickReport {
        if !self.ready {
            return TickReport::not_ready(self.session.phase);
        }
        let Ok(resolved) = world.resolve() else {
            return TickReport::not_ready(self.session.phase);
        };
        self.session.ticks += 1;
        let position = agent.position;

        // 1. Travel direction
        self.session.update_travel(position);

        // 2. Area tracking
        if let Some(area) = resolved.area_of(position) {
            if self.session.area.current != Some(area) {
                self.on_area_change(world, coverage, area, position, now);
            }
        }
        let current = self.session.area.current;

        // 3. Visibility marking
        let mut area_coverage = current.map_or(0.0, |a| coverage.area_coverage(a));
        let mut complete = current.is_some() && self.area_done(area_coverage, now);
        if current.is_some() && !complete && self.marking_due() {
            self.mark_view(&resolved, coverage, agent);
            area_coverage = current.map_or(0.0, |a| coverage.area_coverage(a));
            complete = self.area_done(area_coverage, now);
        }
        if let Some(area) = current {
            self.session
                .track_progress(area_coverage, self.config.planner.plateau_delta, now);
            if complete && !self.session.area.completion_reported {
                self.session.area.completion_reported = true;
                self.emit(PlannerEvent::AreaCompleted {
                    area,
                    coverage: area_coverage,
                    at: now,
                });
            }
        }

        let mut pick = None;
        match current {
            // 4. Commit an exit target once per completed area
            Some(area) if complete => {
                if !self.session.area.exit_committed {
                    pick = self.commit_exit(world, &resolved, area, agent, now);
                }
            }
            // 5. Plateau reseed
            Some(area) => {
                let p = &self.config.planner;
                if self.session.plateau_reseed_due(
                    p.plateau_window_secs,
                    p.plateau_reseed_cooldown_secs,
                    now,
                ) {
                    self.reseed_local(world, position, now);
                    self.session.last_plateau_reseed = Some(now);
                    self.session.plateau_since = now;
                    self.session.hurry_next = true;
                    self.emit(PlannerEvent::PlateauReseed {
                        area,
                        coverage: area_coverage,
                    });
                }
            }
            None => {}
        }

        // 6. Thinking debounce
        if pick.is_none() {
            pick = self.think(world, &resolved, coverage, agent, complete, now);
        }

        TickReport {
            readiness: Readiness::Ready,
            area: current,
            area_coverage,
            area_complete: complete,
            phase: self.session.phase,
            pick,
        }
    }

    fn on_area_change(
        &mut self,
        world: &SearchWorld<'_>,
        coverage: &CoverageGrid,
        area: AreaId,
        position: WorldPoint,
        now: f32,
    ) {
        let entry_coverage = coverage.area_coverage(area);
        let left = self.session.enter_area(area, position, entry_coverage, now);
        if let Some(prev) = left {
            self.session
                .areas
                .leave(prev, now, self.config.planner.area_exit_cooldown_secs);
        }
        self.session.areas.prune(now);
        self.emit(PlannerEvent::AreaEntered {
            area,
            previous: left,
            at: now,
        });
        self.reseed_local(world, position, now);
    }

    fn marking_due(&self) -> bool {
        let stride = u64::from(self.config.coverage.marking_stride.max(1));
        (self.session.ticks + self.agent_id % stride) % stride == 0
    }

    fn mark_view(&self, world: &World<'_>, coverage: &mut CoverageGrid, agent: &AgentState) {
        let cfg = &self.config.coverage;
        let heading = match agent.move_target {
            Some(target) => target - agent.position,
            None => self.session.travel_dir,
        };
        let sight: Option<SightTest<'_>> = if cfg.use_line_of_sight {
            world.visibility.map(|v| (v, cfg.mask()))
        } else {
            None
        };
        coverage.mark_cone(
            agent.position,
            heading,
            cfg.cone_radius,
            cfg.cone_half_angle_deg,
            sight,
        );
    }

    fn reseed_local(&mut self, world: &SearchWorld<'_>, around: WorldPoint, now: f32) {
        let params = self.seed_params();
        let points = self.seeder.seed_around(
            &mut self.session.frontier,
            world,
            around,
            self.config.frontier.batch_size,
            &params,
            now,
        );
        self.session.frontier_mode = SeedMode::Local;
        self.emit(PlannerEvent::FrontierReseeded {
            mode: SeedMode::Local,
            points,
        });
    }

    fn reseed_across(&mut self, world: &SearchWorld<'_>, from: AreaId, around: WorldPoint) {
        let params = self.seed_params();
        let points = self.seeder.seed_across(
            &mut self.session.frontier,
            world,
            from,
            around,
            self.config.frontier.batch_size,
            &params,
        );
        self.session.frontier_mode = SeedMode::Across;
        self.emit(PlannerEvent::FrontierReseeded {
            mode: SeedMode::Across,
            points,
        });
    }

    fn commit_exit(
        &mut self,
        world: &SearchWorld<'_>,
        resolved: &World<'_>,
        area: AreaId,
        agent: &mut AgentState,
        now: f32,
    ) -> Option<Pick> {
        self.reseed_across(world, area, agent.position);
        let point = self.session.frontier.pop_next()?;
        self.session.area.exit_committed = true;
        let pick = Pick {
            point,
            source: PickSource::CrossFrontier,
            degraded: false,
        };
        Some(self.commit(resolved, agent, pick, true, 1.0, now))
    }

    fn think(
        &mut self,
        world: &SearchWorld<'_>,
        resolved: &World<'_>,
        coverage: &CoverageGrid,
        agent: &mut AgentState,
        complete: bool,
        now: f32,
    ) -> Option<Pick> {
        if self.session.phase == DecisionPhase::Idle {
            let p = &self.config.planner;
            let reached = agent
                .move_target
                .map_or(true, |t| t.distance(&agent.position) <= p.arrive_tolerance);
            let interval = self
                .session
                .last_pick_at
                .map_or(true, |t| now - t >= p.pick_interval_secs);
            if reached || interval {
                let mut delay = p.think_delay_secs;
                if self.session.hurry_next {
                    delay *= 0.5;
                    self.session.hurry_next = false;
                }
                self.session.begin_thinking(now + delay);
            }
        }

        if !self.session.finish_thinking(now) {
            return None;
        }
        let area_coverage = self
            .session
            .area
            .current
            .map_or(0.0, |a| coverage.area_coverage(a));
        let pick = if complete {
            self.select_elsewhere(world, resolved, coverage, agent.position, now)
        } else {
            self.select_local(world, resolved, coverage, agent.position, now)
        };
        Some(self.commit(resolved, agent, pick, complete, area_coverage, now))
    }

    // ========================================================================
    // Selection chains
    // ========================================================================

    fn select_local(
        &mut self,
        world: &SearchWorld<'_>,
        resolved: &World<'_>,
        coverage: &CoverageGrid,
        position: WorldPoint,
        now: f32,
    ) -> Pick {
        let Some(area) = self.session.area.current else {
            return self.fallback(resolved, position, None);
        };

        if let Some(point) = self.search_nearby(resolved, coverage, area, position, now) {
            return Pick {
                point,
                source: PickSource::LocalSearch,
                degraded: false,
            };
        }

        if let Some(point) = self.scored(resolved, position, AreaFilter::Within(area), 1.0, now) {
            return Pick {
                point,
                source: PickSource::ScoredLocal,
                degraded: false,
            };
        }

        if self.session.frontier.is_empty() {
            self.reseed_local(world, position, now);
        }
        while let Some(point) = self.session.frontier.pop_next() {
            if self.frontier_point_usable(resolved, area, point, now) {
                return Pick {
                    point,
                    source: PickSource::Frontier,
                    degraded: false,
                };
            }
        }

        self.fallback(resolved, position, Some(area))
    }

    fn select_elsewhere(
        &mut self,
        world: &SearchWorld<'_>,
        resolved: &World<'_>,
        coverage: &CoverageGrid,
        position: WorldPoint,
        now: f32,
    ) -> Pick {
        let current = self.session.area.current;

        if self.session.frontier_mode != SeedMode::Across {
            if let Some(area) = current {
                self.reseed_across(world, area, position);
            }
        }
        if let Some(point) = self.session.frontier.pop_next() {
            return Pick {
                point,
                source: PickSource::CrossFrontier,
                degraded: false,
            };
        }

        let scale = self.config.planner.global_radius_scale;
        if let Some(point) =
            self.scored(resolved, position, AreaFilter::Elsewhere { current }, scale, now)
        {
            return Pick {
                point,
                source: PickSource::GlobalScored,
                degraded: false,
            };
        }

        if let Some(point) = self.sample_least_covered(resolved, coverage, current, now) {
            return Pick {
                point,
                source: PickSource::AreaSample,
                degraded: false,
            };
        }

        self.fallback(resolved, position, current)
    }

    /// Up to `bfs_attempts` local searches; rejected hits are excluded from
    /// the following attempts.
    fn search_nearby(
        &mut self,
        world: &World<'_>,
        coverage: &CoverageGrid,
        area: AreaId,
        position: WorldPoint,
        now: f32,
    ) -> Option<WorldPoint> {
        let p = &self.config.planner;
        let attempts = p.bfs_attempts;
        let max_expansions = p.bfs_max_expansions;
        let min_hop = p.min_hop_distance;
        let layout = *world.grid.layout();

        let mut rejected = [GridCoord::default(); MAX_REJECTED];
        let mut rejected_len = 0;
        let mut hop_floor = false;

        for _ in 0..attempts {
            let excluded = &rejected[..rejected_len];
            let found = self.search.find_unsearched(
                world,
                area,
                position,
                |c| {
                    !coverage.is_searched(c)
                        && !excluded.contains(&c)
                        && (!hop_floor
                            || layout.grid_to_world(c).distance(&position) >= min_hop)
                },
                max_expansions,
            );

            let Some(point) = found else {
                // Identical inputs would fail again
                self.session.area.bfs_failures += 1;
                self.boost_radius();
                return None;
            };

            let reason = if world
                .area_of(point)
                .is_some_and(|a| a != area && self.session.areas.is_avoided(a, now))
            {
                Some(RejectReason::AvoidedArea)
            } else if point.distance(&position) < min_hop && !self.has_alternate(position, area, world) {
                Some(RejectReason::BelowMinHop)
            } else {
                None
            };

            let Some(reason) = reason else {
                return Some(point);
            };
            self.session.area.bfs_rejections += 1;
            self.emit(PlannerEvent::CandidateRejected { point, reason });
            if reason == RejectReason::BelowMinHop {
                hop_floor = true;
            }
            if rejected_len < MAX_REJECTED {
                rejected[rejected_len] = layout.world_to_grid(point);
                rejected_len += 1;
            }
        }
        self.boost_radius();
        None
    }

    /// Does the frontier still hold a point of `area` a full hop away?
    fn has_alternate(&self, position: WorldPoint, area: AreaId, world: &World<'_>) -> bool {
        let min_hop = self.config.planner.min_hop_distance;
        self.session.frontier.pending().iter().any(|p| {
            p.distance(&position) >= min_hop && world.areas.strict_area(*p) == Some(area)
        })
    }

    fn scored(
        &mut self,
        world: &World<'_>,
        position: WorldPoint,
        filter: AreaFilter,
        radius_scale: f32,
        now: f32,
    ) -> Option<WorldPoint> {
        let sight = match filter {
            AreaFilter::Within(_) if self.config.coverage.use_line_of_sight => {
                Some(self.config.coverage.mask())
            }
            _ => None,
        };
        let memory = &self.session.areas;
        let avoided = |a: AreaId| memory.is_avoided(a, now);
        let query = CandidateQuery {
            origin: position,
            radius: self.search_radius() * radius_scale,
            min_hop: self.config.planner.min_hop_distance,
            travel_dir: self.session.travel_dir,
            filter,
            sight,
            recent: &self.session.recent_targets,
            avoided: &avoided,
        };
        self.scorer
            .best(world, &mut self.rng, &query)
            .map(|c| c.point)
    }

    fn frontier_point_usable(
        &self,
        world: &World<'_>,
        area: AreaId,
        point: WorldPoint,
        now: f32,
    ) -> bool {
        let in_area = world.areas.strict_area(point) == Some(area) && !world.is_portal_at(point);
        if in_area {
            return true;
        }
        match self.session.area.previous {
            Some(prev) => !self.session.areas.is_on_cooldown(prev, now),
            None => true,
        }
    }

    fn sample_least_covered(
        &mut self,
        world: &World<'_>,
        coverage: &CoverageGrid,
        current: Option<AreaId>,
        now: f32,
    ) -> Option<WorldPoint> {
        let target = (0..world.areas.area_count())
            .map(|i| AreaId(i as u32))
            .filter(|&a| Some(a) != current && !self.session.areas.is_avoided(a, now))
            .filter(|&a| world.areas.walkable_cells(a) > 0)
            .map(|a| (a, coverage.area_coverage(a)))
            .filter(|&(_, c)| c < 1.0)
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))?
            .0;

        let mut samples = Vec::with_capacity(1);
        world.areas.sample_points(target, 1, &mut self.rng, &mut samples);
        samples.first().copied()
    }

    /// Sixteen directions at slowly growing radii; the first in-area,
    /// non-portal node wins. Falls back to the agent position.
    fn fallback(&mut self, world: &World<'_>, position: WorldPoint, area: Option<AreaId>) -> Pick {
        let min_hop = self.config.planner.min_hop_distance;
        let base = if self.session.travel_dir.length() > 0.0 {
            WorldPoint::ZERO.angle_to(&self.session.travel_dir)
        } else {
            0.0
        };

        let mut nearest_ok = None;
        for k in 0..FALLBACK_DIRECTIONS {
            let angle = base + k as f32 * TWO_PI / FALLBACK_DIRECTIONS as f32;
            let radius = min_hop * (1.0 + FALLBACK_RADIUS_GROWTH * k as f32);
            let Some(node) = world.grid.nearest_node(position.point_at(angle, radius)) else {
                continue;
            };
            if world.areas.is_portal(node) {
                continue;
            }
            if let Some(a) = area {
                if world.areas.strict_area_at(node) != Some(a) {
                    continue;
                }
            }
            let point = world.grid.node_position(node);
            if point.distance(&position) >= min_hop {
                nearest_ok = Some(point);
                break;
            }
            nearest_ok.get_or_insert(point);
        }

        self.boost_radius();
        Pick {
            point: nearest_ok.unwrap_or(position),
            source: PickSource::Fallback,
            degraded: true,
        }
    }

    // ========================================================================
    // Commit
    // ========================================================================

    fn commit(
        &mut self,
        world: &World<'_>,
        agent: &mut AgentState,
        mut pick: Pick,
        complete: bool,
        area_coverage: f32,
        now: f32,
    ) -> Pick {
        let position = agent.position;
        if !pick.degraded {
            let (point, degraded) = self.satisfy_min_hop(world, position, pick.point, now);
            pick.point = point;
            if degraded {
                pick.degraded = true;
                pick.source = PickSource::Fallback;
            }
        }
        if !complete && !pick.degraded {
            pick.point = self.portal_nudge(world, position, pick.point, area_coverage);
        }

        agent.move_target = Some(pick.point);
        self.session.recent_targets.push(pick.point);
        self.session.last_pick_at = Some(now);
        if !complete {
            self.session.area.local_picks += 1;
        }
        if !pick.degraded {
            let p = &self.config.planner;
            let (decay, max) = (p.radius_boost_decay, p.max_radius_boost());
            self.session.decay_radius(decay, max);
        }

        self.emit(PlannerEvent::TargetCommitted {
            point: pick.point,
            source: pick.source,
            degraded: pick.degraded,
        });
        pick
    }

    /// Replace a target nearer than the minimum hop. Returns the point and
    /// whether the final fallback produced it.
    fn satisfy_min_hop(
        &mut self,
        world: &World<'_>,
        position: WorldPoint,
        point: WorldPoint,
        now: f32,
    ) -> (WorldPoint, bool) {
        let min_hop = self.config.planner.min_hop_distance;
        if point.distance(&position) >= min_hop {
            return (point, false);
        }

        for _ in 0..MIN_HOP_FRONTIER_TRIES {
            let Some(candidate) = self.session.frontier.pop_next() else {
                break;
            };
            if candidate.distance(&position) >= min_hop && self.area_acceptable(world, candidate, now) {
                return (candidate, false);
            }
        }

        let bearing = if point.distance(&position) > 1e-4 {
            position.angle_to(&point)
        } else if self.session.travel_dir.length() > 0.0 {
            WorldPoint::ZERO.angle_to(&self.session.travel_dir)
        } else {
            0.0
        };
        let projected = position.point_at(bearing, 2.0 * min_hop);
        if world.is_walkable_at(projected) && self.area_acceptable(world, projected, now) {
            return (projected, false);
        }

        let area = self.session.area.current;
        let fallback = self.fallback(world, position, area);
        (fallback.point, true)
    }

    /// Current area, or any area not avoided
    fn area_acceptable(&self, world: &World<'_>, point: WorldPoint, now: f32) -> bool {
        match world.area_of(point) {
            Some(a) => Some(a) == self.session.area.current || !self.session.areas.is_avoided(a, now),
            None => false,
        }
    }

    /// While the area is still mostly unsearched, keep targets inside it:
    /// a portal or out-of-area target becomes a short step on the same
    /// bearing.
    fn portal_nudge(
        &self,
        world: &World<'_>,
        position: WorldPoint,
        point: WorldPoint,
        area_coverage: f32,
    ) -> WorldPoint {
        let Some(area) = self.session.area.current else {
            return point;
        };
        if area_coverage >= 0.5 * self.config.coverage.effective_target() {
            return point;
        }
        let leaves_area =
            world.is_portal_at(point) || world.areas.strict_area(point) != Some(area);
        if !leaves_area {
            return point;
        }

        let p = &self.config.planner;
        let dist = point.distance(&position);
        let step = p.portal_nudge_distance.max(p.min_hop_distance).min(dist);
        let nudged = position.point_at(position.angle_to(&point), step);
        if world.is_walkable_at(nudged) && world.areas.strict_area(nudged) == Some(area) {
            nudged
        } else {
            point
        }
    }

    fn boost_radius(&mut self) {
        let p = &self.config.planner;
        let (step, max) = (p.radius_boost_step, p.max_radius_boost());
        self.session.boost_radius(step, max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::GridMap;
    use crate::planner::NullObserver;
    use crate::world::AreaPartition;
    use approx::assert_relative_eq;

    /// Two rooms joined by a portal at (6, 3)
    const TWO_ROOMS: [&str; 7] = [
        "###########",
        "#00000#111#",
        "#00000#111#",
        "#00000+111#",
        "#00000#111#",
        "#00000#111#",
        "###########",
    ];

    fn planner_in(area: AreaId) -> ExplorationPlanner {
        let mut planner =
            ExplorationPlanner::new(SearchConfig::default(), 1).with_observer(Box::new(NullObserver));
        planner.session.area.current = Some(area);
        planner
    }

    #[test]
    fn test_portal_nudge_keeps_target_in_area() {
        let map = GridMap::from_ascii(&TWO_ROOMS, 1.0).unwrap();
        let world = map.world().resolve().unwrap();
        let planner = planner_in(AreaId(0));
        let position = map.center(2, 3);

        // Step of max(nudge, min hop) = 2.5 along the bearing
        let nudged = planner.portal_nudge(&world, position, map.center(6, 3), 0.0);
        assert_relative_eq!(nudged.x, 5.0, epsilon = 1e-5);
        assert_relative_eq!(nudged.y, 3.5, epsilon = 1e-5);
        assert_eq!(map.strict_area(nudged), Some(AreaId(0)));

        let across = planner.portal_nudge(&world, position, map.center(8, 3), 0.0);
        assert_eq!(map.strict_area(across), Some(AreaId(0)));
        assert_relative_eq!(across.distance(&position), 2.5, epsilon = 1e-5);

        // In-area targets and well covered areas are left alone
        let inside = map.center(5, 5);
        assert_eq!(planner.portal_nudge(&world, position, inside, 0.0), inside);
        let portal = map.center(6, 3);
        assert_eq!(planner.portal_nudge(&world, position, portal, 0.5), portal);
    }

    #[test]
    fn test_min_hop_prefers_frontier_then_projection() {
        let map = GridMap::from_ascii(&TWO_ROOMS, 1.0).unwrap();
        let world = map.world().resolve().unwrap();
        let mut planner = planner_in(AreaId(0));
        let position = map.center(1, 1);
        let too_close = map.center(2, 2);

        planner.session.frontier.push(map.center(2, 1));
        planner.session.frontier.push(map.center(5, 5));
        let (point, degraded) = planner.satisfy_min_hop(&world, position, too_close, 0.0);
        assert!(!degraded);
        assert_eq!(point, map.center(5, 5));

        // Empty frontier: project the bearing to twice the hop
        let (point, degraded) = planner.satisfy_min_hop(&world, position, too_close, 0.0);
        assert!(!degraded);
        assert_relative_eq!(point.distance(&position), 5.0, epsilon = 1e-4);
        assert_relative_eq!(
            position.angle_to(&point),
            position.angle_to(&too_close),
            epsilon = 1e-5
        );
        assert_eq!(map.strict_area(point), Some(AreaId(0)));
        assert_relative_eq!(planner.session.radius_boost, 0.0);
    }

    #[test]
    fn test_min_hop_falls_back_when_projection_leaves_map() {
        let map = GridMap::from_ascii(&TWO_ROOMS, 1.0).unwrap();
        let world = map.world().resolve().unwrap();
        let mut planner = planner_in(AreaId(0));
        let position = map.center(3, 3);

        let (point, degraded) = planner.satisfy_min_hop(&world, position, map.center(3, 4), 0.0);
        assert!(degraded);
        assert_eq!(map.strict_area(point), Some(AreaId(0)));
        assert!(point.distance(&position) >= 2.5);
        assert_relative_eq!(planner.session.radius_boost, 1.5);
    }

    #[test]
    fn test_fallback_stays_in_area_and_boosts_radius() {
        let map = GridMap::from_ascii(&TWO_ROOMS, 1.0).unwrap();
        let world = map.world().resolve().unwrap();
        let mut planner = planner_in(AreaId(0));
        let position = map.center(3, 3);

        let pick = planner.fallback(&world, position, Some(AreaId(0)));
        assert!(pick.degraded);
        assert_eq!(pick.source, PickSource::Fallback);
        assert_eq!(map.strict_area(pick.point), Some(AreaId(0)));
        assert!(pick.point.distance(&position) >= 2.5);
        assert_relative_eq!(planner.search_radius(), 8.0 + 1.5);

        for _ in 0..10 {
            planner.fallback(&world, position, Some(AreaId(0)));
        }
        assert_relative_eq!(planner.search_radius(), 16.0);
    }

    #[test]
    fn test_fallback_returns_position_when_nothing_fits() {
        let map = GridMap::from_ascii(&["0"], 1.0).unwrap();
        let world = map.world().resolve().unwrap();
        let mut planner = planner_in(AreaId(0));
        let position = map.center(0, 0);

        let pick = planner.fallback(&world, position, Some(AreaId(0)));
        assert!(pick.degraded);
        assert_eq!(pick.point, position);
    }

    #[test]
    fn test_frontier_points_respect_previous_area_cooldown() {
        let map = GridMap::from_ascii(&TWO_ROOMS, 1.0).unwrap();
        let world = map.world().resolve().unwrap();
        let mut planner = planner_in(AreaId(1));
        planner.session.area.previous = Some(AreaId(0));
        planner.session.areas.leave(AreaId(0), 0.0, 20.0);

        let own = map.center(8, 2);
        let other = map.center(2, 2);
        let portal = map.center(6, 3);

        assert!(planner.frontier_point_usable(&world, AreaId(1), own, 5.0));
        assert!(!planner.frontier_point_usable(&world, AreaId(1), other, 5.0));
        assert!(!planner.frontier_point_usable(&world, AreaId(1), portal, 5.0));

        // Cooldown over
        assert!(planner.frontier_point_usable(&world, AreaId(1), other, 20.0));
    }
}
