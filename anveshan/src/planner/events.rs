//! Structured planner events and their observers.

use tracing::{debug, info, warn};

use crate::core::{AreaId, WorldPoint};

/// Where a committed target came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickSource {
    /// Local breadth-first search hit
    LocalSearch,
    /// Best scored candidate inside the current area
    ScoredLocal,
    /// Next point of the local frontier
    Frontier,
    /// Next point of the cross-area frontier
    CrossFrontier,
    /// Best scored candidate anywhere outside avoided areas
    GlobalScored,
    /// Random sample from the least covered area
    AreaSample,
    /// Fixed-direction fallback
    Fallback,
}

/// Which sampler refilled the frontier
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedMode {
    Local,
    Across,
}

/// Why a search result was not committed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// Lies in an area on cooldown or recently left
    AvoidedArea,
    /// Closer than the minimum hop with no alternate
    BelowMinHop,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PlannerEvent {
    AreaEntered {
        area: AreaId,
        previous: Option<AreaId>,
        at: f32,
    },
    AreaCompleted {
        area: AreaId,
        coverage: f32,
        at: f32,
    },
    FrontierReseeded {
        mode: SeedMode,
        points: usize,
    },
    PlateauReseed {
        area: AreaId,
        coverage: f32,
    },
    CandidateRejected {
        point: WorldPoint,
        reason: RejectReason,
    },
    TargetCommitted {
        point: WorldPoint,
        source: PickSource,
        degraded: bool,
    },
}

/// Receives planner events as they happen.
pub trait PlannerObserver {
    fn on_event(&mut self, event: &PlannerEvent);
}

/// Emits every event through `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver {
    /// Agent id included in every message
    pub agent_id: u64,
}

impl PlannerObserver for TracingObserver {
    fn on_event(&mut self, event: &PlannerEvent) {
        let agent = self.agent_id;
        match event {
            PlannerEvent::AreaEntered { area, previous, at } => {
                info!(
                    "[Planner:{}] entered {} (from {:?}) at t={:.2}",
                    agent, area, previous, at
                );
            }
            PlannerEvent::AreaCompleted { area, coverage, at } => {
                info!(
                    "[Planner:{}] {} complete, coverage {:.1}% at t={:.2}",
                    agent,
                    area,
                    coverage * 100.0,
                    at
                );
            }
            PlannerEvent::FrontierReseeded { mode, points } => {
                debug!("[Planner:{}] {:?} frontier reseeded with {} points", agent, mode, points);
            }
            PlannerEvent::PlateauReseed { area, coverage } => {
                debug!(
                    "[Planner:{}] coverage of {} stalled at {:.1}%, reseeding",
                    agent,
                    area,
                    coverage * 100.0
                );
            }
            PlannerEvent::CandidateRejected { point, reason } => {
                debug!(
                    "[Planner:{}] rejected ({:.2}, {:.2}): {:?}",
                    agent, point.x, point.y, reason
                );
            }
            PlannerEvent::TargetCommitted {
                point,
                source,
                degraded,
            } => {
                if *degraded {
                    warn!(
                        "[Planner:{}] degraded pick ({:.2}, {:.2}) via {:?}",
                        agent, point.x, point.y, source
                    );
                } else {
                    debug!(
                        "[Planner:{}] target ({:.2}, {:.2}) via {:?}",
                        agent, point.x, point.y, source
                    );
                }
            }
        }
    }
}

/// Drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl PlannerObserver for NullObserver {
    fn on_event(&mut self, _event: &PlannerEvent) {}
}
