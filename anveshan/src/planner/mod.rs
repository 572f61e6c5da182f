//! Per-agent exploration planning.
//!
//! [`ExplorationPlanner`] is driven by the host once per tick. It owns the
//! per-agent [`PlannerSession`] and borrows the shared
//! [`CoverageGrid`](crate::coverage::CoverageGrid) and collaborators for the
//! duration of a tick only.
//!
//! ```rust,ignore
//! let mut planner = ExplorationPlanner::new(config, agent_id);
//! planner.initialize(&world)?;
//!
//! loop {
//!     let report = planner.tick(&world, &mut coverage, &mut agent, now);
//!     if let Some(pick) = report.pick {
//!         // agent.move_target now holds pick.point
//!     }
//! }
//! ```

mod avoidance;
mod events;
mod explorer;
mod recency;
mod scoring;
mod session;

pub use avoidance::{AreaMemory, RECENT_AREAS};
pub use events::{
    NullObserver, PickSource, PlannerEvent, PlannerObserver, RejectReason, SeedMode,
    TracingObserver,
};
pub use explorer::{AgentState, ExplorationPlanner, Pick, Readiness, TickReport};
pub use recency::{RecencyRing, RECENT_TARGETS};
pub use scoring::{AreaFilter, CandidateQuery, CandidateScorer, ScoredCandidate};
pub use session::{AreaContext, DecisionPhase, PlannerSession};
