//! # Anveshan: Area-Coverage Search Planner
//!
//! Drives an agent that searches a grid map for something it cannot see
//! yet. The map is split into contiguous walkable areas joined by portal
//! cells; the planner sweeps one area until it is covered well enough,
//! then moves on to areas it has not searched.
//!
//! ## Features
//!
//! - **Coverage tracking**: per-cell searched state with per-area counts and
//!   cone-shaped visibility marking
//! - **Allocation-free local search**: area-restricted breadth-first search
//!   with generation stamps and a fixed ring queue
//! - **Frontier seeding**: angular/radial sampling for in-area sweeps and
//!   portal crossings
//! - **Tick-driven planner**: completion detection, a target priority chain,
//!   budgeted candidate scoring and area cooldowns
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use anveshan::config::SearchConfig;
//! use anveshan::coverage::CoverageGrid;
//! use anveshan::harness::GridMap;
//! use anveshan::planner::{AgentState, ExplorationPlanner};
//!
//! let map = GridMap::from_ascii(&["0000+1111", "0000#1111"], 1.0).unwrap();
//! let world = map.world();
//!
//! let mut coverage = CoverageGrid::new(world.areas);
//! let mut planner = ExplorationPlanner::new(SearchConfig::default(), 7);
//! planner.initialize(&world).unwrap();
//!
//! let mut agent = AgentState::at(map.center(1, 0));
//! let report = planner.tick(&world, &mut coverage, &mut agent, 0.0);
//! println!("area {:?} at {:.0}%", report.area, report.area_coverage * 100.0);
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: points, cell keys, area ids, grid layout, angle math
//! - [`world`]: collaborator traits (grid, partition, visibility)
//! - [`coverage`]: [`CoverageGrid`](coverage::CoverageGrid)
//! - [`search`]: [`LocalFrontierSearch`](search::LocalFrontierSearch)
//! - [`frontier`]: [`Frontier`](frontier::Frontier) and its seeder
//! - [`planner`]: [`ExplorationPlanner`](planner::ExplorationPlanner)
//! - [`config`]: TOML configuration
//! - [`harness`]: in-memory reference collaborators
//!
//! ## Data Flow
//!
//! ```text
//!   host tick ──► ExplorationPlanner ──► agent.move_target
//!                   │      │      │
//!         mark_cone │      │      │ seed_around / seed_across
//!                   ▼      │      ▼
//!           CoverageGrid   │   FrontierSeeder ──► Frontier
//!                   ▲      │
//!       is_searched │      ▼
//!                LocalFrontierSearch
//! ```

pub mod config;
pub mod core;
pub mod coverage;
pub mod error;
pub mod frontier;
pub mod harness;
pub mod planner;
pub mod search;
pub mod world;

pub use config::SearchConfig;
pub use core::{AreaId, CellKey, GridCoord, GridLayout, WorldPoint};
pub use coverage::CoverageGrid;
pub use error::{Result, SearchError};
pub use frontier::{Frontier, FrontierSeeder, SeedParams};
pub use planner::{AgentState, ExplorationPlanner, PlannerEvent, PlannerObserver, TickReport};
pub use search::LocalFrontierSearch;
pub use world::{AreaPartition, GridService, OcclusionMask, SearchWorld, Visibility, World};
