//! Configuration loading for the search planner.
//!
//! All settings live in one TOML file; every field has a default so a
//! partial file (or none at all) is valid.
//!
//! ```rust,ignore
//! use anveshan::config::SearchConfig;
//!
//! // configs/search.toml when present, otherwise defaults
//! let config = SearchConfig::load_default()?;
//!
//! // Or tune in code
//! let config = SearchConfig::default()
//!     .with_min_hop(3.0)
//!     .with_cone(5.0, 75.0);
//! ```
//!
//! ## Configuration Sections
//!
//! | Section | Description |
//! |---------|-------------|
//! | [`CoverageSection`] | Completion target, cone marking, line of sight |
//! | [`FrontierSection`] | Seeding batch size, portal targets |
//! | [`PlannerSection`] | Timing, minimum hop, radius adaptation, cooldowns |
//! | [`ScoringSection`] | Candidate count, time budget, score weights |
//!
//! ## Example TOML
//!
//! ```toml
//! [coverage]
//! target = 0.85            # fraction of an area to search
//! cone_radius = 6.0
//! cone_half_angle_deg = 60.0
//!
//! [planner]
//! min_hop_distance = 2.5
//! base_search_radius = 8.0
//! max_search_radius = 16.0
//! ```

mod coverage;
mod defaults;
mod frontier;
mod planner;
mod scoring;
mod search;

pub use search::{SearchConfig, DEFAULT_CONFIG_PATH};

pub use coverage::CoverageSection;
pub use frontier::FrontierSection;
pub use planner::PlannerSection;
pub use scoring::ScoringSection;
