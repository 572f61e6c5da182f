//! Single-agent sweep over a three-room map.
//!
//! The agent moves a fixed step toward its target every tick (walls are
//! ignored for movement) and the per-area coverage is printed as it goes.
//!
//! Usage:
//!   cargo run --example sweep_demo
//!   RUST_LOG=anveshan=debug cargo run --example sweep_demo -- --ticks 3000

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use anveshan::coverage::CoverageGrid;
use anveshan::harness::GridMap;
use anveshan::planner::{AgentState, ExplorationPlanner};
use anveshan::world::AreaPartition;
use anveshan::{AreaId, SearchConfig};

const ROOMS: [&str; 11] = [
    "##############################",
    "#000000000#1111111111#2222222#",
    "#000000000#1111111111#2222222#",
    "#000000000#1111111111#2222222#",
    "#000000000+1111111111#2222222#",
    "#000000000#1111111111+2222222#",
    "#000000000#1111111111#2222222#",
    "#000000000#1111111111#2222222#",
    "#000000000#1111111111#2222222#",
    "#000000000#1111111111#2222222#",
    "##############################",
];

/// Sweep demo
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path (defaults when absent)
    #[arg(short, long, default_value = "configs/search.toml")]
    config: String,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 2000)]
    ticks: u32,

    /// Seconds per tick
    #[arg(long, default_value_t = 0.1)]
    dt: f32,

    /// Distance moved per tick
    #[arg(long, default_value_t = 0.4)]
    step: f32,

    /// Agent id (seeds the planner's random streams)
    #[arg(long, default_value_t = 1)]
    agent: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("anveshan=info".parse()?)
                .add_directive("sweep_demo=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let path = std::path::Path::new(&args.config);
    let config = if path.exists() {
        SearchConfig::load(path)?
    } else {
        SearchConfig::default()
    };

    let map = GridMap::from_ascii(&ROOMS, 1.0)?;
    let world = map.world();
    let mut coverage = CoverageGrid::new(world.areas);
    let mut planner = ExplorationPlanner::new(config, args.agent);
    planner.initialize(&world)?;

    let mut agent = AgentState::at(map.center(2, 2));
    let mut last_area = None;

    for i in 0..args.ticks {
        let now = i as f32 * args.dt;
        let report = planner.tick(&world, &mut coverage, &mut agent, now);

        if report.area != last_area || i % 100 == 0 {
            last_area = report.area;
            let per_area: Vec<String> = (0..map.area_count())
                .map(|a| format!("{:5.1}%", coverage.area_coverage(AreaId(a as u32)) * 100.0))
                .collect();
            info!(
                "t={:6.1} pos=({:5.1}, {:5.1}) area={:?} coverage [{}] total {:.1}%",
                now,
                agent.position.x,
                agent.position.y,
                report.area,
                per_area.join(" "),
                coverage.total_coverage() * 100.0
            );
        }

        if coverage.total_coverage() >= 0.99 {
            info!("Map covered after {:.1}s", now);
            break;
        }

        if let Some(target) = agent.move_target {
            let d = agent.position.distance(&target);
            agent.position = if d <= args.step {
                target
            } else {
                agent
                    .position
                    .point_at(agent.position.angle_to(&target), args.step)
            };
        }
    }

    info!(
        "Final coverage {:.1}% ({} cells searched)",
        coverage.total_coverage() * 100.0,
        coverage.searched_cells()
    );
    Ok(())
}
