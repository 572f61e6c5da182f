//! Shared fixtures for Anveshan integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anveshan::harness::GridMap;
use anveshan::planner::{AgentState, PlannerEvent, PlannerObserver};
use anveshan::{SearchConfig, WorldPoint};

/// Three rooms in a row joined by portals at y = 3.
pub const THREE_ROOMS: [&str; 7] = [
    "##########################",
    "#0000000#11111111#2222222#",
    "#0000000#11111111#2222222#",
    "#0000000+11111111+2222222#",
    "#0000000#11111111#2222222#",
    "#0000000#11111111#2222222#",
    "##########################",
];

pub fn three_rooms() -> GridMap {
    GridMap::from_ascii(&THREE_ROOMS, 1.0).unwrap()
}

/// Config with no reaction delay and minimal dwell, marking every tick.
pub fn fast_config() -> SearchConfig {
    SearchConfig::default()
        .with_think_delay(0.0)
        .with_dwell(0.0, 1)
        .with_marking_stride(1)
        .with_pick_interval(2.0)
}

/// Move the agent up to `step` toward its target, ignoring walls.
pub fn step_toward(agent: &mut AgentState, step: f32) {
    if let Some(target) = agent.move_target {
        let d = agent.position.distance(&target);
        if d <= step {
            agent.position = target;
        } else {
            let angle = agent.position.angle_to(&target);
            agent.position = agent.position.point_at(angle, step);
        }
    }
}

/// Observer that keeps every event for later inspection.
#[derive(Clone, Default)]
pub struct Recorder {
    pub events: Arc<Mutex<Vec<PlannerEvent>>>,
}

impl Recorder {
    pub fn snapshot(&self) -> Vec<PlannerEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl PlannerObserver for Recorder {
    fn on_event(&mut self, event: &PlannerEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// Install a test subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

pub fn approx_eq(a: WorldPoint, b: WorldPoint) -> bool {
    a.distance(&b) < 1e-4
}
