//! Area exit cooldowns and the recently-visited area queue.

use std::collections::{HashMap, VecDeque};

use crate::core::AreaId;

/// Number of recently left areas that stay avoided
pub const RECENT_AREAS: usize = 3;

/// Which areas the planner should not return to yet.
#[derive(Clone, Debug, Default)]
pub struct AreaMemory {
    /// Area -> time its cooldown ends
    cooldown_until: HashMap<AreaId, f32>,
    recent: VecDeque<AreaId>,
}

impl AreaMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record leaving `area`: start its cooldown and queue it as recent.
    pub fn leave(&mut self, area: AreaId, now: f32, cooldown_secs: f32) {
        self.cooldown_until.insert(area, now + cooldown_secs);

        self.recent.retain(|&a| a != area);
        self.recent.push_back(area);
        while self.recent.len() > RECENT_AREAS {
            self.recent.pop_front();
        }
    }

    pub fn is_on_cooldown(&self, area: AreaId, now: f32) -> bool {
        self.cooldown_until
            .get(&area)
            .is_some_and(|&until| now < until)
    }

    pub fn is_recent(&self, area: AreaId) -> bool {
        self.recent.contains(&area)
    }

    /// Avoided while on cooldown or in the recent queue
    pub fn is_avoided(&self, area: AreaId, now: f32) -> bool {
        self.is_on_cooldown(area, now) || self.is_recent(area)
    }

    /// Recently left areas, oldest first
    pub fn recent(&self) -> impl Iterator<Item = AreaId> + '_ {
        self.recent.iter().copied()
    }

    /// Drop expired cooldowns
    pub fn prune(&mut self, now: f32) {
        self.cooldown_until.retain(|_, until| now < *until);
    }

    pub fn clear(&mut self) {
        self.cooldown_until.clear();
        self.recent.clear();
    }
}
