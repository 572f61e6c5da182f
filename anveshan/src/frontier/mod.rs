//! Candidate waypoint lists and the samplers that fill them.

mod seeder;

pub use seeder::{FrontierSeeder, SeedParams};

use crate::core::WorldPoint;

/// Ordered waypoint list with a read cursor.
///
/// Filled wholesale by [`FrontierSeeder`] and consumed front to back.
#[derive(Clone, Debug, Default)]
pub struct Frontier {
    points: Vec<WorldPoint>,
    cursor: usize,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all points and rewind. Keeps the allocation.
    pub fn clear(&mut self) {
        self.points.clear();
        self.cursor = 0;
    }

    pub fn push(&mut self, point: WorldPoint) {
        self.points.push(point);
    }

    /// Next unread point
    pub fn pop_next(&mut self) -> Option<WorldPoint> {
        let point = self.points.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(point)
    }

    /// Unread points left
    pub fn remaining(&self) -> usize {
        self.points.len() - self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Unread points, in order
    pub fn pending(&self) -> &[WorldPoint] {
        &self.points[self.cursor..]
    }
}
