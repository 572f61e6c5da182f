//! Fixed-size history of recently committed targets.

use crate::core::WorldPoint;

/// Number of recent targets remembered per session
pub const RECENT_TARGETS: usize = 8;

/// Circular buffer of target points; the oldest is overwritten when full.
#[derive(Clone, Debug)]
pub struct RecencyRing<const N: usize> {
    buffer: [WorldPoint; N],
    head: usize,
    len: usize,
}

impl<const N: usize> Default for RecencyRing<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RecencyRing<N> {
    pub fn new() -> Self {
        Self {
            buffer: [WorldPoint::ZERO; N],
            head: 0,
            len: 0,
        }
    }

    pub fn push(&mut self, point: WorldPoint) {
        if N == 0 {
            return;
        }
        self.buffer[self.head] = point;
        self.head = (self.head + 1) % N;
        if self.len < N {
            self.len += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    /// Most recent point
    pub fn last(&self) -> Option<WorldPoint> {
        if self.len == 0 {
            return None;
        }
        Some(self.buffer[(self.head + N - 1) % N])
    }

    /// Points from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = WorldPoint> + '_ {
        let start = if self.len < N { 0 } else { self.head };
        (0..self.len).map(move |i| self.buffer[(start + i) % N])
    }

    /// Distance to the closest remembered point
    pub fn nearest_distance(&self, point: WorldPoint) -> Option<f32> {
        self.iter()
            .map(|p| p.distance(&point))
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }

    /// Sum of `1 - d / radius` over remembered points closer than `radius`.
    pub fn proximity(&self, point: WorldPoint, radius: f32) -> f32 {
        if radius <= 0.0 {
            return 0.0;
        }
        self.iter()
            .map(|p| p.distance(&point))
            .filter(|&d| d < radius)
            .map(|d| 1.0 - d / radius)
            .sum()
    }
}
