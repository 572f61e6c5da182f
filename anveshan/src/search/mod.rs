//! Area-restricted breadth-first search for the nearest unsearched cell.
//!
//! All buffers are sized once per grid; a search call never allocates.
//! Visited cells are tracked with generation stamps so the stamp array is
//! only cleared when the generation counter wraps.

mod ring_queue;

use crate::core::{AreaId, GridCoord, GridLayout, WorldPoint};
use crate::world::World;

use ring_queue::RingQueue;

/// Smallest queue capacity
const MIN_QUEUE_CAPACITY: usize = 256;

/// Reusable BFS state for one grid.
#[derive(Clone, Debug)]
pub struct LocalFrontierSearch {
    stamps: Vec<u32>,
    generation: u32,
    queue: RingQueue,
    last_expansions: usize,
}

impl Default for LocalFrontierSearch {
    fn default() -> Self {
        Self {
            stamps: Vec::new(),
            generation: 0,
            queue: RingQueue::with_capacity(MIN_QUEUE_CAPACITY),
            last_expansions: 0,
        }
    }
}

impl LocalFrontierSearch {
    /// Search state sized for a grid
    pub fn new(layout: &GridLayout) -> Self {
        let mut search = Self::default();
        search.resize(layout);
        search
    }

    /// Size the buffers for a grid. No-op when already sized.
    pub fn resize(&mut self, layout: &GridLayout) {
        let cells = layout.cell_count();
        if self.stamps.len() == cells {
            return;
        }
        self.stamps = vec![0; cells];
        self.generation = 0;
        self.queue = RingQueue::with_capacity(MIN_QUEUE_CAPACITY.max(cells / 8));
    }

    /// Queue capacity in cells
    pub fn queue_capacity(&self) -> usize {
        self.queue.capacity()
    }

    /// Current visited-stamp generation (never 0 after the first search)
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Dequeues performed by the last call
    pub fn last_expansions(&self) -> usize {
        self.last_expansions
    }

    fn next_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            self.stamps.fill(0);
            self.generation = 1;
        }
    }

    /// Breadth-first search from `start` for the nearest cell of `area`
    /// accepted by `unsearched`.
    ///
    /// Expansion never leaves `area` and portals are never returned. At most
    /// `max_expansions` cells are dequeued; running out of budget, an
    /// unusable start or an exhausted area all yield `None`.
    pub fn find_unsearched<F>(
        &mut self,
        world: &World<'_>,
        area: AreaId,
        start: WorldPoint,
        mut unsearched: F,
        max_expansions: usize,
    ) -> Option<WorldPoint>
    where
        F: FnMut(GridCoord) -> bool,
    {
        self.last_expansions = 0;
        if max_expansions == 0 {
            return None;
        }

        let grid = world.grid;
        let areas = world.areas;
        let layout = grid.layout();
        self.resize(layout);

        let origin = grid.nearest_node(start)?;
        if !grid.is_walkable(origin) || !grid.is_walkable_cached(origin, 0) {
            return None;
        }
        let origin_key = layout.key(origin)?;

        self.next_generation();
        let generation = self.generation;
        self.queue.clear();
        self.stamps[origin_key.index()] = generation;
        self.queue.push(origin);

        let mut neighbors = [GridCoord::default(); 8];
        while self.last_expansions < max_expansions {
            let Some(cell) = self.queue.pop() else {
                break;
            };
            self.last_expansions += 1;

            if !grid.is_walkable(cell) {
                continue;
            }
            if areas.strict_area_at(cell) == Some(area)
                && !areas.is_portal(cell)
                && unsearched(cell)
            {
                return Some(grid.node_position(cell));
            }

            let n = grid.neighbors(cell, &mut neighbors);
            for &next in &neighbors[..n] {
                let Some(key) = layout.key(next) else {
                    continue;
                };
                if self.stamps[key.index()] == generation {
                    continue;
                }
                if areas.strict_area_at(next) != Some(area) {
                    continue;
                }
                self.stamps[key.index()] = generation;
                if !self.queue.push(next) {
                    break;
                }
            }
        }
        None
    }

    #[cfg(test)]
    fn force_generation(&mut self, generation: u32) {
        self.generation = generation;
    }
}
