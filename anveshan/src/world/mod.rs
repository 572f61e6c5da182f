//! Collaborator capabilities consumed by the search components.
//!
//! The planner never builds walkability, partitions or raycasts itself.
//! Hosts hand in whatever they have through [`SearchWorld`]; missing pieces
//! degrade the planner instead of failing a tick.

use rand::RngCore;

use crate::core::{AreaId, GridCoord, GridLayout, WorldPoint};
use crate::error::{Result, SearchError};

/// Opaque occlusion mask threaded from configuration to [`Visibility`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OcclusionMask(pub u32);

impl OcclusionMask {
    /// Static geometry only
    pub const WALLS: OcclusionMask = OcclusionMask(1);
}

/// Walkability grid and node graph.
pub trait GridService {
    /// Geometry of the grid
    fn layout(&self) -> &GridLayout;

    /// Nearest walkable node to a world point
    fn nearest_node(&self, point: WorldPoint) -> Option<GridCoord>;

    /// World position of a node
    fn node_position(&self, coord: GridCoord) -> WorldPoint {
        self.layout().grid_to_world(coord)
    }

    /// Is the cell walkable?
    fn is_walkable(&self, coord: GridCoord) -> bool;

    /// Walkability with a clearance radius in cells, from a precomputed cache.
    fn is_walkable_cached(&self, coord: GridCoord, clearance: u8) -> bool;

    /// Write the in-bounds neighbors of a cell into `out`, returning how many.
    fn neighbors(&self, coord: GridCoord, out: &mut [GridCoord; 8]) -> usize {
        let layout = self.layout();
        let mut n = 0;
        for neighbor in coord.neighbors_8() {
            if layout.contains(neighbor) {
                out[n] = neighbor;
                n += 1;
            }
        }
        n
    }
}

/// Area partition with portal detection already applied.
pub trait AreaPartition {
    /// Geometry of the partition grid (same as the walkability grid)
    fn layout(&self) -> &GridLayout;

    /// Area owning the cell under `point`; `None` on walls and portals
    fn strict_area(&self, point: WorldPoint) -> Option<AreaId>;

    /// Like `strict_area` but resolves portals to an adjacent area
    fn soft_area(&self, point: WorldPoint) -> Option<AreaId>;

    /// Area owning a cell; `None` on walls, portals and out of bounds
    fn strict_area_at(&self, coord: GridCoord) -> Option<AreaId>;

    /// Is the cell a portal between areas?
    fn is_portal(&self, coord: GridCoord) -> bool;

    /// Number of walkable cells in an area (0 for unknown ids)
    fn walkable_cells(&self, area: AreaId) -> usize;

    /// Number of areas; ids are `0..area_count`
    fn area_count(&self) -> usize;

    /// Append up to `count` random walkable points of `area` to `out`.
    fn sample_points(
        &self,
        area: AreaId,
        count: usize,
        rng: &mut dyn RngCore,
        out: &mut Vec<WorldPoint>,
    );
}

/// Line-of-sight capability.
pub trait Visibility {
    /// Is the segment `from -> to` free of occluders selected by `mask`?
    fn line_of_sight(&self, from: WorldPoint, to: WorldPoint, mask: OcclusionMask) -> bool;
}

/// Optional collaborator references passed into every planner call.
#[derive(Clone, Copy, Default)]
pub struct SearchWorld<'a> {
    pub grid: Option<&'a dyn GridService>,
    pub areas: Option<&'a dyn AreaPartition>,
    pub visibility: Option<&'a dyn Visibility>,
}

impl<'a> SearchWorld<'a> {
    /// World with every capability present
    pub fn new(
        grid: &'a dyn GridService,
        areas: &'a dyn AreaPartition,
        visibility: &'a dyn Visibility,
    ) -> Self {
        Self {
            grid: Some(grid),
            areas: Some(areas),
            visibility: Some(visibility),
        }
    }

    /// Builder-style setter dropping line of sight
    pub fn without_visibility(mut self) -> Self {
        self.visibility = None;
        self
    }

    /// Resolve into a [`World`] if grid and partition are both present.
    pub fn resolve(&self) -> Result<World<'a>> {
        let grid = self.grid.ok_or(SearchError::MissingGrid)?;
        let areas = self.areas.ok_or(SearchError::MissingPartition)?;
        Ok(World {
            grid,
            areas,
            visibility: self.visibility,
        })
    }
}

/// Resolved collaborators. Visibility stays optional: without it every
/// line-of-sight test passes.
#[derive(Clone, Copy)]
pub struct World<'a> {
    pub grid: &'a dyn GridService,
    pub areas: &'a dyn AreaPartition,
    pub visibility: Option<&'a dyn Visibility>,
}

impl<'a> World<'a> {
    /// Line-of-sight test; true when no visibility capability is present
    pub fn line_of_sight(&self, from: WorldPoint, to: WorldPoint, mask: OcclusionMask) -> bool {
        match self.visibility {
            Some(v) => v.line_of_sight(from, to, mask),
            None => true,
        }
    }

    /// Strict area falling back to the soft area
    pub fn area_of(&self, point: WorldPoint) -> Option<AreaId> {
        self.areas
            .strict_area(point)
            .or_else(|| self.areas.soft_area(point))
    }

    /// Is the cell under `point` a portal?
    pub fn is_portal_at(&self, point: WorldPoint) -> bool {
        let coord = self.grid.layout().world_to_grid(point);
        self.areas.is_portal(coord)
    }

    /// Is the cell under `point` walkable?
    pub fn is_walkable_at(&self, point: WorldPoint) -> bool {
        if !point.is_finite() {
            return false;
        }
        let coord = self.grid.layout().world_to_grid(point);
        self.grid.is_walkable(coord)
    }
}
