//! Per-cell searched state with per-area aggregate counts.
//!
//! A [`CoverageGrid`] is built once per map from the area partition and
//! outlives planner sessions. Every walkable cell with a strict area can be
//! marked searched; walls and portals never count.
//!
//! Per-area searched counts are maintained incrementally and always equal
//! the number of searched cells carrying that area id.

use tracing::warn;

use crate::core::{AreaId, CellKey, GridCoord, GridLayout, WorldPoint};
use crate::world::{AreaPartition, OcclusionMask, Visibility};

/// Half angles at or above this mark a full circle
const FULL_CIRCLE_HALF_ANGLE_DEG: f32 = 179.9;

/// Line-of-sight gate for cone marking
pub type SightTest<'a> = (&'a dyn Visibility, OcclusionMask);

/// Searched-cell tracker for one map.
#[derive(Clone, Debug)]
pub struct CoverageGrid {
    layout: GridLayout,
    /// Strict area of each cell, cached from the partition
    cell_area: Vec<Option<AreaId>>,
    searched: Vec<bool>,
    area_walkable: Vec<usize>,
    area_searched: Vec<usize>,
    searched_total: usize,
    degraded: bool,
}

impl CoverageGrid {
    /// Build from a partition. Without one the grid is degraded: coverage
    /// reads as zero and every mutation is a no-op.
    pub fn new(partition: Option<&dyn AreaPartition>) -> Self {
        let Some(partition) = partition else {
            warn!("[Coverage] no area partition, coverage tracking disabled");
            return Self::degraded();
        };

        let layout = *partition.layout();
        let cell_area: Vec<Option<AreaId>> = (0..layout.cell_count())
            .map(|i| {
                layout
                    .coord(CellKey(i as u32))
                    .and_then(|c| partition.strict_area_at(c))
            })
            .collect();

        let slots = cell_area
            .iter()
            .flatten()
            .map(|a| a.index() + 1)
            .max()
            .unwrap_or(0)
            .max(partition.area_count());
        let area_walkable = (0..slots)
            .map(|i| partition.walkable_cells(AreaId(i as u32)))
            .collect();

        Self {
            layout,
            searched: vec![false; cell_area.len()],
            cell_area,
            area_walkable,
            area_searched: vec![0; slots],
            searched_total: 0,
            degraded: false,
        }
    }

    fn degraded() -> Self {
        Self {
            layout: GridLayout::new(0, 0, 1.0, WorldPoint::ZERO),
            cell_area: Vec::new(),
            searched: Vec::new(),
            area_walkable: Vec::new(),
            area_searched: Vec::new(),
            searched_total: 0,
            degraded: true,
        }
    }

    /// Built without a partition?
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Grid geometry (empty when degraded)
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    // ========================================================================
    // Marking
    // ========================================================================

    /// Mark the cell containing `point`. Returns true only on first mark.
    pub fn mark_point(&mut self, point: WorldPoint) -> bool {
        match self.layout.key_at(point) {
            Some(key) => self.mark_key(key),
            None => false,
        }
    }

    fn mark_key(&mut self, key: CellKey) -> bool {
        let idx = key.index();
        if self.degraded || idx >= self.searched.len() || self.searched[idx] {
            return false;
        }
        let Some(area) = self.cell_area[idx] else {
            return false;
        };
        self.searched[idx] = true;
        self.area_searched[area.index()] += 1;
        self.searched_total += 1;
        true
    }

    /// Mark every area cell inside a view cone.
    ///
    /// Cells are tested by their centers. `heading` need not be normalized;
    /// a zero heading or a half angle of 179.9 degrees or more marks a full
    /// circle. Returns the number of newly marked cells.
    pub fn mark_cone(
        &mut self,
        origin: WorldPoint,
        heading: WorldPoint,
        radius: f32,
        half_angle_deg: f32,
        sight: Option<SightTest<'_>>,
    ) -> usize {
        if self.degraded || radius <= 0.0 || !origin.is_finite() {
            return 0;
        }

        let full_circle =
            half_angle_deg >= FULL_CIRCLE_HALF_ANGLE_DEG || heading.length() < 1e-6;
        let dir = heading.normalize();
        let cos_limit = half_angle_deg.to_radians().cos();
        let radius_sq = radius * radius;

        let lo = self
            .layout
            .world_to_grid(WorldPoint::new(origin.x - radius, origin.y - radius));
        let hi = self
            .layout
            .world_to_grid(WorldPoint::new(origin.x + radius, origin.y + radius));
        let max_x = self.layout.width as i32 - 1;
        let max_y = self.layout.height as i32 - 1;

        let mut marked = 0;
        for y in lo.y.max(0)..=hi.y.min(max_y) {
            for x in lo.x.max(0)..=hi.x.min(max_x) {
                let coord = GridCoord::new(x, y);
                let Some(key) = self.layout.key(coord) else {
                    continue;
                };
                let idx = key.index();
                if self.searched[idx] || self.cell_area[idx].is_none() {
                    continue;
                }

                let center = self.layout.grid_to_world(coord);
                let offset = center - origin;
                if offset.dot(&offset) > radius_sq {
                    continue;
                }
                if !full_circle {
                    let len = offset.length();
                    if len > 1e-6 && offset.dot(&dir) / len < cos_limit {
                        continue;
                    }
                }
                if let Some((vis, mask)) = sight {
                    if !vis.line_of_sight(origin, center, mask) {
                        continue;
                    }
                }

                if self.mark_key(key) {
                    marked += 1;
                }
            }
        }
        marked
    }

    /// Mark peer-shared cells by key. Out-of-range keys are ignored.
    pub fn ingest_keys(&mut self, keys: &[CellKey]) -> usize {
        keys.iter().filter(|&&k| self.mark_key(k)).count()
    }

    /// Mark peer-shared cells by world position.
    pub fn ingest_points(&mut self, points: &[WorldPoint]) -> usize {
        points.iter().filter(|&&p| self.mark_point(p)).count()
    }

    /// Forget everything searched in one area.
    pub fn reset_area(&mut self, area: AreaId) {
        if self.degraded || area.index() >= self.area_searched.len() {
            return;
        }
        for (idx, cell_area) in self.cell_area.iter().enumerate() {
            if *cell_area == Some(area) && self.searched[idx] {
                self.searched[idx] = false;
                self.searched_total -= 1;
            }
        }
        self.area_searched[area.index()] = 0;
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Fraction of an area searched, in [0, 1].
    ///
    /// Areas with no walkable cells (including unknown ids) read as fully
    /// covered; a degraded grid reads zero everywhere.
    pub fn area_coverage(&self, area: AreaId) -> f32 {
        if self.degraded {
            return 0.0;
        }
        let walkable = self.area_walkable(area);
        if walkable == 0 {
            return 1.0;
        }
        (self.area_searched(area) as f32 / walkable as f32).clamp(0.0, 1.0)
    }

    /// Walkable-weighted mean coverage over all areas
    pub fn total_coverage(&self) -> f32 {
        if self.degraded {
            return 0.0;
        }
        let walkable: usize = self.area_walkable.iter().sum();
        if walkable == 0 {
            return 1.0;
        }
        let searched: usize = self
            .area_searched
            .iter()
            .zip(&self.area_walkable)
            .map(|(&s, &w)| s.min(w))
            .sum();
        (searched as f32 / walkable as f32).clamp(0.0, 1.0)
    }

    /// Has this cell been searched?
    pub fn is_searched(&self, coord: GridCoord) -> bool {
        self.layout
            .key(coord)
            .and_then(|k| self.searched.get(k.index()).copied())
            .unwrap_or(false)
    }

    /// Has the cell under `point` been searched?
    pub fn is_searched_at(&self, point: WorldPoint) -> bool {
        self.layout
            .key_at(point)
            .and_then(|k| self.searched.get(k.index()).copied())
            .unwrap_or(false)
    }

    /// Total searched cells
    pub fn searched_cells(&self) -> usize {
        self.searched_total
    }

    /// Searched cells in one area
    pub fn area_searched(&self, area: AreaId) -> usize {
        self.area_searched.get(area.index()).copied().unwrap_or(0)
    }

    /// Walkable cells of one area, as reported by the partition
    pub fn area_walkable(&self, area: AreaId) -> usize {
        self.area_walkable.get(area.index()).copied().unwrap_or(0)
    }

    /// Number of area slots tracked
    pub fn area_count(&self) -> usize {
        self.area_walkable.len()
    }

    /// Up to `budget` searched keys, spread across areas and across each
    /// area's cells, for sharing with peers.
    pub fn export_sample(&self, budget: usize) -> Vec<CellKey> {
        if self.degraded || budget == 0 {
            return Vec::new();
        }
        let contributing = self.area_searched.iter().filter(|&&s| s > 0).count();
        if contributing == 0 {
            return Vec::new();
        }

        let quota = budget.div_ceil(contributing);
        let strides: Vec<usize> = self
            .area_searched
            .iter()
            .map(|&s| (s / quota).max(1))
            .collect();
        let mut seen = vec![0usize; self.area_searched.len()];
        let mut taken = vec![0usize; self.area_searched.len()];

        let mut out = Vec::with_capacity(budget.min(self.searched_total));
        for (idx, &searched) in self.searched.iter().enumerate() {
            if out.len() >= budget {
                break;
            }
            if !searched {
                continue;
            }
            let Some(area) = self.cell_area[idx] else {
                continue;
            };
            let a = area.index();
            let nth = seen[a];
            seen[a] += 1;
            if taken[a] < quota && nth % strides[a] == 0 {
                taken[a] += 1;
                out.push(CellKey(idx as u32));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::GridMap;
    use approx::assert_relative_eq;

    fn open_grid() -> (GridMap, CoverageGrid) {
        let map = GridMap::open(10, 10, 1.0);
        let grid = CoverageGrid::new(Some(&map));
        (map, grid)
    }

    #[test]
    fn test_mark_point_idempotent() {
        let (map, mut grid) = open_grid();
        let p = map.center(3, 4);
        assert!(grid.mark_point(p));
        assert!(!grid.mark_point(p));
        assert_eq!(grid.searched_cells(), 1);
        assert_eq!(grid.area_searched(AreaId(0)), 1);
        assert!(grid.is_searched(GridCoord::new(3, 4)));
    }

    #[test]
    fn test_mark_point_outside_is_noop() {
        let (_map, mut grid) = open_grid();
        assert!(!grid.mark_point(WorldPoint::new(-1.0, 3.0)));
        assert!(!grid.mark_point(WorldPoint::new(f32::NAN, 3.0)));
        assert_eq!(grid.searched_cells(), 0);
    }

    #[test]
    fn test_walls_and_portals_never_marked() {
        let map = GridMap::from_ascii(&["0#+1"], 1.0).unwrap();
        let mut grid = CoverageGrid::new(Some(&map));
        assert!(!grid.mark_point(map.center(1, 0)));
        assert!(!grid.mark_point(map.center(2, 0)));
        assert!(grid.mark_point(map.center(3, 0)));
        assert_eq!(grid.area_searched(AreaId(1)), 1);
    }

    #[test]
    fn test_full_circle_cone() {
        let (_map, mut grid) = open_grid();
        let marked = grid.mark_cone(WorldPoint::ZERO, WorldPoint::UNIT_X, 5.0, 180.0, None);
        assert!(marked > 0);
        assert!(grid.area_coverage(AreaId(0)) > 0.0);
        assert!(grid.is_searched(GridCoord::new(3, 0)));
        assert!(!grid.is_searched(GridCoord::new(9, 9)));
    }

    #[test]
    fn test_narrow_cone_respects_heading() {
        let (map, mut grid) = open_grid();
        let origin = map.center(5, 5);
        grid.mark_cone(origin, WorldPoint::UNIT_X, 4.0, 20.0, None);
        assert!(grid.is_searched(GridCoord::new(8, 5)));
        assert!(!grid.is_searched(GridCoord::new(2, 5)));
        assert!(!grid.is_searched(GridCoord::new(5, 8)));
    }

    #[test]
    fn test_zero_heading_is_full_circle() {
        let (map, mut grid) = open_grid();
        let origin = map.center(5, 5);
        grid.mark_cone(origin, WorldPoint::ZERO, 2.0, 10.0, None);
        assert!(grid.is_searched(GridCoord::new(3, 5)));
        assert!(grid.is_searched(GridCoord::new(7, 5)));
    }

    #[test]
    fn test_cone_blocked_by_walls() {
        let map = GridMap::from_ascii(&["00000", "00#00", "00000"], 1.0).unwrap();
        let mut grid = CoverageGrid::new(Some(&map));
        let origin = map.center(0, 1);
        let sight: SightTest<'_> = (&map, OcclusionMask::WALLS);
        grid.mark_cone(origin, WorldPoint::UNIT_X, 6.0, 180.0, Some(sight));
        assert!(grid.is_searched(GridCoord::new(1, 1)));
        assert!(!grid.is_searched(GridCoord::new(4, 1)));
    }

    #[test]
    fn test_cone_count_matches_new_marks() {
        let (map, mut grid) = open_grid();
        let origin = map.center(5, 5);
        let first = grid.mark_cone(origin, WorldPoint::UNIT_X, 3.0, 180.0, None);
        assert_eq!(first, grid.searched_cells());
        let second = grid.mark_cone(origin, WorldPoint::UNIT_X, 3.0, 180.0, None);
        assert_eq!(second, 0);
    }

    #[test]
    fn test_coverage_non_decreasing() {
        let (map, mut grid) = open_grid();
        let mut last = 0.0;
        for x in 0..10 {
            grid.mark_cone(map.center(x, 5), WorldPoint::UNIT_X, 2.0, 45.0, None);
            let now = grid.area_coverage(AreaId(0));
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn test_total_coverage_weighted() {
        let map = GridMap::split_vertical(10, 2, 2, 1.0);
        let mut grid = CoverageGrid::new(Some(&map));
        // Area 0 has 4 cells, area 1 has 16
        grid.mark_point(map.center(0, 0));
        grid.mark_point(map.center(1, 0));
        for x in 2..6 {
            grid.mark_point(map.center(x, 0));
        }
        assert_relative_eq!(grid.area_coverage(AreaId(0)), 0.5);
        assert_relative_eq!(grid.area_coverage(AreaId(1)), 0.25);
        assert_relative_eq!(grid.total_coverage(), 6.0 / 20.0);
    }

    #[test]
    fn test_unknown_area_reads_complete() {
        let (_map, grid) = open_grid();
        assert_relative_eq!(grid.area_coverage(AreaId(42)), 1.0);
    }

    #[test]
    fn test_degraded_grid() {
        let mut grid = CoverageGrid::new(None);
        assert!(grid.is_degraded());
        assert!(!grid.mark_point(WorldPoint::new(1.0, 1.0)));
        assert_eq!(grid.mark_cone(WorldPoint::ZERO, WorldPoint::UNIT_X, 5.0, 180.0, None), 0);
        assert_eq!(grid.ingest_keys(&[CellKey(0)]), 0);
        assert_relative_eq!(grid.area_coverage(AreaId(0)), 0.0);
        assert_relative_eq!(grid.total_coverage(), 0.0);
        assert!(grid.export_sample(10).is_empty());
    }

    #[test]
    fn test_ingest_keys_and_points() {
        let (map, mut grid) = open_grid();
        let added = grid.ingest_keys(&[CellKey(0), CellKey(1), CellKey(1), CellKey(5000)]);
        assert_eq!(added, 2);
        let added = grid.ingest_points(&[map.center(0, 0), map.center(9, 9)]);
        assert_eq!(added, 1);
        assert_eq!(grid.searched_cells(), 3);
    }

    #[test]
    fn test_export_sample_spreads_across_areas() {
        let map = GridMap::split_vertical(10, 10, 5, 1.0);
        let mut grid = CoverageGrid::new(Some(&map));
        for y in 0..10 {
            for x in 0..10 {
                grid.mark_point(map.center(x, y));
            }
        }
        let sample = grid.export_sample(10);
        assert_eq!(sample.len(), 10);

        let in_left = sample
            .iter()
            .filter(|k| (k.index() % 10) < 5)
            .count();
        assert_eq!(in_left, 5);

        // Stride keeps the sample from bunching in the first rows
        let max_row = sample.iter().map(|k| k.index() / 10).max().unwrap();
        assert!(max_row >= 5);
    }

    #[test]
    fn test_export_sample_edge_cases() {
        let (map, mut grid) = open_grid();
        assert!(grid.export_sample(5).is_empty());
        grid.mark_point(map.center(1, 1));
        assert!(grid.export_sample(0).is_empty());
        assert_eq!(grid.export_sample(5), vec![CellKey(11)]);
    }

    #[test]
    fn test_reset_area() {
        let map = GridMap::split_vertical(4, 1, 2, 1.0);
        let mut grid = CoverageGrid::new(Some(&map));
        grid.ingest_keys(&[CellKey(0), CellKey(1), CellKey(2)]);
        grid.reset_area(AreaId(0));
        assert_eq!(grid.area_searched(AreaId(0)), 0);
        assert_eq!(grid.area_searched(AreaId(1)), 1);
        assert_eq!(grid.searched_cells(), 1);
        assert!(!grid.is_searched(GridCoord::new(0, 0)));
    }
}
