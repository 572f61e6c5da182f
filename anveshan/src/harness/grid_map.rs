//! In-memory grid map implementing every collaborator capability.

use std::collections::VecDeque;

use rand::{Rng, RngCore};

use crate::core::{AreaId, GridCoord, GridLayout, WorldPoint};
use crate::error::{Result, SearchError};
use crate::world::{AreaPartition, GridService, OcclusionMask, SearchWorld, Visibility};

use super::raycast::line_is_clear;

/// Classification of one map cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellKind {
    Wall,
    Floor(AreaId),
    /// Walkable transition cell; carries the adjacent area used as soft area
    Portal(Option<AreaId>),
}

/// Grid map with labeled areas and portals.
///
/// Layout characters (row index is `y`, column index is `x`):
///
/// | Char | Cell |
/// |------|------|
/// | `#` | wall |
/// | `0`-`9` | floor in that area |
/// | `+` | portal |
#[derive(Clone, Debug)]
pub struct GridMap {
    layout: GridLayout,
    cells: Vec<CellKind>,
    /// Chebyshev radius of free cells around each cell
    clearance: Vec<u8>,
    area_cells: Vec<Vec<GridCoord>>,
}

impl GridMap {
    /// Parse an ASCII layout.
    pub fn from_ascii(rows: &[&str], cell_size: f32) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        if width == 0 {
            return Err(SearchError::Layout("empty layout".to_string()));
        }
        if cell_size <= 0.0 {
            return Err(SearchError::Layout(format!("cell size {cell_size} must be positive")));
        }

        let mut cells = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(SearchError::Layout(format!(
                    "row {y} has {} cells, expected {width}",
                    row.chars().count()
                )));
            }
            for (x, ch) in row.chars().enumerate() {
                let kind = match ch {
                    '#' => CellKind::Wall,
                    '+' => CellKind::Portal(None),
                    d if d.is_ascii_digit() => CellKind::Floor(AreaId(d as u32 - '0' as u32)),
                    other => {
                        return Err(SearchError::Layout(format!(
                            "unknown cell '{other}' at ({x}, {y})"
                        )))
                    }
                };
                cells.push(kind);
            }
        }

        let layout = GridLayout::new(width, height, cell_size, WorldPoint::ZERO);
        Ok(Self::build(layout, cells))
    }

    /// Open single-area map
    pub fn open(width: usize, height: usize, cell_size: f32) -> Self {
        let layout = GridLayout::new(width, height, cell_size, WorldPoint::ZERO);
        Self::build(layout, vec![CellKind::Floor(AreaId(0)); width * height])
    }

    /// Two areas side by side: area 0 for `x < x_split`, area 1 otherwise
    pub fn split_vertical(width: usize, height: usize, x_split: usize, cell_size: f32) -> Self {
        let layout = GridLayout::new(width, height, cell_size, WorldPoint::ZERO);
        let cells = (0..width * height)
            .map(|i| {
                if i % width < x_split {
                    CellKind::Floor(AreaId(0))
                } else {
                    CellKind::Floor(AreaId(1))
                }
            })
            .collect();
        Self::build(layout, cells)
    }

    fn build(layout: GridLayout, mut cells: Vec<CellKind>) -> Self {
        let width = layout.width;

        // Resolve each portal's soft area from its neighbors
        for i in 0..cells.len() {
            if cells[i] != CellKind::Portal(None) {
                continue;
            }
            let coord = GridCoord::new((i % width) as i32, (i / width) as i32);
            let soft = coord.neighbors_8().into_iter().find_map(|n| {
                layout.key(n).and_then(|k| match cells[k.index()] {
                    CellKind::Floor(area) => Some(area),
                    _ => None,
                })
            });
            cells[i] = CellKind::Portal(soft);
        }

        let area_count = cells
            .iter()
            .filter_map(|c| match c {
                CellKind::Floor(area) => Some(area.index() + 1),
                _ => None,
            })
            .max()
            .unwrap_or(0);
        let mut area_cells = vec![Vec::new(); area_count];
        for (i, cell) in cells.iter().enumerate() {
            if let CellKind::Floor(area) = cell {
                area_cells[area.index()]
                    .push(GridCoord::new((i % width) as i32, (i / width) as i32));
            }
        }

        let clearance = compute_clearance(&layout, &cells);

        Self {
            layout,
            cells,
            clearance,
            area_cells,
        }
    }

    /// Grid geometry
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Cell classification, `None` out of bounds
    pub fn cell(&self, coord: GridCoord) -> Option<CellKind> {
        self.layout.key(coord).map(|k| self.cells[k.index()])
    }

    /// World position of the center of cell `(x, y)`
    pub fn center(&self, x: i32, y: i32) -> WorldPoint {
        self.layout.grid_to_world(GridCoord::new(x, y))
    }

    /// Cells of an area
    pub fn area_cells(&self, area: AreaId) -> &[GridCoord] {
        self.area_cells
            .get(area.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Bundle this map as every collaborator at once
    pub fn world(&self) -> SearchWorld<'_> {
        SearchWorld::new(self, self, self)
    }
}

/// Per-cell free radius: Chebyshev distance to the nearest wall or the
/// outside of the grid, minus one.
fn compute_clearance(layout: &GridLayout, cells: &[CellKind]) -> Vec<u8> {
    let width = layout.width;
    let height = layout.height;
    let mut wall_dist = vec![u32::MAX; cells.len()];
    let mut queue = VecDeque::new();

    for (i, cell) in cells.iter().enumerate() {
        if *cell == CellKind::Wall {
            wall_dist[i] = 0;
            queue.push_back(i);
        }
    }
    while let Some(i) = queue.pop_front() {
        let coord = GridCoord::new((i % width) as i32, (i / width) as i32);
        for n in coord.neighbors_8() {
            if let Some(k) = layout.key(n) {
                if wall_dist[k.index()] == u32::MAX {
                    wall_dist[k.index()] = wall_dist[i] + 1;
                    queue.push_back(k.index());
                }
            }
        }
    }

    wall_dist
        .iter()
        .enumerate()
        .map(|(i, &d)| {
            if d == 0 {
                return 0;
            }
            let x = (i % width) as u32;
            let y = (i / width) as u32;
            let edge = (x + 1)
                .min(y + 1)
                .min(width as u32 - x)
                .min(height as u32 - y);
            (d.min(edge) - 1).min(u8::MAX as u32) as u8
        })
        .collect()
}

impl GridService for GridMap {
    fn layout(&self) -> &GridLayout {
        &self.layout
    }

    fn nearest_node(&self, point: WorldPoint) -> Option<GridCoord> {
        if !point.is_finite() || self.layout.cell_count() == 0 {
            return None;
        }
        let raw = self.layout.world_to_grid(point);
        let start = GridCoord::new(
            raw.x.clamp(0, self.layout.width as i32 - 1),
            raw.y.clamp(0, self.layout.height as i32 - 1),
        );
        if self.is_walkable(start) {
            return Some(start);
        }

        // Scan square rings outward, nearest center wins within a ring
        let max_ring = self.layout.width.max(self.layout.height) as i32;
        for r in 1..=max_ring {
            let mut best: Option<(f32, GridCoord)> = None;
            for dy in -r..=r {
                for dx in -r..=r {
                    if dx.abs() != r && dy.abs() != r {
                        continue;
                    }
                    let c = GridCoord::new(start.x + dx, start.y + dy);
                    if !self.is_walkable(c) {
                        continue;
                    }
                    let d = self.layout.grid_to_world(c).distance_squared(&point);
                    if best.map_or(true, |(bd, _)| d < bd) {
                        best = Some((d, c));
                    }
                }
            }
            if let Some((_, c)) = best {
                return Some(c);
            }
        }
        None
    }

    fn is_walkable(&self, coord: GridCoord) -> bool {
        matches!(self.cell(coord), Some(kind) if kind != CellKind::Wall)
    }

    fn is_walkable_cached(&self, coord: GridCoord, clearance: u8) -> bool {
        match self.layout.key(coord) {
            Some(k) => self.cells[k.index()] != CellKind::Wall && self.clearance[k.index()] >= clearance,
            None => false,
        }
    }
}

impl AreaPartition for GridMap {
    fn layout(&self) -> &GridLayout {
        &self.layout
    }

    fn strict_area(&self, point: WorldPoint) -> Option<AreaId> {
        let key = self.layout.key_at(point)?;
        match self.cells[key.index()] {
            CellKind::Floor(area) => Some(area),
            _ => None,
        }
    }

    fn soft_area(&self, point: WorldPoint) -> Option<AreaId> {
        let key = self.layout.key_at(point)?;
        match self.cells[key.index()] {
            CellKind::Floor(area) => Some(area),
            CellKind::Portal(soft) => soft,
            CellKind::Wall => None,
        }
    }

    fn strict_area_at(&self, coord: GridCoord) -> Option<AreaId> {
        match self.cell(coord)? {
            CellKind::Floor(area) => Some(area),
            _ => None,
        }
    }

    fn is_portal(&self, coord: GridCoord) -> bool {
        matches!(self.cell(coord), Some(CellKind::Portal(_)))
    }

    fn walkable_cells(&self, area: AreaId) -> usize {
        self.area_cells(area).len()
    }

    fn area_count(&self) -> usize {
        self.area_cells.len()
    }

    fn sample_points(
        &self,
        area: AreaId,
        count: usize,
        rng: &mut dyn RngCore,
        out: &mut Vec<WorldPoint>,
    ) {
        let cells = self.area_cells(area);
        if cells.is_empty() {
            return;
        }
        for _ in 0..count {
            let c = cells[rng.random_range(0..cells.len())];
            out.push(self.layout.grid_to_world(c));
        }
    }
}

impl Visibility for GridMap {
    fn line_of_sight(&self, from: WorldPoint, to: WorldPoint, mask: OcclusionMask) -> bool {
        if mask.0 & OcclusionMask::WALLS.0 == 0 {
            return true;
        }
        if !from.is_finite() || !to.is_finite() {
            return false;
        }
        let start = self.layout.world_to_grid(from);
        let end = self.layout.world_to_grid(to);
        line_is_clear(start, end, |c| !self.is_walkable(c))
    }
}
