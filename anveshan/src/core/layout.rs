//! Fixed grid geometry: dimensions, cell size and world origin.

use serde::{Deserialize, Serialize};

use super::point::{CellKey, GridCoord, WorldPoint};

/// Geometry of a fixed-size grid.
///
/// Cell `(x, y)` covers the square starting at
/// `origin + (x, y) * cell_size`; its center is the canonical world
/// position of the cell.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    /// Width in cells
    pub width: usize,
    /// Height in cells
    pub height: usize,
    /// Edge length of one cell in world units
    pub cell_size: f32,
    /// World position of the grid's minimum corner
    pub origin: WorldPoint,
}

impl GridLayout {
    /// Create a new layout
    pub fn new(width: usize, height: usize, cell_size: f32, origin: WorldPoint) -> Self {
        Self {
            width,
            height,
            cell_size,
            origin,
        }
    }

    /// Total number of cells
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Is the coordinate inside the grid?
    #[inline]
    pub fn contains(&self, coord: GridCoord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && (coord.x as usize) < self.width
            && (coord.y as usize) < self.height
    }

    /// Convert world coordinates to grid coordinates (may be out of bounds).
    #[inline]
    pub fn world_to_grid(&self, point: WorldPoint) -> GridCoord {
        let x = ((point.x - self.origin.x) / self.cell_size).floor() as i32;
        let y = ((point.y - self.origin.y) / self.cell_size).floor() as i32;
        GridCoord::new(x, y)
    }

    /// Convert grid coordinates to world coordinates (cell center).
    #[inline]
    pub fn grid_to_world(&self, coord: GridCoord) -> WorldPoint {
        WorldPoint::new(
            self.origin.x + (coord.x as f32 + 0.5) * self.cell_size,
            self.origin.y + (coord.y as f32 + 0.5) * self.cell_size,
        )
    }

    /// Flat key of an in-bounds coordinate
    #[inline]
    pub fn key(&self, coord: GridCoord) -> Option<CellKey> {
        if self.contains(coord) {
            Some(CellKey((coord.y as usize * self.width + coord.x as usize) as u32))
        } else {
            None
        }
    }

    /// Flat key of the cell containing a world point
    #[inline]
    pub fn key_at(&self, point: WorldPoint) -> Option<CellKey> {
        if !point.is_finite() {
            return None;
        }
        self.key(self.world_to_grid(point))
    }

    /// Coordinate of a key, if the key is in range
    #[inline]
    pub fn coord(&self, key: CellKey) -> Option<GridCoord> {
        if self.width == 0 || key.index() >= self.cell_count() {
            return None;
        }
        let idx = key.index();
        Some(GridCoord::new(
            (idx % self.width) as i32,
            (idx / self.width) as i32,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_world_grid_roundtrip() {
        let layout = GridLayout::new(10, 8, 0.5, WorldPoint::new(-1.0, -1.0));
        let coord = GridCoord::new(3, 2);
        let center = layout.grid_to_world(coord);
        assert_relative_eq!(center.x, 0.75);
        assert_relative_eq!(center.y, 0.25);
        assert_eq!(layout.world_to_grid(center), coord);
    }

    #[test]
    fn test_key_mapping() {
        let layout = GridLayout::new(10, 10, 1.0, WorldPoint::ZERO);
        assert_eq!(layout.key(GridCoord::new(3, 2)), Some(CellKey(23)));
        assert_eq!(layout.coord(CellKey(23)), Some(GridCoord::new(3, 2)));
        assert_eq!(layout.key(GridCoord::new(10, 0)), None);
        assert_eq!(layout.key(GridCoord::new(-1, 0)), None);
        assert_eq!(layout.coord(CellKey(100)), None);
    }

    #[test]
    fn test_key_at_rejects_nan() {
        let layout = GridLayout::new(4, 4, 1.0, WorldPoint::ZERO);
        assert_eq!(layout.key_at(WorldPoint::new(f32::NAN, 1.0)), None);
        assert_eq!(layout.key_at(WorldPoint::new(1.5, 1.5)), Some(CellKey(5)));
    }
}
