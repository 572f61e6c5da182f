//! Grid line walking for line-of-sight queries.

use crate::core::GridCoord;

/// Cells crossed by the segment between two grid cells, endpoints included.
///
/// Integer Bresenham stepping along the major axis.
pub struct GridLine {
    major: i32,
    minor: i32,
    d_major: i32,
    d_minor: i32,
    major_step: i32,
    minor_step: i32,
    error: i32,
    steep: bool,
    end_major: i32,
    done: bool,
}

impl GridLine {
    pub fn new(start: GridCoord, end: GridCoord) -> Self {
        let dx = (end.x - start.x).abs();
        let dy = (end.y - start.y).abs();
        let steep = dy > dx;

        let (major, minor, end_major, end_minor, d_major, d_minor) = if steep {
            (start.y, start.x, end.y, end.x, dy, dx)
        } else {
            (start.x, start.y, end.x, end.y, dx, dy)
        };

        Self {
            major,
            minor,
            d_major,
            d_minor,
            major_step: if end_major >= major { 1 } else { -1 },
            minor_step: if end_minor >= minor { 1 } else { -1 },
            error: d_major / 2,
            steep,
            end_major,
            done: false,
        }
    }
}

impl Iterator for GridLine {
    type Item = GridCoord;

    fn next(&mut self) -> Option<GridCoord> {
        if self.done {
            return None;
        }

        let cell = if self.steep {
            GridCoord::new(self.minor, self.major)
        } else {
            GridCoord::new(self.major, self.minor)
        };

        if self.major == self.end_major {
            self.done = true;
            return Some(cell);
        }

        self.error -= self.d_minor;
        if self.error < 0 {
            self.minor += self.minor_step;
            self.error += self.d_major;
        }
        self.major += self.major_step;

        Some(cell)
    }
}

/// True when no cell on the line between `start` and `end` is blocked.
pub fn line_is_clear<F>(start: GridCoord, end: GridCoord, mut blocked: F) -> bool
where
    F: FnMut(GridCoord) -> bool,
{
    GridLine::new(start, end).all(|cell| !blocked(cell))
}
