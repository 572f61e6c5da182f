//! Fixed-capacity FIFO over a power-of-two buffer.

use crate::core::GridCoord;

/// Bounded queue; pushes past capacity are rejected, never reallocated.
#[derive(Clone, Debug)]
pub(crate) struct RingQueue {
    buf: Vec<GridCoord>,
    mask: usize,
    head: usize,
    len: usize,
}

impl RingQueue {
    /// Queue holding at least `min_capacity` items (rounded to a power of two)
    pub fn with_capacity(min_capacity: usize) -> Self {
        let capacity = min_capacity.max(1).next_power_of_two();
        Self {
            buf: vec![GridCoord::default(); capacity],
            mask: capacity - 1,
            head: 0,
            len: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    /// Append; false when full
    #[inline]
    pub fn push(&mut self, coord: GridCoord) -> bool {
        if self.len == self.buf.len() {
            return false;
        }
        let tail = (self.head + self.len) & self.mask;
        self.buf[tail] = coord;
        self.len += 1;
        true
    }

    #[inline]
    pub fn pop(&mut self) -> Option<GridCoord> {
        if self.len == 0 {
            return None;
        }
        let coord = self.buf[self.head];
        self.head = (self.head + 1) & self.mask;
        self.len -= 1;
        Some(coord)
    }
}
