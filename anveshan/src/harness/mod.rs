//! Reference collaborators for tests, demos and simple hosts.
//!
//! [`GridMap`] reads walls, areas and portals straight from an ASCII layout
//! and implements [`GridService`](crate::world::GridService),
//! [`AreaPartition`](crate::world::AreaPartition) and
//! [`Visibility`](crate::world::Visibility).

mod grid_map;
pub mod raycast;

pub use grid_map::{CellKind, GridMap};
