//! Core types shared by every search component.
//!
//! - [`GridCoord`] and [`WorldPoint`]: cell indices and world positions
//! - [`CellKey`]: canonical flat cell identity (`y * width + x`)
//! - [`AreaId`]: identifier of a contiguous walkable area
//! - [`GridLayout`]: world <-> cell mapping for a fixed-size grid
//! - [`math`]: angle helpers and easing curves

mod layout;
pub mod math;
mod point;

pub use layout::GridLayout;
pub use point::{AreaId, CellKey, GridCoord, WorldPoint};
