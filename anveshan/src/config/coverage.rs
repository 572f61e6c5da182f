//! Coverage and visibility-marking configuration section.

use serde::{Deserialize, Serialize};

use crate::world::OcclusionMask;

use super::defaults;

/// Coverage settings section
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CoverageSection {
    /// Fraction of an area that must be searched before moving on
    #[serde(default = "defaults::coverage_target")]
    pub target: f32,

    /// Extra coverage required on top of the target before leaving
    #[serde(default = "defaults::leave_hysteresis")]
    pub leave_hysteresis: f32,

    /// Radius of the visibility cone marked while moving
    #[serde(default = "defaults::cone_radius")]
    pub cone_radius: f32,

    /// Half angle of the visibility cone (degrees). >= 179.9 marks a full circle.
    #[serde(default = "defaults::cone_half_angle_deg")]
    pub cone_half_angle_deg: f32,

    /// Mark a cone every N ticks (offset by agent phase)
    #[serde(default = "defaults::marking_stride")]
    pub marking_stride: u32,

    /// Gate cone marking and candidates on line of sight
    #[serde(default = "defaults::enabled")]
    pub use_line_of_sight: bool,

    /// Occlusion mask handed to the visibility capability
    #[serde(default = "defaults::occlusion_mask")]
    pub occlusion_mask: u32,
}

impl Default for CoverageSection {
    fn default() -> Self {
        Self {
            target: defaults::coverage_target(),
            leave_hysteresis: defaults::leave_hysteresis(),
            cone_radius: defaults::cone_radius(),
            cone_half_angle_deg: defaults::cone_half_angle_deg(),
            marking_stride: defaults::marking_stride(),
            use_line_of_sight: defaults::enabled(),
            occlusion_mask: defaults::occlusion_mask(),
        }
    }
}

impl CoverageSection {
    /// Target actually used for completion: the configured target capped at 0.98
    pub fn effective_target(&self) -> f32 {
        self.target.min(0.98)
    }

    /// Occlusion mask as the opaque visibility type
    pub fn mask(&self) -> OcclusionMask {
        OcclusionMask(self.occlusion_mask)
    }
}
