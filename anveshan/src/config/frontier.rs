//! Frontier seeding configuration section.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Frontier settings section
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FrontierSection {
    /// Number of points generated per reseed
    #[serde(default = "defaults::batch_size")]
    pub batch_size: usize,

    /// Allow portal cells as cross-area targets
    #[serde(default)]
    pub allow_portal_targets: bool,
}

impl Default for FrontierSection {
    fn default() -> Self {
        Self {
            batch_size: defaults::batch_size(),
            allow_portal_targets: false,
        }
    }
}
