//! Output surface options.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// Raster surface size and background.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema,
)]
#[serde(default)]
pub struct DisplayOptions {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Background fill color.
    pub background: Rgb,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
            background: [1.0, 1.0, 1.0],
        }
    }
}
