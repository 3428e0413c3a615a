//! Viewer-wide color options.

use serde::{Deserialize, Serialize};

use crate::color::ColorMode;

/// Default coloring behavior, overridable per object by its scheme.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default,
)]
#[serde(default)]
pub struct ColorOptions {
    /// Global default color mode (level 5 of the resolution chain).
    pub mode: ColorMode,
    /// Use the colorblind-safe chain palette.
    pub colorblind: bool,
}
