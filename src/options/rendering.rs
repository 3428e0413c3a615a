//! Stroke, projection-blend, shadow, and culling options.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::render::{CullParams, ShadowParams};

/// Outline drawing mode for the two-pass stroke.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum OutlineMode {
    /// No outline pass.
    None,
    /// Outline with flush (butt) caps.
    Partial,
    /// Outline with round caps.
    #[default]
    Full,
}

/// Rendering pipeline options.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema,
)]
#[serde(default)]
pub struct RenderingOptions {
    /// Base stroke width in pixels.
    pub width: f32,
    /// Outline mode.
    pub outline: OutlineMode,
    /// Orthographic/perspective blend in [0, 1]; 1 = pure ortho.
    /// Applies only while an object's perspective toggle is on.
    pub ortho: f32,
    /// Channel multiplier for segments outside the visible selection.
    pub dim_factor: f32,
    /// Occlusion shading parameters.
    pub shadow: ShadowParams,
    /// Density culling parameters.
    pub cull: CullParams,
}

impl Default for RenderingOptions {
    fn default() -> Self {
        Self {
            width: 3.0,
            outline: OutlineMode::default(),
            ortho: 1.0,
            dim_factor: 0.3,
            shadow: ShadowParams::default(),
            cull: CullParams::default(),
        }
    }
}
