//! Per-cell occlusion darkening.
//!
//! A shadow grid over the culling partition records, per cell and per
//! source frame, the maximum (nearest) depth among contributing
//! segments. Segments lagging their cell's maximum by more than an
//! epsilon draw darkened. Cells are keyed by source frame so merged
//! frames never shadow each other.

use rustc_hash::FxHashMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::segment::Segment;

/// Shadow parameters.
#[derive(
    Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema,
)]
#[serde(default)]
pub struct ShadowParams {
    /// Master toggle.
    pub enabled: bool,
    /// Darkening strength in [0, 1]; the shaded multiplier is
    /// `1 − strength`.
    pub strength: f32,
    /// Depth slack before a segment counts as occluded, in structure
    /// units.
    pub epsilon: f32,
    /// Screen-partition resolution, cells per axis.
    pub grid: u32,
}

impl Default for ShadowParams {
    fn default() -> Self {
        Self {
            enabled: true,
            strength: 0.5,
            epsilon: 1.5,
            grid: 24,
        }
    }
}

/// Compute the per-segment shade multiplier (1.0 = unshaded).
///
/// The grid is rebuilt from scratch on every call; there is no
/// incremental reuse across passes.
#[must_use]
pub fn shade_factors(
    segments: &[Segment],
    width: u32,
    height: u32,
    params: ShadowParams,
) -> Vec<f32> {
    if !params.enabled || params.strength <= 0.0 {
        return vec![1.0; segments.len()];
    }

    let grid = params.grid.max(1);
    let cell = |segment: &Segment| -> (usize, u32, u32) {
        let mid = segment.midpoint();
        let cx = (mid.x / width.max(1) as f32 * grid as f32) as i64;
        let cy = (mid.y / height.max(1) as f32 * grid as f32) as i64;
        (
            segment.source,
            cx.clamp(0, i64::from(grid) - 1) as u32,
            cy.clamp(0, i64::from(grid) - 1) as u32,
        )
    };

    let mut max_depth: FxHashMap<(usize, u32, u32), f32> =
        FxHashMap::default();
    for segment in segments {
        let key = cell(segment);
        let entry = max_depth.entry(key).or_insert(f32::NEG_INFINITY);
        *entry = entry.max(segment.depth);
    }

    segments
        .iter()
        .map(|segment| {
            let nearest = max_depth[&cell(segment)];
            if nearest - segment.depth > params.epsilon {
                1.0 - params.strength.clamp(0.0, 1.0)
            } else {
                1.0
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::segment::SegmentKind;
    use glam::Vec2;

    fn seg(depth: f32, x: f32, source: usize) -> Segment {
        Segment {
            a: 0,
            b: 1,
            p0: Vec2::new(x - 1.0, 100.0),
            p1: Vec2::new(x + 1.0, 100.0),
            depth,
            blend: 1.0,
            color: [0.5, 0.5, 0.5],
            visible: true,
            source,
            width_scale: 1.0,
            kind: SegmentKind::Bond,
        }
    }

    #[test]
    fn occluded_segment_is_darkened() {
        let params = ShadowParams::default();
        let segments =
            vec![seg(-10.0, 50.0, 0), seg(10.0, 50.0, 0)];
        let factors = shade_factors(&segments, 400, 400, params);
        assert_eq!(factors[0], 0.5);
        assert_eq!(factors[1], 1.0);
    }

    #[test]
    fn within_epsilon_stays_lit() {
        let params = ShadowParams {
            epsilon: 5.0,
            ..ShadowParams::default()
        };
        let segments = vec![seg(0.0, 50.0, 0), seg(4.0, 50.0, 0)];
        let factors = shade_factors(&segments, 400, 400, params);
        assert_eq!(factors, vec![1.0, 1.0]);
    }

    #[test]
    fn different_cells_do_not_shadow() {
        let params = ShadowParams::default();
        let segments = vec![seg(-10.0, 20.0, 0), seg(10.0, 380.0, 0)];
        let factors = shade_factors(&segments, 400, 400, params);
        assert_eq!(factors, vec![1.0, 1.0]);
    }

    #[test]
    fn sources_are_isolated() {
        // Same cell, deep depth gap, but different source frames: no
        // cross-frame shadowing.
        let params = ShadowParams::default();
        let segments = vec![seg(-10.0, 50.0, 0), seg(10.0, 50.0, 1)];
        let factors = shade_factors(&segments, 400, 400, params);
        assert_eq!(factors, vec![1.0, 1.0]);
    }

    #[test]
    fn disabled_shadow_is_all_ones() {
        let params = ShadowParams {
            enabled: false,
            ..ShadowParams::default()
        };
        let segments = vec![seg(-10.0, 50.0, 0), seg(10.0, 50.0, 0)];
        assert_eq!(
            shade_factors(&segments, 400, 400, params),
            vec![1.0, 1.0]
        );
    }

    #[test]
    fn strength_controls_the_multiplier() {
        let params = ShadowParams {
            strength: 0.2,
            ..ShadowParams::default()
        };
        let segments = vec![seg(-10.0, 50.0, 0), seg(10.0, 50.0, 0)];
        let factors = shade_factors(&segments, 400, 400, params);
        assert!((factors[0] - 0.8).abs() < 1e-6);
    }
}
