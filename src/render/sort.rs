//! Painter's-algorithm depth ordering and per-cell culling.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::segment::Segment;

/// Culling parameters. Culling engages only above `threshold` positions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema,
)]
#[serde(default)]
pub struct CullParams {
    /// Position count above which culling engages.
    pub threshold: usize,
    /// Screen-partition resolution, cells per axis.
    pub grid: u32,
    /// Segments retained per cell (the nearest K).
    pub keep_per_cell: usize,
}

impl Default for CullParams {
    fn default() -> Self {
        Self {
            threshold: 2000,
            grid: 24,
            keep_per_cell: 12,
        }
    }
}

/// Sort segments ascending by depth: farthest first, so nearer segments
/// overdraw (painter's algorithm). The sort is stable, leaving equal
/// depths in original build order — the tie-break key is the original
/// segment index.
pub fn sort_by_depth(segments: &mut [Segment]) {
    segments.sort_by(|a, b| a.depth.total_cmp(&b.depth));
}

/// Cell index of a screen point on a `grid`×`grid` partition of the
/// viewport.
fn cell_of(
    x: f32,
    y: f32,
    width: u32,
    height: u32,
    grid: u32,
) -> (u32, u32) {
    let gx = (x / width.max(1) as f32 * grid as f32) as i64;
    let gy = (y / height.max(1) as f32 * grid as f32) as i64;
    (
        gx.clamp(0, i64::from(grid) - 1) as u32,
        gy.clamp(0, i64::from(grid) - 1) as u32,
    )
}

/// Drop low-priority segments per screen cell.
///
/// Expects `segments` sorted ascending by depth. Below the position
/// threshold everything is retained; above it, each cell of a uniform
/// screen grid keeps only its `keep_per_cell` nearest segments. The
/// retained set is reproducible: fixed camera and K always select the
/// same segments, walking from nearest to farthest.
#[must_use]
pub fn cull_segments(
    segments: Vec<Segment>,
    position_count: usize,
    width: u32,
    height: u32,
    params: CullParams,
) -> Vec<Segment> {
    if position_count <= params.threshold {
        return segments;
    }

    let grid = params.grid.max(1);
    let mut counts = vec![0usize; (grid * grid) as usize];
    let mut retained = vec![false; segments.len()];

    // Walk nearest-to-farthest so each cell's budget goes to the
    // segments the painter draws last.
    for (idx, segment) in segments.iter().enumerate().rev() {
        let mid = segment.midpoint();
        let (cx, cy) = cell_of(mid.x, mid.y, width, height, grid);
        let cell = (cy * grid + cx) as usize;
        if counts[cell] < params.keep_per_cell {
            counts[cell] += 1;
            retained[idx] = true;
        }
    }

    segments
        .into_iter()
        .zip(retained)
        .filter_map(|(segment, keep)| keep.then_some(segment))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::segment::SegmentKind;
    use glam::Vec2;

    fn seg_at(depth: f32, x: f32, y: f32) -> Segment {
        Segment {
            a: 0,
            b: 1,
            p0: Vec2::new(x - 1.0, y),
            p1: Vec2::new(x + 1.0, y),
            depth,
            blend: 1.0,
            color: [0.5, 0.5, 0.5],
            visible: true,
            source: 0,
            width_scale: 1.0,
            kind: SegmentKind::Bond,
        }
    }

    #[test]
    fn sorts_far_to_near_with_stable_ties() {
        let mut segments = vec![
            seg_at(3.0, 0.0, 0.0),
            seg_at(-1.0, 10.0, 0.0),
            seg_at(3.0, 20.0, 0.0),
        ];
        sort_by_depth(&mut segments);
        assert_eq!(segments[0].depth, -1.0);
        // Equal depths keep their original relative order.
        assert_eq!(segments[1].p0.x, -1.0);
        assert_eq!(segments[2].p0.x, 19.0);
    }

    #[test]
    fn below_threshold_nothing_is_culled() {
        let segments: Vec<Segment> =
            (0..10).map(|i| seg_at(i as f32, 50.0, 50.0)).collect();
        let out = cull_segments(
            segments.clone(),
            100,
            400,
            400,
            CullParams::default(),
        );
        assert_eq!(out.len(), segments.len());
    }

    #[test]
    fn crowded_cell_keeps_only_nearest_k() {
        let params = CullParams {
            threshold: 0,
            grid: 4,
            keep_per_cell: 3,
        };
        // 10 segments stacked in one cell, depths 0..10 already sorted.
        let segments: Vec<Segment> =
            (0..10).map(|i| seg_at(i as f32, 50.0, 50.0)).collect();
        let out =
            cull_segments(segments, 1, 400, 400, params);
        assert_eq!(out.len(), 3);
        // The nearest three survive, still in far-to-near order.
        let depths: Vec<f32> = out.iter().map(|s| s.depth).collect();
        assert_eq!(depths, vec![7.0, 8.0, 9.0]);
    }

    #[test]
    fn cells_are_independent() {
        let params = CullParams {
            threshold: 0,
            grid: 4,
            keep_per_cell: 1,
        };
        let mut segments = vec![
            seg_at(0.0, 50.0, 50.0),
            seg_at(1.0, 50.0, 50.0),
            seg_at(0.0, 350.0, 350.0),
        ];
        sort_by_depth(&mut segments);
        let out = cull_segments(segments, 1, 400, 400, params);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn culling_is_deterministic() {
        let params = CullParams {
            threshold: 0,
            grid: 8,
            keep_per_cell: 2,
        };
        let build = || -> Vec<Segment> {
            let mut segments: Vec<Segment> = (0..50)
                .map(|i| {
                    let t = i as f32;
                    seg_at(
                        (t * 0.7).sin() * 10.0,
                        (t * 13.0) % 400.0,
                        (t * 29.0) % 400.0,
                    )
                })
                .collect();
            sort_by_depth(&mut segments);
            cull_segments(segments, 1, 400, 400, params)
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn offscreen_midpoints_clamp_into_edge_cells() {
        let params = CullParams {
            threshold: 0,
            grid: 4,
            keep_per_cell: 8,
        };
        let segments = vec![seg_at(0.0, -50.0, 900.0)];
        let out = cull_segments(segments, 1, 400, 400, params);
        assert_eq!(out.len(), 1);
    }
}
