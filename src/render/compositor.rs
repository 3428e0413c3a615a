//! Final draw passes: outline and fill strokes onto the raster.

use super::raster::{LineCap, Raster};
use super::segment::Segment;
use crate::color::scale_rgb;
use crate::options::{OutlineMode, RenderingOptions};

/// Extra stroke width of the outline pass, in pixels.
const OUTLINE_EXTRA: f32 = 2.0;

/// Channel multiplier of the outline color relative to the fill.
const OUTLINE_DARKEN: f32 = 0.25;

/// Draw segments in the order given (callers pass a depth-sorted,
/// culled list).
///
/// Non-visible segments draw dimmed rather than hidden, preserving
/// spatial context around a selection. With outlining enabled each
/// segment gets two passes: a wider, darker stroke first — round-capped
/// in `Full` mode, flush in `Partial` — then the true color and width.
pub fn composite(
    raster: &mut Raster,
    segments: &[Segment],
    shades: &[f32],
    options: &RenderingOptions,
) {
    for (segment, &shade) in segments.iter().zip(shades.iter()) {
        let mut color = scale_rgb(segment.color, shade);
        if !segment.visible {
            color = scale_rgb(color, options.dim_factor);
        }
        let width = options.width * segment.width_scale * segment.blend;

        if options.outline != OutlineMode::None {
            let cap = if options.outline == OutlineMode::Full {
                LineCap::Round
            } else {
                LineCap::Butt
            };
            raster.stroke_line(
                segment.p0,
                segment.p1,
                width + OUTLINE_EXTRA,
                scale_rgb(color, OUTLINE_DARKEN),
                cap,
            );
        }

        raster.stroke_line(
            segment.p0,
            segment.p1,
            width,
            color,
            LineCap::Round,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::segment::SegmentKind;
    use glam::Vec2;

    fn seg(visible: bool) -> Segment {
        Segment {
            a: 0,
            b: 1,
            p0: Vec2::new(5.0, 20.0),
            p1: Vec2::new(35.0, 20.0),
            depth: 0.0,
            blend: 1.0,
            color: [1.0, 0.0, 0.0],
            visible,
            source: 0,
            width_scale: 1.0,
            kind: SegmentKind::Bond,
        }
    }

    fn options(outline: OutlineMode) -> RenderingOptions {
        RenderingOptions {
            outline,
            ..RenderingOptions::default()
        }
    }

    #[test]
    fn hidden_segments_draw_dimmed_not_absent() {
        let draw = |visible: bool| -> [u8; 4] {
            let mut raster = Raster::new(40, 40);
            composite(
                &mut raster,
                &[seg(visible)],
                &[1.0],
                &options(OutlineMode::None),
            );
            raster.pixel(20, 20)
        };
        let lit = draw(true);
        let dim = draw(false);
        // Still drawn, but at a fraction of the intensity.
        assert_ne!(dim, [255, 255, 255, 255]);
        assert!(dim[0] < lit[0]);
    }

    #[test]
    fn shade_factor_darkens_fill() {
        let mut raster = Raster::new(40, 40);
        composite(
            &mut raster,
            &[seg(true)],
            &[0.5],
            &options(OutlineMode::None),
        );
        let px = raster.pixel(20, 20);
        assert!(px[0] < 200 && px[0] > 50);
    }

    #[test]
    fn full_outline_rings_the_fill() {
        let mut raster = Raster::new(40, 40);
        composite(
            &mut raster,
            &[seg(true)],
            &[1.0],
            &options(OutlineMode::Full),
        );
        // Centerline keeps the fill color; just outside the fill radius
        // the darker outline shows.
        let center = raster.pixel(20, 20);
        let edge = raster.pixel(20, 22);
        assert!(center[0] > 200);
        assert!(edge[0] < center[0]);
    }

    #[test]
    fn later_segments_overdraw_earlier_ones() {
        let mut near = seg(true);
        near.color = [0.0, 0.0, 1.0];
        let far = seg(true);

        let mut raster = Raster::new(40, 40);
        composite(
            &mut raster,
            &[far, near],
            &[1.0, 1.0],
            &options(OutlineMode::None),
        );
        let px = raster.pixel(20, 20);
        // The blue (drawn last = nearer) wins the center pixel.
        assert!(px[2] > px[0]);
    }
}
