//! Rotation and projection of position clouds onto the screen plane.

use glam::{Vec2, Vec3};

use crate::scene::ViewTransform;

/// Screen-space margin left around a fitted structure.
const FIT_MARGIN: f32 = 0.9;

/// Smallest distance from the perspective pole; projection stays finite
/// for any depth.
const POLE_EPS: f32 = 1e-3;

/// One projected position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    /// Screen coordinate in pixels, origin top-left, y growing down.
    pub screen: Vec2,
    /// Rotated Z, retained for depth sorting. Larger is nearer.
    pub depth: f32,
    /// The ortho/perspective blend factor applied at this depth.
    pub blend: f32,
}

/// Pure projection of structure space onto a pixel viewport.
///
/// A projector is a value snapshot of one object's transform plus the
/// viewport; identical inputs always produce identical outputs.
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    rotation: glam::Mat3,
    center: Vec3,
    half: Vec2,
    pixel_scale: f32,
    ortho: f32,
    focal: f32,
}

impl Projector {
    /// Snapshot `transform` against a `width`×`height` viewport.
    ///
    /// `ortho_blend` ∈ [0, 1] blends orthographic (1) and perspective
    /// (0) scaling; it only applies while the transform's perspective
    /// toggle is on.
    #[must_use]
    pub fn new(
        transform: &ViewTransform,
        ortho_blend: f32,
        width: u32,
        height: u32,
    ) -> Self {
        let min_side = width.min(height) as f32;
        let pixel_scale = transform.zoom * FIT_MARGIN * 0.5 * min_side
            / transform.extent.max(POLE_EPS);
        let ortho = if transform.perspective {
            ortho_blend.clamp(0.0, 1.0)
        } else {
            1.0
        };
        Self {
            rotation: transform.rotation,
            center: transform.center,
            half: Vec2::new(width as f32 * 0.5, height as f32 * 0.5),
            pixel_scale,
            ortho,
            focal: transform.focal_length.max(POLE_EPS),
        }
    }

    /// Project one structure-space coordinate.
    ///
    /// Rotates about the transform center, blends the perspective factor
    /// `focal / (focal − depth)` with orthographic scaling, and inverts
    /// screen Y (canvas convention).
    #[must_use]
    pub fn project(&self, point: Vec3) -> Projected {
        let rotated = self.rotation * (point - self.center);
        let persp = self.focal / (self.focal - rotated.z).max(POLE_EPS);
        let blend = self.ortho + (1.0 - self.ortho) * persp;
        let scale = self.pixel_scale * blend;
        Projected {
            screen: Vec2::new(
                self.half.x + rotated.x * scale,
                self.half.y - rotated.y * scale,
            ),
            depth: rotated.z,
            blend,
        }
    }

    /// Project a coordinate list, preserving order.
    #[must_use]
    pub fn project_all(&self, coords: &[Vec3]) -> Vec<Projected> {
        coords.iter().map(|&p| self.project(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::ViewTransform;

    fn ortho_transform() -> ViewTransform {
        ViewTransform {
            extent: 10.0,
            ..ViewTransform::default()
        }
    }

    #[test]
    fn ortho_scale_is_depth_independent() {
        let proj = Projector::new(&ortho_transform(), 1.0, 400, 400);
        let near = proj.project(Vec3::new(5.0, 0.0, 8.0));
        let far = proj.project(Vec3::new(5.0, 0.0, -8.0));
        assert_eq!(near.screen.x, far.screen.x);
        assert_eq!(near.blend, 1.0);
        assert!(near.depth > far.depth);
    }

    #[test]
    fn perspective_enlarges_near_points() {
        let transform = ViewTransform {
            perspective: true,
            extent: 10.0,
            ..ViewTransform::default()
        };
        let proj = Projector::new(&transform, 0.0, 400, 400);
        let near = proj.project(Vec3::new(5.0, 0.0, 50.0));
        let far = proj.project(Vec3::new(5.0, 0.0, -50.0));
        assert!(near.screen.x > far.screen.x);
        assert!(near.blend > far.blend);
    }

    #[test]
    fn perspective_toggle_off_forces_ortho() {
        // ortho_blend = 0 would be full perspective, but the toggle wins.
        let proj = Projector::new(&ortho_transform(), 0.0, 400, 400);
        let p = proj.project(Vec3::new(3.0, 0.0, 7.0));
        assert_eq!(p.blend, 1.0);
    }

    #[test]
    fn screen_y_is_inverted() {
        let proj = Projector::new(&ortho_transform(), 1.0, 400, 400);
        let up = proj.project(Vec3::new(0.0, 5.0, 0.0));
        let down = proj.project(Vec3::new(0.0, -5.0, 0.0));
        // +Y in structure space is up on screen, i.e. a smaller row index.
        assert!(up.screen.y < down.screen.y);
        assert_eq!(up.screen.x, 200.0);
    }

    #[test]
    fn projection_is_deterministic() {
        let proj = Projector::new(&ortho_transform(), 1.0, 640, 480);
        let coords: Vec<Vec3> = (0..32)
            .map(|i| {
                let t = i as f32 * 0.37;
                Vec3::new(t.sin() * 9.0, t.cos() * 7.0, t - 5.0)
            })
            .collect();
        assert_eq!(proj.project_all(&coords), proj.project_all(&coords));
    }

    #[test]
    fn projection_survives_extreme_depth() {
        let transform = ViewTransform {
            perspective: true,
            focal_length: 10.0,
            extent: 10.0,
            ..ViewTransform::default()
        };
        let proj = Projector::new(&transform, 0.0, 400, 400);
        // Depth right at / beyond the focal pole must stay finite.
        let at_pole = proj.project(Vec3::new(1.0, 1.0, 10.0));
        let beyond = proj.project(Vec3::new(1.0, 1.0, 50.0));
        assert!(at_pole.screen.x.is_finite());
        assert!(beyond.screen.x.is_finite());
    }
}
