//! CPU raster target with antialiased thick-line stroking.
//!
//! The only output surface of the crate: an RGBA8 pixel buffer plus the
//! stroking primitive the compositor draws sticks with. Coverage is
//! computed from the distance to the stroked segment, giving a one-pixel
//! antialiased edge without any window-system dependency.

use glam::Vec2;

use crate::color::Rgb;

/// Stroke end-cap style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    /// Stroke stops flush at the endpoints.
    Butt,
    /// Semicircular cap extending half the stroke width.
    Round,
}

/// An owned RGBA8 pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Raster {
    /// Allocate a surface filled with opaque white.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![255; (width * height * 4) as usize],
        }
    }

    /// Surface width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Surface height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 pixel data, row-major.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.pixels
    }

    /// Fill the whole surface with an opaque color.
    pub fn fill(&mut self, color: Rgb) {
        let rgba = to_rgba(color);
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Read one pixel. Out-of-bounds reads return transparent black.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0; 4];
        }
        let i = ((y * self.width + x) * 4) as usize;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Stroke a thick antialiased line from `p0` to `p1`.
    pub fn stroke_line(
        &mut self,
        p0: Vec2,
        p1: Vec2,
        width: f32,
        color: Rgb,
        cap: LineCap,
    ) {
        if width <= 0.0 || self.width == 0 || self.height == 0 {
            return;
        }
        let half = width * 0.5;
        let pad = half + 1.0;

        let min_x = (p0.x.min(p1.x) - pad).floor().max(0.0) as u32;
        let max_x = (p0.x.max(p1.x) + pad)
            .ceil()
            .min(self.width as f32 - 1.0) as u32;
        let min_y = (p0.y.min(p1.y) - pad).floor().max(0.0) as u32;
        let max_y = (p0.y.max(p1.y) + pad)
            .ceil()
            .min(self.height as f32 - 1.0) as u32;
        if min_x > max_x || min_y > max_y {
            return;
        }

        let dir = p1 - p0;
        let len_sq = dir.length_squared();
        let rgba = to_rgba(color);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let t = if len_sq > 0.0 {
                    (p - p0).dot(dir) / len_sq
                } else {
                    0.0
                };

                let dist = match cap {
                    LineCap::Round => {
                        let clamped = t.clamp(0.0, 1.0);
                        (p - (p0 + dir * clamped)).length()
                    }
                    LineCap::Butt => {
                        if !(0.0..=1.0).contains(&t) {
                            continue;
                        }
                        (p - (p0 + dir * t)).length()
                    }
                };

                // One-pixel feathered edge.
                let coverage = (half + 0.5 - dist).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend_pixel(x, y, rgba, coverage);
                }
            }
        }
    }

    /// Source-over blend of one pixel with fractional coverage.
    fn blend_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4], coverage: f32) {
        let i = ((y * self.width + x) * 4) as usize;
        for c in 0..3 {
            let dst = f32::from(self.pixels[i + c]);
            let src = f32::from(rgba[c]);
            self.pixels[i + c] =
                (src * coverage + dst * (1.0 - coverage)).round() as u8;
        }
        self.pixels[i + 3] = 255;
    }
}

fn to_rgba(color: Rgb) -> [u8; 4] {
    [
        (color[0].clamp(0.0, 1.0) * 255.0).round() as u8,
        (color[1].clamp(0.0, 1.0) * 255.0).round() as u8,
        (color[2].clamp(0.0, 1.0) * 255.0).round() as u8,
        255,
    ]
}
