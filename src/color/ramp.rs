//! Value → RGB color ramps.
//!
//! Two built-in ramps drive the mode-based coloring:
//! - **Confidence**: the AlphaFold pLDDT band colors (orange → yellow →
//!   cyan → blue), sampled continuously.
//! - **Rainbow**: N-terminus blue through C-terminus red.

use super::Rgb;

/// A color ramp defined by N evenly-spaced color stops.
/// `t = 0` maps to the first color, `t = 1` to the last.
pub struct ColorRamp {
    stops: Vec<Rgb>,
}

impl ColorRamp {
    /// Build a ramp from explicit stops. Fewer than two stops degenerate
    /// to a constant ramp.
    #[must_use]
    pub fn new(stops: Vec<Rgb>) -> Self {
        Self { stops }
    }

    /// Interpolate the ramp at position `t` in [0, 1].
    #[must_use]
    pub fn sample(&self, t: f32) -> Rgb {
        match self.stops.len() {
            0 => super::DEFAULT_COLOR,
            1 => self.stops[0],
            n => {
                let t = t.clamp(0.0, 1.0);
                let scaled = t * (n - 1) as f32;
                let idx = (scaled as usize).min(n - 2);
                let frac = scaled - idx as f32;

                let a = self.stops[idx];
                let b = self.stops[idx + 1];
                [
                    a[0] + (b[0] - a[0]) * frac,
                    a[1] + (b[1] - a[1]) * frac,
                    a[2] + (b[2] - a[2]) * frac,
                ]
            }
        }
    }

    /// Low-confidence orange → yellow → cyan → high-confidence blue.
    #[must_use]
    pub fn confidence() -> Self {
        Self::new(vec![
            [1.0, 0.49, 0.27],   // very low (< 50)
            [1.0, 0.86, 0.32],   // low
            [0.40, 0.80, 0.95],  // confident
            [0.00, 0.33, 0.84],  // very high (> 90)
        ])
    }

    /// N-to-C rainbow: blue → cyan → green → yellow → red.
    #[must_use]
    pub fn rainbow() -> Self {
        Self::new(vec![
            [0.15, 0.25, 0.90],
            [0.15, 0.75, 0.90],
            [0.20, 0.80, 0.30],
            [0.95, 0.85, 0.15],
            [0.90, 0.15, 0.10],
        ])
    }
}

/// Map a per-position confidence score to a color. Scores on the 0-100
/// pLDDT scale and the 0-1 fractional scale are both accepted; values at
/// or below 1.0 are treated as fractions.
#[must_use]
pub fn confidence_color(score: f32) -> Rgb {
    let t = if score <= 1.0 { score } else { score / 100.0 };
    ColorRamp::confidence().sample(t.clamp(0.0, 1.0))
}

/// Position-in-sequence rainbow color. `index` out of `count` positions;
/// a single-position frame takes the ramp start.
#[must_use]
pub fn rainbow_color(index: usize, count: usize) -> Rgb {
    let t = if count > 1 {
        index as f32 / (count - 1) as f32
    } else {
        0.0
    };
    ColorRamp::rainbow().sample(t)
}
