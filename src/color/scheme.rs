//! Per-object color schemes and the override resolution chain.
//!
//! A [`ColorScheme`] carries the host-set overrides for one object. Each
//! rendered position resolves its color through five levels, first match
//! wins: position override > chain override > frame override > object
//! color > global default mode.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::{
    confidence_color, parse_color, rainbow_color, Rgb, CHAIN_PALETTE,
    CHAIN_PALETTE_COLORBLIND, DEFAULT_COLOR,
};
use crate::scene::Frame;

/// Mode-based coloring rules.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Single chain → rainbow; multiple chains → per-chain palette.
    #[default]
    Auto,
    /// Cycle the chain palette by chain index.
    Chain,
    /// Per-position confidence ramp.
    Confidence,
    /// N-to-C rainbow over the frame.
    Rainbow,
}

/// One color directive: either a mode or a literal RGB.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    /// Evaluate a coloring mode per position.
    Mode(ColorMode),
    /// A fixed color.
    Literal(Rgb),
}

impl ColorSpec {
    /// Parse host input: a mode name, a `#rrggbb` hex, or a named color.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(Self::Mode(ColorMode::Auto)),
            "chain" => Some(Self::Mode(ColorMode::Chain)),
            "confidence" | "plddt" => Some(Self::Mode(ColorMode::Confidence)),
            "rainbow" => Some(Self::Mode(ColorMode::Rainbow)),
            _ => parse_color(text).map(Self::Literal),
        }
    }
}

/// Host-set color overrides for one object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorScheme {
    /// Object-level directive (level 4).
    pub object: Option<ColorSpec>,
    /// Per-chain overrides keyed by chain id (level 2).
    pub chains: FxHashMap<String, ColorSpec>,
    /// Per-position overrides keyed by position index (level 1).
    pub positions: FxHashMap<usize, ColorSpec>,
    /// Per-frame overrides keyed by frame index (level 3).
    pub frames: FxHashMap<usize, ColorSpec>,
}

impl ColorScheme {
    /// Whether no override is set at any level.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.object.is_none()
            && self.chains.is_empty()
            && self.positions.is_empty()
            && self.frames.is_empty()
    }
}

/// Resolve the color of every position in `frame`.
///
/// `default_mode` is the viewer-wide mode (level 5); `colorblind` swaps
/// the chain palette for the colorblind-safe set.
#[must_use]
pub fn resolve_frame_colors(
    frame: &Frame,
    frame_idx: usize,
    scheme: &ColorScheme,
    default_mode: ColorMode,
    colorblind: bool,
) -> Vec<Rgb> {
    let chain_order = frame.chain_ids();
    let count = frame.len();

    let eval_mode = |mode: ColorMode, index: usize| -> Rgb {
        let position = &frame.positions()[index];
        let effective = if mode == ColorMode::Auto {
            if chain_order.len() > 1 {
                ColorMode::Chain
            } else {
                ColorMode::Rainbow
            }
        } else {
            mode
        };
        match effective {
            ColorMode::Chain => {
                let palette = if colorblind {
                    CHAIN_PALETTE_COLORBLIND
                } else {
                    CHAIN_PALETTE
                };
                let chain_idx = chain_order
                    .iter()
                    .position(|c| *c == position.chain)
                    .unwrap_or(0);
                palette[chain_idx % palette.len()]
            }
            ColorMode::Confidence => confidence_color(position.confidence),
            ColorMode::Rainbow => rainbow_color(index, count),
            ColorMode::Auto => DEFAULT_COLOR,
        }
    };

    (0..count)
        .map(|i| {
            let spec = scheme
                .positions
                .get(&i)
                .or_else(|| scheme.chains.get(&frame.positions()[i].chain))
                .or_else(|| scheme.frames.get(&frame_idx))
                .or(scheme.object.as_ref())
                .copied()
                .unwrap_or(ColorSpec::Mode(default_mode));
            match spec {
                ColorSpec::Literal(c) => c,
                ColorSpec::Mode(m) => eval_mode(m, i),
            }
        })
        .collect()
}
