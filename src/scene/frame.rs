//! Frames and positions: immutable per-timepoint structure data.
//!
//! A [`Frame`] owns an ordered list of [`Position`]s plus an optional
//! pairwise confidence matrix ([`Pae`]). Frames are built once from a
//! [`FrameData`] input record and never mutated afterwards; a changed
//! frame is a new frame.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Structural class of one drawable position.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
pub enum PositionKind {
    /// Protein residue (CA proxy).
    #[default]
    #[serde(rename = "P")]
    Protein,
    /// DNA backbone position.
    #[serde(rename = "D")]
    Dna,
    /// RNA backbone position.
    #[serde(rename = "R")]
    Rna,
    /// Ligand atom.
    #[serde(rename = "L")]
    Ligand,
}

impl PositionKind {
    /// DNA or RNA.
    #[must_use]
    pub fn is_nucleic(self) -> bool {
        matches!(self, Self::Dna | Self::Rna)
    }
}

/// One drawable structural unit (atom/residue proxy). Immutable;
/// exclusively owned by its frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// 3D coordinate in structure space.
    pub coord: Vec3,
    /// Per-position confidence score (pLDDT-style, 0-100 or 0-1).
    pub confidence: f32,
    /// Chain identifier.
    pub chain: String,
    /// Structural class.
    pub kind: PositionKind,
    /// Sequence index (residue number).
    pub seq_index: i32,
    /// Residue/atom name.
    pub name: String,
}

/// Pairwise predicted-aligned-error matrix in the scaled wire form:
/// values are `error · 8`, clamped to `0..=255`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pae {
    dim: usize,
    values: Vec<u8>,
}

impl Pae {
    /// Build from the scaled wire values. Returns `None` when `values`
    /// is not `dim × dim`.
    #[must_use]
    pub fn from_wire(dim: usize, values: Vec<u8>) -> Option<Self> {
        if values.len() == dim * dim {
            Some(Self { dim, values })
        } else {
            None
        }
    }

    /// Build from a square matrix of error values (Ångström-scale floats).
    /// Returns `None` when rows are not square.
    #[must_use]
    pub fn from_matrix(rows: &[Vec<f32>]) -> Option<Self> {
        let dim = rows.len();
        let mut values = Vec::with_capacity(dim * dim);
        for row in rows {
            if row.len() != dim {
                return None;
            }
            for &v in row {
                values.push((v * 8.0).round().clamp(0.0, 255.0) as u8);
            }
        }
        Some(Self { dim, values })
    }

    /// Matrix dimension L (the matrix is L×L).
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Error value at (i, j), unscaled back to float. Out-of-range
    /// indices read as 0.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        if i < self.dim && j < self.dim {
            f32::from(self.values[i * self.dim + j]) / 8.0
        } else {
            0.0
        }
    }
}

/// Input contract for one frame. Optional arrays that disagree with
/// `coords` in length are dropped with a warning and defaults
/// substituted — a malformed frame is never fatal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameData {
    /// Position coordinates; the only mandatory array.
    pub coords: Vec<Vec3>,
    /// Per-position confidence scores.
    pub confidences: Option<Vec<f32>>,
    /// Per-position chain ids.
    pub chains: Option<Vec<String>>,
    /// Per-position structural classes.
    pub position_types: Option<Vec<PositionKind>>,
    /// Per-position residue/atom names.
    pub position_names: Option<Vec<String>>,
    /// Per-position residue sequence numbers.
    pub residue_numbers: Option<Vec<i32>>,
    /// Pairwise confidence matrix.
    pub pae: Option<Pae>,
}

/// Ordered positions for one timepoint, plus an optional pairwise
/// confidence matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    positions: Vec<Position>,
    pae: Option<Pae>,
}

/// Default chain id substituted for malformed input.
const DEFAULT_CHAIN: &str = "A";
/// Default residue name substituted for malformed input.
const DEFAULT_NAME: &str = "UNK";

impl Frame {
    /// Build a frame from already-validated positions.
    #[must_use]
    pub fn new(positions: Vec<Position>, pae: Option<Pae>) -> Self {
        Self { positions, pae }
    }

    /// Build a frame from an input record, applying the defaulting rules:
    /// any optional array whose length disagrees with `coords` is dropped
    /// (with a `log::warn!`) and per-position defaults substituted.
    #[must_use]
    pub fn from_data(data: FrameData) -> Self {
        let n = data.coords.len();

        let keep = |label: &str, ok: bool| -> bool {
            if !ok {
                log::warn!(
                    "frame field '{label}' length mismatch; substituting defaults"
                );
            }
            ok
        };

        let confidences = data
            .confidences
            .filter(|v| keep("confidences", v.len() == n));
        let chains = data.chains.filter(|v| keep("chains", v.len() == n));
        let kinds = data
            .position_types
            .filter(|v| keep("position_types", v.len() == n));
        let names = data
            .position_names
            .filter(|v| keep("position_names", v.len() == n));
        let numbers = data
            .residue_numbers
            .filter(|v| keep("residue_numbers", v.len() == n));

        let positions = data
            .coords
            .iter()
            .enumerate()
            .map(|(i, &coord)| Position {
                coord,
                confidence: confidences.as_ref().map_or(1.0, |v| v[i]),
                chain: chains
                    .as_ref()
                    .map_or_else(|| DEFAULT_CHAIN.to_owned(), |v| v[i].clone()),
                kind: kinds.as_ref().map_or(PositionKind::Protein, |v| v[i]),
                seq_index: numbers.as_ref().map_or(i as i32, |v| v[i]),
                name: names
                    .as_ref()
                    .map_or_else(|| DEFAULT_NAME.to_owned(), |v| v[i].clone()),
            })
            .collect();

        Self {
            positions,
            pae: data.pae,
        }
    }

    /// Number of positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the frame holds no positions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// All positions, in order.
    #[must_use]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// The pairwise confidence matrix, if present.
    #[must_use]
    pub fn pae(&self) -> Option<&Pae> {
        self.pae.as_ref()
    }

    /// Whether a pairwise confidence matrix is present.
    #[must_use]
    pub fn has_pae(&self) -> bool {
        self.pae.is_some()
    }

    /// Coordinates of all positions, in order.
    #[must_use]
    pub fn coords(&self) -> Vec<Vec3> {
        self.positions.iter().map(|p| p.coord).collect()
    }

    /// Distinct chain ids in first-appearance order.
    #[must_use]
    pub fn chain_ids(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for p in &self.positions {
            if !out.contains(&p.chain) {
                out.push(p.chain.clone());
            }
        }
        out
    }

    /// Indices of all positions belonging to `chain`.
    #[must_use]
    pub fn chain_positions(&self, chain: &str) -> Vec<usize> {
        self.positions
            .iter()
            .enumerate()
            .filter(|(_, p)| p.chain == chain)
            .map(|(i, _)| i)
            .collect()
    }
}
