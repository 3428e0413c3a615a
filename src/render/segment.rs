//! Drawable segment construction from bonds, contacts, and inferred
//! neighbor edges.

use std::collections::BTreeSet;

use glam::Vec2;
use rustc_hash::FxHashMap;

use super::projection::Projected;
use crate::color::Rgb;
use crate::scene::{Bond, Contact, Frame, PositionKind};

/// Max inferred bond distance between consecutive protein positions.
pub const PROTEIN_BOND_DIST: f32 = 5.0;
/// Max inferred bond distance between consecutive nucleic positions.
pub const NUCLEIC_BOND_DIST: f32 = 7.5;
/// Max inferred bond distance between ligand positions.
pub const LIGAND_BOND_DIST: f32 = 2.0;

/// What produced a segment; contacts keep their own width and color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Covalent/backbone stick.
    Bond,
    /// Weighted contact edge.
    Contact,
}

/// One drawable stick, rebuilt every render pass and owned by it.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// First endpoint position index.
    pub a: usize,
    /// Second endpoint position index.
    pub b: usize,
    /// Screen position of endpoint `a`.
    pub p0: Vec2,
    /// Screen position of endpoint `b`.
    pub p1: Vec2,
    /// Average endpoint rotated Z. Larger is nearer.
    pub depth: f32,
    /// Average ortho/perspective blend factor, scales stroke width.
    pub blend: f32,
    /// Resolved color.
    pub color: Rgb,
    /// Whether both endpoints are in the visible selection.
    pub visible: bool,
    /// Source frame id, isolating shadows between merged frames.
    pub source: usize,
    /// Stroke-width multiplier (contact weight).
    pub width_scale: f32,
    /// Producer of this segment.
    pub kind: SegmentKind,
}

impl Segment {
    /// Screen midpoint, used for spatial binning.
    #[must_use]
    pub fn midpoint(&self) -> Vec2 {
        (self.p0 + self.p1) * 0.5
    }
}

/// Distance threshold for an inferred edge between two position kinds.
/// `None` means the pair never bonds implicitly.
fn bond_threshold(a: PositionKind, b: PositionKind) -> Option<f32> {
    match (a, b) {
        (PositionKind::Protein, PositionKind::Protein) => {
            Some(PROTEIN_BOND_DIST)
        }
        (PositionKind::Ligand, PositionKind::Ligand) => {
            Some(LIGAND_BOND_DIST)
        }
        (x, y) if x.is_nucleic() && y.is_nucleic() => {
            Some(NUCLEIC_BOND_DIST)
        }
        _ => None,
    }
}

/// Infer a nearest-neighbor bond set for a frame without explicit bonds.
///
/// Polymer positions (protein/nucleic) bond to their sequence neighbor
/// when within the kind-pair threshold; ligand positions bond to any
/// ligand position of the same chain within range. Inferred edges never
/// cross a chain boundary.
#[must_use]
pub fn infer_bonds(frame: &Frame) -> Vec<Bond> {
    let positions = frame.positions();
    let mut bonds = Vec::new();

    for i in 0..positions.len().saturating_sub(1) {
        let a = &positions[i];
        let b = &positions[i + 1];
        if a.chain != b.chain
            || a.kind == PositionKind::Ligand
            || b.kind == PositionKind::Ligand
        {
            continue;
        }
        if let Some(threshold) = bond_threshold(a.kind, b.kind) {
            if a.coord.distance(b.coord) <= threshold {
                bonds.push(Bond { a: i, b: i + 1 });
            }
        }
    }

    // Ligands are unordered: connect all same-chain pairs within range.
    let mut ligands_by_chain: FxHashMap<&str, Vec<usize>> =
        FxHashMap::default();
    for (i, p) in positions.iter().enumerate() {
        if p.kind == PositionKind::Ligand {
            ligands_by_chain.entry(p.chain.as_str()).or_default().push(i);
        }
    }
    let mut chains: Vec<&str> = ligands_by_chain.keys().copied().collect();
    chains.sort_unstable();
    for chain in chains {
        let members = &ligands_by_chain[chain];
        for (k, &i) in members.iter().enumerate() {
            for &j in &members[k + 1..] {
                let dist =
                    positions[i].coord.distance(positions[j].coord);
                if dist <= LIGAND_BOND_DIST {
                    bonds.push(Bond { a: i, b: j });
                }
            }
        }
    }

    bonds
}

/// Build the drawable segments of one frame.
///
/// Explicit bonds take precedence over inference; contacts are always
/// appended. Edges with out-of-range endpoints are skipped. A segment is
/// visible when both endpoints are in `visible`.
#[must_use]
pub fn build_segments(
    frame: &Frame,
    source: usize,
    bonds: &[Bond],
    contacts: &[Contact],
    projected: &[Projected],
    colors: &[Rgb],
    visible: &BTreeSet<usize>,
) -> Vec<Segment> {
    let n = frame.len();
    let inferred;
    let edges: &[Bond] = if bonds.is_empty() {
        inferred = infer_bonds(frame);
        &inferred
    } else {
        bonds
    };

    let make = |a: usize,
                b: usize,
                color: Rgb,
                width_scale: f32,
                kind: SegmentKind|
     -> Option<Segment> {
        if a >= n || b >= n {
            return None;
        }
        let pa = projected[a];
        let pb = projected[b];
        Some(Segment {
            a,
            b,
            p0: pa.screen,
            p1: pb.screen,
            depth: (pa.depth + pb.depth) * 0.5,
            blend: (pa.blend + pb.blend) * 0.5,
            color,
            visible: visible.contains(&a) && visible.contains(&b),
            source,
            width_scale,
            kind,
        })
    };

    let mut segments = Vec::with_capacity(edges.len() + contacts.len());
    for bond in edges {
        // Sticks take the lower-index endpoint's resolved color.
        let (lo, hi) = (bond.a.min(bond.b), bond.a.max(bond.b));
        if let Some(seg) =
            colors.get(lo).and_then(|&c| {
                make(lo, hi, c, 1.0, SegmentKind::Bond)
            })
        {
            segments.push(seg);
        }
    }
    for contact in contacts {
        if let Some(seg) = make(
            contact.a,
            contact.b,
            contact.color,
            contact.weight.max(0.0),
            SegmentKind::Contact,
        ) {
            segments.push(seg);
        }
    }
    segments
}
