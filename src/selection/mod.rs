//! Per-object highlight state and its combination rules.
//!
//! A [`SelectionModel`] composes three independent sources — explicit
//! residue picks, chain toggles, and pairwise-matrix box picks — by
//! union. The model is pure data: it never draws and never touches the
//! renderer; hosts observe it through the read API and the viewer's
//! change callbacks.
//!
//! Mode semantics: `Default` with empty residues/chains means "all
//! visible"; `Explicit` with everything empty means "none visible".

mod drag;

use std::collections::BTreeSet;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

pub use drag::DragSelect;

use crate::scene::Frame;

/// Selection interpretation mode.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Empty residues/chains mean "everything visible".
    #[default]
    Default,
    /// The stored sets are exhaustive; empty means "nothing visible".
    Explicit,
}

/// Derived selection state, for hosts that render tri-state UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    /// All positions visible.
    Default,
    /// Nothing visible.
    ExplicitEmpty,
    /// A proper subset visible.
    ExplicitPartial,
}

/// One pairwise-matrix box pick: inclusive index ranges along the two
/// matrix axes. A box contributes both its i-range and j-range positions
/// to the selected set — never an implicit mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaeBox {
    /// Inclusive index range along the matrix i-axis.
    pub i: (usize, usize),
    /// Inclusive index range along the matrix j-axis.
    pub j: (usize, usize),
}

impl PaeBox {
    /// All position indices the box selects (both declared ranges).
    fn positions(&self) -> impl Iterator<Item = usize> {
        let (i0, i1) = (self.i.0.min(self.i.1), self.i.0.max(self.i.1));
        let (j0, j1) = (self.j.0.min(self.j.1), self.j.0.max(self.j.1));
        (i0..=i1).chain(j0..=j1)
    }
}

/// Partial update for the selection write API. An omitted field keeps
/// its current value; an explicitly empty one clears only that field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionUpdate {
    /// Replacement residue set.
    pub residues: Option<Vec<usize>>,
    /// Replacement chain set.
    pub chains: Option<Vec<String>>,
    /// Replacement box list.
    pub pae_boxes: Option<Vec<PaeBox>>,
    /// Replacement mode.
    pub mode: Option<SelectionMode>,
}

/// Highlight state for one object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionModel {
    residues: FxHashSet<usize>,
    chains: FxHashSet<String>,
    pae_boxes: Vec<PaeBox>,
    mode: SelectionMode,
}

impl SelectionModel {
    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Explicitly selected residue indices.
    #[must_use]
    pub fn residues(&self) -> &FxHashSet<usize> {
        &self.residues
    }

    /// Selected chain ids.
    #[must_use]
    pub fn chains(&self) -> &FxHashSet<String> {
        &self.chains
    }

    /// Box picks, in insertion order.
    #[must_use]
    pub fn pae_boxes(&self) -> &[PaeBox] {
        &self.pae_boxes
    }

    /// Derived tri-state classification.
    #[must_use]
    pub fn state(&self) -> SelectionState {
        match self.mode {
            SelectionMode::Default => SelectionState::Default,
            SelectionMode::Explicit => {
                if self.residues.is_empty()
                    && self.chains.is_empty()
                    && self.pae_boxes.is_empty()
                {
                    SelectionState::ExplicitEmpty
                } else {
                    SelectionState::ExplicitPartial
                }
            }
        }
    }

    /// The set of visible position indices for `frame`.
    ///
    /// `Default` mode makes every position visible regardless of stored
    /// content; otherwise the three sources union, with indices beyond
    /// the frame silently dropped (UI events can race a structure swap).
    #[must_use]
    pub fn visible_positions(&self, frame: &Frame) -> BTreeSet<usize> {
        let n = frame.len();
        if self.mode == SelectionMode::Default {
            return (0..n).collect();
        }

        let mut visible: BTreeSet<usize> =
            self.residues.iter().copied().filter(|&i| i < n).collect();
        for (idx, p) in frame.positions().iter().enumerate() {
            if self.chains.contains(&p.chain) {
                let _ = visible.insert(idx);
            }
        }
        for pae_box in &self.pae_boxes {
            visible.extend(pae_box.positions().filter(|&i| i < n));
        }
        visible
    }

    /// Whether position `index` is currently visible.
    #[must_use]
    pub fn is_visible(&self, frame: &Frame, index: usize) -> bool {
        index < frame.len() && self.visible_positions(frame).contains(&index)
    }

    /// Everything visible: clears residues/chains and returns to
    /// `Default` mode. Box picks are preserved (they keep highlighting
    /// the matrix; visibility is already total).
    pub fn select_all(&mut self) {
        self.residues.clear();
        self.chains.clear();
        self.mode = SelectionMode::Default;
    }

    /// Nothing visible: clears residues, chains and box picks.
    pub fn clear_all(&mut self) {
        self.residues.clear();
        self.chains.clear();
        self.pae_boxes.clear();
        self.mode = SelectionMode::Explicit;
    }

    /// Toggle a single position. Indices beyond the frame are ignored.
    pub fn toggle_residue(&mut self, frame: &Frame, index: usize) {
        if index >= frame.len() {
            log::debug!("ignoring out-of-range selection index {index}");
            return;
        }
        let mut visible = self.visible_positions(frame);
        if !visible.remove(&index) {
            let _ = visible.insert(index);
        }
        self.commit_visible_set(frame, visible);
    }

    /// Toggle a whole chain. A chain counts as selected only when its
    /// full residue set is selected; toggling sets or clears all of its
    /// residues accordingly. Unknown chains are ignored.
    ///
    /// `Default` mode carries no explicit picks, so the first chain
    /// toggle starts an explicit selection from that chain alone rather
    /// than subtracting it from "all".
    pub fn toggle_chain(&mut self, frame: &Frame, chain: &str) {
        let members = frame.chain_positions(chain);
        if members.is_empty() {
            log::debug!("ignoring toggle of unknown chain '{chain}'");
            return;
        }
        let mut visible = if self.mode == SelectionMode::Default {
            BTreeSet::new()
        } else {
            self.visible_positions(frame)
        };
        if members.iter().all(|i| visible.contains(i)) {
            for i in &members {
                let _ = visible.remove(i);
            }
        } else {
            visible.extend(members);
        }
        self.commit_visible_set(frame, visible);
    }

    /// Whether every position of `chain` is visible (and the chain is
    /// non-empty).
    #[must_use]
    pub fn chain_fully_selected(&self, frame: &Frame, chain: &str) -> bool {
        let members = frame.chain_positions(chain);
        if members.is_empty() {
            return false;
        }
        let visible = self.visible_positions(frame);
        members.iter().all(|i| visible.contains(i))
    }

    /// Whether some but not all positions of `chain` are visible.
    #[must_use]
    pub fn chain_partially_selected(
        &self,
        frame: &Frame,
        chain: &str,
    ) -> bool {
        let members = frame.chain_positions(chain);
        if members.is_empty() {
            return false;
        }
        let visible = self.visible_positions(frame);
        let selected = members.iter().filter(|i| visible.contains(i)).count();
        selected > 0 && selected < members.len()
    }

    /// Append a box pick. Residues, chains and mode are untouched; an
    /// empty-explicit model becomes partial simply because the box now
    /// contributes members.
    pub fn push_pae_box(&mut self, pae_box: PaeBox) {
        self.pae_boxes.push(pae_box);
    }

    /// Replace the visible set wholesale and reclassify: the full set
    /// returns to `Default`, the empty set to explicit-empty, anything
    /// else to an explicit residue selection. Chain and box sources are
    /// consumed into the residue set by this operation.
    pub fn commit_visible_set(
        &mut self,
        frame: &Frame,
        set: BTreeSet<usize>,
    ) {
        let n = frame.len();
        let set: BTreeSet<usize> =
            set.into_iter().filter(|&i| i < n).collect();

        self.chains.clear();
        self.pae_boxes.clear();
        if set.len() == n && n > 0 {
            self.residues.clear();
            self.mode = SelectionMode::Default;
        } else {
            self.residues = set.into_iter().collect();
            self.mode = SelectionMode::Explicit;
        }
    }

    /// Partial update from the write API: omitted fields keep their
    /// values, explicitly empty fields clear only themselves.
    pub fn apply_update(&mut self, update: SelectionUpdate) {
        if let Some(residues) = update.residues {
            self.residues = residues.into_iter().collect();
        }
        if let Some(chains) = update.chains {
            self.chains = chains.into_iter().collect();
        }
        if let Some(pae_boxes) = update.pae_boxes {
            self.pae_boxes = pae_boxes;
        }
        if let Some(mode) = update.mode {
            self.mode = mode;
        }
    }

    /// Begin a drag gesture at `start`. The returned [`DragSelect`]
    /// captures the pre-drag visible set and whether the gesture selects
    /// or unselects; it is committed or discarded by the caller.
    #[must_use]
    pub fn begin_drag(&self, frame: &Frame, start: usize) -> DragSelect {
        DragSelect::begin(self, frame, start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::test_frame;

    #[test]
    fn default_mode_means_all_visible() {
        let frame = test_frame(&["A", "A", "B"]);
        let model = SelectionModel::default();
        assert_eq!(model.state(), SelectionState::Default);
        let visible = model.visible_positions(&frame);
        assert_eq!(visible, (0..3).collect());
    }

    #[test]
    fn explicit_empty_means_none_visible() {
        let frame = test_frame(&["A", "A", "B"]);
        let mut model = SelectionModel::default();
        model.clear_all();
        assert_eq!(model.state(), SelectionState::ExplicitEmpty);
        assert!(model.visible_positions(&frame).is_empty());
    }

    #[test]
    fn scenario_a_toggle_chain_b() {
        // 3 positions, chains [A, A, B]: toggling B from Default leaves
        // only position 2 visible, state partial.
        let frame = test_frame(&["A", "A", "B"]);
        let mut model = SelectionModel::default();
        model.toggle_chain(&frame, "B");
        assert_eq!(
            model.visible_positions(&frame),
            [2].into_iter().collect()
        );
        assert_eq!(model.state(), SelectionState::ExplicitPartial);
    }

    #[test]
    fn scenario_b_clear_then_select_all() {
        let chains = vec!["A"; 50];
        let frame = test_frame(&chains);
        let mut model = SelectionModel::default();
        model.clear_all();
        model.select_all();
        assert_eq!(model.mode(), SelectionMode::Default);
        assert_eq!(model.visible_positions(&frame).len(), 50);
    }

    #[test]
    fn scenario_c_box_on_empty_model() {
        let chains = vec!["A"; 20];
        let frame = test_frame(&chains);
        let mut model = SelectionModel::default();
        model.clear_all();
        model.push_pae_box(PaeBox {
            i: (0, 4),
            j: (10, 14),
        });
        let expected: BTreeSet<usize> = (0..=4).chain(10..=14).collect();
        assert_eq!(model.visible_positions(&frame), expected);
        assert_eq!(model.state(), SelectionState::ExplicitPartial);
    }

    #[test]
    fn pae_box_union_law() {
        let frame = test_frame(&["A", "A", "B", "B", "B"]);
        let mut model = SelectionModel::default();
        model.toggle_residue(&frame, 0);
        let before = model.visible_positions(&frame);
        model.push_pae_box(PaeBox { i: (3, 4), j: (0, 0) });
        let after = model.visible_positions(&frame);
        assert!(after.is_superset(&before));
    }

    #[test]
    fn toggle_chain_cycles_through_states() {
        let frame = test_frame(&["A", "A", "B"]);
        let mut model = SelectionModel::default();
        model.toggle_chain(&frame, "B"); // isolate B
        model.toggle_chain(&frame, "A"); // add A -> everything selected
        assert_eq!(model.state(), SelectionState::Default);

        model.toggle_chain(&frame, "B"); // isolate B again
        model.toggle_chain(&frame, "B"); // fully selected chain clears
        assert_eq!(model.state(), SelectionState::ExplicitEmpty);
    }

    #[test]
    fn toggle_residue_from_default_unselects_one() {
        let frame = test_frame(&["A", "A", "A"]);
        let mut model = SelectionModel::default();
        model.toggle_residue(&frame, 1);
        assert_eq!(
            model.visible_positions(&frame),
            [0, 2].into_iter().collect()
        );
        assert_eq!(model.state(), SelectionState::ExplicitPartial);

        // Toggling back restores the full set, which reclassifies to
        // Default.
        model.toggle_residue(&frame, 1);
        assert_eq!(model.state(), SelectionState::Default);
    }

    #[test]
    fn toggle_everything_off_reaches_explicit_empty() {
        let frame = test_frame(&["A", "A"]);
        let mut model = SelectionModel::default();
        model.toggle_residue(&frame, 0);
        model.toggle_residue(&frame, 1);
        assert_eq!(model.state(), SelectionState::ExplicitEmpty);
    }

    #[test]
    fn out_of_range_toggle_is_ignored() {
        let frame = test_frame(&["A", "A"]);
        let mut model = SelectionModel::default();
        model.toggle_residue(&frame, 99);
        assert_eq!(model.state(), SelectionState::Default);
        assert_eq!(model.visible_positions(&frame).len(), 2);
    }

    #[test]
    fn chain_partial_queries() {
        let frame = test_frame(&["A", "A", "B"]);
        let mut model = SelectionModel::default();
        assert!(model.chain_fully_selected(&frame, "A"));
        assert!(!model.chain_partially_selected(&frame, "A"));

        model.toggle_residue(&frame, 0);
        assert!(!model.chain_fully_selected(&frame, "A"));
        assert!(model.chain_partially_selected(&frame, "A"));
        assert!(model.chain_fully_selected(&frame, "B"));
        assert!(!model.chain_fully_selected(&frame, "Z"));
    }

    #[test]
    fn partial_update_keeps_omitted_fields() {
        let frame = test_frame(&["A", "B"]);
        let mut model = SelectionModel::default();
        model.apply_update(SelectionUpdate {
            residues: Some(vec![0]),
            mode: Some(SelectionMode::Explicit),
            ..SelectionUpdate::default()
        });
        assert_eq!(
            model.visible_positions(&frame),
            [0].into_iter().collect()
        );

        // Updating chains alone must not clear residues.
        model.apply_update(SelectionUpdate {
            chains: Some(vec!["B".to_owned()]),
            ..SelectionUpdate::default()
        });
        assert_eq!(
            model.visible_positions(&frame),
            [0, 1].into_iter().collect()
        );

        // An explicitly empty residue list clears only residues.
        model.apply_update(SelectionUpdate {
            residues: Some(Vec::new()),
            ..SelectionUpdate::default()
        });
        assert_eq!(
            model.visible_positions(&frame),
            [1].into_iter().collect()
        );
    }

    #[test]
    fn reversed_box_ranges_are_normalized() {
        let frame = test_frame(&["A", "A", "A", "A", "A"]);
        let mut model = SelectionModel::default();
        model.clear_all();
        model.push_pae_box(PaeBox { i: (3, 1), j: (4, 4) });
        assert_eq!(
            model.visible_positions(&frame),
            [1, 2, 3, 4].into_iter().collect()
        );
    }
}
