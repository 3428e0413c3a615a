//! Drag-range selection with live preview.
//!
//! A drag gesture fixes its select/unselect direction at pointer-down
//! (from whether the start item was visible) and previews against the
//! pre-drag visible set on every pointer-move. Nothing touches the
//! owning [`SelectionModel`](super::SelectionModel) until pointer-up;
//! dropping the gesture (pointer leaves the surface, cancel event)
//! discards the preview and leaves the last committed state intact.

use std::collections::BTreeSet;

use super::SelectionModel;
use crate::scene::Frame;

/// One in-flight drag gesture.
#[derive(Debug, Clone)]
pub struct DragSelect {
    unselect: bool,
    base: BTreeSet<usize>,
    start: usize,
}

impl DragSelect {
    /// Capture gesture state at pointer-down: the pre-drag visible set
    /// and the gesture direction (unselect when the start item is
    /// currently visible).
    #[must_use]
    pub(super) fn begin(
        model: &SelectionModel,
        frame: &Frame,
        start: usize,
    ) -> Self {
        let base = model.visible_positions(frame);
        let unselect = base.contains(&start);
        Self {
            unselect,
            base,
            start,
        }
    }

    /// Whether this gesture removes items rather than adding them.
    #[must_use]
    pub fn unselect_mode(&self) -> bool {
        self.unselect
    }

    /// The gesture's anchor item.
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Preview selection for the pointer at `current`: the pre-drag set
    /// with every item between drag-start and drag-current toggled
    /// consistently. Exposed for live feedback; the model is untouched.
    #[must_use]
    pub fn preview(&self, current: usize) -> BTreeSet<usize> {
        let mut set = self.base.clone();
        let lo = self.start.min(current);
        let hi = self.start.max(current);
        for index in lo..=hi {
            if self.unselect {
                let _ = set.remove(&index);
            } else {
                let _ = set.insert(index);
            }
        }
        set
    }

    /// Commit the gesture at pointer-up: the preview at `current`
    /// becomes the model's visible set (reclassifying mode as usual).
    pub fn commit(
        self,
        model: &mut SelectionModel,
        frame: &Frame,
        current: usize,
    ) {
        let preview = self.preview(current);
        model.commit_visible_set(frame, preview);
    }
}
