//! Objects: named owners of frames, view transform, and selection.

use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

use super::{Frame, FrameData};
use crate::align::{align_a_to_b, best_orientation};
use crate::color::{ColorScheme, Rgb, CONTACT_COLOR};
use crate::error::PlanoError;
use crate::selection::{PaeBox, SelectionModel};

/// An explicit bond between two position indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bond {
    /// First endpoint position index.
    pub a: usize,
    /// Second endpoint position index.
    pub b: usize,
}

/// A weighted, colored contact between two position indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// First endpoint position index.
    pub a: usize,
    /// Second endpoint position index.
    pub b: usize,
    /// Stroke-width weight, ≥ 0.
    #[serde(default = "default_contact_weight")]
    pub weight: f32,
    /// Edge color.
    #[serde(default = "default_contact_color")]
    pub color: Rgb,
}

fn default_contact_weight() -> f32 {
    1.0
}

fn default_contact_color() -> Rgb {
    CONTACT_COLOR
}

/// Persistent per-object viewer transform. Survives frame changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewTransform {
    /// Current rotation applied before projection.
    pub rotation: Mat3,
    /// Zoom factor multiplying the fitted screen scale.
    pub zoom: f32,
    /// Whether the perspective blend is active (false = pure ortho).
    pub perspective: bool,
    /// Focal length for the perspective factor, in structure units.
    pub focal_length: f32,
    /// Rotation center in structure space.
    pub center: Vec3,
    /// Bounding extent: max distance of any position from the center.
    pub extent: f32,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            rotation: Mat3::IDENTITY,
            zoom: 1.0,
            perspective: false,
            focal_length: 200.0,
            center: Vec3::ZERO,
            extent: 1.0,
        }
    }
}

/// Named owner of an ordered frame list, a viewer transform, one
/// selection model, and optional explicit bonds/contacts.
///
/// Created explicitly, persists until cleared; transform and selection
/// survive frame changes. A frame of a different length is treated as a
/// structure reload and resets the selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Object {
    name: String,
    frames: Vec<Frame>,
    active: usize,
    /// Viewer transform (rotation, zoom, perspective, center, extent).
    pub transform: ViewTransform,
    /// Highlight state.
    pub selection: SelectionModel,
    /// Host-set color overrides.
    pub scheme: ColorScheme,
    bonds: Vec<Bond>,
    contacts: Vec<Contact>,
}

impl Object {
    /// Create an empty object.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            frames: Vec::new(),
            active: 0,
            transform: ViewTransform::default(),
            selection: SelectionModel::default(),
            scheme: ColorScheme::default(),
            bonds: Vec::new(),
            contacts: Vec::new(),
        }
    }

    /// Object name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a frame built from `data`.
    ///
    /// The first frame of an object (or of a new structure, detected by
    /// a changed position count) receives a best-orientation pass that
    /// seeds the transform's rotation, center and extent, and resets the
    /// selection. Later frames of the same length are rigidly aligned to
    /// the first frame when `align` is set, so trajectories stay put on
    /// screen.
    pub fn push_frame(&mut self, data: FrameData, align: bool) {
        let mut frame = Frame::from_data(data);

        match self.frames.first().map(Frame::len) {
            None => self.orient_to(&frame),
            Some(first_len) if first_len != frame.len() => {
                log::info!(
                    "object '{}': structure size changed ({} -> {}); \
                     reloading view state",
                    self.name,
                    first_len,
                    frame.len()
                );
                self.frames.clear();
                self.active = 0;
                self.selection = SelectionModel::default();
                self.orient_to(&frame);
            }
            Some(_) if align => {
                let coords = frame.coords();
                let first_coords = self.frames[0].coords();
                let aligned =
                    align_a_to_b(&coords, &coords, &first_coords);
                let positions = frame
                    .positions()
                    .iter()
                    .zip(aligned)
                    .map(|(p, coord)| {
                        let mut p = p.clone();
                        p.coord = coord;
                        p
                    })
                    .collect();
                frame = Frame::new(positions, frame.pae().cloned());
            }
            Some(_) => {}
        }

        self.frames.push(frame);
    }

    /// Seed rotation/center/extent from a frame's coordinates.
    fn orient_to(&mut self, frame: &Frame) {
        let coords = frame.coords();
        let (rotation, center) = best_orientation(&coords);
        self.transform.rotation = rotation;
        self.transform.center = center;
        self.transform.extent = coords
            .iter()
            .map(|p| (*p - center).length())
            .fold(1.0_f32, f32::max);
    }

    /// All frames, in append order.
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Number of frames.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Index of the active frame.
    #[must_use]
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// The active frame, if any frame exists.
    #[must_use]
    pub fn active_frame(&self) -> Option<&Frame> {
        self.frames.get(self.active)
    }

    /// Activate frame `index`, clamped to the valid range.
    pub fn set_active_frame(&mut self, index: usize) {
        if !self.frames.is_empty() {
            self.active = index.min(self.frames.len() - 1);
        }
    }

    /// Replace the explicit bond list.
    pub fn set_bonds(&mut self, bonds: Vec<Bond>) {
        self.bonds = bonds;
    }

    /// Replace the contact list.
    pub fn set_contacts(&mut self, contacts: Vec<Contact>) {
        self.contacts = contacts;
    }

    /// Explicit bonds, if any were supplied.
    #[must_use]
    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// Contacts, if any were supplied.
    #[must_use]
    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    /// Toggle one position in the selection. Out-of-range indices and
    /// frame-less objects are ignored.
    pub fn toggle_residue(&mut self, index: usize) {
        if let Some(frame) = self.frames.get(self.active) {
            self.selection.toggle_residue(frame, index);
        }
    }

    /// Toggle a whole chain in the selection.
    pub fn toggle_chain(&mut self, chain: &str) {
        if let Some(frame) = self.frames.get(self.active) {
            self.selection.toggle_chain(frame, chain);
        }
    }

    /// The visible position set of the active frame (empty without one).
    #[must_use]
    pub fn visible_positions(&self) -> std::collections::BTreeSet<usize> {
        self.active_frame()
            .map(|frame| self.selection.visible_positions(frame))
            .unwrap_or_default()
    }

    /// Begin a drag gesture on the active frame.
    #[must_use]
    pub fn begin_drag(&self, start: usize) -> Option<crate::selection::DragSelect> {
        self.active_frame()
            .map(|frame| self.selection.begin_drag(frame, start))
    }

    /// Commit a drag gesture at its final item.
    pub fn commit_drag(
        &mut self,
        drag: crate::selection::DragSelect,
        current: usize,
    ) {
        if let Some(frame) = self.frames.get(self.active) {
            drag.commit(&mut self.selection, frame, current);
        }
    }

    /// Append a pairwise-matrix box pick to the selection.
    ///
    /// # Errors
    /// [`PlanoError::PaeUnavailable`] when the active frame carries no
    /// pairwise matrix; all other selection sources stay usable.
    pub fn add_pae_box(&mut self, pae_box: PaeBox) -> Result<(), PlanoError> {
        let has_pae = self.active_frame().is_some_and(Frame::has_pae);
        if !has_pae {
            return Err(PlanoError::PaeUnavailable {
                object: self.name.clone(),
            });
        }
        self.selection.push_pae_box(pae_box);
        Ok(())
    }
}
