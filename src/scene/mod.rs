//! Authoritative scene: flat object storage, dirty tracking, state
//! persistence.
//!
//! The [`Scene`] owns every [`Object`] in insertion order. There is no
//! ambient registry: a scene is constructed explicitly, handed to the
//! viewer context, and torn down by drop. Mutation bumps a generation
//! counter so hosts can coalesce redraws (see
//! [`RenderQueue`](crate::viewer::RenderQueue)).

mod frame;
mod object;

use serde::{Deserialize, Serialize};

pub use frame::{Frame, FrameData, Pae, Position, PositionKind};
pub use object::{Bond, Contact, Object, ViewTransform};

use crate::error::PlanoError;

/// The authoritative scene. Owns all objects in a flat list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    objects: Vec<Object>,
    #[serde(skip)]
    generation: u64,
    #[serde(skip)]
    rendered_generation: u64,
}

impl Scene {
    /// Create an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- Dirty tracking --

    fn invalidate(&mut self) {
        self.generation += 1;
    }

    /// Whether scene data changed since the last `mark_rendered()`.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.generation != self.rendered_generation
    }

    /// Force the scene dirty (e.g. when options change but scene data
    /// hasn't).
    pub fn force_dirty(&mut self) {
        self.invalidate();
    }

    /// Mark the current generation as rendered.
    pub fn mark_rendered(&mut self) {
        self.rendered_generation = self.generation;
    }

    // -- Object management --

    /// Add an object, replacing any existing object with the same name.
    /// Returns a mutable handle to the inserted object.
    pub fn add_object(&mut self, name: impl Into<String>) -> &mut Object {
        let name = name.into();
        self.invalidate();
        if let Some(idx) =
            self.objects.iter().position(|o| o.name() == name)
        {
            self.objects[idx] = Object::new(name);
            &mut self.objects[idx]
        } else {
            self.objects.push(Object::new(name));
            let last = self.objects.len() - 1;
            &mut self.objects[last]
        }
    }

    /// Read access to an object by name.
    #[must_use]
    pub fn object(&self, name: &str) -> Option<&Object> {
        self.objects.iter().find(|o| o.name() == name)
    }

    /// Write access to an object by name (marks the scene dirty).
    pub fn object_mut(&mut self, name: &str) -> Option<&mut Object> {
        self.invalidate();
        self.objects.iter_mut().find(|o| o.name() == name)
    }

    /// All objects in insertion order.
    #[must_use]
    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    /// Number of objects.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Remove an object by name. Returns the removed object, if any.
    pub fn remove_object(&mut self, name: &str) -> Option<Object> {
        let idx = self.objects.iter().position(|o| o.name() == name)?;
        self.invalidate();
        Some(self.objects.remove(idx))
    }

    /// Remove all objects.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.invalidate();
    }

    // -- State persistence --

    /// Serialize the scene (objects, frames, transforms, selections) to
    /// JSON for host-side session persistence.
    ///
    /// # Errors
    /// [`PlanoError::StateParse`] when serialization fails.
    pub fn to_json(&self) -> Result<String, PlanoError> {
        serde_json::to_string(self)
            .map_err(|e| PlanoError::StateParse(e.to_string()))
    }

    /// Rebuild a scene from [`Scene::to_json`] output.
    ///
    /// # Errors
    /// [`PlanoError::StateParse`] when the JSON does not describe a
    /// scene.
    pub fn from_json(json: &str) -> Result<Self, PlanoError> {
        serde_json::from_str(json)
            .map_err(|e| PlanoError::StateParse(e.to_string()))
    }

    /// Save the scene state to a JSON file.
    ///
    /// # Errors
    /// [`PlanoError::Io`] on filesystem failure, [`PlanoError::StateParse`]
    /// on serialization failure.
    pub fn save_state(&self, path: &std::path::Path) -> Result<(), PlanoError> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(PlanoError::Io)
    }

    /// Load scene state from a JSON file written by [`Scene::save_state`].
    ///
    /// # Errors
    /// [`PlanoError::Io`] on filesystem failure, [`PlanoError::StateParse`]
    /// on malformed content.
    pub fn load_state(path: &std::path::Path) -> Result<Self, PlanoError> {
        let json = std::fs::read_to_string(path).map_err(PlanoError::Io)?;
        Self::from_json(&json)
    }
}

/// Build a single-frame test fixture with one position per chain entry,
/// spaced 1.0 apart along X.
#[cfg(test)]
pub(crate) fn test_frame(chains: &[&str]) -> Frame {
    use glam::Vec3;

    let positions = chains
        .iter()
        .enumerate()
        .map(|(i, chain)| Position {
            coord: Vec3::new(i as f32, 0.0, 0.0),
            confidence: 90.0,
            chain: (*chain).to_owned(),
            kind: PositionKind::Protein,
            seq_index: i as i32,
            name: "UNK".to_owned(),
        })
        .collect();
    Frame::new(positions, None)
}
