//! Viewer context: the explicit registry tying scene, options, and the
//! coalescing render queue together.
//!
//! There is no ambient global state anywhere in the crate: hosts
//! construct a [`Viewer`], drive it from their one event thread, and
//! drop it when done. UI collaborators observe selection changes through
//! an injected [`HostHooks`] implementation and read state through the
//! accessor API — they never mutate shared state directly.

use std::collections::BTreeSet;

use crate::error::PlanoError;
use crate::options::Options;
use crate::render::{render_scene, Raster};
use crate::scene::{FrameData, Object, Scene};
use crate::selection::{PaeBox, SelectionModel, SelectionUpdate};

/// Narrow capability interface injected by the host. All DOM/event
/// specifics live on the host side; the core only emits these
/// notifications.
pub trait HostHooks {
    /// The named object's selection changed.
    fn selection_changed(&self, _object: &str) {}

    /// A redraw was requested; the host should schedule a paint tick.
    fn render_requested(&self, _reason: &str) {}
}

/// Coalescing redraw queue: any number of requests within one paint tick
/// collapse into a single pending redraw.
#[derive(Debug, Default)]
pub struct RenderQueue {
    pending: Option<String>,
}

impl RenderQueue {
    /// Request a redraw. Idempotent within a tick: the first reason is
    /// kept, later ones are absorbed.
    pub fn request(&mut self, reason: &str) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(reason.to_owned());
        true
    }

    /// Whether a redraw is pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drain the queue on the host's paint tick.
    pub fn take_pending(&mut self) -> Option<String> {
        self.pending.take()
    }
}

/// The viewer context. Owns the scene, the options, and the queue.
pub struct Viewer {
    /// The owned scene.
    pub scene: Scene,
    /// Viewer-wide options.
    pub options: Options,
    queue: RenderQueue,
    hooks: Option<Box<dyn HostHooks>>,
}

impl Viewer {
    /// Create a viewer with the given options and an empty scene.
    #[must_use]
    pub fn new(options: Options) -> Self {
        Self {
            scene: Scene::new(),
            options,
            queue: RenderQueue::default(),
            hooks: None,
        }
    }

    /// Inject the host capability interface.
    pub fn set_hooks(&mut self, hooks: Box<dyn HostHooks>) {
        self.hooks = Some(hooks);
    }

    // -- Structure loading --

    /// Append a frame to `object`, creating the object on first use.
    pub fn add_frame(&mut self, object: &str, data: FrameData, align: bool) {
        if self.scene.object(object).is_none() {
            let _ = self.scene.add_object(object);
        }
        if let Some(obj) = self.scene.object_mut(object) {
            obj.push_frame(data, align);
        }
        self.request_render("frame added");
    }

    // -- Render scheduling --

    /// Request a redraw; idempotent within one paint tick.
    pub fn request_render(&mut self, reason: &str) {
        if self.queue.request(reason) {
            if let Some(hooks) = &self.hooks {
                hooks.render_requested(reason);
            }
        }
    }

    /// Whether a redraw is pending.
    #[must_use]
    pub fn render_pending(&self) -> bool {
        self.queue.is_pending()
    }

    /// Drain the pending redraw request, as the host's paint tick does.
    pub fn take_pending_render(&mut self) -> Option<String> {
        self.queue.take_pending()
    }

    /// Render the scene now. Drains the queue and marks the scene
    /// rendered.
    pub fn render(&mut self) -> Raster {
        let raster = render_scene(&self.scene, &self.options);
        self.scene.mark_rendered();
        let _ = self.queue.take_pending();
        raster
    }

    // -- Selection read API --

    /// Visible position set of the named object's active frame.
    #[must_use]
    pub fn visible_positions(&self, object: &str) -> Option<BTreeSet<usize>> {
        self.scene.object(object).map(Object::visible_positions)
    }

    /// Snapshot of the named object's selection model.
    #[must_use]
    pub fn selection(&self, object: &str) -> Option<SelectionModel> {
        self.scene.object(object).map(|o| o.selection.clone())
    }

    // -- Selection write API --

    /// Apply a partial selection update: omitted fields keep their
    /// values, explicitly empty fields clear only themselves.
    pub fn set_selection(&mut self, object: &str, update: SelectionUpdate) {
        if let Some(obj) = self.scene.object_mut(object) {
            obj.selection.apply_update(update);
        }
        self.selection_touched(object);
    }

    /// Toggle one position of the named object.
    pub fn toggle_residue(&mut self, object: &str, index: usize) {
        if let Some(obj) = self.scene.object_mut(object) {
            obj.toggle_residue(index);
        }
        self.selection_touched(object);
    }

    /// Toggle a chain of the named object.
    pub fn toggle_chain(&mut self, object: &str, chain: &str) {
        if let Some(obj) = self.scene.object_mut(object) {
            obj.toggle_chain(chain);
        }
        self.selection_touched(object);
    }

    /// Select everything in the named object.
    pub fn select_all(&mut self, object: &str) {
        if let Some(obj) = self.scene.object_mut(object) {
            obj.selection.select_all();
        }
        self.selection_touched(object);
    }

    /// Clear the named object's selection entirely.
    pub fn clear_all(&mut self, object: &str) {
        if let Some(obj) = self.scene.object_mut(object) {
            obj.selection.clear_all();
        }
        self.selection_touched(object);
    }

    /// Append a pairwise-matrix box pick.
    ///
    /// # Errors
    /// [`PlanoError::PaeUnavailable`] when the object is missing or its
    /// active frame has no pairwise matrix.
    pub fn add_pae_box(
        &mut self,
        object: &str,
        pae_box: PaeBox,
    ) -> Result<(), PlanoError> {
        let result = match self.scene.object_mut(object) {
            Some(obj) => obj.add_pae_box(pae_box),
            None => Err(PlanoError::PaeUnavailable {
                object: object.to_owned(),
            }),
        };
        if result.is_ok() {
            self.selection_touched(object);
        }
        result
    }

    fn selection_touched(&mut self, object: &str) {
        if let Some(hooks) = &self.hooks {
            hooks.selection_changed(object);
        }
        self.request_render("selection changed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn line_data(n: usize) -> FrameData {
        FrameData {
            coords: (0..n)
                .map(|i| Vec3::new(i as f32 * 3.0, 0.0, 0.0))
                .collect(),
            ..FrameData::default()
        }
    }

    #[test]
    fn render_requests_coalesce_per_tick() {
        let mut viewer = Viewer::new(Options::default());
        viewer.request_render("first");
        viewer.request_render("second");
        viewer.request_render("third");
        assert_eq!(viewer.take_pending_render().as_deref(), Some("first"));
        assert_eq!(viewer.take_pending_render(), None);

        // Next tick accepts a fresh request.
        viewer.request_render("fourth");
        assert!(viewer.render_pending());
    }

    #[test]
    fn selection_changes_notify_hooks_once_per_burst() {
        #[derive(Default)]
        struct Recorder {
            selections: RefCell<Vec<String>>,
            renders: RefCell<usize>,
        }
        impl HostHooks for Rc<Recorder> {
            fn selection_changed(&self, object: &str) {
                self.selections.borrow_mut().push(object.to_owned());
            }
            fn render_requested(&self, _reason: &str) {
                *self.renders.borrow_mut() += 1;
            }
        }

        let recorder = Rc::new(Recorder::default());
        let mut viewer = Viewer::new(Options::default());
        viewer.set_hooks(Box::new(Rc::clone(&recorder)));

        viewer.add_frame("demo", line_data(5), true);
        viewer.toggle_residue("demo", 2);
        viewer.toggle_chain("demo", "A");

        assert_eq!(
            recorder.selections.borrow().as_slice(),
            ["demo", "demo"]
        );
        // The whole burst coalesced into one pending render request.
        assert_eq!(*recorder.renders.borrow(), 1);
        assert!(viewer.render_pending());
    }

    #[test]
    fn read_api_reflects_writes() {
        let mut viewer = Viewer::new(Options::default());
        viewer.add_frame("demo", line_data(4), true);
        viewer.toggle_residue("demo", 1);
        assert_eq!(
            viewer.visible_positions("demo"),
            Some([0, 2, 3].into_iter().collect())
        );
        assert!(viewer.visible_positions("missing").is_none());

        viewer.select_all("demo");
        assert_eq!(
            viewer.visible_positions("demo").map(|s| s.len()),
            Some(4)
        );
    }

    #[test]
    fn pae_box_on_object_without_matrix_errors() {
        let mut viewer = Viewer::new(Options::default());
        viewer.add_frame("demo", line_data(4), true);
        let result =
            viewer.add_pae_box("demo", PaeBox { i: (0, 1), j: (2, 3) });
        assert!(matches!(
            result,
            Err(PlanoError::PaeUnavailable { .. })
        ));
        // The rest of the selection machinery stays usable.
        viewer.toggle_residue("demo", 0);
        assert_eq!(
            viewer.visible_positions("demo").map(|s| s.len()),
            Some(3)
        );
    }

    #[test]
    fn render_drains_the_queue() {
        let mut viewer = Viewer::new(Options::default());
        viewer.add_frame("demo", line_data(6), true);
        assert!(viewer.render_pending());
        let raster = viewer.render();
        assert_eq!(raster.width(), 400);
        assert!(!viewer.render_pending());
        assert!(!viewer.scene.is_dirty());
    }
}
