// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Pseudo-3D molecular structure renderer for plain 2D raster surfaces.
//!
//! Plano draws proteins, DNA/RNA, and ligands as depth-sorted stick
//! images on a CPU pixel buffer — no GPU 3D API, no window system. The
//! crate centers on two things: the rendering pipeline (rotation,
//! projection, painter's-algorithm depth ordering, occlusion shading,
//! density culling) and the selection state machine composing explicit
//! picks, chain toggles, and pairwise-matrix box picks.
//!
//! # Key entry points
//!
//! - [`viewer::Viewer`] - the owning context (scene + options + queue)
//! - [`scene::Scene`] - objects, frames, and positions
//! - [`render::render_scene`] - one full pass onto a [`render::Raster`]
//! - [`selection::SelectionModel`] - per-object highlight state
//! - [`options::Options`] - runtime configuration with TOML presets
//!
//! # Architecture
//!
//! Everything runs on the host's one event thread. State changes mark
//! the scene dirty and coalesce into at most one pending redraw per
//! paint tick; a render pass is a pure function from scene + options to
//! pixels, rebuilding its transient segment list and spatial grids from
//! scratch every time.

pub mod align;
pub mod color;
pub mod error;
pub mod options;
pub mod render;
pub mod scene;
pub mod selection;
pub mod viewer;
