//! Centralized rendering/display options with TOML preset support.
//!
//! All tweakable settings (surface size, stroke and outline style,
//! shadow and culling parameters, color defaults) are consolidated here.
//! Options serialize to/from TOML for view presets.

mod color;
mod display;
mod rendering;

use std::path::Path;

pub use color::ColorOptions;
pub use display::DisplayOptions;
pub use rendering::{OutlineMode, RenderingOptions};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::PlanoError;

/// Top-level options container. All sub-structs use `#[serde(default)]`
/// so partial TOML files (e.g. only overriding `[rendering]`) work
/// correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Output surface size and background.
    pub display: DisplayOptions,
    /// Stroke, shadow, and culling parameters.
    pub rendering: RenderingOptions,
    /// Color mode defaults.
    #[schemars(skip)]
    pub color: ColorOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    /// [`PlanoError::Io`] on filesystem failure,
    /// [`PlanoError::OptionsParse`] on malformed TOML.
    pub fn load(path: &Path) -> Result<Self, PlanoError> {
        let content = std::fs::read_to_string(path).map_err(PlanoError::Io)?;
        toml::from_str(&content)
            .map_err(|e| PlanoError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    /// [`PlanoError::Io`] on filesystem failure,
    /// [`PlanoError::OptionsParse`] on serialization failure.
    pub fn save(&self, path: &Path) -> Result<(), PlanoError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| PlanoError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(PlanoError::Io)?;
        }
        std::fs::write(path, content).map_err(PlanoError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}
