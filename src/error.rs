//! Crate-level error types.

use std::fmt;

/// Errors produced by the plano crate.
///
/// Render-path faults (malformed frames, degenerate alignments, stale
/// selection indices) are recovered locally and never surface here; the
/// variants below cover host-facing operations only.
#[derive(Debug)]
pub enum PlanoError {
    /// A PAE-dependent operation was requested on an object whose active
    /// frame carries no pairwise matrix.
    PaeUnavailable {
        /// Name of the object the operation targeted.
        object: String,
    },
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Scene state (JSON) parsing/serialization failure.
    StateParse(String),
}

impl fmt::Display for PlanoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PaeUnavailable { object } => {
                write!(f, "pairwise matrix unsupported for object '{object}'")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::StateParse(msg) => {
                write!(f, "state parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for PlanoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PlanoError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
