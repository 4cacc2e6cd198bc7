//! Error types for rendering.
//!
//! Only contract violations surface as errors. Malformed user markup never
//! does: unknown tags parse as literal text, unknown modules render a
//! visible error block, and unbalanced tags close implicitly at end of
//! input.

use tagmark_writer::WriterError;

/// Failure reported by an injected module renderer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModuleError {
    /// No module registered under this name.
    #[error("no module named {0:?}")]
    Unknown(String),

    /// The module's own rendering failed.
    #[error("module {name:?} failed: {message}")]
    Failed { name: String, message: String },

    /// The writer rejected the module's output.
    #[error(transparent)]
    Writer(#[from] WriterError),
}

/// Contract violation during a render pass.
///
/// A render of a well-formed tree with a well-behaved helper cannot
/// produce this; it indicates a bug in the engine or its caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// The underlying writer rejected an emit (unbalanced close, void-tag
    /// children, disallowed name, ...).
    #[error(transparent)]
    Writer(#[from] WriterError),
}
