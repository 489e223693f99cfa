//! Core error types for formsync.
//!
//! [`FormError`] covers the faults the engine can raise. Configuration errors
//! are programmer mistakes detected when a field unit is mounted or receives
//! new props; they abort the offending unit and are never retried. Validation messages
//! are *not* errors in this sense: they are ordinary data stored on each
//! field's state and never travel through `Err`.

use thiserror::Error;

/// The primary error type for formsync.
#[derive(Error, Debug)]
pub enum FormError {
    // ── Field configuration ──────────────────────────────────────────

    /// A field unit was configured without a name.
    #[error("Configuration error: the `name` prop must be provided to a field")]
    MissingName,

    /// Neither a `render` function nor a `component` was configured.
    #[error("Configuration error: field `{0}` must have a `component` or a `render` prop")]
    NoRenderVariant(String),

    /// The `component` string does not name a built-in field kind.
    #[error("Configuration error: invalid string value `{kind}` for the `component` prop of field `{name}`")]
    UnknownKind {
        /// The field name.
        name: String,
        /// The unrecognized kind string.
        kind: String,
    },

    /// A textarea field was given nested content instead of a `value`.
    #[error("Configuration error: textarea field `{0}` uses the `value` prop instead of children")]
    TextareaChildren(String),

    // ── Settings ─────────────────────────────────────────────────────

    /// A settings value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── State ────────────────────────────────────────────────────────

    /// An update was submitted for a field that is not registered.
    #[error("Field `{0}` is not registered")]
    NotRegistered(String),

    // ── Serialization ────────────────────────────────────────────────

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl FormError {
    /// Returns `true` for the fatal configuration category.
    ///
    /// These errors abort mounting or rendering of a field unit.
    pub const fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::MissingName
                | Self::NoRenderVariant(_)
                | Self::UnknownKind { .. }
                | Self::TextareaChildren(_)
                | Self::ConfigurationError(_)
        )
    }
}

impl From<serde_json::Error> for FormError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// A convenience type alias for `Result<T, FormError>`.
pub type FormResult<T> = Result<T, FormError>;
