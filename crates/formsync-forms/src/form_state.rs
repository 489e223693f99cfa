//! The aggregate state of a form.
//!
//! [`FormState`] is what the aggregate owns and what readers receive as a
//! snapshot. A name missing from [`FormState::fields`] means the field is
//! not registered ("not ready"); callers must not substitute a default.

use indexmap::IndexMap;
use serde::Serialize;

use formsync_core::FormResult;

use crate::field_state::FieldState;
use crate::validation::ValidationErrors;

/// Field values keyed by name, in registration order, as handed to validators.
pub type FormValues = IndexMap<String, String>;

/// State of every registered field plus the last validation result.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FormState {
    /// Registered fields in registration order.
    pub fields: IndexMap<String, FieldState>,
    /// Messages from the last validation pass, keyed by field name.
    pub errors: ValidationErrors,
    /// Incremented on every committed mutation.
    pub revision: u64,
}

impl FormState {
    /// Creates an empty form state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the state of `name`, or `None` if it is not registered.
    pub fn field(&self, name: &str) -> Option<&FieldState> {
        self.fields.get(name)
    }

    /// Returns `true` if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Returns the registered field names in registration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Returns the number of registered fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no field is registered.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns every field's read value (format applied, then trim).
    pub fn values(&self) -> FormValues {
        self.fields
            .iter()
            .map(|(name, field)| (name.clone(), field.read_value()))
            .collect()
    }

    /// Returns `true` if the last validation pass reported nothing.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns `true` if any field was changed by the user.
    pub fn is_dirty(&self) -> bool {
        self.fields.values().any(|f| f.dirty)
    }

    /// Returns `true` if any field has lost focus at least once.
    pub fn is_touched(&self) -> bool {
        self.fields.values().any(|f| f.touched)
    }

    /// Returns the name of the focused field, if any.
    pub fn active_field(&self) -> Option<&str> {
        self.fields
            .iter()
            .find(|(_, f)| f.active)
            .map(|(name, _)| name.as_str())
    }

    /// Serializes a snapshot of this state. Formatters are omitted.
    pub fn to_json(&self) -> FormResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}
