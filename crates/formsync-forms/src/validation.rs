//! Validation pipeline for form processing.
//!
//! A validator is a pure function from the current field values to a map of
//! error messages. The pipeline runs it against the whole form and writes the
//! result back onto every field:
//!
//! - a name present in the result gets that message as its `error`;
//! - a name absent from the result has its `error` cleared.
//!
//! Errors are level signals, not edges: a stale message from an earlier pass
//! never survives a pass that no longer reports it.

use indexmap::IndexMap;

use crate::form_state::{FormState, FormValues};

/// Error messages keyed by field name.
pub type ValidationErrors = IndexMap<String, String>;

/// A whole-form validation function.
///
/// Implemented for any `Fn(&FormValues) -> ValidationErrors`, so plain
/// closures can be used directly.
///
/// # Examples
///
/// ```
/// use formsync_forms::validation::{Validate, ValidationErrors};
/// use formsync_forms::form_state::FormValues;
///
/// let validator = |values: &FormValues| {
///     let mut errors = ValidationErrors::new();
///     if values.get("name").map_or(true, String::is_empty) {
///         errors.insert("name".to_string(), "Required".to_string());
///     }
///     errors
/// };
///
/// let mut values = FormValues::new();
/// values.insert("name".to_string(), String::new());
/// assert_eq!(validator.validate(&values)["name"], "Required");
/// ```
pub trait Validate: Send + Sync {
    /// Validates `values`, returning a message per invalid field.
    fn validate(&self, values: &FormValues) -> ValidationErrors;
}

impl<F> Validate for F
where
    F: Fn(&FormValues) -> ValidationErrors + Send + Sync,
{
    fn validate(&self, values: &FormValues) -> ValidationErrors {
        self(values)
    }
}

/// Runs `validator` over the read values of `state` and stores the result.
///
/// An absent validator reports no errors. Messages for names that are not
/// registered are kept in [`FormState::errors`] but attach to no field.
pub fn run_validation(validator: Option<&dyn Validate>, state: &mut FormState) {
    let errors = validator.map_or_else(ValidationErrors::new, |v| v.validate(&state.values()));

    for (name, field) in &mut state.fields {
        field.error = errors.get(name).cloned();
    }

    tracing::trace!(errors = errors.len(), "validation pass complete");
    state.errors = errors;
}
