//! Value normalization.
//!
//! Pure functions that turn raw control data and configured initial values
//! into semantic field values. The semantic value of every field is a
//! `String`: checkboxes carry their "on" value or the empty string, booleans
//! are stringified, and anything unset becomes the empty string. None of
//! these functions can fail.

use std::fmt;
use std::sync::Arc;

use crate::event::{InputType, RawEvent};

/// A configured initial value, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InitialValue {
    /// No value was configured.
    #[default]
    Unset,
    /// A string value.
    Text(String),
    /// A boolean value.
    Bool(bool),
}

impl InitialValue {
    /// Returns the raw value as JSON, as exposed through field props.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Unset => serde_json::Value::Null,
            Self::Text(s) => serde_json::Value::String(s.clone()),
            Self::Bool(b) => serde_json::Value::Bool(*b),
        }
    }
}

impl From<&str> for InitialValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for InitialValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for InitialValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for InitialValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Unset, Into::into)
    }
}

/// A value → displayed value transform. Identity by default.
#[derive(Clone)]
pub struct Formatter(Arc<dyn Fn(&str) -> String + Send + Sync>);

impl Formatter {
    /// Wraps a transform function.
    pub fn new(f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// The identity transform.
    pub fn identity() -> Self {
        Self::new(|value: &str| value.to_string())
    }

    /// Applies the transform.
    pub fn apply(&self, value: &str) -> String {
        (self.0)(value)
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Formatter(..)")
    }
}

/// Converts a raw event into the semantic value for a field of `field_kind`.
///
/// The input type reported by the event target takes precedence; the field's
/// configured kind is used when the target does not report one. A checkbox
/// yields its value when checked and `""` otherwise. Every other kind,
/// radios included, yields the raw value verbatim regardless of `checked`.
/// A missing raw value yields `""`.
pub fn normalize_incoming(event: &RawEvent, field_kind: InputType) -> String {
    let target = &event.target;
    let kind = target.input_type.unwrap_or(field_kind);
    let raw = target.value.clone().unwrap_or_default();

    match kind {
        InputType::Checkbox => {
            if target.checked {
                raw
            } else {
                String::new()
            }
        }
        InputType::Radio | InputType::Text | InputType::Select | InputType::Textarea => raw,
    }
}

/// Normalizes a configured initial value.
///
/// Booleans are stringified so equality and serialization stay consistent.
pub fn normalize_initial(value: &InitialValue) -> String {
    match value {
        InitialValue::Unset => String::new(),
        InitialValue::Text(s) => s.clone(),
        InitialValue::Bool(b) => b.to_string(),
    }
}

/// Normalizes an initial value for a field of a given kind.
///
/// For checkable kinds with an explicit `checked` prop, the value prop is the
/// "on" value: it becomes the semantic value only when checked. Otherwise this
/// is [`normalize_initial`].
pub fn normalize_initial_for(
    kind: InputType,
    value: &InitialValue,
    checked: Option<bool>,
) -> String {
    if kind.is_checkable() && checked == Some(false) {
        String::new()
    } else {
        normalize_initial(value)
    }
}

/// Reads a stored value: applies `format`, then strips surrounding
/// whitespace when `trim` is set.
pub fn read_value(value: &str, format: &Formatter, trim: bool) -> String {
    let formatted = format.apply(value);
    if trim {
        formatted.trim().to_string()
    } else {
        formatted
    }
}
