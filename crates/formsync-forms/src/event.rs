//! Raw input events and update triggers.
//!
//! A [`RawEvent`] is the host's report of what happened on a control: the
//! control's input type, its current raw value and its checked flag. The
//! engine never interprets it directly; [`normalize_incoming`] turns it into a
//! semantic value.
//!
//! [`normalize_incoming`]: crate::normalize::normalize_incoming

use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of input kinds the normalizer distinguishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    /// Any text-like `<input>` (text, email, password, ...).
    #[default]
    Text,
    /// `<input type="checkbox">`.
    Checkbox,
    /// `<input type="radio">`.
    Radio,
    /// `<select>`.
    Select,
    /// `<textarea>`.
    Textarea,
}

impl InputType {
    /// Maps a DOM `type` attribute to an input kind.
    ///
    /// Unknown types behave like text inputs, as browsers do.
    pub fn from_dom(type_attr: &str) -> Self {
        match type_attr.trim().to_ascii_lowercase().as_str() {
            "checkbox" => Self::Checkbox,
            "radio" => Self::Radio,
            "select" | "select-one" => Self::Select,
            "textarea" => Self::Textarea,
            _ => Self::Text,
        }
    }

    /// Returns the lowercase name of this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::Select => "select",
            Self::Textarea => "textarea",
        }
    }

    /// Returns `true` for kinds whose value depends on a checked flag.
    pub const fn is_checkable(self) -> bool {
        matches!(self, Self::Checkbox | Self::Radio)
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The control that produced an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTarget {
    /// The control's reported input type, if the host knows it.
    pub input_type: Option<InputType>,
    /// The control's raw value attribute.
    pub value: Option<String>,
    /// The control's checked flag (meaningful for checkboxes and radios).
    pub checked: bool,
}

/// A raw change, focus or blur event as delivered by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    /// The control the event originated from.
    pub target: EventTarget,
}

impl RawEvent {
    /// An event carrying no target information.
    pub fn blank() -> Self {
        Self::default()
    }

    /// An event from a text-like input holding `value`.
    pub fn input(value: impl Into<String>) -> Self {
        Self {
            target: EventTarget {
                input_type: Some(InputType::Text),
                value: Some(value.into()),
                checked: false,
            },
        }
    }

    /// An event from a checkbox whose "on" value is `value`.
    pub fn checkbox(value: impl Into<String>, checked: bool) -> Self {
        Self {
            target: EventTarget {
                input_type: Some(InputType::Checkbox),
                value: Some(value.into()),
                checked,
            },
        }
    }

    /// An event from a radio button whose value is `value`.
    pub fn radio(value: impl Into<String>, checked: bool) -> Self {
        Self {
            target: EventTarget {
                input_type: Some(InputType::Radio),
                value: Some(value.into()),
                checked,
            },
        }
    }

    /// An event whose target does not report its input type.
    pub fn untyped(value: impl Into<String>, checked: bool) -> Self {
        Self {
            target: EventTarget {
                input_type: None,
                value: Some(value.into()),
                checked,
            },
        }
    }
}

/// What caused a field update. Passed to the per-field and per-form hooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldTrigger {
    /// The user changed the control's value.
    Change(RawEvent),
    /// The control gained focus.
    Focus(RawEvent),
    /// The control lost focus.
    Blur(RawEvent),
    /// The field's configuration changed its `value` or `checked` prop.
    PropsChanged,
}

impl FieldTrigger {
    /// Returns the underlying raw event, if the trigger came from the host.
    pub const fn event(&self) -> Option<&RawEvent> {
        match self {
            Self::Change(e) | Self::Focus(e) | Self::Blur(e) => Some(e),
            Self::PropsChanged => None,
        }
    }

    /// Returns `true` if this trigger is a user value change.
    pub const fn is_change(&self) -> bool {
        matches!(self, Self::Change(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_type_from_dom() {
        assert_eq!(InputType::from_dom("checkbox"), InputType::Checkbox);
        assert_eq!(InputType::from_dom("RADIO"), InputType::Radio);
        assert_eq!(InputType::from_dom("select-one"), InputType::Select);
        assert_eq!(InputType::from_dom("email"), InputType::Text);
        assert_eq!(InputType::from_dom(""), InputType::Text);
    }

    #[test]
    fn test_input_type_display() {
        assert_eq!(InputType::Textarea.to_string(), "textarea");
        assert!(InputType::Checkbox.is_checkable());
        assert!(!InputType::Select.is_checkable());
    }

    #[test]
    fn test_raw_event_constructors() {
        let e = RawEvent::checkbox("yes", true);
        assert_eq!(e.target.input_type, Some(InputType::Checkbox));
        assert_eq!(e.target.value.as_deref(), Some("yes"));
        assert!(e.target.checked);

        assert_eq!(RawEvent::blank().target.value, None);
        assert_eq!(RawEvent::untyped("x", false).target.input_type, None);
    }

    #[test]
    fn test_trigger_event_access() {
        let t = FieldTrigger::Change(RawEvent::input("a"));
        assert!(t.is_change());
        assert_eq!(t.event(), Some(&RawEvent::input("a")));
        assert_eq!(FieldTrigger::PropsChanged.event(), None);
    }
}
