//! Per-field state and partial updates.
//!
//! A [`FieldState`] is owned by the form aggregate and only ever changed by
//! applying a [`FieldStatePatch`]. A patch is a shallow merge: every `None`
//! member leaves the corresponding state member untouched.

use indexmap::IndexMap;
use serde::Serialize;

use crate::normalize::{read_value, Formatter};

/// The original configuration props of a field, merged with its raw value.
pub type FieldProps = IndexMap<String, serde_json::Value>;

/// The live state of one registered field.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FieldState {
    /// The semantic value as stored; never rewritten by `format` or `trim`.
    pub value: String,
    /// Changed through user interaction since registration.
    pub dirty: bool,
    /// Has gained focus at least once.
    pub visited: bool,
    /// Has lost focus at least once.
    pub touched: bool,
    /// Currently focused.
    pub active: bool,
    /// The current validation message, if any.
    pub error: Option<String>,
    /// Value → display transform.
    #[serde(skip)]
    pub format: Formatter,
    /// Strip surrounding whitespace on read.
    pub trim: bool,
    /// Configuration props exposed to the rendering layer.
    pub props: FieldProps,
}

impl FieldState {
    /// Builds the state of a freshly registered field.
    ///
    /// `default_trim` applies when the initial state does not set `trim`.
    pub fn from_initial(initial: InitialFieldState, default_trim: bool) -> Self {
        Self {
            value: initial.value,
            format: initial.format,
            trim: initial.trim.unwrap_or(default_trim),
            props: initial.props,
            ..Self::default()
        }
    }

    /// Refreshes the configuration-derived members on re-registration.
    ///
    /// Interaction flags and the current error are kept.
    pub fn refresh(&mut self, initial: InitialFieldState, default_trim: bool) {
        self.value = initial.value;
        self.format = initial.format;
        self.trim = initial.trim.unwrap_or(default_trim);
        self.props = initial.props;
    }

    /// The value as seen by validators and consumers: formatted, then trimmed
    /// if `trim` is set.
    pub fn read_value(&self) -> String {
        read_value(&self.value, &self.format, self.trim)
    }

    /// The formatted value shown in a control. Never trimmed.
    pub fn display_value(&self) -> String {
        self.format.apply(&self.value)
    }

    /// Returns `true` if the field currently carries a validation message.
    pub const fn has_error(&self) -> bool {
        self.error.is_some()
    }
}

/// The configuration-derived part of a field's state, computed by a field
/// unit from its props and submitted at registration.
#[derive(Debug, Clone, Default)]
pub struct InitialFieldState {
    /// Normalized initial value.
    pub value: String,
    /// Value → display transform.
    pub format: Formatter,
    /// Trim on read; `None` defers to the aggregate's default.
    pub trim: Option<bool>,
    /// Configuration props.
    pub props: FieldProps,
}

/// A partial [`FieldState`]. Members left as `None` are preserved on merge.
///
/// The validation message is not part of a patch: only the validation
/// pipeline writes `error`.
#[derive(Debug, Clone, Default)]
pub struct FieldStatePatch {
    /// New semantic value.
    pub value: Option<String>,
    /// New dirty flag.
    pub dirty: Option<bool>,
    /// New visited flag.
    pub visited: Option<bool>,
    /// New touched flag.
    pub touched: Option<bool>,
    /// New active flag.
    pub active: Option<bool>,
    /// New format transform.
    pub format: Option<Formatter>,
    /// New trim flag.
    pub trim: Option<bool>,
    /// When `trim` is `None`, reset the trim flag to the form default
    /// instead of keeping it.
    pub reset_trim: bool,
    /// New props.
    pub props: Option<FieldProps>,
}

impl FieldStatePatch {
    /// An empty patch. Applying it changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// The patch submitted for a user value change: `{ value, dirty: true }`.
    pub fn changed(value: impl Into<String>) -> Self {
        Self::new().value(value).dirty(true)
    }

    /// The patch submitted on focus: `{ visited: true, active: true }`.
    pub fn focused() -> Self {
        Self::new().visited(true).active(true)
    }

    /// The patch submitted on blur: `{ active: false, touched: true }`.
    pub fn blurred() -> Self {
        Self::new().active(false).touched(true)
    }

    /// Sets the value.
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Sets the dirty flag.
    #[must_use]
    pub fn dirty(mut self, dirty: bool) -> Self {
        self.dirty = Some(dirty);
        self
    }

    /// Sets the visited flag.
    #[must_use]
    pub fn visited(mut self, visited: bool) -> Self {
        self.visited = Some(visited);
        self
    }

    /// Sets the touched flag.
    #[must_use]
    pub fn touched(mut self, touched: bool) -> Self {
        self.touched = Some(touched);
        self
    }

    /// Sets the active flag.
    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    /// Sets the format transform.
    #[must_use]
    pub fn format(mut self, format: Formatter) -> Self {
        self.format = Some(format);
        self
    }

    /// Sets the trim flag.
    #[must_use]
    pub fn trim(mut self, trim: bool) -> Self {
        self.trim = Some(trim);
        self
    }

    /// Sets the props.
    #[must_use]
    pub fn props(mut self, props: FieldProps) -> Self {
        self.props = Some(props);
        self
    }

    /// Returns `true` if applying this patch would change nothing.
    pub const fn is_empty(&self) -> bool {
        self.value.is_none()
            && self.dirty.is_none()
            && self.visited.is_none()
            && self.touched.is_none()
            && self.active.is_none()
            && self.format.is_none()
            && self.trim.is_none()
            && !self.reset_trim
            && self.props.is_none()
    }

    /// Shallow-merges this patch into `state`.
    ///
    /// `default_trim` is used only when the patch asks for `reset_trim`.
    pub fn apply(self, state: &mut FieldState, default_trim: bool) {
        if let Some(value) = self.value {
            state.value = value;
        }
        if let Some(dirty) = self.dirty {
            state.dirty = dirty;
        }
        if let Some(visited) = self.visited {
            state.visited = visited;
        }
        if let Some(touched) = self.touched {
            state.touched = touched;
        }
        if let Some(active) = self.active {
            state.active = active;
        }
        if let Some(format) = self.format {
            state.format = format;
        }
        match self.trim {
            Some(trim) => state.trim = trim,
            None if self.reset_trim => state.trim = default_trim,
            None => {}
        }
        if let Some(props) = self.props {
            state.props = props;
        }
    }
}

impl From<InitialFieldState> for FieldStatePatch {
    /// Resubmits configuration-derived state; interaction flags are untouched.
    ///
    /// An unset `trim` resolves to the form default, as on re-registration.
    fn from(initial: InitialFieldState) -> Self {
        Self {
            value: Some(initial.value),
            format: Some(initial.format),
            trim: initial.trim,
            reset_trim: true,
            props: Some(initial.props),
            ..Self::default()
        }
    }
}
