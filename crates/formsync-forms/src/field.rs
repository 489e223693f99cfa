//! Field units: per-field controllers bridging a host and the aggregate.
//!
//! A [`FieldUnit`] is mounted from a [`FieldConfig`] and an explicit handle
//! to the form's [`FormCapabilities`]. It keeps no copy of its state; every
//! read goes back to the aggregate, so a unit whose field is not registered
//! simply renders nothing.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use formsync_core::{FormError, FormResult};

use crate::aggregate::{FieldUpdate, FormCapabilities};
use crate::event::{FieldTrigger, InputType, RawEvent};
use crate::field_state::{FieldProps, FieldState, FieldStatePatch, InitialFieldState};
use crate::form_state::FormState;
use crate::normalize::{normalize_incoming, normalize_initial_for, Formatter, InitialValue};
use crate::render::{CustomProps, CustomRenderer, Markup, RenderFn, Renderer};

/// The per-field change hook: `(field_state, form_state, trigger)`.
pub type FieldHook = Arc<dyn Fn(&FieldState, &FormState, &FieldTrigger) + Send + Sync>;

/// The `component` option: a built-in kind name or a custom renderer.
#[derive(Clone)]
pub enum Component {
    /// `"input"`, `"select"` or `"textarea"`.
    Kind(String),
    /// A user-supplied renderer.
    Custom(Arc<dyn CustomRenderer>),
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kind(kind) => f.debug_tuple("Kind").field(kind).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Configuration of one field unit.
///
/// # Examples
///
/// ```
/// use formsync_forms::field::FieldConfig;
///
/// let config = FieldConfig::new("agree")
///     .input("checkbox")
///     .value("yes")
///     .checked(false)
///     .attr("id", "field-agree");
/// assert_eq!(config.name, "agree");
/// assert_eq!(config.props()["value"], "yes");
/// ```
#[derive(Clone, Default)]
pub struct FieldConfig {
    /// The field name. Required and unique within a form.
    pub name: String,
    /// The initial value, or the "on" value of a checkable control.
    pub value: InitialValue,
    /// The initial checked flag of a checkable control.
    pub checked: Option<bool>,
    /// Strip whitespace on read. `None` defers to the form's settings.
    pub trim: Option<bool>,
    /// Value → display transform.
    pub format: Option<Formatter>,
    /// Built-in kind or custom renderer.
    pub component: Option<Component>,
    /// Render function. Takes precedence over `component`.
    pub render: Option<RenderFn>,
    /// The DOM `type` of an `"input"` component.
    pub input_type: Option<String>,
    /// Nested markup.
    pub children: Option<Markup>,
    /// `(value, label)` options for selects.
    pub choices: Vec<(String, String)>,
    /// Extra attributes passed through to the renderer.
    pub attrs: IndexMap<String, String>,
    /// Per-field change hook.
    pub on_change: Option<FieldHook>,
}

impl FieldConfig {
    /// Starts a configuration for `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the initial value.
    #[must_use]
    pub fn value(mut self, value: impl Into<InitialValue>) -> Self {
        self.value = value.into();
        self
    }

    /// Sets the initial checked flag.
    #[must_use]
    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = Some(checked);
        self
    }

    /// Sets whether the value is trimmed on read.
    #[must_use]
    pub fn trim(mut self, trim: bool) -> Self {
        self.trim = Some(trim);
        self
    }

    /// Sets the value → display transform.
    #[must_use]
    pub fn format(mut self, format: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        self.format = Some(Formatter::new(format));
        self
    }

    /// Selects a built-in component by name.
    #[must_use]
    pub fn component(mut self, kind: impl Into<String>) -> Self {
        self.component = Some(Component::Kind(kind.into()));
        self
    }

    /// Shorthand for the `"input"` component with the given DOM type.
    #[must_use]
    pub fn input(self, input_type: impl Into<String>) -> Self {
        self.component("input").input_type(input_type)
    }

    /// Sets the DOM `type`.
    #[must_use]
    pub fn input_type(mut self, input_type: impl Into<String>) -> Self {
        self.input_type = Some(input_type.into());
        self
    }

    /// Renders through a custom renderer function.
    #[must_use]
    pub fn custom<F>(self, renderer: F) -> Self
    where
        F: Fn(&CustomProps<'_>) -> Markup + Send + Sync + 'static,
    {
        self.custom_renderer(Arc::new(renderer))
    }

    /// Renders through a shared custom renderer.
    #[must_use]
    pub fn custom_renderer(mut self, renderer: Arc<dyn CustomRenderer>) -> Self {
        self.component = Some(Component::Custom(renderer));
        self
    }

    /// Renders through a function of `(events, field_state, form_state)`.
    #[must_use]
    pub fn render<F>(mut self, render: F) -> Self
    where
        F: Fn(&FieldEvents<'_>, &FieldState, &FormState) -> Markup + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(render));
        self
    }

    /// Sets nested markup.
    #[must_use]
    pub fn children(mut self, children: impl Into<Markup>) -> Self {
        self.children = Some(children.into());
        self
    }

    /// Adds a select option.
    #[must_use]
    pub fn choice(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.choices.push((value.into(), label.into()));
        self
    }

    /// Adds an extra attribute.
    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Sets the per-field change hook.
    #[must_use]
    pub fn on_change<F>(mut self, hook: F) -> Self
    where
        F: Fn(&FieldState, &FormState, &FieldTrigger) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(hook));
        self
    }

    /// The props exposed through [`FieldState::props`]: extra attributes,
    /// then `name`, `type` and `checked` when set, then the raw `value`.
    pub fn props(&self) -> FieldProps {
        let mut props: FieldProps = self
            .attrs
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();
        props.insert("name".to_string(), self.name.clone().into());
        if let Some(input_type) = &self.input_type {
            props.insert("type".to_string(), input_type.clone().into());
        }
        if let Some(checked) = self.checked {
            props.insert("checked".to_string(), checked.into());
        }
        props.insert("value".to_string(), self.value.to_json());
        props
    }

    /// Computes the configuration-derived state for a field of `kind`.
    pub fn initial_state(&self, kind: InputType) -> InitialFieldState {
        InitialFieldState {
            value: normalize_initial_for(kind, &self.value, self.checked),
            format: self.format.clone().unwrap_or_default(),
            trim: self.trim,
            props: self.props(),
        }
    }
}

impl fmt::Debug for FieldConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldConfig")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("checked", &self.checked)
            .field("trim", &self.trim)
            .field("component", &self.component)
            .field("has_render", &self.render.is_some())
            .field("input_type", &self.input_type)
            .field("children", &self.children)
            .field("choices", &self.choices)
            .field("attrs", &self.attrs)
            .field("has_on_change", &self.on_change.is_some())
            .finish_non_exhaustive()
    }
}

/// A mounted field.
pub struct FieldUnit {
    config: FieldConfig,
    renderer: Renderer,
    kind: InputType,
    form: Arc<dyn FormCapabilities>,
}

impl FieldUnit {
    /// Validates `config`, resolves its renderer and registers the field.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::MissingName`] for a blank name, or the
    /// configuration error reported by [`Renderer::resolve`].
    pub fn mount(config: FieldConfig, form: Arc<dyn FormCapabilities>) -> FormResult<Self> {
        if config.name.trim().is_empty() {
            return Err(FormError::MissingName);
        }
        let renderer = Renderer::resolve(&config)?;
        let kind = renderer.input_kind(&config);

        form.register_field(&config.name, config.initial_state(kind));
        tracing::debug!(
            field = %config.name,
            renderer = renderer.variant_name(),
            kind = %kind,
            "field mounted"
        );

        Ok(Self {
            config,
            renderer,
            kind,
            form,
        })
    }

    /// Applies a new configuration.
    ///
    /// When `value` and `checked` are unchanged, the configuration is stored
    /// and nothing is submitted: no validation runs and no observer is
    /// notified. Otherwise the initial state is recomputed and submitted as
    /// an update, preserving interaction flags.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the name changes or the new
    /// configuration does not resolve to a renderer, and
    /// [`FormError::NotRegistered`] if the field was unregistered meanwhile.
    pub fn receive_props(&mut self, next: FieldConfig) -> FormResult<Option<FieldUpdate>> {
        if next.name != self.config.name {
            return Err(FormError::ConfigurationError(format!(
                "field '{}' cannot be renamed to '{}'",
                self.config.name, next.name
            )));
        }
        let renderer = Renderer::resolve(&next)?;
        let kind = renderer.input_kind(&next);
        let unchanged = next.value == self.config.value && next.checked == self.config.checked;

        self.config = next;
        self.renderer = renderer;
        self.kind = kind;

        if unchanged {
            tracing::trace!(field = %self.config.name, "props unchanged; update suppressed");
            return Ok(None);
        }

        let patch = FieldStatePatch::from(self.config.initial_state(kind));
        self.update_field_state(patch, FieldTrigger::PropsChanged)
            .map(Some)
    }

    /// Handles a raw change event: submits `{ value, dirty: true }`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::NotRegistered`] if the field is not registered.
    pub fn handle_change(&self, event: RawEvent) -> FormResult<FieldUpdate> {
        let value = normalize_incoming(&event, self.kind);
        self.update_field_state(FieldStatePatch::changed(value), FieldTrigger::Change(event))
    }

    /// Handles focus: submits `{ visited: true, active: true }`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::NotRegistered`] if the field is not registered.
    pub fn handle_focus(&self, event: RawEvent) -> FormResult<FieldUpdate> {
        self.update_field_state(FieldStatePatch::focused(), FieldTrigger::Focus(event))
    }

    /// Handles blur: submits `{ active: false, touched: true }`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::NotRegistered`] if the field is not registered.
    pub fn handle_blur(&self, event: RawEvent) -> FormResult<FieldUpdate> {
        self.update_field_state(FieldStatePatch::blurred(), FieldTrigger::Blur(event))
    }

    /// Submits `patch`, then fires the field hook, then the form hook.
    fn update_field_state(
        &self,
        patch: FieldStatePatch,
        trigger: FieldTrigger,
    ) -> FormResult<FieldUpdate> {
        let name = &self.config.name;
        let update = self.form.set_field_state(name, patch)?;
        if let Some(hook) = &self.config.on_change {
            hook(&update.field, &update.form, &trigger);
        }
        self.form.on_change(name, &trigger);
        Ok(update)
    }

    /// The event entry points handed to renderers.
    pub const fn events(&self) -> FieldEvents<'_> {
        FieldEvents { unit: self }
    }

    /// The current state of this field, or `None` if it is not registered.
    pub fn field_state(&self) -> Option<FieldState> {
        self.form.field_state(&self.config.name)
    }

    /// Renders the field, or returns `None` if it is not registered.
    pub fn render(&self) -> Option<Markup> {
        let form_state = self.form.get_form_state();
        let field_state = form_state.field(&self.config.name)?;
        Some(
            self.renderer
                .render(&self.config, &self.events(), field_state, &form_state),
        )
    }

    /// Unregisters the field. Returns `true` if it was registered.
    pub fn unmount(self) -> bool {
        tracing::debug!(field = %self.config.name, "field unmounted");
        self.form.unregister_field(&self.config.name)
    }

    /// The field name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// The current configuration.
    pub const fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// The input kind used to normalize change events.
    pub const fn kind(&self) -> InputType {
        self.kind
    }

    /// The resolved renderer.
    pub const fn renderer(&self) -> &Renderer {
        &self.renderer
    }
}

impl fmt::Debug for FieldUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldUnit")
            .field("config", &self.config)
            .field("renderer", &self.renderer)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Event entry points of one field, as handed to renderers.
#[derive(Clone, Copy)]
pub struct FieldEvents<'a> {
    unit: &'a FieldUnit,
}

impl FieldEvents<'_> {
    /// Forwards a change event.
    ///
    /// # Errors
    ///
    /// See [`FieldUnit::handle_change`].
    pub fn on_change(&self, event: RawEvent) -> FormResult<FieldUpdate> {
        self.unit.handle_change(event)
    }

    /// Forwards a focus event.
    ///
    /// # Errors
    ///
    /// See [`FieldUnit::handle_focus`].
    pub fn on_focus(&self, event: RawEvent) -> FormResult<FieldUpdate> {
        self.unit.handle_focus(event)
    }

    /// Forwards a blur event.
    ///
    /// # Errors
    ///
    /// See [`FieldUnit::handle_blur`].
    pub fn on_blur(&self, event: RawEvent) -> FormResult<FieldUpdate> {
        self.unit.handle_blur(event)
    }

    /// The field name.
    pub fn name(&self) -> &str {
        self.unit.name()
    }
}

impl fmt::Debug for FieldEvents<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldEvents")
            .field("name", &self.unit.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::aggregate::FormAggregate;

    fn mount(config: FieldConfig) -> (Arc<FormAggregate>, FieldUnit) {
        let form = FormAggregate::new("test").into_shared();
        let unit = FieldUnit::mount(config, form.clone()).unwrap();
        (form, unit)
    }

    #[test]
    fn test_mount_registers() {
        let (form, unit) = mount(FieldConfig::new("name").input("text").value("Ada"));
        assert_eq!(form.field_state("name").unwrap().value, "Ada");
        assert_eq!(unit.kind(), InputType::Text);
    }

    #[test]
    fn test_mount_rejects_blank_name() {
        let form = FormAggregate::new("test").into_shared();
        let err = FieldUnit::mount(FieldConfig::new("  ").input("text"), form.clone()).unwrap_err();
        assert!(matches!(err, FormError::MissingName));
        assert!(form.get_form_state().is_empty());
    }

    #[test]
    fn test_mount_rejects_unresolvable_renderer() {
        let form = FormAggregate::new("test").into_shared();
        let err = FieldUnit::mount(FieldConfig::new("a"), form.clone()).unwrap_err();
        assert!(err.is_configuration_error());
        assert!(form.field_state("a").is_none());
    }

    #[test]
    fn test_props_include_attrs_and_raw_value() {
        let config = FieldConfig::new("flag")
            .attr("id", "field-flag")
            .input("checkbox")
            .value(true)
            .checked(true);
        let props = config.props();
        assert_eq!(
            props.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["id", "name", "type", "checked", "value"]
        );
        assert_eq!(props["value"], serde_json::json!(true));
    }

    #[test]
    fn test_checkbox_initial_value() {
        let (form, _unit) = mount(
            FieldConfig::new("agree")
                .input("checkbox")
                .value("yes")
                .checked(false),
        );
        assert_eq!(form.field_state("agree").unwrap().value, "");

        let (form, _unit) = mount(
            FieldConfig::new("agree")
                .input("checkbox")
                .value("yes")
                .checked(true),
        );
        assert_eq!(form.field_state("agree").unwrap().value, "yes");
    }

    #[test]
    fn test_boolean_initial_value_is_stringified() {
        let (form, _unit) = mount(FieldConfig::new("flag").input("text").value(false));
        assert_eq!(form.field_state("flag").unwrap().value, "false");
    }

    #[test]
    fn test_change_focus_blur_patches() {
        let (_form, unit) = mount(FieldConfig::new("name").input("text"));

        let update = unit.handle_focus(RawEvent::blank()).unwrap();
        assert!(update.field.visited && update.field.active);

        let update = unit.handle_change(RawEvent::input("Ada")).unwrap();
        assert_eq!(update.field.value, "Ada");
        assert!(update.field.dirty);
        assert!(update.field.active);

        let update = unit.handle_blur(RawEvent::blank()).unwrap();
        assert!(update.field.touched);
        assert!(!update.field.active);
    }

    #[test]
    fn test_field_hook_receives_trigger() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let config = FieldConfig::new("name")
            .input("text")
            .on_change(move |field: &FieldState, _: &FormState, trigger: &FieldTrigger| {
                sink.lock()
                    .unwrap()
                    .push((field.value.clone(), trigger.is_change()));
            });
        let (_form, unit) = mount(config);
        unit.handle_change(RawEvent::input("x")).unwrap();
        unit.handle_focus(RawEvent::blank()).unwrap();
        assert_eq!(
            *seen.lock().unwrap(),
            vec![("x".to_string(), true), ("x".to_string(), false)]
        );
    }

    #[test]
    fn test_receive_props_suppresses_unchanged() {
        let (form, mut unit) = mount(FieldConfig::new("name").input("text").value("a"));
        let before = form.get_form_state().revision;

        let next = FieldConfig::new("name").input("text").value("a").attr("class", "x");
        assert!(unit.receive_props(next).unwrap().is_none());
        assert_eq!(form.get_form_state().revision, before);
        assert!(unit.config().attrs.contains_key("class"));
    }

    #[test]
    fn test_receive_props_resubmits_changed_value() {
        let (form, mut unit) = mount(FieldConfig::new("name").input("text").value("a"));
        unit.handle_blur(RawEvent::blank()).unwrap();

        let update = unit
            .receive_props(FieldConfig::new("name").input("text").value("b"))
            .unwrap()
            .unwrap();
        assert_eq!(update.field.value, "b");
        assert!(update.field.touched, "flags survive prop changes");
        assert!(!update.field.dirty);
        assert_eq!(form.field_state("name").unwrap().props["value"], "b");
    }

    #[test]
    fn test_receive_props_without_trim_resets_to_default() {
        let (form, mut unit) = mount(
            FieldConfig::new("name")
                .input("text")
                .trim(true)
                .value("x"),
        );
        assert!(form.field_state("name").unwrap().trim);

        let next = FieldConfig::new("name").input("text").value(" y ");
        let update = unit.receive_props(next).unwrap().unwrap();
        assert!(!update.field.trim);
        assert_eq!(form.values()["name"], " y ");
    }

    #[test]
    fn test_receive_props_rejects_rename() {
        let (_form, mut unit) = mount(FieldConfig::new("name").input("text"));
        let err = unit
            .receive_props(FieldConfig::new("other").input("text"))
            .unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_render_builtin_text() {
        let (_form, unit) = mount(
            FieldConfig::new("name")
                .input("text")
                .value("Ada")
                .format(str::to_uppercase),
        );
        assert_eq!(
            unit.render().unwrap(),
            r#"<input type="text" name="name" value="ADA" />"#
        );
    }

    #[test]
    fn test_render_function_gets_events() {
        let config = FieldConfig::new("email").render(|events, field, form| {
            format!("{}={} ({} fields)", events.name(), field.value, form.len())
        });
        let (_form, unit) = mount(config);
        assert_eq!(unit.render().unwrap(), "email= (1 fields)");
    }

    #[test]
    fn test_render_custom_gets_config() {
        let config = FieldConfig::new("color")
            .value("red")
            .attr("data-x", "1")
            .custom(|props: &CustomProps<'_>| {
                format!(
                    "{}:{}:{}:{}",
                    props.name(),
                    props.field_state.value,
                    props.config.value.to_json(),
                    props.attrs()["data-x"]
                )
            });
        let (_form, unit) = mount(config);
        assert_eq!(unit.render().unwrap(), r#"color:red:"red":1"#);
    }

    #[test]
    fn test_unmounted_field_renders_nothing() {
        let (form, unit) = mount(FieldConfig::new("phone").input("text"));
        form.unregister_field("phone");
        assert!(unit.field_state().is_none());
        assert!(unit.render().is_none());
        assert!(matches!(
            unit.handle_change(RawEvent::input("1")),
            Err(FormError::NotRegistered(_))
        ));
    }

    #[test]
    fn test_unmount_unregisters() {
        let (form, unit) = mount(FieldConfig::new("a").input("text"));
        assert!(unit.unmount());
        assert!(form.field_state("a").is_none());
    }
}
