//! Rendering variants and built-in widgets.
//!
//! A field unit renders through exactly one [`Renderer`], resolved from its
//! configuration when it mounts:
//!
//! - a render function given the field's events and state snapshots;
//! - one of the built-in widgets (text, checkbox, radio, select, textarea);
//! - a user-supplied [`CustomRenderer`].
//!
//! Widgets produce HTML strings. They are a thin layer; how markup reaches a
//! screen is up to the host.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use formsync_core::{FormError, FormResult};

use crate::event::InputType;
use crate::field::{Component, FieldConfig, FieldEvents};
use crate::field_state::FieldState;
use crate::form_state::FormState;
use crate::normalize::normalize_initial;

/// Rendered output.
pub type Markup = String;

/// A render function: `(events, field_state, form_state) -> markup`.
pub type RenderFn = Arc<dyn Fn(&FieldEvents<'_>, &FieldState, &FormState) -> Markup + Send + Sync>;

/// Everything a custom renderer receives.
pub struct CustomProps<'a> {
    /// The field's state at render time.
    pub field_state: &'a FieldState,
    /// The form's state at render time.
    pub form_state: &'a FormState,
    /// Event entry points for the field.
    pub events: &'a FieldEvents<'a>,
    /// The field's configuration, including its original value, extra
    /// attributes and nested children.
    pub config: &'a FieldConfig,
}

impl CustomProps<'_> {
    /// The field name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Extra attributes passed through from configuration.
    pub fn attrs(&self) -> &IndexMap<String, String> {
        &self.config.attrs
    }

    /// Nested markup, if any.
    pub fn children(&self) -> Option<&str> {
        self.config.children.as_deref()
    }
}

/// A user-supplied renderer.
///
/// Implemented for any `Fn(&CustomProps<'_>) -> Markup`.
pub trait CustomRenderer: Send + Sync {
    /// Renders the field.
    fn render(&self, props: &CustomProps<'_>) -> Markup;
}

impl<F> CustomRenderer for F
where
    F: Fn(&CustomProps<'_>) -> Markup + Send + Sync,
{
    fn render(&self, props: &CustomProps<'_>) -> Markup {
        self(props)
    }
}

/// The closed set of rendering variants.
#[derive(Clone)]
pub enum Renderer {
    /// `<input>` of any text-like type.
    Text,
    /// `<input type="checkbox">`.
    Checkbox,
    /// `<input type="radio">`.
    Radio,
    /// `<select>`.
    Select,
    /// `<textarea>`.
    Textarea,
    /// A user-supplied renderer.
    Custom(Arc<dyn CustomRenderer>),
    /// A render function.
    Render(RenderFn),
}

impl Renderer {
    /// Resolves the rendering variant for `config`.
    ///
    /// A render function takes precedence over a component. The component
    /// `"input"` (any case) dispatches on `input_type`.
    ///
    /// # Errors
    ///
    /// - [`FormError::NoRenderVariant`] if neither is configured;
    /// - [`FormError::UnknownKind`] for an unrecognized component string;
    /// - [`FormError::TextareaChildren`] for a textarea given children.
    pub fn resolve(config: &FieldConfig) -> FormResult<Self> {
        if let Some(render) = &config.render {
            return Ok(Self::Render(Arc::clone(render)));
        }

        match &config.component {
            Some(Component::Kind(kind)) if kind.eq_ignore_ascii_case("input") => {
                Ok(match config.input_type.as_deref().map(InputType::from_dom) {
                    Some(InputType::Checkbox) => Self::Checkbox,
                    Some(InputType::Radio) => Self::Radio,
                    _ => Self::Text,
                })
            }
            Some(Component::Kind(kind)) => match kind.as_str() {
                "textarea" if config.children.is_some() => {
                    Err(FormError::TextareaChildren(config.name.clone()))
                }
                "textarea" => Ok(Self::Textarea),
                "select" => Ok(Self::Select),
                _ => Err(FormError::UnknownKind {
                    name: config.name.clone(),
                    kind: kind.clone(),
                }),
            },
            Some(Component::Custom(renderer)) => Ok(Self::Custom(Arc::clone(renderer))),
            None => Err(FormError::NoRenderVariant(config.name.clone())),
        }
    }

    /// The input kind used to normalize change events for this renderer.
    ///
    /// Render functions and custom renderers use the configured
    /// `input_type`, defaulting to text.
    pub fn input_kind(&self, config: &FieldConfig) -> InputType {
        match self {
            Self::Text => InputType::Text,
            Self::Checkbox => InputType::Checkbox,
            Self::Radio => InputType::Radio,
            Self::Select => InputType::Select,
            Self::Textarea => InputType::Textarea,
            Self::Custom(_) | Self::Render(_) => config
                .input_type
                .as_deref()
                .map_or(InputType::Text, InputType::from_dom),
        }
    }

    /// Returns a short name for this variant.
    pub const fn variant_name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::Select => "select",
            Self::Textarea => "textarea",
            Self::Custom(_) => "custom",
            Self::Render(_) => "render",
        }
    }

    /// Renders a field.
    pub fn render(
        &self,
        config: &FieldConfig,
        events: &FieldEvents<'_>,
        field_state: &FieldState,
        form_state: &FormState,
    ) -> Markup {
        let widget: &dyn Widget = match self {
            Self::Render(render) => return render(events, field_state, form_state),
            Self::Custom(renderer) => {
                return renderer.render(&CustomProps {
                    field_state,
                    form_state,
                    events,
                    config,
                })
            }
            Self::Text => &TextInput,
            Self::Checkbox => &CheckboxInput,
            Self::Radio => &RadioInput,
            Self::Select => &Select,
            Self::Textarea => &Textarea,
        };

        widget.render(&WidgetContext {
            name: &config.name,
            type_attr: config.input_type.as_deref().unwrap_or("text"),
            value: field_state.display_value(),
            on_value: normalize_initial(&config.value),
            choices: &config.choices,
            children: config.children.as_deref(),
            attrs: &config.attrs,
        })
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Renderer::{}", self.variant_name())
    }
}

/// What a built-in widget needs to render.
#[derive(Debug)]
pub struct WidgetContext<'a> {
    /// The `name` attribute.
    pub name: &'a str,
    /// The `type` attribute for text-like inputs.
    pub type_attr: &'a str,
    /// The formatted value.
    pub value: String,
    /// The configured value of a checkable control.
    pub on_value: String,
    /// `(value, label)` options for selects.
    pub choices: &'a [(String, String)],
    /// Raw nested markup.
    pub children: Option<&'a str>,
    /// Extra attributes, in configuration order.
    pub attrs: &'a IndexMap<String, String>,
}

impl WidgetContext<'_> {
    fn is_checked(&self) -> bool {
        !self.value.is_empty() && self.value == self.on_value
    }
}

/// A built-in HTML widget.
pub trait Widget: Send + Sync + fmt::Debug {
    /// The input kind this widget produces events for.
    fn input_type(&self) -> InputType;

    /// Renders the widget as an HTML string.
    fn render(&self, ctx: &WidgetContext<'_>) -> Markup;
}

/// Formats attributes as ` key="value"` pairs.
fn render_attrs(attrs: &IndexMap<String, String>) -> String {
    attrs
        .iter()
        .map(|(k, v)| format!(r#" {k}="{}""#, escape(v)))
        .collect()
}

/// Escapes text for use in HTML content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// `<input>` of any text-like type.
#[derive(Debug, Clone, Copy)]
pub struct TextInput;

impl Widget for TextInput {
    fn input_type(&self) -> InputType {
        InputType::Text
    }

    fn render(&self, ctx: &WidgetContext<'_>) -> Markup {
        format!(
            r#"<input type="{}" name="{}" value="{}"{} />"#,
            escape(ctx.type_attr),
            escape(ctx.name),
            escape(&ctx.value),
            render_attrs(ctx.attrs)
        )
    }
}

/// `<input type="checkbox">`, checked when the value equals its "on" value.
#[derive(Debug, Clone, Copy)]
pub struct CheckboxInput;

impl Widget for CheckboxInput {
    fn input_type(&self) -> InputType {
        InputType::Checkbox
    }

    fn render(&self, ctx: &WidgetContext<'_>) -> Markup {
        let checked = if ctx.is_checked() { " checked" } else { "" };
        format!(
            r#"<input type="checkbox" name="{}" value="{}"{checked}{} />"#,
            escape(ctx.name),
            escape(&ctx.on_value),
            render_attrs(ctx.attrs)
        )
    }
}

/// `<input type="radio">`, one per field unit.
#[derive(Debug, Clone, Copy)]
pub struct RadioInput;

impl Widget for RadioInput {
    fn input_type(&self) -> InputType {
        InputType::Radio
    }

    fn render(&self, ctx: &WidgetContext<'_>) -> Markup {
        let checked = if ctx.is_checked() { " checked" } else { "" };
        format!(
            r#"<input type="radio" name="{}" value="{}"{checked}{} />"#,
            escape(ctx.name),
            escape(&ctx.on_value),
            render_attrs(ctx.attrs)
        )
    }
}

/// `<select>` over configured choices, or over raw children when there are
/// none.
#[derive(Debug, Clone, Copy)]
pub struct Select;

impl Widget for Select {
    fn input_type(&self) -> InputType {
        InputType::Select
    }

    fn render(&self, ctx: &WidgetContext<'_>) -> Markup {
        let options = if ctx.choices.is_empty() {
            ctx.children.unwrap_or_default().to_string()
        } else {
            ctx.choices
                .iter()
                .map(|(val, label)| {
                    let selected = if *val == ctx.value { " selected" } else { "" };
                    format!(
                        r#"<option value="{}"{selected}>{}</option>"#,
                        escape(val),
                        escape(label)
                    )
                })
                .collect()
        };
        format!(
            r#"<select name="{}"{}>{options}</select>"#,
            escape(ctx.name),
            render_attrs(ctx.attrs)
        )
    }
}

/// `<textarea>`. The value is the element's content.
#[derive(Debug, Clone, Copy)]
pub struct Textarea;

impl Widget for Textarea {
    fn input_type(&self) -> InputType {
        InputType::Textarea
    }

    fn render(&self, ctx: &WidgetContext<'_>) -> Markup {
        format!(
            r#"<textarea name="{}"{}>{}</textarea>"#,
            escape(ctx.name),
            render_attrs(ctx.attrs),
            escape(&ctx.value)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx<'a>(
        value: &str,
        on_value: &str,
        attrs: &'a IndexMap<String, String>,
        choices: &'a [(String, String)],
    ) -> WidgetContext<'a> {
        WidgetContext {
            name: "f",
            type_attr: "text",
            value: value.to_string(),
            on_value: on_value.to_string(),
            choices,
            children: None,
            attrs,
        }
    }

    #[test]
    fn test_resolve_render_fn_wins() {
        let config = FieldConfig::new("a")
            .component("bogus")
            .render(|_, _, _| String::new());
        assert!(matches!(Renderer::resolve(&config).unwrap(), Renderer::Render(_)));
    }

    #[test]
    fn test_resolve_input_dispatches_on_type() {
        let kinds = [
            (None, "text"),
            (Some("checkbox"), "checkbox"),
            (Some("radio"), "radio"),
            (Some("email"), "text"),
        ];
        for (input_type, expected) in kinds {
            let mut config = FieldConfig::new("a").component("INPUT");
            config.input_type = input_type.map(str::to_string);
            assert_eq!(Renderer::resolve(&config).unwrap().variant_name(), expected);
        }
    }

    #[test]
    fn test_resolve_named_kinds() {
        let select = FieldConfig::new("a").component("select");
        assert_eq!(Renderer::resolve(&select).unwrap().variant_name(), "select");
        let textarea = FieldConfig::new("a").component("textarea");
        assert_eq!(Renderer::resolve(&textarea).unwrap().variant_name(), "textarea");
    }

    #[test]
    fn test_resolve_configuration_errors() {
        let err = Renderer::resolve(&FieldConfig::new("a")).unwrap_err();
        assert!(matches!(err, FormError::NoRenderVariant(_)));

        let err = Renderer::resolve(&FieldConfig::new("a").component("slider")).unwrap_err();
        assert!(matches!(err, FormError::UnknownKind { ref kind, .. } if kind == "slider"));

        let config = FieldConfig::new("a").component("textarea").children("text");
        let err = Renderer::resolve(&config).unwrap_err();
        assert!(matches!(err, FormError::TextareaChildren(_)));
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_input_kind_for_custom() {
        let config = FieldConfig::new("a")
            .custom(|_: &CustomProps<'_>| String::new())
            .input_type("checkbox");
        let renderer = Renderer::resolve(&config).unwrap();
        assert_eq!(renderer.input_kind(&config), InputType::Checkbox);
        assert_eq!(Renderer::Select.input_kind(&config), InputType::Select);
    }

    #[test]
    fn test_text_input_render() {
        let mut attrs = IndexMap::new();
        attrs.insert("id".to_string(), "field-f".to_string());
        attrs.insert("class".to_string(), "wide".to_string());
        let html = TextInput.render(&ctx("a\"b", "", &attrs, &[]));
        assert_eq!(
            html,
            r#"<input type="text" name="f" value="a&quot;b" id="field-f" class="wide" />"#
        );
    }

    #[test]
    fn test_checkbox_checked_state() {
        let attrs = IndexMap::new();
        assert!(CheckboxInput
            .render(&ctx("yes", "yes", &attrs, &[]))
            .contains(" checked"));
        assert!(!CheckboxInput
            .render(&ctx("", "yes", &attrs, &[]))
            .contains(" checked"));
        assert!(!CheckboxInput.render(&ctx("", "", &attrs, &[])).contains(" checked"));
    }

    #[test]
    fn test_radio_checked_when_value_matches() {
        let attrs = IndexMap::new();
        let html = RadioInput.render(&ctx("b", "b", &attrs, &[]));
        assert_eq!(html, r#"<input type="radio" name="f" value="b" checked />"#);
        assert!(!RadioInput.render(&ctx("a", "b", &attrs, &[])).contains("checked"));
    }

    #[test]
    fn test_select_marks_selected() {
        let attrs = IndexMap::new();
        let choices = vec![
            ("a".to_string(), "Alpha".to_string()),
            ("b".to_string(), "Beta".to_string()),
        ];
        let html = Select.render(&ctx("b", "", &attrs, &choices));
        assert!(html.contains(r#"<option value="a">Alpha</option>"#));
        assert!(html.contains(r#"<option value="b" selected>Beta</option>"#));
    }

    #[test]
    fn test_select_falls_back_to_children() {
        let attrs = IndexMap::new();
        let mut c = ctx("", "", &attrs, &[]);
        c.children = Some("<option>x</option>");
        assert_eq!(Select.render(&c), r#"<select name="f"><option>x</option></select>"#);
    }

    #[test]
    fn test_textarea_escapes_content() {
        let attrs = IndexMap::new();
        let html = Textarea.render(&ctx("<b>", "", &attrs, &[]));
        assert_eq!(html, r#"<textarea name="f">&lt;b&gt;</textarea>"#);
    }

    #[test]
    fn test_widget_input_types() {
        assert_eq!(TextInput.input_type(), InputType::Text);
        assert_eq!(CheckboxInput.input_type(), InputType::Checkbox);
        assert_eq!(Textarea.input_type(), InputType::Textarea);
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;"
        );
    }
}
